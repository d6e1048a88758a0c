// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;

use clap::Parser;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  starfall --duration 0 --color-bg black --color white --fps 60 --density 1";

/// Size of one terminal cell in virtual pixels.
pub const CELL_WIDTH_PX: f32 = 8.0;
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Fixed tuning of the star field.
///
/// Every launch uses the same values, including the seed, so the animation
/// replays the same sequence each time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarConfig {
    pub count: usize,
    pub seed: u64,
    /// Base drift speed in density-independent pixels per second.
    pub base_speed_dp_per_s: f32,
    /// `scale = scale_min_part + scale_random_part * r`
    pub scale_min_part: f32,
    pub scale_random_part: f32,
    /// `alpha = alpha_scale_part * scale + alpha_random_part * r`
    pub alpha_scale_part: f32,
    pub alpha_random_part: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 32,
            seed: 1337,
            base_speed_dp_per_s: 200.0,
            scale_min_part: 0.45,
            scale_random_part: 0.55,
            alpha_scale_part: 0.5,
            alpha_random_part: 0.5,
        }
    }
}

impl StarConfig {
    pub fn scale_max(&self) -> f32 {
        self.scale_min_part + self.scale_random_part
    }

    pub fn alpha_max(&self) -> f32 {
        self.alpha_scale_part * self.scale_max() + self.alpha_random_part
    }
}

/// Pixel quantities derived from the image asset and the display density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarMetrics {
    /// Half-extent of the image at scale 1.
    pub base_size: f32,
    /// Pixels per second at `alpha * scale == 1`.
    pub base_speed: f32,
}

impl StarMetrics {
    pub fn new(config: &StarConfig, intrinsic: (u32, u32), density: f32) -> Self {
        Self {
            base_size: intrinsic.0.max(intrinsic.1) as f32 / 2.0,
            base_speed: config.base_speed_dp_per_s * density,
        }
    }
}

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        let mut out = String::with_capacity(DEFAULT_PARAMS_USAGE.len() + 32);
        for (i, line) in DEFAULT_PARAMS_USAGE.lines().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            if i == 0 {
                out.push_str("\x1b[1;36m");
                out.push_str(line);
                out.push_str("\x1b[0m");
            } else if let Some(rest) = line.strip_prefix("  starfall") {
                out.push_str("  \x1b[1;34mstarfall\x1b[0m");
                out.push_str(rest);
            } else {
                out.push_str(line);
            }
        }
        out
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
    #[value(name = "transparent")]
    Transparent,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "starfall", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'c',
        long = "color",
        default_value = "white",
        help_heading = "APPEARANCE",
        help = "Star color theme (see --list-colors)"
    )]
    pub color: String,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, default-background, transparent)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: auto-detected from COLORTERM/TERM"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "ascii",
        help_heading = "APPEARANCE",
        help = "Draw stars with ASCII characters only"
    )]
    pub ascii: bool,

    #[arg(
        short = 'D',
        long = "density",
        default_value_t = 1.0,
        help_heading = "DISPLAY",
        help = "Display density factor applied to star speed (min 0.25 max 8)"
    )]
    pub density: f32,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "DISPLAY",
        help = "Target refresh rate (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "perf-stats",
        help_heading = "GENERAL",
        help = "Print an animation summary on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List available color themes and exit"
    )]
    pub list_colors: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

pub fn print_list_colors() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE COLOR THEMES:\x1b[0m");
        println!("\x1b[2mNOTE: Use only the VALUE (left side) with --color.\x1b[0m");
    } else {
        println!("AVAILABLE COLOR THEMES:");
        println!("NOTE: Use only the VALUE (left side) with --color.");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    println!("white        Plain white stars");
    println!("gold         Warm gold stars (alias: yellow)");
    println!("ice          Pale blue stars (alias: blue)");
    println!("rose         Pink stars (alias: pink)");
    println!("mint         Soft green stars (alias: green)");
    println!("nebula       Violet stars on a dark purple sky");
    println!("dusk         Orange stars on a deep blue sky");
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn default_config_bounds() {
        let c = StarConfig::default();
        assert_eq!(c.count, 32);
        assert_eq!(c.seed, 1337);
        assert!((c.scale_max() - 1.0).abs() < 1e-6);
        assert!((c.alpha_max() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn metrics_use_larger_half_extent_and_density() {
        let c = StarConfig::default();
        let m = StarMetrics::new(&c, (40, 100), 2.0);
        assert_eq!(m.base_size, 50.0);
        assert_eq!(m.base_speed, 400.0);
    }

    #[test]
    fn args_defaults() {
        let args = Args::try_parse_from(["starfall"]).unwrap();
        assert_eq!(args.color, "white");
        assert_eq!(args.color_bg, ColorBg::Black);
        assert_eq!(args.density, 1.0);
        assert_eq!(args.fps, 60.0);
        assert!(args.duration.is_none());
        assert!(!args.ascii);
    }

    #[test]
    fn args_short_flags() {
        let args =
            Args::try_parse_from(["starfall", "-c", "gold", "-D", "2.5", "-f", "30", "-s"])
                .unwrap();
        assert_eq!(args.color, "gold");
        assert_eq!(args.density, 2.5);
        assert_eq!(args.fps, 30.0);
        assert!(args.screensaver);
    }
}
