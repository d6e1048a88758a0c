// Copyright (c) 2026 rezky_nightky

mod canvas;
mod cell;
mod config;
mod driver;
mod field;
mod frame;
mod glyphs;
mod palette;
mod pool;
mod renderer;
mod rng;
mod runtime;
mod simulator;
mod sprite;
mod star;
mod terminal;

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{
    color_enabled_stdout, default_params_usage_for_help, print_list_colors, Args, ColorBg,
    StarConfig, CELL_HEIGHT_PX, CELL_WIDTH_PX,
};
use crate::driver::{AnimationDriver, DriverState, PauseControl, Scene, SystemClock};
use crate::field::StarField;
use crate::frame::{Frame, FrameCanvas};
use crate::glyphs::{default_to_ascii, Glyphs};
use crate::palette::{build_palette, Palette};
use crate::runtime::{ColorMode, Theme};
use crate::sprite::StarSprite;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("STARFALL_BUILD")
}

fn git_sha() -> &'static str {
    env!("STARFALL_GIT_SHA")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_f32_range(name: &str, v: f32, min: f32, max: f32) -> f32 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }
    if term == "linux" || term.starts_with("vt") {
        return ColorMode::Color16;
    }

    ColorMode::Color256
}

fn parse_color_mode(m: u16) -> Result<ColorMode, String> {
    match m {
        0 => Ok(ColorMode::Mono),
        16 => Ok(ColorMode::Color16),
        8 | 256 => Ok(ColorMode::Color256),
        24 | 32 => Ok(ColorMode::TrueColor),
        _ => Err(format!(
            "invalid --colormode: {} (allowed: 0,16,8/256,24/32)",
            m
        )),
    }
}

fn detect_color_mode(args: &Args) -> ColorMode {
    if let Some(m) = args.colormode {
        return match parse_color_mode(m) {
            Ok(mode) => mode,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        };
    }

    detect_color_mode_auto()
}

fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Mono => "mono",
        ColorMode::Color16 => "16-color",
    }
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "white" => Ok(Theme::White),
        "gold" | "yellow" => Ok(Theme::Gold),
        "ice" | "blue" => Ok(Theme::Ice),
        "rose" | "pink" => Ok(Theme::Rose),
        "mint" | "green" => Ok(Theme::Mint),
        "nebula" => Ok(Theme::Nebula),
        "dusk" => Ok(Theme::Dusk),
        _ => Err(format!("invalid color: {} (see --list-colors)", s)),
    }
}

/// Surface size in virtual pixels for a terminal of `cols x rows` cells.
fn surface_px(cols: u16, rows: u16) -> (u32, u32) {
    (
        (cols as f32 * CELL_WIDTH_PX) as u32,
        (rows as f32 * CELL_HEIGHT_PX) as u32,
    )
}

/// Draw the field as it stands, without advancing time.
fn redraw_still(
    term: &mut Terminal,
    frame: &mut Frame,
    field: &mut StarField,
    palette: &Palette,
    glyphs: Glyphs,
    color_mode: ColorMode,
) -> std::io::Result<()> {
    frame.clear_with_bg(palette.bg);
    if field.is_laid_out() {
        let mut canvas = FrameCanvas::new(
            frame,
            glyphs,
            palette.backdrop,
            (CELL_WIDTH_PX, CELL_HEIGHT_PX),
        );
        field.draw(&mut canvas);
    }
    term.draw(frame, color_mode)?;
    Ok(())
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }
    cmd.build();

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_colors {
        print_list_colors();
        return Ok(());
    }

    if args.check_bitcolor {
        let colorterm = env::var("COLORTERM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        let auto = detect_color_mode_auto();
        let effective = detect_color_mode(&args);

        println!("BITCOLOR CHECK:");
        println!(
            "  COLORTERM: {}",
            if colorterm.is_empty() {
                "(unset)"
            } else {
                &colorterm
            }
        );
        println!(
            "  TERM: {}",
            if term.is_empty() { "(unset)" } else { &term }
        );
        println!("  auto_detected: {}", color_mode_label(auto));
        if args.colormode.is_some() {
            println!("  forced: {}", color_mode_label(effective));
        }
        println!("  effective: {}", color_mode_label(effective));
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        if git_sha().is_empty() {
            println!("Build: {}", build_info());
        } else {
            println!("Build: {} ({})", build_info(), git_sha());
        }
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let color_mode = detect_color_mode(&args);
    let glyphs = Glyphs::new(args.ascii || default_to_ascii());

    let target_fps = require_f64_range("--fps", args.fps, 1.0, 240.0);
    let density = require_f32_range("--density", args.density, 0.25, 8.0);
    let duration_s = args.duration.and_then(|s| {
        if !s.is_finite() {
            eprintln!("failed to apply --duration {} (must be a finite number)", s);
            std::process::exit(1);
        }
        if s > 0.0 {
            return Some(require_f64_range("--duration", s, 0.1, 86400.0));
        }
        None
    });

    let mut theme = match parse_theme(&args.color) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let default_background = matches!(
        args.color_bg,
        ColorBg::DefaultBackground | ColorBg::Transparent
    );
    let mut palette = build_palette(theme, default_background);

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;

    let mut field = StarField::new(
        StarConfig::default(),
        StarSprite::new(palette.tint),
        density,
    );
    let (pw, ph) = surface_px(w, h);
    field.on_size_changed(pw, ph);

    let mut frame = Frame::new(w, h, palette.bg);

    let mut driver = AnimationDriver::new(SystemClock::default());
    driver.attach();
    let mut pause_control = PauseControl::default();

    let start_time = Instant::now();
    let end_time = duration_s.map(|s| start_time + Duration::from_secs_f64(s));

    let target_period = Duration::from_secs_f64(1.0 / target_fps);
    let mut next_frame = Instant::now();
    let mut running = true;

    let mut perf_frames: u64 = 0;
    let mut perf_drawn_frames: u64 = 0;
    let mut perf_cells_written: u64 = 0;
    let mut perf_pauses: u64 = 0;
    let mut perf_work_sum_s: f64 = 0.0;
    let mut perf_work_max_s: f32 = 0.0;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;
        let mut needs_still_redraw = false;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => {
                        pending_resize = Some((nw, nh));
                    }
                    Event::FocusLost => {
                        if pause_control.focus_lost(&mut driver) {
                            perf_pauses += 1;
                        }
                    }
                    Event::FocusGained => {
                        pause_control.focus_gained(&mut driver);
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if args.screensaver {
                            running = false;
                            break;
                        }

                        match k.code {
                            KeyCode::Esc | KeyCode::Char('q') => running = false,
                            KeyCode::Char('p') => {
                                if pause_control.toggle(&mut driver) {
                                    perf_pauses += 1;
                                }
                            }
                            KeyCode::Char(' ') => {
                                field.relayout();
                                needs_still_redraw = true;
                            }
                            KeyCode::Char('c') => {
                                theme = theme.next();
                                palette = build_palette(theme, default_background);
                                field.set_tint(palette.tint);
                                needs_still_redraw = true;
                            }
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }

            if !running || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            frame = Frame::new(nw, nh, palette.bg);
            let (pw, ph) = surface_px(nw, nh);
            field.on_size_changed(pw, ph);
            term.force_full_redraw();
            needs_still_redraw = true;
        }

        let work_start = Instant::now();
        let mut did_draw = false;
        if driver.state() == DriverState::Running {
            frame.clear_with_bg(palette.bg);
            let ticked = {
                let mut canvas = FrameCanvas::new(
                    &mut frame,
                    glyphs,
                    palette.backdrop,
                    (CELL_WIDTH_PX, CELL_HEIGHT_PX),
                );
                driver.on_frame(&mut field, &mut canvas).is_some()
            };
            if ticked {
                perf_cells_written += term.draw(&frame, color_mode)? as u64;
                did_draw = true;
            }
        } else if needs_still_redraw {
            redraw_still(&mut term, &mut frame, &mut field, &palette, glyphs, color_mode)?;
            did_draw = true;
        }
        let work_s = work_start.elapsed().as_secs_f32();

        if args.perf_stats {
            perf_frames = perf_frames.saturating_add(1);
            if did_draw {
                perf_drawn_frames = perf_drawn_frames.saturating_add(1);
            }
            perf_work_sum_s += work_s as f64;
            perf_work_max_s = perf_work_max_s.max(work_s);
        }

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    let play_time = driver.play_time();
    let dropped_ticks = driver.dropped_ticks();
    driver.detach();

    if args.perf_stats {
        drop(term);
        let elapsed = start_time.elapsed();
        let elapsed_s = elapsed.as_secs_f64().max(0.000_001);

        let frames = perf_frames.max(1);
        let avg_work_ms = (perf_work_sum_s / frames as f64) * 1000.0;
        let avg_fps = (perf_frames as f64) / elapsed_s;
        let drawn_ratio = (perf_drawn_frames as f64) / (perf_frames as f64).max(1.0);
        let stats = field.stats();
        let star_draws = (stats.drawn + stats.culled).max(1);

        println!("PERF STATS:");
        println!("  elapsed_s: {:.3}", elapsed_s);
        println!("  play_time_s: {:.3}", play_time.as_secs_f64());
        println!("  target_fps: {:.3}", target_fps);
        println!("  avg_fps: {:.3}", avg_fps);
        println!("  frames: {}", perf_frames);
        println!(
            "  drawn_frames: {} ({:.1}%)",
            perf_drawn_frames,
            drawn_ratio * 100.0
        );
        println!("  ticks_dropped_before_layout: {}", dropped_ticks);
        println!("  sim_updates: {}", stats.updates);
        println!("  stars_recycled: {}", stats.recycled);
        println!(
            "  stars_drawn: {} culled: {} ({:.1}% visible)",
            stats.drawn,
            stats.culled,
            (stats.drawn as f64) / (star_draws as f64) * 100.0
        );
        println!("  cells_written: {}", perf_cells_written);
        println!("  pauses: {}", perf_pauses);
        println!("  avg_work_ms: {:.3}", avg_work_ms);
        println!("  max_work_ms: {:.3}", perf_work_max_s as f64 * 1000.0);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_names_and_aliases() {
        assert_eq!(parse_theme("white"), Ok(Theme::White));
        assert_eq!(parse_theme(" Gold "), Ok(Theme::Gold));
        assert_eq!(parse_theme("yellow"), Ok(Theme::Gold));
        assert_eq!(parse_theme("blue"), Ok(Theme::Ice));
        assert_eq!(parse_theme("PINK"), Ok(Theme::Rose));
        assert_eq!(parse_theme("green"), Ok(Theme::Mint));
        assert_eq!(parse_theme("dusk"), Ok(Theme::Dusk));
        assert!(parse_theme("plaid").is_err());
    }

    #[test]
    fn every_listed_theme_parses() {
        for name in ["white", "gold", "ice", "rose", "mint", "nebula", "dusk"] {
            assert!(parse_theme(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn colormode_values() {
        assert_eq!(parse_color_mode(0), Ok(ColorMode::Mono));
        assert_eq!(parse_color_mode(16), Ok(ColorMode::Color16));
        assert_eq!(parse_color_mode(8), Ok(ColorMode::Color256));
        assert_eq!(parse_color_mode(256), Ok(ColorMode::Color256));
        assert_eq!(parse_color_mode(24), Ok(ColorMode::TrueColor));
        assert_eq!(parse_color_mode(32), Ok(ColorMode::TrueColor));
        assert!(parse_color_mode(7).is_err());
    }

    #[test]
    fn surface_is_cells_times_cell_size() {
        assert_eq!(surface_px(80, 24), (640, 384));
        assert_eq!(surface_px(0, 24), (0, 384));
    }
}
