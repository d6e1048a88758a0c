// Copyright (c) 2026 rezky_nightky

use crate::canvas::{Bounds, Canvas};
use crate::palette::Rgb;

const STAR_ART: [&str; 12] = [
    ".....##.....",
    ".....##.....",
    "....####....",
    "....####....",
    "############",
    ".##########.",
    "..########..",
    "...######...",
    "...######...",
    "..###..###..",
    ".##......##.",
    "##........##",
];

/// Pixels of intrinsic size per mask texel.
const STAR_TEXEL_PX: u32 = 4;

/// One-bit coverage mask sampled with nearest-neighbour lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl AlphaMask {
    /// Build a mask from rows of art where `#` is opaque.
    pub fn from_art(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut bits = vec![false; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                bits[y * width + x] = ch == '#';
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample at normalized `(u, v)`; anything outside `[0, 1)` is clear.
    pub fn sample(&self, u: f32, v: f32) -> bool {
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return false;
        }
        let x = ((u * self.width as f32) as usize).min(self.width.saturating_sub(1));
        let y = ((v * self.height as f32) as usize).min(self.height.saturating_sub(1));
        self.bits.get(y * self.width + x).copied().unwrap_or(false)
    }
}

/// An image that can be positioned, faded and drawn onto a canvas.
///
/// Bounds and alpha are mutable state on the drawable itself, so one
/// instance shared across stars must be used strictly one star at a time.
pub trait Drawable {
    fn intrinsic_size(&self) -> (u32, u32);
    fn set_bounds(&mut self, bounds: Bounds);
    fn set_alpha(&mut self, alpha: u8);
    fn draw(&self, canvas: &mut dyn Canvas);
}

/// The star image every particle is drawn with.
#[derive(Clone, Debug)]
pub struct StarSprite {
    mask: AlphaMask,
    intrinsic: (u32, u32),
    bounds: Bounds,
    alpha: u8,
    tint: Rgb,
}

impl StarSprite {
    pub fn new(tint: Rgb) -> Self {
        let mask = AlphaMask::from_art(&STAR_ART);
        let intrinsic = (
            mask.width() as u32 * STAR_TEXEL_PX,
            mask.height() as u32 * STAR_TEXEL_PX,
        );
        Self {
            mask,
            intrinsic,
            bounds: Bounds::default(),
            alpha: 255,
            tint,
        }
    }

    pub fn set_tint(&mut self, tint: Rgb) {
        self.tint = tint;
    }
}

impl Drawable for StarSprite {
    fn intrinsic_size(&self) -> (u32, u32) {
        self.intrinsic
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if self.alpha == 0 || self.bounds.is_empty() {
            return;
        }
        canvas.draw_mask(&self.mask, self.bounds, self.tint, self.alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::tests::RecordingCanvas;

    #[test]
    fn star_art_is_square_and_sized() {
        let s = StarSprite::new(Rgb::WHITE);
        assert_eq!(s.intrinsic_size(), (48, 48));
    }

    #[test]
    fn mask_sampling() {
        let m = AlphaMask::from_art(&["#.", ".#"]);
        assert!(m.sample(0.1, 0.1));
        assert!(!m.sample(0.9, 0.1));
        assert!(m.sample(0.9, 0.9));
        assert!(!m.sample(1.0, 0.9));
        assert!(!m.sample(-0.1, 0.1));
    }

    #[test]
    fn star_center_is_opaque_and_corner_clear() {
        let m = AlphaMask::from_art(&STAR_ART);
        assert!(m.sample(0.5, 0.5));
        assert!(!m.sample(0.01, 0.01));
    }

    #[test]
    fn draw_forwards_bounds_and_alpha() {
        let mut s = StarSprite::new(Rgb::WHITE);
        s.set_bounds(Bounds::new(-5, -5, 5, 5));
        s.set_alpha(128);
        let mut c = RecordingCanvas::default();
        s.draw(&mut c);
        assert_eq!(c.draws.len(), 1);
        assert_eq!(c.draws[0].1, Bounds::new(-5, -5, 5, 5));
        assert_eq!(c.draws[0].2, 128);
    }

    #[test]
    fn invisible_or_empty_draws_nothing() {
        let mut s = StarSprite::new(Rgb::WHITE);
        let mut c = RecordingCanvas::default();
        s.set_bounds(Bounds::new(-5, -5, 5, 5));
        s.set_alpha(0);
        s.draw(&mut c);
        s.set_alpha(255);
        s.set_bounds(Bounds::default());
        s.draw(&mut c);
        assert!(c.draws.is_empty());
    }
}
