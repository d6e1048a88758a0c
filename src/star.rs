// Copyright (c) 2026 rezky_nightky

/// State of a single star.
///
/// `y` is the center of the star and grows while it drifts down; `x` is fixed
/// between re-initializations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub alpha: f32,
    /// Downward velocity in pixels per second.
    pub speed: f32,
}

impl Star {
    /// Half-extent of the star in pixels.
    pub fn size(&self, base_size: f32) -> f32 {
        self.scale * base_size
    }

    /// True once the star's lowest point is below the bottom edge.
    pub fn has_left(&self, base_size: f32, view_height: f32) -> bool {
        self.y + self.size(base_size) > view_height
    }

    /// True when no part of the star overlaps `[0, view_height]` vertically.
    pub fn is_outside(&self, base_size: f32, view_height: f32) -> bool {
        let size = self.size(base_size);
        self.y + size < 0.0 || self.y - size > view_height
    }
}
