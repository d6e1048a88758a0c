// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

use crate::canvas::Canvas;
use crate::config::{StarConfig, StarMetrics};
use crate::driver::Scene;
use crate::palette::Rgb;
use crate::pool::StarPool;
use crate::renderer::Renderer;
use crate::simulator::Simulator;
use crate::sprite::{Drawable, StarSprite};

/// Running totals for `--perf-stats`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldStats {
    pub updates: u64,
    pub recycled: u64,
    pub drawn: u64,
    pub culled: u64,
}

/// The falling-star scene: a pool, the image it is drawn with, and counters.
pub struct StarField {
    pool: StarPool,
    sprite: StarSprite,
    stats: FieldStats,
}

impl StarField {
    pub fn new(config: StarConfig, sprite: StarSprite, density: f32) -> Self {
        let metrics = StarMetrics::new(&config, sprite.intrinsic_size(), density);
        Self {
            pool: StarPool::create(config, metrics),
            sprite,
            stats: FieldStats::default(),
        }
    }

    /// Lay the pool out for a new surface size. Same size twice is a no-op.
    pub fn on_size_changed(&mut self, width: u32, height: u32) {
        if self.pool.is_laid_out() && self.pool.view_size() == (width, height) {
            return;
        }
        self.pool.layout(width, height);
    }

    /// Re-scatter every star over the current surface.
    pub fn relayout(&mut self) {
        let (w, h) = self.pool.view_size();
        self.pool.layout(w, h);
    }

    pub fn set_tint(&mut self, tint: Rgb) {
        self.sprite.set_tint(tint);
    }

    pub fn pool(&self) -> &StarPool {
        &self.pool
    }

    pub fn stats(&self) -> FieldStats {
        self.stats
    }
}

impl Scene for StarField {
    fn is_laid_out(&self) -> bool {
        self.pool.is_laid_out()
    }

    fn update(&mut self, delta: Duration) {
        let recycled = Simulator::update(&mut self.pool, delta.as_secs_f32());
        self.stats.updates += 1;
        self.stats.recycled += recycled as u64;
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        let drawn = Renderer::draw(canvas, &self.pool, &mut self.sprite);
        self.stats.drawn += drawn as u64;
        self.stats.culled += (self.pool.len() - drawn) as u64;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::canvas::tests::RecordingCanvas;

    fn field() -> StarField {
        StarField::new(StarConfig::default(), StarSprite::new(Rgb::WHITE), 1.0)
    }

    #[test]
    fn metrics_come_from_the_sprite() {
        let f = field();
        assert_eq!(f.pool().metrics().base_size, 24.0);
        assert_eq!(f.pool().metrics().base_speed, 200.0);
        assert_eq!(f.pool().len(), 32);
        assert!(!f.is_laid_out());
    }

    #[test]
    fn same_size_does_not_reseed_layout() {
        let mut f = field();
        f.on_size_changed(800, 1200);
        let before = f.pool().stars().to_vec();
        f.on_size_changed(800, 1200);
        assert_eq!(f.pool().stars(), &before[..]);

        f.on_size_changed(640, 480);
        assert_eq!(f.pool().view_size(), (640, 480));
        assert_ne!(f.pool().stars(), &before[..]);
    }

    #[test]
    fn zero_size_leaves_field_unlaid() {
        let mut f = field();
        f.on_size_changed(0, 480);
        assert!(!f.is_laid_out());
        f.on_size_changed(640, 480);
        assert!(f.is_laid_out());
    }

    #[test]
    fn stats_track_updates_and_draws() {
        let mut f = field();
        f.on_size_changed(800, 1200);
        let mut canvas = RecordingCanvas::default();
        for _ in 0..5 {
            f.update(Duration::from_millis(16));
            f.draw(&mut canvas);
        }
        let s = f.stats();
        assert_eq!(s.updates, 5);
        assert_eq!(s.drawn + s.culled, 5 * 32);
        assert_eq!(canvas.draws.len() as u64, s.drawn);
        assert_eq!(canvas.save_count(), 1);
    }

    #[test]
    fn huge_step_recycles_every_star_once() {
        let mut f = field();
        f.on_size_changed(800, 1200);
        f.update(Duration::from_secs(3600));
        assert_eq!(f.stats().recycled, 32);
    }

    #[test]
    fn relayout_keeps_size() {
        let mut f = field();
        f.on_size_changed(320, 240);
        f.relayout();
        assert!(f.is_laid_out());
        assert_eq!(f.pool().view_size(), (320, 240));
    }
}
