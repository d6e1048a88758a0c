// Copyright (c) 2026 rezky_nightky

use crate::config::{StarConfig, StarMetrics};
use crate::rng::RandomSequence;
use crate::star::Star;

/// Fixed ring of star slots plus the policy that (re)initializes them.
///
/// The slot count is set at creation and never changes. Slots are reused in
/// place when their star leaves the view.
#[derive(Clone, Debug)]
pub struct StarPool {
    config: StarConfig,
    metrics: StarMetrics,
    stars: Vec<Star>,
    mt: RandomSequence,
    width: u32,
    height: u32,
    laid_out: bool,
}

impl StarPool {
    pub fn create(config: StarConfig, metrics: StarMetrics) -> Self {
        Self {
            stars: vec![Star::default(); config.count],
            mt: RandomSequence::new(config.seed),
            config,
            metrics,
            width: 0,
            height: 0,
            laid_out: false,
        }
    }

    /// Adopt a new viewport size and initialize every star for it.
    ///
    /// An empty viewport is recorded but leaves the pool un-laid-out.
    pub fn layout(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        if width == 0 || height == 0 {
            self.laid_out = false;
            return;
        }
        for i in 0..self.stars.len() {
            self.initialize_star(i);
        }
        self.laid_out = true;
    }

    /// Randomize the star in slot `index` for the current viewport.
    ///
    /// Draw order is part of the determinism contract: scale, x, y offset,
    /// alpha.
    pub fn initialize_star(&mut self, index: usize) {
        let width = self.width as f32;
        let height = self.height as f32;
        let StarMetrics {
            base_size,
            base_speed,
        } = self.metrics;
        let c = &self.config;
        let Some(star) = self.stars.get_mut(index) else {
            return;
        };

        star.scale = c.scale_min_part + c.scale_random_part * self.mt.next_float();
        star.x = width * self.mt.next_float();

        // One half-extent in, staggered by up to a quarter of the view height.
        star.y = 0.0;
        star.y += star.scale * base_size;
        star.y += height * self.mt.next_float() / 4.0;

        star.alpha = c.alpha_scale_part * star.scale + c.alpha_random_part * self.mt.next_float();
        star.speed = base_speed * star.alpha * star.scale;
        debug_assert!(star.scale <= c.scale_max() + f32::EPSILON);
        debug_assert!(star.alpha <= c.alpha_max() + f32::EPSILON);
    }

    pub(crate) fn stars_mut(&mut self) -> &mut [Star] {
        &mut self.stars
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn view_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_laid_out(&self) -> bool {
        self.laid_out
    }

    pub fn metrics(&self) -> StarMetrics {
        self.metrics
    }
}
