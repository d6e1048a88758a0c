// Copyright (c) 2026 rezky_nightky

use crate::canvas::{Bounds, Canvas, SaveGuard};
use crate::pool::StarPool;
use crate::sprite::Drawable;

/// Draws a star pool with a single shared image.
pub struct Renderer;

impl Renderer {
    /// Draw every visible star and return how many were drawn.
    ///
    /// Stars fully above or below the view are skipped. There is no
    /// horizontal culling: `x` was sampled inside the view width.
    pub fn draw<D: Drawable + ?Sized>(
        canvas: &mut dyn Canvas,
        pool: &StarPool,
        image: &mut D,
    ) -> usize {
        let base_size = pool.metrics().base_size;
        let view_height = pool.view_size().1 as f32;

        let mut drawn = 0usize;
        for star in pool.stars() {
            if star.is_outside(base_size, view_height) {
                continue;
            }
            let star_size = star.size(base_size);

            let mut guard = SaveGuard::new(canvas);
            guard.translate(star.x, star.y);

            // Tumble with vertical travel. Not clamped: a star far past the
            // bottom turns more than once.
            let progress = (star.y + star_size) / view_height;
            guard.rotate(360.0 * progress);

            let size = star_size.round() as i32;
            image.set_bounds(Bounds::new(-size, -size, size, size));
            image.set_alpha(alpha_to_u8(star.alpha));
            image.draw(&mut *guard);
            drawn += 1;
        }
        drawn
    }
}

fn alpha_to_u8(alpha: f32) -> u8 {
    (255.0 * alpha.clamp(0.0, 1.0)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::tests::RecordingCanvas;
    use crate::config::{StarConfig, StarMetrics};
    use crate::palette::Rgb;
    use crate::sprite::StarSprite;
    use crate::star::Star;

    /// Drawable that records what it was asked to draw.
    #[derive(Default)]
    struct Probe {
        bounds: Bounds,
        alpha: u8,
        calls: std::cell::RefCell<Vec<(Bounds, u8, usize)>>,
    }

    impl Drawable for Probe {
        fn intrinsic_size(&self) -> (u32, u32) {
            (100, 100)
        }
        fn set_bounds(&mut self, bounds: Bounds) {
            self.bounds = bounds;
        }
        fn set_alpha(&mut self, alpha: u8) {
            self.alpha = alpha;
        }
        fn draw(&self, canvas: &mut dyn Canvas) {
            self.calls
                .borrow_mut()
                .push((self.bounds, self.alpha, canvas.save_count()));
        }
    }

    fn pool_with(stars: &[Star], height: u32) -> StarPool {
        let config = StarConfig {
            count: stars.len(),
            ..StarConfig::default()
        };
        let mut pool = StarPool::create(
            config,
            StarMetrics {
                base_size: 50.0,
                base_speed: 200.0,
            },
        );
        pool.layout(1000, height);
        pool.stars_mut().copy_from_slice(stars);
        pool
    }

    fn star(x: f32, y: f32, scale: f32, alpha: f32) -> Star {
        Star {
            x,
            y,
            scale,
            alpha,
            speed: 0.0,
        }
    }

    #[test]
    fn culled_stars_never_reach_the_image() {
        let pool = pool_with(
            &[
                star(10.0, -51.0, 1.0, 1.0),  // above
                star(20.0, 2051.0, 1.0, 1.0), // below
                star(30.0, -49.0, 1.0, 1.0),  // touching top
                star(40.0, 2049.0, 1.0, 1.0), // touching bottom
                star(50.0, 1000.0, 0.5, 0.5),
            ],
            2000,
        );
        let mut canvas = RecordingCanvas::default();
        let mut probe = Probe::default();
        let drawn = Renderer::draw(&mut canvas, &pool, &mut probe);
        assert_eq!(drawn, 3);
        assert_eq!(probe.calls.borrow().len(), 3);
    }

    #[test]
    fn each_star_is_drawn_inside_its_own_save() {
        let pool = pool_with(
            &[star(10.0, 100.0, 1.0, 1.0), star(20.0, 200.0, 1.0, 1.0)],
            2000,
        );
        let mut canvas = RecordingCanvas::default();
        let mut probe = Probe::default();
        Renderer::draw(&mut canvas, &pool, &mut probe);
        for &(_, _, depth) in probe.calls.borrow().iter() {
            assert_eq!(depth, 2);
        }
        assert_eq!(canvas.save_count(), 1);
        assert_eq!(canvas.matrix(), crate::canvas::Affine::IDENTITY);
    }

    #[test]
    fn bounds_are_centered_rounded_half_extent_and_alpha_scaled() {
        let pool = pool_with(&[star(10.0, 100.0, 0.505, 0.5)], 2000);
        let mut canvas = RecordingCanvas::default();
        let mut probe = Probe::default();
        Renderer::draw(&mut canvas, &pool, &mut probe);
        let (bounds, alpha, _) = probe.calls.borrow()[0];
        assert_eq!(bounds, Bounds::new(-25, -25, 25, 25));
        assert_eq!(alpha, 128);
    }

    #[test]
    fn alpha_is_clamped_before_scaling() {
        assert_eq!(alpha_to_u8(1.7), 255);
        assert_eq!(alpha_to_u8(-0.2), 0);
        assert_eq!(alpha_to_u8(0.0), 0);
        assert_eq!(alpha_to_u8(1.0), 255);
    }

    #[test]
    fn transform_translates_then_rotates_by_progress() {
        // progress = (y + size) / height = (950 + 50) / 2000 = 0.5 -> 180 degrees
        let pool = pool_with(&[star(100.0, 950.0, 1.0, 1.0)], 2000);
        let mut canvas = RecordingCanvas::default();
        let mut sprite = StarSprite::new(Rgb::WHITE);
        Renderer::draw(&mut canvas, &pool, &mut sprite);
        let (m, _, _) = canvas.draws[0];
        assert!((m.tx - 100.0).abs() < 1e-3);
        assert!((m.ty - 950.0).abs() < 1e-3);
        assert!((m.a + 1.0).abs() < 1e-5);
        assert!((m.d + 1.0).abs() < 1e-5);
    }

    #[test]
    fn rotation_past_the_bottom_is_not_wrapped() {
        // Drawn while overlapping the bottom edge: progress > 1.
        let mut expected = crate::canvas::Affine::IDENTITY;
        expected.translate(0.0, 1990.0);
        expected.rotate(360.0 * ((1990.0 + 50.0) / 2000.0));

        let pool = pool_with(&[star(0.0, 1990.0, 1.0, 1.0)], 2000);
        let mut canvas = RecordingCanvas::default();
        let mut sprite = StarSprite::new(Rgb::WHITE);
        Renderer::draw(&mut canvas, &pool, &mut sprite);
        let (m, _, _) = canvas.draws[0];
        assert_eq!(m, expected);
    }
}
