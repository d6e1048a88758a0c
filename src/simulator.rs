// Copyright (c) 2026 rezky_nightky

use crate::pool::StarPool;

/// Moves stars along their drift and recycles those that left the view.
pub struct Simulator;

impl Simulator {
    /// Advance every star by `delta_seconds` and return how many were recycled.
    ///
    /// A slot recycles at most once per call no matter how large the delta.
    pub fn update(pool: &mut StarPool, delta_seconds: f32) -> usize {
        let base_size = pool.metrics().base_size;
        let view_height = pool.view_size().1 as f32;

        let mut recycled = 0usize;
        for i in 0..pool.len() {
            let left = {
                let star = &mut pool.stars_mut()[i];
                star.y += star.speed * delta_seconds;
                star.has_left(base_size, view_height)
            };
            if left {
                pool.initialize_star(i);
                recycled += 1;
            }
        }
        recycled
    }
}

#[cfg(test)]
mod tests {
    use super::Simulator;
    use crate::config::{StarConfig, StarMetrics};
    use crate::pool::StarPool;
    use crate::star::Star;

    fn scenario_pool() -> StarPool {
        let mut pool = StarPool::create(
            StarConfig::default(),
            StarMetrics {
                base_size: 50.0,
                base_speed: 200.0,
            },
        );
        pool.layout(1000, 2000);
        pool
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let mut pool = scenario_pool();
        let before = pool.stars().to_vec();
        assert_eq!(Simulator::update(&mut pool, 0.0), 0);
        assert_eq!(pool.stars(), &before[..]);
    }

    #[test]
    fn stars_move_down_by_speed_times_delta() {
        let mut pool = scenario_pool();
        let before = pool.stars().to_vec();
        Simulator::update(&mut pool, 0.5);
        for (a, b) in before.iter().zip(pool.stars()) {
            assert_eq!(b.y, a.y + a.speed * 0.5);
            assert_eq!(b.x, a.x);
            assert!(b.y > a.y);
        }
    }

    #[test]
    fn y_never_decreases_unless_recycled() {
        let mut pool = scenario_pool();
        for _ in 0..600 {
            let before = pool.stars().to_vec();
            Simulator::update(&mut pool, 1.0 / 60.0);
            for (a, b) in before.iter().zip(pool.stars()) {
                assert!(b.speed >= 0.0);
                let recycled = b.scale != a.scale || b.x != a.x;
                if !recycled {
                    assert!(b.y >= a.y);
                }
            }
        }
    }

    #[test]
    fn recycled_star_is_stable_under_zero_delta() {
        let mut pool = scenario_pool();
        let mut recycled = 0;
        for _ in 0..10_000 {
            recycled = Simulator::update(&mut pool, 1.0 / 60.0);
            if recycled > 0 {
                break;
            }
        }
        assert!(recycled > 0);

        let after_recycle = pool.stars().to_vec();
        assert_eq!(Simulator::update(&mut pool, 0.0), 0);
        assert_eq!(pool.stars(), &after_recycle[..]);
    }

    #[test]
    fn huge_delta_recycles_each_slot_once() {
        let mut pool = scenario_pool();
        let recycled = Simulator::update(&mut pool, 1.0e6);
        assert_eq!(recycled, pool.len());
        for s in pool.stars() {
            assert!(s.y <= s.scale * 50.0 + 500.0);
        }
    }

    #[test]
    fn same_seed_same_deltas_give_identical_runs() {
        let mut a = scenario_pool();
        let mut b = scenario_pool();
        let deltas = [0.016, 0.033, 0.0, 0.25, 0.016, 1.5, 0.008];
        for _ in 0..50 {
            for &dt in &deltas {
                Simulator::update(&mut a, dt);
                Simulator::update(&mut b, dt);
                let bits = |s: &Star| {
                    [
                        s.x.to_bits(),
                        s.y.to_bits(),
                        s.scale.to_bits(),
                        s.alpha.to_bits(),
                        s.speed.to_bits(),
                    ]
                };
                for (sa, sb) in a.stars().iter().zip(b.stars()) {
                    assert_eq!(bits(sa), bits(sb));
                }
            }
        }
    }

    #[test]
    fn one_second_at_sixty_hz() {
        let mut pool = scenario_pool();
        let initial = pool.stars().to_vec();
        for s in &initial {
            assert!(s.y >= -s.scale * 50.0);
        }

        let mut total_recycled = 0;
        for _ in 0..60 {
            let n = Simulator::update(&mut pool, 1.0 / 60.0);
            assert!(n <= pool.len());
            total_recycled += n;
        }
        assert!(total_recycled <= pool.len());

        let nearest_top = initial
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.y.total_cmp(&b.1.y))
            .map(|(i, _)| i)
            .unwrap();
        assert!(pool.stars()[nearest_top].y > initial[nearest_top].y);
    }
}
