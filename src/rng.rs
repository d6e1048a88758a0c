// Copyright (c) 2026 rezky_nightky

use rand::{
    distr::{Distribution, StandardUniform},
    rngs::StdRng,
    SeedableRng,
};

/// Seeded source of uniform floats in `[0, 1)`.
///
/// Two sequences built from the same seed yield the same values in the same
/// order. Nothing outside the sequence itself is needed to advance it.
#[derive(Clone, Debug)]
pub struct RandomSequence {
    mt: StdRng,
}

impl RandomSequence {
    pub fn new(seed: u64) -> Self {
        Self {
            mt: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_float(&mut self) -> f32 {
        StandardUniform.sample(&mut self.mt)
    }
}
