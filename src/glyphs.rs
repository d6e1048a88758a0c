// Copyright (c) 2026 rezky_nightky

use std::env;

const UNICODE_RAMP: [char; 4] = ['·', '•', '✦', '★'];
const ASCII_RAMP: [char; 4] = ['.', '+', '*', '#'];

/// Characters used for increasing sub-cell coverage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyphs {
    ramp: &'static [char],
}

impl Glyphs {
    pub fn new(ascii: bool) -> Self {
        Self {
            ramp: if ascii { &ASCII_RAMP } else { &UNICODE_RAMP },
        }
    }

    /// Glyph for `hits` covered samples out of `total`. Space when nothing
    /// is covered.
    pub fn for_coverage(&self, hits: usize, total: usize) -> char {
        if hits == 0 || total == 0 || self.ramp.is_empty() {
            return ' ';
        }
        let n = self.ramp.len();
        let level = (hits.min(total) * n).div_ceil(total);
        self.ramp[level.clamp(1, n) - 1]
    }

    /// Position of `ch` on the ramp, 0 for anything else.
    pub fn level_of(&self, ch: char) -> usize {
        self.ramp
            .iter()
            .position(|&c| c == ch)
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

pub fn default_to_ascii() -> bool {
    let lang = env::var("LANG").unwrap_or_default();
    !lang.to_ascii_uppercase().contains("UTF")
}
