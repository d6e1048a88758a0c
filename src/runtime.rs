// Copyright (c) 2025 rezk_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    White,
    Gold,
    Ice,
    Rose,
    Mint,
    Nebula,
    Dusk,
}

impl Theme {
    pub const ALL: [Theme; 7] = [
        Theme::White,
        Theme::Gold,
        Theme::Ice,
        Theme::Rose,
        Theme::Mint,
        Theme::Nebula,
        Theme::Dusk,
    ];

    /// The theme after this one, wrapping around.
    pub fn next(self) -> Theme {
        let i = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}
