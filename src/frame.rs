// Copyright (c) 2026 rezky_nightky

use crate::canvas::{Affine, Bounds, Canvas, TransformStack};
use crate::cell::Cell;
use crate::glyphs::Glyphs;
use crate::palette::Rgb;
use crate::sprite::AlphaMask;

/// Sample points inside a cell, as fractions of the cell size.
const SUBSAMPLES: [(f32, f32); 4] = [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)];

/// Alpha at and above which a star cell is drawn bold.
const BOLD_ALPHA: u8 = 200;

#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    gen: u32,
    cell_gen: Vec<u32>,
    blank: Cell,
}

impl Frame {
    pub fn new(width: u16, height: u16, bg: Option<Rgb>) -> Self {
        let len = width as usize * height as usize;
        let blank = Cell::blank_with_bg(bg);
        let gen = 1u32;
        Self {
            width,
            height,
            cells: vec![blank; len],
            gen,
            cell_gen: vec![gen; len],
            blank,
        }
    }

    /// Blank every cell. Cells written before the clear read back as blank
    /// without touching the cell buffer.
    pub fn clear_with_bg(&mut self, bg: Option<Rgb>) {
        self.blank = Cell::blank_with_bg(bg);
        self.gen = self.gen.wrapping_add(1);
        if self.gen == 0 {
            self.cell_gen.fill(0);
            self.gen = 1;
        }
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| {
            if self.cell_gen.get(i).copied() == Some(self.gen) {
                &self.cells[i]
            } else {
                &self.blank
            }
        })
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        if self.cell_gen.get(i).copied() == Some(self.gen) {
            self.cells[i]
        } else {
            self.blank
        }
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
            if let Some(v) = self.cell_gen.get_mut(i) {
                *v = self.gen;
            }
        }
    }
}

/// Rasterizes canvas draws into a `Frame`, one terminal cell per
/// `cell_w x cell_h` device pixels.
pub struct FrameCanvas<'a> {
    frame: &'a mut Frame,
    stack: TransformStack,
    glyphs: Glyphs,
    backdrop: Rgb,
    cell_w: f32,
    cell_h: f32,
}

impl<'a> FrameCanvas<'a> {
    pub fn new(frame: &'a mut Frame, glyphs: Glyphs, backdrop: Rgb, cell_px: (f32, f32)) -> Self {
        Self {
            frame,
            stack: TransformStack::default(),
            glyphs,
            backdrop,
            cell_w: cell_px.0.max(1.0),
            cell_h: cell_px.1.max(1.0),
        }
    }

    /// Cell range `[start, end)` covering device span `[lo, hi]`.
    fn cell_span(lo: f32, hi: f32, cell: f32, limit: u16) -> (u16, u16) {
        let start = (lo / cell).floor().max(0.0);
        let end = (hi / cell).ceil().min(limit as f32);
        if end <= start {
            return (0, 0);
        }
        (start as u16, end as u16)
    }

    fn composite(&mut self, col: u16, row: u16, glyph: char, tint: Rgb, alpha: u8) {
        let Some(cur) = self.frame.get(col, row).copied() else {
            return;
        };
        let under = match cur.fg {
            Some(fg) if !cur.is_blank() => fg,
            _ => cur.bg.unwrap_or(self.backdrop),
        };
        let fg = under.lerp(tint, alpha as f32 / 255.0);
        let ch = if self.glyphs.level_of(glyph) >= self.glyphs.level_of(cur.ch) {
            glyph
        } else {
            cur.ch
        };
        self.frame.set(
            col,
            row,
            Cell {
                ch,
                fg: Some(fg),
                bg: cur.bg,
                bold: cur.bold || alpha >= BOLD_ALPHA,
            },
        );
    }
}

impl Canvas for FrameCanvas<'_> {
    fn save(&mut self) -> usize {
        self.stack.save()
    }

    fn restore_to_count(&mut self, count: usize) {
        self.stack.restore_to_count(count);
    }

    fn save_count(&self) -> usize {
        self.stack.save_count()
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.stack.translate(dx, dy);
    }

    fn rotate(&mut self, degrees: f32) {
        self.stack.rotate(degrees);
    }

    fn matrix(&self) -> Affine {
        self.stack.matrix()
    }

    fn draw_mask(&mut self, mask: &AlphaMask, bounds: Bounds, tint: Rgb, alpha: u8) {
        if alpha == 0 || bounds.is_empty() {
            return;
        }
        let m = self.stack.matrix();

        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for (x, y) in bounds.corners() {
            let (dx, dy) = m.apply(x, y);
            min_x = min_x.min(dx);
            min_y = min_y.min(dy);
            max_x = max_x.max(dx);
            max_y = max_y.max(dy);
        }
        if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
            return;
        }

        let (col0, col1) = Self::cell_span(min_x, max_x, self.cell_w, self.frame.width);
        let (row0, row1) = Self::cell_span(min_y, max_y, self.cell_h, self.frame.height);

        for row in row0..row1 {
            for col in col0..col1 {
                let mut hits = 0usize;
                for (sx, sy) in SUBSAMPLES {
                    let px = (col as f32 + sx) * self.cell_w;
                    let py = (row as f32 + sy) * self.cell_h;
                    let Some((lx, ly)) = m.invert_apply(px, py) else {
                        return;
                    };
                    if let Some((u, v)) = bounds.normalize(lx, ly) {
                        if mask.sample(u, v) {
                            hits += 1;
                        }
                    }
                }
                if hits == 0 {
                    continue;
                }
                let glyph = self.glyphs.for_coverage(hits, SUBSAMPLES.len());
                self.composite(col, row, glyph, tint, alpha);
            }
        }
    }
}
