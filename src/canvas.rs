// Copyright (c) 2026 rezky_nightky

use std::ops::{Deref, DerefMut};

use crate::palette::Rgb;
use crate::sprite::AlphaMask;

/// 2x3 affine transform from local to device coordinates.
///
/// `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.tx += self.a * dx + self.c * dy;
        self.ty += self.b * dx + self.d * dy;
    }

    /// Post-multiply by a rotation. Positive degrees turn clockwise on a
    /// y-down surface.
    pub fn rotate(&mut self, degrees: f32) {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let a = self.a * cos + self.c * sin;
        let b = self.b * cos + self.d * sin;
        let c = self.c * cos - self.a * sin;
        let d = self.d * cos - self.b * sin;
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    /// Map a device point back to local space. `None` for a degenerate matrix.
    pub fn invert_apply(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f32::EPSILON {
            return None;
        }
        let dx = x - self.tx;
        let dy = y - self.ty;
        Some((
            (self.d * dx - self.c * dy) / det,
            (self.a * dy - self.b * dx) / det,
        ))
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Integer rectangle in local coordinates, right/bottom exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn corners(&self) -> [(f32, f32); 4] {
        let (l, t, r, b) = (
            self.left as f32,
            self.top as f32,
            self.right as f32,
            self.bottom as f32,
        );
        [(l, t), (r, t), (r, b), (l, b)]
    }

    /// Position of a local point inside the rectangle as `(u, v)` in
    /// `[0, 1)`, or `None` when outside.
    pub fn normalize(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }
        let u = (x - self.left as f32) / self.width() as f32;
        let v = (y - self.top as f32) / self.height() as f32;
        if (0.0..1.0).contains(&u) && (0.0..1.0).contains(&v) {
            Some((u, v))
        } else {
            None
        }
    }
}

/// A 2D drawing surface with a save/restore transform stack.
///
/// Save counts start at 1. `save` returns the count to hand back to
/// `restore_to_count` to undo it and everything saved after it.
pub trait Canvas {
    fn save(&mut self) -> usize;
    fn restore_to_count(&mut self, count: usize);
    fn save_count(&self) -> usize;
    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, degrees: f32);
    fn matrix(&self) -> Affine;
    fn draw_mask(&mut self, mask: &AlphaMask, bounds: Bounds, tint: Rgb, alpha: u8);
}

/// Matrix stack shared by canvas implementations.
#[derive(Clone, Debug, Default)]
pub struct TransformStack {
    current: Affine,
    saved: Vec<Affine>,
}

impl TransformStack {
    pub fn save(&mut self) -> usize {
        let count = self.save_count();
        self.saved.push(self.current);
        count
    }

    pub fn restore_to_count(&mut self, count: usize) {
        let count = count.max(1);
        while self.save_count() > count {
            match self.saved.pop() {
                Some(m) => self.current = m,
                None => break,
            }
        }
    }

    pub fn save_count(&self) -> usize {
        self.saved.len() + 1
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.current.translate(dx, dy);
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.current.rotate(degrees);
    }

    pub fn matrix(&self) -> Affine {
        self.current
    }
}

/// Saves the canvas on creation and restores it when dropped, including on
/// early return or unwinding.
pub struct SaveGuard<'a> {
    canvas: &'a mut dyn Canvas,
    count: usize,
}

impl<'a> SaveGuard<'a> {
    pub fn new(canvas: &'a mut dyn Canvas) -> Self {
        let count = canvas.save();
        Self { canvas, count }
    }
}

impl<'a> Deref for SaveGuard<'a> {
    type Target = dyn Canvas + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.canvas
    }
}

impl DerefMut for SaveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.canvas
    }
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.canvas.restore_to_count(self.count);
    }
}
