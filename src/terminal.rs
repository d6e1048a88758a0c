// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;
use crate::palette::to_term_color;
use crate::runtime::ColorMode;

struct LastFrame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl LastFrame {
    fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::blank_with_bg(None); len],
        }
    }
}

/// Pen state already sent to the terminal.
#[derive(Default)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
}

impl Pen {
    fn apply<W: Write>(
        &mut self,
        out: &mut W,
        fg: Option<Color>,
        bg: Option<Color>,
        bold: bool,
    ) -> Result<()> {
        if fg != self.fg {
            out.queue(SetForegroundColor(fg.unwrap_or(Color::Reset)))?;
            self.fg = fg;
        }
        if bg != self.bg {
            out.queue(SetBackgroundColor(bg.unwrap_or(Color::Reset)))?;
            self.bg = bg;
        }
        if bold != self.bold {
            out.queue(SetAttribute(if bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
            self.bold = bold;
        }
        Ok(())
    }
}

/// Writes frames as the difference against what was last shown.
#[derive(Default)]
pub struct FramePainter {
    last: Option<LastFrame>,
    run_buf: String,
}

impl FramePainter {
    /// Forget what is on screen so the next paint is a full redraw.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Queue the commands that bring the screen up to `frame` and flush.
    /// Returns the number of cells written.
    pub fn paint<W: Write>(&mut self, out: &mut W, frame: &Frame, mode: ColorMode) -> Result<usize> {
        let full = self
            .last
            .as_ref()
            .map(|l| l.width != frame.width || l.height != frame.height)
            .unwrap_or(true);
        if full {
            out.queue(terminal::Clear(terminal::ClearType::All))?;
            self.last = Some(LastFrame::new(frame.width, frame.height));
        }
        let Some(last) = self.last.as_mut() else {
            return Ok(0);
        };

        let width = frame.width as usize;
        let mut pen = Pen::default();
        let mut cur_pos: Option<(u16, u16)> = None;
        let mut written = 0usize;

        for y in 0..frame.height {
            let row = y as usize * width;
            let mut x = 0usize;
            while x < width {
                let idx0 = row + x;
                let cell0 = frame.cell_at_index(idx0);
                if !full && last.cells[idx0] == cell0 {
                    x += 1;
                    continue;
                }

                // Extend over neighbours that also changed and share the pen.
                self.run_buf.clear();
                self.run_buf.push(cell0.ch);
                last.cells[idx0] = cell0;
                let mut end = x + 1;
                while end < width {
                    let cell1 = frame.cell_at_index(row + end);
                    if !full && last.cells[row + end] == cell1 {
                        break;
                    }
                    if cell1.fg != cell0.fg || cell1.bg != cell0.bg || cell1.bold != cell0.bold {
                        break;
                    }
                    self.run_buf.push(cell1.ch);
                    last.cells[row + end] = cell1;
                    end += 1;
                }

                let x0 = x as u16;
                if cur_pos != Some((x0, y)) {
                    out.queue(cursor::MoveTo(x0, y))?;
                }
                pen.apply(
                    out,
                    cell0.fg.and_then(|c| to_term_color(c, mode)),
                    cell0.bg.and_then(|c| to_term_color(c, mode)),
                    cell0.bold,
                )?;
                out.queue(Print(self.run_buf.as_str()))?;

                let run_len = end - x;
                written += run_len;
                let next_x = end as u16;
                cur_pos = if end < width { Some((next_x, y)) } else { None };
                x = end;
            }
        }

        if written > 0 || full {
            out.queue(SetAttribute(Attribute::Reset))?;
            out.queue(ResetColor)?;
        }
        out.flush()?;
        Ok(written)
    }
}

pub struct Terminal {
    stdout: Stdout,
    painter: FramePainter,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            // Not every terminal reports focus; pausing on blur is best effort.
            let _ = out.execute(event::EnableFocusChange);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            painter: FramePainter::default(),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    /// Show `frame`, writing only cells that differ from the last one shown.
    pub fn draw(&mut self, frame: &Frame, mode: ColorMode) -> Result<usize> {
        self.painter.paint(&mut self.stdout, frame, mode)
    }

    pub fn force_full_redraw(&mut self) {
        self.painter.invalidate();
    }
}

fn restore<W: Write>(out: &mut W) {
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(event::DisableFocusChange);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore(&mut self.stdout);
    }
}

pub fn restore_terminal_best_effort() {
    restore(&mut stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Rgb;

    fn star(fg: Rgb) -> Cell {
        Cell {
            ch: '*',
            fg: Some(fg),
            bg: None,
            bold: false,
        }
    }

    #[test]
    fn first_paint_writes_every_cell() {
        let f = Frame::new(4, 3, None);
        let mut p = FramePainter::default();
        let mut out = Vec::new();
        assert_eq!(p.paint(&mut out, &f, ColorMode::TrueColor).unwrap(), 12);
        assert!(!out.is_empty());
    }

    #[test]
    fn unchanged_frame_writes_nothing() {
        let mut f = Frame::new(4, 3, None);
        f.set(1, 1, star(Rgb::WHITE));
        let mut p = FramePainter::default();
        let mut out = Vec::new();
        p.paint(&mut out, &f, ColorMode::TrueColor).unwrap();

        out.clear();
        assert_eq!(p.paint(&mut out, &f, ColorMode::TrueColor).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn only_changed_cells_are_written() {
        let mut f = Frame::new(8, 2, None);
        let mut p = FramePainter::default();
        let mut out = Vec::new();
        p.paint(&mut out, &f, ColorMode::Color256).unwrap();

        f.set(2, 0, star(Rgb::WHITE));
        f.set(3, 0, star(Rgb::WHITE));
        f.set(5, 1, star(Rgb::new(255, 0, 0)));
        out.clear();
        assert_eq!(p.paint(&mut out, &f, ColorMode::Color256).unwrap(), 3);
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("**"));

        // Clearing puts the three cells back to blank.
        f.clear_with_bg(None);
        out.clear();
        assert_eq!(p.paint(&mut out, &f, ColorMode::Color256).unwrap(), 3);
    }

    #[test]
    fn size_change_forces_full_redraw() {
        let mut p = FramePainter::default();
        let mut out = Vec::new();
        p.paint(&mut out, &Frame::new(2, 2, None), ColorMode::Mono).unwrap();
        assert_eq!(
            p.paint(&mut out, &Frame::new(3, 2, None), ColorMode::Mono).unwrap(),
            6
        );
        p.invalidate();
        assert_eq!(
            p.paint(&mut out, &Frame::new(3, 2, None), ColorMode::Mono).unwrap(),
            6
        );
    }
}
