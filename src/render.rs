//! Terminal surface: a braille subpixel canvas (2x4 per cell) for hexagon
//! geometry, flattened into a diff-rendered cell buffer. The Terminal guard
//! owns raw mode, the alternate screen and mouse capture, and restores all
//! of it on drop even if the loop never ran.

use crate::config::Rgb;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

/// Braille subpixels per terminal cell.
pub(crate) const SUB_W: u32 = 2;
pub(crate) const SUB_H: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TermCell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for TermCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<TermCell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![TermCell::default(); (w as usize) * (h as usize)],
        }
    }

    fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub(crate) fn set(&mut self, x: u16, y: u16, c: TermCell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Pixel {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl Pixel {
    pub(crate) fn opaque(c: Rgb) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// The engine's drawable surface. Plain RGBA subpixels; solid overwrite is
/// enough because fills are laid down first and strokes on top.
pub(crate) struct PixelCanvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) px: Vec<Pixel>,
}

impl PixelCanvas {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Pixel::default(); (w as usize) * (h as usize)],
        }
    }

    pub(crate) fn clear(&mut self) {
        self.px.fill(Pixel::default());
    }

    fn set(&mut self, x: i64, y: i64, p: Pixel) {
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 {
            return;
        }
        let i = (y as usize) * (self.w as usize) + (x as usize);
        self.px[i] = p;
    }

    /// Scanline fill of a convex polygon. Vertices in any winding order.
    pub(crate) fn fill_convex_poly(&mut self, pts: &[(f64, f64)], p: Pixel) {
        if pts.len() < 3 {
            return;
        }
        let y_min = pts.iter().map(|v| v.1).fold(f64::INFINITY, f64::min);
        let y_max = pts.iter().map(|v| v.1).fold(f64::NEG_INFINITY, f64::max);
        let y0 = (y_min.floor() as i64).max(0);
        let y1 = (y_max.ceil() as i64).min(self.h as i64 - 1);

        for y in y0..=y1 {
            let yc = y as f64 + 0.5;
            let mut span: Option<(f64, f64)> = None;
            for i in 0..pts.len() {
                let (ax, ay) = pts[i];
                let (bx, by) = pts[(i + 1) % pts.len()];
                let crosses = (ay <= yc && yc < by) || (by <= yc && yc < ay);
                if !crosses {
                    continue;
                }
                let x = ax + (yc - ay) / (by - ay) * (bx - ax);
                span = Some(match span {
                    None => (x, x),
                    Some((lo, hi)) => (lo.min(x), hi.max(x)),
                });
            }
            if let Some((lo, hi)) = span {
                let x0 = (lo.round() as i64).max(0);
                let x1 = (hi.round() as i64).min(self.w as i64 - 1);
                for x in x0..=x1 {
                    self.set(x, y, p);
                }
            }
        }
    }

    /// Stroke a closed polygon by stepping each edge, one subpixel per step.
    pub(crate) fn stroke_poly(&mut self, pts: &[(f64, f64)], p: Pixel) {
        if pts.len() < 2 {
            return;
        }
        for i in 0..pts.len() {
            let (ax, ay) = pts[i];
            let (bx, by) = pts[(i + 1) % pts.len()];
            let dx = bx - ax;
            let dy = by - ay;
            let len = (dx * dx + dy * dy).sqrt().max(1e-6);
            let steps = (len * 1.5).ceil() as i64;
            for s in 0..=steps {
                let t = s as f64 / steps.max(1) as f64;
                self.set(
                    (ax + dx * t).round() as i64,
                    (ay + dy * t).round() as i64,
                    p,
                );
            }
        }
    }
}

/// The six corners of a pointy-top hexagon centered at (cx, cy).
pub(crate) fn hexagon(cx: f64, cy: f64, r: f64) -> [(f64, f64); 6] {
    let mut pts = [(0.0, 0.0); 6];
    for (i, pt) in pts.iter_mut().enumerate() {
        let angle = std::f64::consts::FRAC_PI_6 + i as f64 * std::f64::consts::FRAC_PI_3;
        *pt = (cx + r * angle.cos(), cy + r * angle.sin());
    }
    pts
}

fn braille_bit(dx: u32, dy: u32) -> u8 {
    // (0,0)=1 (0,1)=2 (0,2)=4 (0,3)=64
    // (1,0)=8 (1,1)=16 (1,2)=32 (1,3)=128
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

/// Flatten the canvas into terminal cells. Inked subpixels become braille
/// dots colored by their average; the cell background follows a vertical
/// gradient between the two configured endpoint colors.
pub(crate) fn canvas_to_cells(canvas: &PixelCanvas, out: &mut CellBuffer, bg_top: Rgb, bg_bottom: Rgb) {
    let cols = out.w as u32;
    let rows = out.h as u32;

    for cy in 0..rows {
        let t = if rows > 1 {
            cy as f64 / (rows - 1) as f64
        } else {
            0.0
        };
        let bg = bg_top.lerp(bg_bottom, t).to_color();

        for cx in 0..cols {
            let px0 = cx * SUB_W;
            let py0 = cy * SUB_H;

            let mut mask: u8 = 0;
            let mut sum_r: u32 = 0;
            let mut sum_g: u32 = 0;
            let mut sum_b: u32 = 0;
            let mut ink: u32 = 0;

            for dy in 0..SUB_H {
                for dx in 0..SUB_W {
                    let x = px0 + dx;
                    let y = py0 + dy;
                    if x >= canvas.w || y >= canvas.h {
                        continue;
                    }
                    let p = canvas.px[(y as usize) * (canvas.w as usize) + (x as usize)];
                    if p.a >= 32 {
                        mask |= braille_bit(dx, dy);
                        sum_r += p.r as u32;
                        sum_g += p.g as u32;
                        sum_b += p.b as u32;
                        ink += 1;
                    }
                }
            }

            let ch = char::from_u32(0x2800 + mask as u32).unwrap_or(' ');
            let fg = if ink > 0 {
                Color::Rgb {
                    r: (sum_r / ink) as u8,
                    g: (sum_g / ink) as u8,
                    b: (sum_b / ink) as u8,
                }
            } else {
                Color::White
            };

            out.set(cx as u16, cy as u16, TermCell { ch, fg, bg });
        }
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    restored: bool,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            EnableMouseCapture,
            Clear(ClearType::All)
        )?;
        if let Err(e) = terminal::enable_raw_mode() {
            // Unwind the half-acquired surface before failing start.
            let _ = execute!(
                out,
                DisableMouseCapture,
                EnableLineWrap,
                cursor::Show,
                LeaveAlternateScreen
            );
            return Err(e.into());
        }

        let (cols, rows) = match terminal::size() {
            Ok(size) => size,
            Err(e) => {
                let _ = terminal::disable_raw_mode();
                let _ = execute!(
                    out,
                    DisableMouseCapture,
                    EnableLineWrap,
                    cursor::Show,
                    LeaveAlternateScreen
                );
                return Err(e.into());
            }
        };
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            restored: false,
        })
    }

    /// Detect a resize; the caller rebuilds whatever depends on the size.
    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        execute!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    /// Diff-present the current buffer.
    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;
        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if c == self.prev.cells[i] {
                    continue;
                }
                queue!(self.out, cursor::MoveTo(x, y))?;
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        self.restored = true;
        terminal::disable_raw_mode()?;
        execute!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            DisableMouseCapture,
            EnableLineWrap,
            cursor::Show,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // Best effort if the loop bailed before the explicit end().
        if !self.restored {
            let _ = terminal::disable_raw_mode();
            let _ = execute!(
                self.out,
                ResetColor,
                DisableMouseCapture,
                EnableLineWrap,
                cursor::Show,
                LeaveAlternateScreen
            );
        }
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, TermCell { ch, fg, bg });
    }
}
