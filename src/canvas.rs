//! Braille dot canvas: each terminal cell holds a 2x4 grid of dots.

use crate::geometry::{Point, Rgb};
use crate::host::{Stroke, Surface};
use crate::terminal::{rgb, Terminal};

/// Dot bit for column `dx` (0..2), row `dy` (0..4) inside one braille cell
const DOT_BITS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// Segments at or above this depth are drawn bold
const BOLD_DEPTH: u32 = 3;

#[derive(Clone, Copy, Default, PartialEq)]
struct BrailleCell {
    dots: u8,
    color: Option<Rgb>,
    bold: bool,
}

pub struct BrailleCanvas {
    cols: usize,
    rows: usize,
    cells: Vec<BrailleCell>,
}

impl BrailleCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let cols = cols as usize;
        let rows = rows as usize;
        Self {
            cols,
            rows,
            cells: vec![BrailleCell::default(); cols * rows],
        }
    }

    /// Size in terminal cells
    pub fn size(&self) -> (u16, u16) {
        (self.cols as u16, self.rows as u16)
    }

    /// Size of the dot grid, the coordinate space trees are grown in
    pub fn dot_size(&self) -> (f64, f64) {
        ((self.cols * 2) as f64, (self.rows * 4) as f64)
    }

    pub fn clear(&mut self) {
        self.cells.fill(BrailleCell::default());
    }

    /// Light one dot; outside the grid is ignored
    pub fn plot(&mut self, x: i32, y: i32, color: Rgb, bold: bool) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.cols || cy >= self.rows {
            return;
        }
        let cell = &mut self.cells[cy * self.cols + cx];
        cell.dots |= DOT_BITS[y % 4][x % 2];
        cell.color = Some(color);
        cell.bold = bold;
    }

    /// Braille character and color at a cell, if any dot is lit
    pub fn cell(&self, cx: usize, cy: usize) -> Option<(char, Rgb, bool)> {
        let cell = self.cells.get(cy * self.cols + cx)?;
        if cell.dots == 0 || cx >= self.cols {
            return None;
        }
        let ch = char::from_u32(0x2800 + cell.dots as u32)?;
        Some((ch, cell.color?, cell.bold))
    }

    pub fn lit_dots(&self) -> u32 {
        self.cells.iter().map(|c| c.dots.count_ones()).sum()
    }

    /// Copy lit cells into the terminal back buffer starting at row `top`
    pub fn flush_to(&self, term: &mut Terminal, top: i32) {
        for cy in 0..self.rows {
            for cx in 0..self.cols {
                if let Some((ch, (r, g, b), bold)) = self.cell(cx, cy) {
                    term.set(cx as i32, top + cy as i32, ch, Some(rgb(r, g, b)), bold);
                }
            }
        }
    }
}

impl Surface for BrailleCanvas {
    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        let bold = stroke.depth < BOLD_DEPTH;
        let (x1, y1) = (to.x.round() as i32, to.y.round() as i32);
        let mut x = from.x.round() as i32;
        let mut y = from.y.round() as i32;

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x, y, stroke.color, bold);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn draw_circle(&mut self, center: Point, radius: f64, color: Rgb) {
        let r = radius.max(0.0);
        let reach = r.ceil() as i32;
        let (cx, cy) = (center.x.round() as i32, center.y.round() as i32);
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if ((dx * dx + dy * dy) as f64) <= r * r {
                    self.plot(cx + dx, cy + dy, color, false);
                }
            }
        }
    }
}
