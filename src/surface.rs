//! Drawing surfaces.
//!
//! The game draws in playfield pixels through the `Surface` trait.  The
//! terminal implementation keeps a character-cell back buffer, scales pixel
//! coordinates down to cells, and writes the buffer out with crossterm.
//! Like a canvas, the buffer keeps its contents between frames.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    terminal, QueueableCommand,
};

use crate::assets::AssetRegistry;
use crate::entities::{GAME_HEIGHT, GAME_WIDTH};

// ── Sprites ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    /// `None` lets whatever is underneath show through.
    pub bg: Option<Color>,
}

/// A rectangular block of cells; `None` cells are transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    cols: u16,
    rows: u16,
    cells: Vec<Option<Cell>>,
}

impl Sprite {
    /// `cells` is row-major and must hold exactly `cols * rows` entries.
    pub fn new(cols: u16, rows: u16, cells: Vec<Option<Cell>>) -> Self {
        debug_assert_eq!(cells.len(), cols as usize * rows as usize);
        Sprite { cols, rows, cells }
    }

    /// Every cell painted with background `bg`.
    pub fn solid(cols: u16, rows: u16, bg: Color) -> Self {
        let cell = Cell {
            ch: ' ',
            fg: bg,
            bg: Some(bg),
        };
        Sprite::new(cols, rows, vec![Some(cell); cols as usize * rows as usize])
    }

    /// A box outline filled with `fill`, used when an image is unavailable.
    pub fn framed(cols: u16, rows: u16, fill: char, fg: Color) -> Self {
        let mut cells = Vec::with_capacity(cols as usize * rows as usize);
        for r in 0..rows {
            for c in 0..cols {
                let top = r == 0;
                let bottom = r + 1 == rows;
                let left = c == 0;
                let right = c + 1 == cols;
                let ch = match (top, bottom, left, right) {
                    (true, _, true, _) => '┌',
                    (true, _, _, true) => '┐',
                    (_, true, true, _) => '└',
                    (_, true, _, true) => '┘',
                    (true, _, _, _) | (_, true, _, _) => '─',
                    (_, _, true, _) | (_, _, _, true) => '│',
                    _ => fill,
                };
                cells.push(Some(Cell { ch, fg, bg: None }));
            }
        }
        Sprite::new(cols, rows, cells)
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[row as usize * self.cols as usize + col as usize]
    }
}

// ── Surface contract ──────────────────────────────────────────────────────────

/// Horizontal anchoring of `fill_text` relative to its `x`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchoring of `fill_text` relative to its `y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Hanging,
    Middle,
    #[default]
    Alphabetic,
    Bottom,
}

/// Canvas-style drawing target addressed in playfield pixels.
///
/// Text state (alignment, baseline, font, fill) is sticky: it applies to every
/// later `fill_text` until changed.
pub trait Surface {
    fn draw_image(&mut self, sprite: &Sprite, x: f64, y: f64);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn set_font(&mut self, font: &str);
    fn set_fill_style(&mut self, color: Color);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

/// Something that knows how to draw itself onto a surface.
pub trait Render {
    fn render(&self, surface: &mut dyn Surface, assets: &AssetRegistry);
}

// ── Pixel ↔ cell scaling ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    pub px_per_col: f64,
    pub px_per_row: f64,
}

impl Scale {
    /// Cell footprint of a `width` x `height` pixel area, at least one cell.
    pub fn cells(&self, width: i32, height: i32) -> (u16, u16) {
        let cols = (f64::from(width) / self.px_per_col).round().max(1.0);
        let rows = (f64::from(height) / self.px_per_row).round().max(1.0);
        (cols as u16, rows as u16)
    }

    /// Cell containing pixel `(x, y)`; may be negative or past the edge.
    pub fn cell_at(&self, x: f64, y: f64) -> (i32, i32) {
        (
            (x / self.px_per_col).floor() as i32,
            (y / self.px_per_row).floor() as i32,
        )
    }
}

// ── Terminal implementation ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
struct TermCell {
    ch: char,
    fg: Color,
    bg: Color,
    bold: bool,
}

const BLANK: TermCell = TermCell {
    ch: ' ',
    fg: Color::Reset,
    bg: Color::Reset,
    bold: false,
};

pub struct TerminalSurface {
    scale: Scale,
    cols: u16,
    rows: u16,
    buffer: Vec<TermCell>,
    align: TextAlign,
    baseline: TextBaseline,
    bold: bool,
    fill: Color,
}

impl TerminalSurface {
    /// A blank surface covering the whole playfield at `scale`.
    pub fn new(scale: Scale) -> Self {
        let cols = (f64::from(GAME_WIDTH) / scale.px_per_col).ceil() as u16;
        let rows = (f64::from(GAME_HEIGHT) / scale.px_per_row).ceil() as u16;
        TerminalSurface {
            scale,
            cols,
            rows,
            buffer: vec![BLANK; cols as usize * rows as usize],
            align: TextAlign::default(),
            baseline: TextBaseline::default(),
            bold: false,
            fill: Color::White,
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= i32::from(self.cols) || row >= i32::from(self.rows) {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    #[cfg(test)]
    fn glyph(&self, col: i32, row: i32) -> Option<char> {
        self.index(col, row).map(|i| self.buffer[i].ch)
    }

    /// Write the back buffer to `out` in one flush.
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        let mut current: Option<(Color, Color, bool)> = None;
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            for col in 0..self.cols {
                let cell = self.buffer[row as usize * self.cols as usize + col as usize];
                let look = (cell.fg, cell.bg, cell.bold);
                if current != Some(look) {
                    out.queue(style::SetAttribute(Attribute::Reset))?;
                    out.queue(style::SetForegroundColor(cell.fg))?;
                    out.queue(style::SetBackgroundColor(cell.bg))?;
                    if cell.bold {
                        out.queue(style::SetAttribute(Attribute::Bold))?;
                    }
                    current = Some(look);
                }
                out.queue(Print(cell.ch))?;
            }
        }

        // Park cursor below the playfield and flush
        out.queue(style::SetAttribute(Attribute::Reset))?;
        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.rows))?;
        out.flush()?;
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn draw_image(&mut self, sprite: &Sprite, x: f64, y: f64) {
        let (col0, row0) = self.scale.cell_at(x, y);
        for r in 0..sprite.rows() {
            for c in 0..sprite.cols() {
                let Some(cell) = sprite.cell(c, r) else {
                    continue;
                };
                if let Some(i) = self.index(col0 + i32::from(c), row0 + i32::from(r)) {
                    let under = self.buffer[i];
                    self.buffer[i] = TermCell {
                        ch: cell.ch,
                        fg: cell.fg,
                        bg: cell.bg.unwrap_or(under.bg),
                        bold: false,
                    };
                }
            }
        }
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.baseline = baseline;
    }

    /// Only the weight survives in a terminal.
    fn set_font(&mut self, font: &str) {
        self.bold = font.split_whitespace().any(|part| part == "bold");
    }

    fn set_fill_style(&mut self, color: Color) {
        self.fill = color;
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let (anchor, row) = self.scale.cell_at(x, y);
        let row = match self.baseline {
            TextBaseline::Top | TextBaseline::Hanging | TextBaseline::Middle => row,
            // Glyphs sit on the baseline, so they occupy the row above it.
            TextBaseline::Alphabetic | TextBaseline::Bottom => row - 1,
        };
        let len = text.chars().count() as i32;
        let start = match self.align {
            TextAlign::Left => anchor,
            TextAlign::Center => anchor - len / 2,
            TextAlign::Right => anchor - len,
        };
        for (offset, ch) in text.chars().enumerate() {
            if let Some(i) = self.index(start + offset as i32, row) {
                let under = self.buffer[i];
                self.buffer[i] = TermCell {
                    ch,
                    fg: self.fill,
                    bg: under.bg,
                    bold: self.bold,
                };
            }
        }
    }
}
