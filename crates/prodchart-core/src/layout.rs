//! Page geometry as reported by a [`PdfBackend`](crate::PdfBackend).
//!
//! Coordinates follow the MuPDF convention: origin at the top-left corner,
//! `y` growing downwards.

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// Length of the shared horizontal extent, `0.0` when disjoint.
    pub fn horizontal_overlap(&self, other: &BBox) -> f32 {
        (self.x1.min(other.x1) - self.x0.max(other.x0)).max(0.0)
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A single positioned character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub x0: f32,
    pub x1: f32,
    /// Font size in points.
    pub size: f32,
}

/// A line of glyphs as grouped by the backend.
///
/// Backends typically emit one line per table cell, so a visual table row
/// is usually spread over several `TextLine`s sharing the same baseline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLine {
    pub bbox: BBox,
    pub glyphs: Vec<Glyph>,
}

impl TextLine {
    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.ch).collect()
    }

    /// Lay out `text` with a fixed advance of `0.6 × size` per character,
    /// starting at `(x, y)`.
    pub fn monospace(text: &str, x: f32, y: f32, size: f32) -> Self {
        let advance = size * 0.6;
        let glyphs: Vec<Glyph> = text
            .chars()
            .enumerate()
            .map(|(i, ch)| {
                let x0 = x + advance * i as f32;
                Glyph {
                    ch,
                    x0,
                    x1: x0 + advance,
                    size,
                }
            })
            .collect();
        let x1 = glyphs.last().map(|g| g.x1).unwrap_or(x);
        Self {
            bbox: BBox::new(x, y, x1, y + size),
            glyphs,
        }
    }
}

/// Positioned text of one page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub lines: Vec<TextLine>,
}

/// One table row; `None` marks an empty or missing cell.
pub type Row = Vec<Option<String>>;

/// A table found on the page, as a sequence of rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a table from string literals, mapping `""` to `None`.
    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|c| (!c.is_empty()).then(|| c.to_string()))
                        .collect()
                })
                .collect(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}
