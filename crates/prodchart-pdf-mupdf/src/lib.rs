use mupdf::{Document, TextPageFlags};

use prodchart_core::{BBox, BackendError, Glyph, PageLayout, PdfBackend, TextLine};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the analysis code does not transitively
/// depend on it.
///
/// Only the first page is read. Each MuPDF structured-text line becomes one
/// [`TextLine`]; glyph extents come from the character quads.
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn first_page_layout(&self, pdf: &[u8]) -> Result<PageLayout, BackendError> {
        let document = Document::from_bytes(pdf, "application/pdf")
            .map_err(|e| BackendError::OpenError(e.to_string()))?;

        let page_count = document
            .page_count()
            .map_err(|e| BackendError::OpenError(e.to_string()))?;
        if page_count < 1 {
            return Err(BackendError::EmptyDocument);
        }

        let page = document
            .load_page(0)
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
        let page_bounds = page
            .bounds()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

        let mut lines = Vec::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let bounds = line.bounds();
                let glyphs: Vec<Glyph> = line
                    .chars()
                    .map(|c| {
                        let quad = c.quad();
                        let x0 = quad.ul.x.min(quad.ll.x);
                        let x1 = quad.ur.x.max(quad.lr.x);
                        Glyph {
                            ch: c.char().unwrap_or('\u{FFFD}'),
                            x0,
                            x1: x1.max(x0),
                            size: c.size(),
                        }
                    })
                    .collect();
                if glyphs.is_empty() {
                    continue;
                }
                lines.push(TextLine {
                    bbox: BBox::new(bounds.x0, bounds.y0, bounds.x1, bounds.y1),
                    glyphs,
                });
            }
        }

        tracing::debug!(
            pages = page_count,
            lines = lines.len(),
            "read first page layout"
        );

        Ok(PageLayout {
            width: page_bounds.x1 - page_bounds.x0,
            height: page_bounds.y1 - page_bounds.y0,
            lines,
        })
    }
}
