use thiserror::Error;

use crate::layout::PageLayout;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("PDF has no pages")]
    EmptyDocument,
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
}

/// Trait for PDF layout extraction backends.
///
/// Implementors provide the low-level glyph extraction step; the analysis
/// pipeline (text reconstruction, table finding, total matching, row folding)
/// lives in `prodchart_parsing::ReportExtractor`.
pub trait PdfBackend: Send + Sync {
    /// Extract the positioned glyphs of the first page of an in-memory PDF.
    fn first_page_layout(&self, pdf: &[u8]) -> Result<PageLayout, BackendError>;
}
