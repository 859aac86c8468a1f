use thiserror::Error;

pub mod breakdown;
pub mod config;
pub mod extractor;
pub mod layout;
pub mod patterns;
pub mod rows;
pub mod text_processing;

pub use config::{ConfigError, ExtractorConfig, ExtractorConfigBuilder, LayoutConfig};
pub use extractor::ReportExtractor;
pub use patterns::{DEFAULT_TOTAL_PATTERN, TotalPattern};
// Re-export domain types from core (canonical definitions live there)
pub use prodchart_core::{
    BackendError, EntityReport, LineItem, PageLayout, PdfBackend, ProductionData, Report, Table,
};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Could not find production data in the PDF.")]
    NoProductionData { missing: Vec<String> },
    #[error("malformed quantity {value:?} for {entity} / {category}")]
    MalformedCell {
        entity: String,
        category: String,
        value: String,
    },
    #[error("row under {entity} has {cells} cells, expected at least 3")]
    ShortRow { entity: String, cells: usize },
    #[error("production total for {entity} is zero")]
    ZeroTotal { entity: String },
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

impl ExtractError {
    /// True when the page lacked one of the production totals.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExtractError::NoProductionData { .. })
    }
}

/// Extract production data from an in-memory PDF with the default
/// entity table.
pub fn extract_production_data(
    pdf: &[u8],
    backend: &dyn PdfBackend,
) -> Result<ProductionData, ExtractError> {
    ReportExtractor::new().extract(pdf, backend)
}
