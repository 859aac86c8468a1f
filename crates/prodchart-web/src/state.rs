use std::sync::Arc;

use prodchart_core::PdfBackend;
use prodchart_parsing::ReportExtractor;

/// Shared application state accessible from all handlers.
///
/// Both fields are immutable; every request works on its own bytes.
pub struct AppState {
    pub extractor: ReportExtractor,
    pub backend: Arc<dyn PdfBackend>,
}
