use axum::Json;
use axum::extract::{Multipart, State};
use std::sync::Arc;

use prodchart_core::ProductionData;

use crate::error::ApiError;
use crate::state::AppState;
use crate::upload::{is_pdf_filename, parse_multipart};

/// Accept a PDF upload and return per-entity totals, breakdowns and charts.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ProductionData>, ApiError> {
    let file = parse_multipart(multipart).await?;

    if !is_pdf_filename(&file.filename) {
        tracing::warn!(filename = %file.filename, "rejected non-PDF upload");
        return Err(ApiError::InvalidFormat);
    }

    tracing::info!(
        filename = %file.filename,
        bytes = file.data.len(),
        "extracting production report"
    );

    let data = extract_blocking(state, file.data).await?;
    Ok(Json(data))
}

/// Run PDF extraction on the blocking pool; the MuPDF calls are synchronous.
async fn extract_blocking(
    state: Arc<AppState>,
    pdf: Vec<u8>,
) -> Result<ProductionData, ApiError> {
    let result = tokio::task::spawn_blocking(move || {
        state.extractor.extract(&pdf, state.backend.as_ref())
    })
    .await
    .map_err(|e| ApiError::Internal(format!("extraction task failed: {e}")))?;

    match result {
        Ok(data) => Ok(data),
        Err(e) => {
            tracing::warn!(error = %e, "extraction failed");
            Err(e.into())
        }
    }
}
