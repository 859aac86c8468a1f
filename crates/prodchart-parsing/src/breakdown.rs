use prodchart_core::LineItem;

use crate::ExtractError;
use crate::rows::Bucket;

/// Annotate an entity's raw items with their share of `total`, in percent.
///
/// Item quantities are not required to sum to `total`. A zero total is only
/// an error when there is something to divide.
pub fn compute(entity: &str, total: f64, raw: Bucket) -> Result<Vec<LineItem>, ExtractError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    if total == 0.0 {
        return Err(ExtractError::ZeroTotal {
            entity: entity.to_string(),
        });
    }

    Ok(raw
        .into_iter()
        .map(|(category, quantity)| LineItem {
            category,
            quantity,
            percentage: quantity / total * 100.0,
        })
        .collect())
}
