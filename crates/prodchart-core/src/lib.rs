use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub mod backend;
pub mod chart;
pub mod config_file;
pub mod layout;

pub use backend::{BackendError, PdfBackend};
pub use chart::{ChartKind, ChartPayload};
pub use layout::{BBox, Glyph, PageLayout, Row, Table, TextLine};

/// Entities recognized when no configuration overrides them.
pub const DEFAULT_ENTITIES: [&str; 2] = ["Lantabur", "Taqwa"];

/// First page of an uploaded report: its plain text and the tables found on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub text: String,
    pub tables: Vec<Table>,
}

/// One category's production quantity under an entity.
///
/// Serialized with the field names the upload page reads
/// (`Color`, `Quantity`, `Percentage`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    #[serde(rename = "Color")]
    pub category: String,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
    /// `quantity / total × 100`.
    #[serde(rename = "Percentage")]
    pub percentage: f64,
}

/// Totals, breakdown and chart for a single entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityReport {
    pub name: String,
    /// JSON key prefix, see [`entity_key`].
    pub key: String,
    pub total: f64,
    pub items: Vec<LineItem>,
    pub chart: ChartPayload,
}

/// Everything extracted from one report, entities in configuration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductionData {
    pub entities: Vec<EntityReport>,
}

impl ProductionData {
    pub fn entity(&self, name: &str) -> Option<&EntityReport> {
        self.entities.iter().find(|e| e.name == name)
    }
}

/// Flattens to `{ "<key>_total", "<key>_data", "<key>_chart", ... }`.
impl Serialize for ProductionData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entities.len() * 3))?;
        for entity in &self.entities {
            map.serialize_entry(&format!("{}_total", entity.key), &entity.total)?;
            map.serialize_entry(&format!("{}_data", entity.key), &entity.items)?;
            map.serialize_entry(&format!("{}_chart", entity.key), &entity.chart)?;
        }
        map.end()
    }
}

/// Derive the JSON key prefix for an entity name: lowercase ASCII
/// alphanumerics, every other run of characters collapsed to `_`.
pub fn entity_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            key.push(ch.to_ascii_lowercase());
        } else if !key.ends_with('_') {
            key.push('_');
        }
    }
    key.trim_matches('_').to_string()
}
