use thiserror::Error;

use prodchart_core::config_file::ConfigFile;
use prodchart_core::{ChartKind, DEFAULT_ENTITIES};

use crate::patterns::{DEFAULT_TOTAL_PATTERN, TotalPattern};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid total pattern for {entity}: {source}")]
    Pattern {
        entity: String,
        #[source]
        source: regex::Error,
    },
    #[error("total pattern for {entity} has no capture group")]
    MissingCapture { entity: String },
    #[error("invalid entity name: {0:?}")]
    InvalidEntity(String),
    #[error("entity {0:?} is configured twice")]
    DuplicateEntity(String),
    #[error("no entities configured")]
    NoEntities,
    #[error("{name} must be a positive number, got {value}")]
    InvalidRatio { name: &'static str, value: f32 },
}

/// Geometry tolerances for turning glyphs into text rows and tables.
///
/// All values are ratios of the glyph size (or row height), so they hold
/// across font sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Horizontal gap, in multiples of the glyph size, that starts a new cell.
    pub column_gap_ratio: f32,
    /// Maximum vertical-centre offset, in multiples of the height, for two
    /// fragments to share a row.
    pub row_tolerance_ratio: f32,
    /// Vertical gap, in multiples of the row height, that ends a table.
    pub row_gap_ratio: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_gap_ratio: 1.0,
            row_tolerance_ratio: 0.5,
            row_gap_ratio: 1.5,
        }
    }
}

/// Configuration for the report extraction pipeline.
///
/// Use [`ExtractorConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub(crate) patterns: Vec<TotalPattern>,
    pub(crate) layout: LayoutConfig,
    pub(crate) chart_kind: ChartKind,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        let patterns = DEFAULT_ENTITIES
            .iter()
            .map(|name| TotalPattern::from_template(name, DEFAULT_TOTAL_PATTERN))
            .collect::<Result<Vec<_>, _>>()
            .unwrap_or_default();
        Self {
            patterns,
            layout: LayoutConfig::default(),
            chart_kind: ChartKind::default(),
        }
    }
}

impl ExtractorConfig {
    pub fn patterns(&self) -> &[TotalPattern] {
        &self.patterns
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn chart_kind(&self) -> ChartKind {
        self.chart_kind
    }
}

/// Builder for [`ExtractorConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with [`ConfigError`] if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfigBuilder {
    entities: Option<Vec<String>>,
    total_pattern: Option<String>,
    entity_patterns: Vec<(String, String)>,
    column_gap_ratio: Option<f32>,
    row_tolerance_ratio: Option<f32>,
    row_gap_ratio: Option<f32>,
    chart_kind: Option<ChartKind>,
}

impl ExtractorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the builder from the `[extraction]` and `[chart]` sections of a
    /// config file.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let mut builder = Self::new();
        if let Some(extraction) = &file.extraction {
            builder.entities = extraction.entities.clone();
            builder.total_pattern = extraction.total_pattern.clone();
            builder.column_gap_ratio = extraction.column_gap_ratio;
            builder.row_tolerance_ratio = extraction.row_tolerance_ratio;
            builder.row_gap_ratio = extraction.row_gap_ratio;
        }
        builder.chart_kind = file.chart.as_ref().and_then(|c| c.kind);
        builder
    }

    /// Replace the entity list. Order is preserved in the output.
    pub fn entities<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Template applied to every entity without its own pattern.
    /// `{name}` is replaced by the escaped entity name.
    pub fn total_pattern(mut self, template: impl Into<String>) -> Self {
        self.total_pattern = Some(template.into());
        self
    }

    /// Per-entity pattern template, overriding [`total_pattern`](Self::total_pattern).
    pub fn entity_pattern(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.entity_patterns.push((name.into(), template.into()));
        self
    }

    pub fn column_gap_ratio(mut self, ratio: f32) -> Self {
        self.column_gap_ratio = Some(ratio);
        self
    }

    pub fn row_tolerance_ratio(mut self, ratio: f32) -> Self {
        self.row_tolerance_ratio = Some(ratio);
        self
    }

    pub fn row_gap_ratio(mut self, ratio: f32) -> Self {
        self.row_gap_ratio = Some(ratio);
        self
    }

    pub fn chart_kind(mut self, kind: ChartKind) -> Self {
        self.chart_kind = Some(kind);
        self
    }

    pub fn build(self) -> Result<ExtractorConfig, ConfigError> {
        let names: Vec<String> = match self.entities {
            Some(names) => names,
            None => DEFAULT_ENTITIES.iter().map(|s| s.to_string()).collect(),
        };
        if names.is_empty() {
            return Err(ConfigError::NoEntities);
        }

        let default_template = self
            .total_pattern
            .as_deref()
            .unwrap_or(DEFAULT_TOTAL_PATTERN);

        let mut patterns: Vec<TotalPattern> = Vec::with_capacity(names.len());
        for name in &names {
            let template = self
                .entity_patterns
                .iter()
                .rev()
                .find(|(n, _)| n == name)
                .map(|(_, t)| t.as_str())
                .unwrap_or(default_template);
            let pattern = TotalPattern::from_template(name, template)?;
            if patterns
                .iter()
                .any(|p| p.name() == pattern.name() || p.key() == pattern.key())
            {
                return Err(ConfigError::DuplicateEntity(name.clone()));
            }
            patterns.push(pattern);
        }

        let defaults = LayoutConfig::default();
        let layout = LayoutConfig {
            column_gap_ratio: positive(
                "column_gap_ratio",
                self.column_gap_ratio.unwrap_or(defaults.column_gap_ratio),
            )?,
            row_tolerance_ratio: positive(
                "row_tolerance_ratio",
                self.row_tolerance_ratio
                    .unwrap_or(defaults.row_tolerance_ratio),
            )?,
            row_gap_ratio: positive(
                "row_gap_ratio",
                self.row_gap_ratio.unwrap_or(defaults.row_gap_ratio),
            )?,
        };

        Ok(ExtractorConfig {
            patterns,
            layout,
            chart_kind: self.chart_kind.unwrap_or_default(),
        })
    }
}

fn positive(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidRatio { name, value })
    }
}
