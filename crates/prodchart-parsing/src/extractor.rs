use prodchart_core::{ChartPayload, EntityReport, PageLayout, PdfBackend, ProductionData, Report};

use crate::config::ExtractorConfig;
use crate::{ExtractError, breakdown, layout, patterns, rows};

/// Production report extractor.
///
/// Holds the compiled pattern table and layout settings; immutable and
/// cheap to share across requests.
#[derive(Debug, Clone, Default)]
pub struct ReportExtractor {
    config: ExtractorConfig,
}

impl ReportExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn entity_names(&self) -> Vec<&str> {
        self.config.patterns.iter().map(|p| p.name()).collect()
    }

    /// Extract production data from an in-memory PDF.
    ///
    /// Pipeline:
    /// 1. Get the first page's glyph layout from `backend`
    /// 2. Rebuild page text and tables
    /// 3. Match every entity's total in the text (all or nothing)
    /// 4. Fold table rows into per-entity buckets
    /// 5. Compute percentages and build one chart per entity
    pub fn extract(
        &self,
        pdf: &[u8],
        backend: &dyn PdfBackend,
    ) -> Result<ProductionData, ExtractError> {
        let layout = backend.first_page_layout(pdf)?;
        self.extract_from_layout(&layout)
    }

    /// Rebuild page text and tables without matching anything.
    pub fn analyze(&self, layout: &PageLayout) -> Report {
        layout::analyze(layout, &self.config.layout)
    }

    pub fn extract_from_layout(&self, layout: &PageLayout) -> Result<ProductionData, ExtractError> {
        let report = self.analyze(layout);
        self.extract_from_report(&report)
    }

    /// Run steps 3 to 5 on already-analyzed page content.
    pub fn extract_from_report(&self, report: &Report) -> Result<ProductionData, ExtractError> {
        let totals = patterns::find_totals(&self.config.patterns, &report.text)?;
        let names = self.entity_names();
        let buckets = rows::fold_rows(&report.tables, &names)?;

        let mut entities = Vec::with_capacity(self.config.patterns.len());
        for ((pattern, total), raw) in self.config.patterns.iter().zip(totals).zip(buckets) {
            let items = breakdown::compute(pattern.name(), total, raw)?;
            let chart = ChartPayload::new(
                self.config.chart_kind,
                ChartPayload::title_for(pattern.name()),
                items.iter().map(|i| i.category.clone()).collect(),
                items.iter().map(|i| i.quantity).collect(),
            );
            tracing::debug!(
                entity = pattern.name(),
                total,
                items = items.len(),
                "entity breakdown"
            );
            entities.push(EntityReport {
                name: pattern.name().to_string(),
                key: pattern.key().to_string(),
                total,
                items,
                chart,
            });
        }

        Ok(ProductionData { entities })
    }
}
