//! Reconstruct page text and tables from positioned glyphs.
//!
//! The approach follows pdfplumber's text strategy: glyphs are cut into
//! fragments at wide horizontal gaps, fragments are grouped into visual
//! rows by vertical position, and runs of multi-fragment rows become
//! tables whose columns are the merged horizontal extents of their cells.

use prodchart_core::{BBox, PageLayout, Report, Row, Table, TextLine};

use crate::config::LayoutConfig;
use crate::text_processing::normalize_fragment;

/// A run of text with no wide gap inside it, usually one table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub bbox: BBox,
}

/// Fragments sharing a baseline, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualRow {
    pub fragments: Vec<Fragment>,
    pub bbox: BBox,
}

impl VisualRow {
    fn new(fragment: Fragment) -> Self {
        Self {
            bbox: fragment.bbox,
            fragments: vec![fragment],
        }
    }

    fn accepts(&self, fragment: &Fragment, tolerance_ratio: f32) -> bool {
        let height = self.bbox.height().max(fragment.bbox.height());
        (fragment.bbox.center_y() - self.bbox.center_y()).abs() <= height * tolerance_ratio
    }

    fn push(&mut self, fragment: Fragment) {
        self.bbox = self.bbox.union(&fragment.bbox);
        self.fragments.push(fragment);
    }

    fn is_multi(&self) -> bool {
        self.fragments.len() >= 2
    }

    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Run the full analysis: fragments → rows → page text and tables.
pub fn analyze(layout: &PageLayout, config: &LayoutConfig) -> Report {
    let fragments: Vec<Fragment> = layout
        .lines
        .iter()
        .flat_map(|line| split_line(line, config))
        .collect();
    let rows = group_rows(fragments, config);
    let report = Report {
        text: page_text(&rows),
        tables: find_tables(&rows, config),
    };
    tracing::debug!(
        lines = layout.lines.len(),
        rows = rows.len(),
        tables = report.tables.len(),
        "analyzed page layout"
    );
    report
}

/// Cut a backend line into fragments wherever the gap between two visible
/// glyphs exceeds `column_gap_ratio × size`. Narrower gaps that held
/// whitespace become a single space.
pub fn split_line(line: &TextLine, config: &LayoutConfig) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut text = String::new();
    let mut x0 = 0.0_f32;
    let mut x1 = 0.0_f32;
    let mut pending_space = false;

    let mut flush = |text: &mut String, x0: f32, x1: f32| {
        let normalized = normalize_fragment(text);
        text.clear();
        if !normalized.is_empty() {
            fragments.push(Fragment {
                text: normalized,
                bbox: BBox::new(x0, line.bbox.y0, x1, line.bbox.y1),
            });
        }
    };

    for glyph in &line.glyphs {
        if glyph.ch.is_whitespace() {
            pending_space = !text.is_empty();
            continue;
        }
        if !text.is_empty() {
            let gap = glyph.x0 - x1;
            if gap > glyph.size.max(1.0) * config.column_gap_ratio {
                flush(&mut text, x0, x1);
            } else if pending_space {
                text.push(' ');
            }
        }
        if text.is_empty() {
            x0 = glyph.x0;
            x1 = glyph.x1;
        }
        text.push(glyph.ch);
        x1 = x1.max(glyph.x1);
        pending_space = false;
    }
    flush(&mut text, x0, x1);

    fragments
}

/// Group fragments into rows top to bottom, each row sorted left to right.
pub fn group_rows(mut fragments: Vec<Fragment>, config: &LayoutConfig) -> Vec<VisualRow> {
    fragments.sort_by(|a, b| {
        a.bbox
            .center_y()
            .total_cmp(&b.bbox.center_y())
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut rows: Vec<VisualRow> = Vec::new();
    for fragment in fragments {
        match rows.last_mut() {
            Some(row) if row.accepts(&fragment, config.row_tolerance_ratio) => row.push(fragment),
            _ => rows.push(VisualRow::new(fragment)),
        }
    }

    for row in &mut rows {
        row.fragments.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    }
    rows
}

/// Plain page text: one line per visual row.
pub fn page_text(rows: &[VisualRow]) -> String {
    rows.iter()
        .map(VisualRow::text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Find tables among the visual rows.
///
/// A table is a run of vertically adjacent rows where each row has at least
/// two fragments, or has one fragment and is directly followed by a row
/// that does (a section label above its items).
pub fn find_tables(rows: &[VisualRow], config: &LayoutConfig) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut run: Vec<&VisualRow> = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        if let Some(prev) = run.last()
            && !adjacent(prev, row, config)
        {
            tables.extend(build_table(&run, config));
            run.clear();
        }

        let leads_into_table = rows
            .get(i + 1)
            .is_some_and(|next| next.is_multi() && adjacent(row, next, config));

        if row.is_multi() || leads_into_table {
            run.push(row);
        } else {
            tables.extend(build_table(&run, config));
            run.clear();
        }
    }
    tables.extend(build_table(&run, config));

    tables
}

fn adjacent(upper: &VisualRow, lower: &VisualRow, config: &LayoutConfig) -> bool {
    let gap = lower.bbox.y0 - upper.bbox.y1;
    let height = upper.bbox.height().max(lower.bbox.height());
    gap <= height * config.row_gap_ratio
}

fn build_table(run: &[&VisualRow], config: &LayoutConfig) -> Option<Table> {
    let bands = column_bands(run);
    if bands.is_empty() {
        return None;
    }

    let mut rows: Vec<Row> = run
        .iter()
        .map(|row| {
            let mut cells: Row = vec![None; bands.len()];
            for fragment in &row.fragments {
                match &mut cells[band_index(&bands, &fragment.bbox)] {
                    Some(cell) => {
                        cell.push(' ');
                        cell.push_str(&fragment.text);
                    }
                    slot => *slot = Some(fragment.text.clone()),
                }
            }
            cells
        })
        .collect();

    lift_merged_labels(run, &mut rows, config);
    Some(Table::new(rows))
}

/// Move the text of vertically merged first-column cells to the top row of
/// the span they cover.
///
/// A merged cell's label is centred over its rows, so it can end up alone
/// on a visual row that overlaps the item rows around it. Such a label is
/// lifted to the topmost row `s` above it for which some row `e` below it
/// puts the label centre at the middle of `s..=e`; its own row is dropped.
/// Label rows that sit clear of their neighbours are section headings and
/// stay where they are.
fn lift_merged_labels(run: &[&VisualRow], rows: &mut Vec<Row>, config: &LayoutConfig) {
    let cells: &[Row] = rows.as_slice();
    let is_item_row = |i: usize| run[i].is_multi() && cells[i][0].is_none();
    let overlaps = |a: &BBox, b: &BBox| a.y0 < b.y1 && b.y0 < a.y1;

    let mut lifts = Vec::new();
    for (i, row) in run.iter().enumerate() {
        if row.is_multi() || cells[i][0].is_none() {
            continue;
        }
        let touches_above =
            i > 0 && is_item_row(i - 1) && overlaps(&row.bbox, &run[i - 1].bbox);
        let touches_below =
            i + 1 < run.len() && is_item_row(i + 1) && overlaps(&row.bbox, &run[i + 1].bbox);
        if !(touches_above || touches_below) {
            continue;
        }

        let centre = row.bbox.center_y();
        let tolerance = row.bbox.height() * config.row_tolerance_ratio;
        let above: Vec<usize> = (0..i).rev().take_while(|&j| is_item_row(j)).collect();
        let below: Vec<usize> = (i + 1..run.len()).take_while(|&k| is_item_row(k)).collect();

        let top = above.iter().rev().copied().find(|&s| {
            below.iter().any(|&e| {
                let middle = (run[s].bbox.y0 + run[e].bbox.y1) / 2.0;
                (middle - centre).abs() <= tolerance
            })
        });
        if let Some(s) = top {
            lifts.push((i, s));
        }
    }

    for (i, s) in lifts.into_iter().rev() {
        let label = rows[i][0].take();
        tracing::trace!(label = ?label, from = i, to = s, "lifted merged label");
        rows[s][0] = label;
        rows.remove(i);
    }
}

/// Column extents: horizontal spans of all fragments in multi-fragment
/// rows, merged where they overlap. A single-fragment row (a section label)
/// that overlaps none of them contributes its own column.
fn column_bands(run: &[&VisualRow]) -> Vec<(f32, f32)> {
    let spans: Vec<(f32, f32)> = run
        .iter()
        .filter(|row| row.is_multi())
        .flat_map(|row| row.fragments.iter().map(|f| (f.bbox.x0, f.bbox.x1)))
        .collect();
    let mut bands = merge_spans(spans);
    if bands.is_empty() {
        return bands;
    }

    let labels: Vec<(f32, f32)> = run
        .iter()
        .filter(|row| !row.is_multi())
        .flat_map(|row| row.fragments.iter().map(|f| (f.bbox.x0, f.bbox.x1)))
        .filter(|&(x0, x1)| bands.iter().all(|&(b0, b1)| x1 < b0 || x0 > b1))
        .collect();
    if !labels.is_empty() {
        bands.extend(labels);
        bands = merge_spans(bands);
    }
    bands
}

fn merge_spans(mut spans: Vec<(f32, f32)>) -> Vec<(f32, f32)> {
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f32, f32)> = Vec::new();
    for (x0, x1) in spans {
        match merged.last_mut() {
            Some(last) if x0 <= last.1 => last.1 = last.1.max(x1),
            _ => merged.push((x0, x1)),
        }
    }
    merged
}

/// Band with the largest overlap; with no overlap, the nearest band
/// (overlap is negative distance then).
fn band_index(bands: &[(f32, f32)], bbox: &BBox) -> usize {
    bands
        .iter()
        .enumerate()
        .map(|(i, &(x0, x1))| (i, x1.min(bbox.x1) - x0.max(bbox.x0)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
