//! Plotly-compatible figure descriptions.
//!
//! A [`ChartPayload`] serializes to the `{ "data": [...], "layout": {...} }`
//! shape that `Plotly.newPlot` accepts directly.

use serde::{Deserialize, Serialize};

/// Trace colours, cycled when there are more categories than entries.
pub const PALETTE: [&str; 10] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#06B6D4", "#F97316", "#84CC16",
    "#EC4899", "#6B7280",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Pie,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub data: Vec<Trace>,
    pub layout: ChartLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Pie {
        labels: Vec<String>,
        values: Vec<f64>,
        textinfo: String,
        hovertemplate: String,
        marker: Marker,
        name: String,
        showlegend: bool,
    },
    Bar {
        x: Vec<String>,
        y: Vec<f64>,
        hovertemplate: String,
        marker: Marker,
        name: String,
        showlegend: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub title: Title,
    pub showlegend: bool,
    pub legend: Legend,
    pub margin: Margin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub tracegroupgap: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub t: u32,
    pub b: u32,
    pub l: u32,
    pub r: u32,
}

impl ChartPayload {
    /// Build a categorical chart mapping `labels[i]` to `values[i]`.
    pub fn new(
        kind: ChartKind,
        title: impl Into<String>,
        labels: Vec<String>,
        values: Vec<f64>,
    ) -> Self {
        let colors = PALETTE
            .iter()
            .cycle()
            .take(labels.len())
            .map(|c| c.to_string())
            .collect();
        let marker = Marker { colors };
        let hovertemplate = "Color=%{label}<br>Quantity=%{value}<extra></extra>".to_string();

        let trace = match kind {
            ChartKind::Pie => Trace::Pie {
                labels,
                values,
                textinfo: "label+percent".to_string(),
                hovertemplate,
                marker,
                name: String::new(),
                showlegend: true,
            },
            ChartKind::Bar => Trace::Bar {
                x: labels,
                y: values,
                hovertemplate: "Color=%{x}<br>Quantity=%{y}<extra></extra>".to_string(),
                marker,
                name: String::new(),
                showlegend: false,
            },
        };

        Self {
            data: vec![trace],
            layout: ChartLayout {
                title: Title {
                    text: title.into(),
                    font: Font { size: 16 },
                },
                showlegend: kind == ChartKind::Pie,
                legend: Legend { tracegroupgap: 0 },
                margin: Margin {
                    t: 50,
                    b: 50,
                    l: 50,
                    r: 50,
                },
            },
        }
    }

    /// Title shown above the chart for an entity.
    pub fn title_for(entity: &str) -> String {
        format!("{} Production by Color", entity)
    }
}
