use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chart::ChartKind;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub extraction: Option<ExtractionConfig>,
    pub chart: Option<ChartConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub max_upload_mb: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Entity names, in output order.
    pub entities: Option<Vec<String>>,
    /// Total pattern template; `{name}` is replaced by the escaped entity name.
    pub total_pattern: Option<String>,
    pub column_gap_ratio: Option<f32>,
    pub row_tolerance_ratio: Option<f32>,
    pub row_gap_ratio: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartConfig {
    pub kind: Option<ChartKind>,
}

/// Platform config directory path: `<config_dir>/prodchart/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("prodchart").join("config.toml"))
}

/// Load config by cascading CWD `.prodchart.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".prodchart.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Some(config)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        server: Some(ServerConfig {
            bind: overlay
                .server
                .as_ref()
                .and_then(|s| s.bind.clone())
                .or_else(|| base.server.as_ref().and_then(|s| s.bind.clone())),
            max_upload_mb: overlay
                .server
                .as_ref()
                .and_then(|s| s.max_upload_mb)
                .or_else(|| base.server.as_ref().and_then(|s| s.max_upload_mb)),
        }),
        extraction: Some(ExtractionConfig {
            entities: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.entities.clone())
                .or_else(|| base.extraction.as_ref().and_then(|e| e.entities.clone())),
            total_pattern: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.total_pattern.clone())
                .or_else(|| {
                    base.extraction
                        .as_ref()
                        .and_then(|e| e.total_pattern.clone())
                }),
            column_gap_ratio: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.column_gap_ratio)
                .or_else(|| base.extraction.as_ref().and_then(|e| e.column_gap_ratio)),
            row_tolerance_ratio: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.row_tolerance_ratio)
                .or_else(|| {
                    base.extraction
                        .as_ref()
                        .and_then(|e| e.row_tolerance_ratio)
                }),
            row_gap_ratio: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.row_gap_ratio)
                .or_else(|| base.extraction.as_ref().and_then(|e| e.row_gap_ratio)),
        }),
        chart: Some(ChartConfig {
            kind: overlay
                .chart
                .as_ref()
                .and_then(|c| c.kind)
                .or_else(|| base.chart.as_ref().and_then(|c| c.kind)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let toml_str = r#"
[server]
bind = "0.0.0.0:8080"
max_upload_mb = 25

[extraction]
entities = ["Lantabur", "Taqwa", "Unit 3"]
column_gap_ratio = 1.5

[chart]
kind = "bar"
"#;
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let server = parsed.server.unwrap();
        assert_eq!(server.bind.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(server.max_upload_mb, Some(25));
        let extraction = parsed.extraction.unwrap();
        assert_eq!(extraction.entities.unwrap().len(), 3);
        assert_eq!(extraction.column_gap_ratio, Some(1.5));
        assert!(extraction.total_pattern.is_none());
        assert_eq!(parsed.chart.unwrap().kind, Some(ChartKind::Bar));
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            server: Some(ServerConfig {
                bind: Some("127.0.0.1:5000".to_string()),
                max_upload_mb: Some(10),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            server: Some(ServerConfig {
                bind: Some("0.0.0.0:9000".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let server = merged.server.unwrap();
        assert_eq!(server.bind.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(server.max_upload_mb, Some(10));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            extraction: Some(ExtractionConfig {
                entities: Some(vec!["Lantabur".to_string()]),
                ..Default::default()
            }),
            chart: Some(ChartConfig {
                kind: Some(ChartKind::Bar),
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(
            merged.extraction.unwrap().entities.unwrap(),
            vec!["Lantabur".to_string()]
        );
        assert_eq!(merged.chart.unwrap().kind, Some(ChartKind::Bar));
    }

    #[test]
    fn missing_file_loads_as_none() {
        assert!(load_from_path(Path::new("/nonexistent/prodchart.toml")).is_none());
    }
}
