use regex::Regex;

use prodchart_core::entity_key;

use crate::ExtractError;
use crate::config::ConfigError;
use crate::text_processing::parse_quantity;

/// Default total pattern template: `"<Entity> Prod. <int>"`. Any single
/// punctuation mark may follow `Prod`, and the number may carry `,`
/// thousands separators.
pub const DEFAULT_TOTAL_PATTERN: &str = r"{name}\s+Prod\W?\s*(\d[\d,]*)";

/// One row of the pattern table: an entity name and the matcher that finds
/// its production total in the page text.
#[derive(Debug, Clone)]
pub struct TotalPattern {
    name: String,
    key: String,
    regex: Regex,
}

impl TotalPattern {
    /// Wrap an already-compiled matcher. The first capture group must hold
    /// the total.
    pub fn new(name: impl Into<String>, regex: Regex) -> Result<Self, ConfigError> {
        let name = name.into();
        if regex.captures_len() < 2 {
            return Err(ConfigError::MissingCapture { entity: name });
        }
        let key = entity_key(&name);
        if key.is_empty() {
            return Err(ConfigError::InvalidEntity(name));
        }
        Ok(Self { name, key, regex })
    }

    /// Compile `template` with `{name}` replaced by the regex-escaped entity
    /// name.
    pub fn from_template(name: &str, template: &str) -> Result<Self, ConfigError> {
        let pattern = template.replace("{name}", &regex::escape(name.trim()));
        let regex = Regex::new(&pattern).map_err(|source| ConfigError::Pattern {
            entity: name.to_string(),
            source,
        })?;
        Self::new(name.trim(), regex)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// First match of this entity's total in `text`, parsed like a
    /// quantity cell.
    pub fn find(&self, text: &str) -> Option<f64> {
        let caps = self.regex.captures(text)?;
        parse_quantity(caps.get(1)?.as_str())
    }
}

/// Apply every pattern to `text`. Either all totals are found, in table
/// order, or the error names every entity that was missing.
pub fn find_totals(patterns: &[TotalPattern], text: &str) -> Result<Vec<f64>, ExtractError> {
    let mut totals = Vec::with_capacity(patterns.len());
    let mut missing = Vec::new();

    for pattern in patterns {
        match pattern.find(text) {
            Some(total) => {
                tracing::debug!(entity = pattern.name(), total, "matched production total");
                totals.push(total);
            }
            None => missing.push(pattern.name().to_string()),
        }
    }

    if missing.is_empty() {
        Ok(totals)
    } else {
        Err(ExtractError::NoProductionData { missing })
    }
}
