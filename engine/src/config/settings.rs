// Defaults for every helper, optionally loaded from a JSON document
use serde::Deserialize;
use shared::models::{OptionsConfig, TreeConfig};

use crate::error::{Result, ShapeError};
use crate::format::money::MoneyFormat;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapingSettings {
    pub tree: TreeConfig,
    pub options: OptionsConfig,
    pub money: MoneyFormat,
    pub date: DateSettings,
    pub csv: CsvSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DateSettings {
    pub empty_placeholder: String,
    pub utc_offset_seconds: i32,
}

impl Default for DateSettings {
    fn default() -> Self {
        DateSettings {
            empty_placeholder: "--".to_string(),
            utc_offset_seconds: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CsvSettings {
    pub delimiter: char,
    pub has_headers: bool,
}

impl Default for CsvSettings {
    fn default() -> Self {
        CsvSettings {
            delimiter: ';',
            has_headers: true,
        }
    }
}

impl ShapingSettings {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let settings: ShapingSettings = serde_json::from_str(s)
            .map_err(|e| ShapeError::ConfigError(format!("Invalid settings JSON: {}", e)))?;
        if !settings.csv.delimiter.is_ascii() {
            return Err(ShapeError::ConfigError(format!(
                "CSV delimiter must be a single ASCII character, got '{}'",
                settings.csv.delimiter
            )));
        }
        tracing::debug!(?settings, "Loaded shaping settings");
        Ok(settings)
    }
}
