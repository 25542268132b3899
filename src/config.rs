use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::loader::{self, DataSource};

/// Looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "score-explorer.json";

/// Optional features of the viewer. Both are on unless the config says
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Free-text search box on the name column.
    pub search: bool,
    /// Link to the published source document for the selected year.
    pub source_link: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities {
            search: true,
            source_link: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

/// Everything that can be tuned without recompiling. Every field is optional
/// in the file; missing ones take their default.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory with `<year>.json` files.
    pub data_dir: PathBuf,
    /// HTTP prefix for `<year>.json`; takes precedence over `data_dir`.
    pub base_url: Option<String>,
    /// Years offered when the source cannot be listed.
    pub years: Vec<String>,
    /// Year loaded at startup; defaults to the newest available.
    pub initial_year: Option<String>,
    pub search_enabled: bool,
    pub source_link_enabled: bool,
    /// Column the search box matches against.
    pub name_column: String,
    /// Column filtered by min/max instead of exact match.
    pub range_column: String,
    /// Font file with CJK glyphs; system fonts are tried when unset.
    pub font_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("data"),
            base_url: None,
            years: ["2024", "2023", "2022", "2021"].map(String::from).to_vec(),
            initial_year: None,
            search_enabled: true,
            source_link_enabled: true,
            name_column: "院校名称".to_string(),
            range_column: "投档线".to_string(),
            font_path: None,
        }
    }
}

impl Config {
    /// Parse a config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Read `path` if it exists; fall back to defaults on any problem.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No {} found, using defaults", path.display());
            return Config::default();
        }
        match Config::from_path(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("Ignoring configuration: {e:#}");
                Config::default()
            }
        }
    }

    pub fn source(&self) -> DataSource {
        match &self.base_url {
            Some(url) => DataSource::Http {
                base_url: url.clone(),
            },
            None => DataSource::Directory(self.data_dir.clone()),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            search: self.search_enabled,
            source_link: self.source_link_enabled,
        }
    }

    /// Years to offer in the year selector: whatever the source holds, or the
    /// configured list when it holds nothing or cannot be listed.
    pub fn years_for(&self, source: &DataSource) -> Vec<String> {
        match loader::available_years(source) {
            Some(found) if !found.is_empty() => found,
            _ => self.years.clone(),
        }
    }

    /// The year to load first.
    pub fn initial_year_from(&self, years: &[String]) -> Option<String> {
        self.initial_year
            .clone()
            .or_else(|| years.first().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"base_url":"https://example.org/data","search_enabled":false}"#)
                .unwrap();
        assert_eq!(config.range_column, "投档线");
        assert_eq!(config.capabilities(), Capabilities { search: false, source_link: true });
        assert_eq!(
            config.source(),
            DataSource::Http { base_url: "https://example.org/data".into() }
        );
    }

    #[test]
    fn missing_or_broken_file_falls_back_to_defaults() {
        let missing = std::env::temp_dir().join("score-explorer-no-such-config.json");
        assert_eq!(Config::load_or_default(&missing), Config::default());

        let broken = std::env::temp_dir().join(format!("score-explorer-broken-{}.json", std::process::id()));
        std::fs::write(&broken, "{ nope").unwrap();
        assert!(Config::from_path(&broken).is_err());
        assert_eq!(Config::load_or_default(&broken), Config::default());
        let _ = std::fs::remove_file(broken);
    }

    #[test]
    fn initial_year_prefers_configured_then_newest() {
        let years = vec!["2024".to_string(), "2023".to_string()];
        assert_eq!(Config::default().initial_year_from(&years), Some("2024".into()));
        let config = Config {
            initial_year: Some("2023".into()),
            ..Config::default()
        };
        assert_eq!(config.initial_year_from(&years), Some("2023".into()));
    }

    #[test]
    fn unlistable_source_uses_configured_years() {
        let config = Config::default();
        let source = DataSource::Http { base_url: "http://localhost".into() };
        assert_eq!(config.years_for(&source), config.years);
    }
}
