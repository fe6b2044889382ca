use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{FieldError, Result};
use crate::order_by::{OrderByField, SortOrder};
use crate::statistics::{StatisticDefinition, StatisticType};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "FIELDCTL_CONFIG";

/// Centralized configuration for fieldctl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldctlConfig {
    /// Schema document used when `--schema` is not given (supports `${VAR}`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_path: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    #[serde(default)]
    pub defaults: SelectionDefaults,
}

/// Selections applied to a freshly loaded schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionDefaults {
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub order_by: Vec<OrderByField>,
    #[serde(default)]
    pub statistics: Vec<StatisticDefinition>,
}

impl Default for SelectionDefaults {
    /// Census sample defaults: population totals and averages per sub-region.
    fn default() -> Self {
        Self {
            group_by: vec!["SUB_REGION".to_string()],
            order_by: vec![OrderByField::new("SUB_REGION", SortOrder::Ascending)],
            statistics: vec![
                StatisticDefinition::new("POP2007", StatisticType::Sum),
                StatisticDefinition::new("POP2007", StatisticType::Average),
                StatisticDefinition::new("AGE_5_17", StatisticType::Minimum),
            ],
        }
    }
}

impl SelectionDefaults {
    /// No initial selections at all
    pub fn empty() -> Self {
        Self {
            group_by: Vec::new(),
            order_by: Vec::new(),
            statistics: Vec::new(),
        }
    }
}

impl FieldctlConfig {
    /// Get config file path: $FIELDCTL_CONFIG or ~/.fieldctl/config.toml
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".fieldctl/config.toml")
    }

    /// Load from the default location, falling back to built-in defaults if
    /// no file exists there yet.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        if !config_path.exists() {
            debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    /// Load an explicit config file. Unlike [`FieldctlConfig::load`], a missing
    /// file is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FieldError::path_not_found(path));
        }

        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.expand_variables();
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|err| FieldError::config(format!("invalid TOML: {err}")))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|err| FieldError::config(format!("failed to serialize config: {err}")))
    }

    /// Save config to `path`, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Expand ${var} references in schema_path from the environment
    fn expand_variables(&mut self) {
        if let Some(ref schema) = self.schema_path {
            let expanded = expand_string(&schema.display().to_string(), |key| env::var(key).ok());
            self.schema_path = Some(PathBuf::from(expanded));
        }
    }
}

/// Replace each `${KEY}` with `lookup(KEY)`; unknown keys are left in place.
fn expand_string(s: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let placeholder = &rest[start..start + 3 + len];
        let key = &placeholder[2..placeholder.len() - 1];
        // unknown variables stay as written
        match lookup(key) {
            Some(value) => result.push_str(&value),
            None => result.push_str(placeholder),
        }
        rest = &rest[start + 3 + len..];
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_census_sample() {
        let defaults = SelectionDefaults::default();
        assert_eq!(defaults.group_by, vec!["SUB_REGION"]);
        assert_eq!(defaults.statistics.len(), 3);
        assert!(SelectionDefaults::empty().statistics.is_empty());
    }

    #[test]
    fn parses_toml() {
        let config = FieldctlConfig::from_toml(
            r#"
            schema_path = "/data/states.json"
            log_level = "debug"

            [defaults]
            group_by = ["STATE_NAME"]
            order_by = [{ field_name = "STATE_NAME", sort_order = "descending" }]
            statistics = [{ field_name = "POP2007", statistic_type = "MAXIMUM" }]
            "#,
        )
        .unwrap();

        assert_eq!(config.schema_path, Some(PathBuf::from("/data/states.json")));
        assert_eq!(config.defaults.order_by[0].sort_order, SortOrder::Descending);
        assert_eq!(
            config.defaults.statistics[0].statistic_type,
            StatisticType::Maximum
        );
    }

    #[test]
    fn missing_sections_fall_back() {
        let config = FieldctlConfig::from_toml("").unwrap();
        assert_eq!(config, FieldctlConfig::default());

        let config = FieldctlConfig::from_toml("[defaults]\ngroup_by = [\"A\"]\n").unwrap();
        assert!(config.defaults.statistics.is_empty());
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = FieldctlConfig::from_toml("defaults = 3").unwrap_err();
        assert!(matches!(err, FieldError::Config { .. }));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");
        let config = FieldctlConfig {
            log_level: Some("warn".into()),
            ..Default::default()
        };

        config.save(&path).unwrap();
        assert_eq!(FieldctlConfig::load_from(&path).unwrap(), config);
        assert!(matches!(
            FieldctlConfig::load_from(dir.path().join("absent.toml")),
            Err(FieldError::PathNotFound { .. })
        ));
    }

    #[test]
    fn expands_variables() {
        let lookup = |key: &str| (key == "DATA").then(|| "/srv/data".to_string());
        assert_eq!(
            expand_string("${DATA}/states.json", lookup),
            "/srv/data/states.json"
        );
        assert_eq!(expand_string("${UNSET}/x", lookup), "${UNSET}/x");
        assert_eq!(expand_string("plain/${open", lookup), "plain/${open");
    }
}
