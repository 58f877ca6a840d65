use crate::utils::error::{ExportError, Result};
use crate::utils::validation::{validate_range, validate_required_field, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Vote thresholds used to turn delegate vote weight into entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationConfig {
    pub min_votes: f64,
    pub max_votes: f64,
    pub min_entries: u32,
    pub max_entries: u32,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            min_votes: 100.0,
            max_votes: 50_000.0,
            min_entries: 3,
            max_entries: 100,
        }
    }
}

/// Partial settings from a TOML file or the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationOverrides {
    pub min_votes: Option<f64>,
    pub max_votes: Option<f64>,
    pub min_entries: Option<u32>,
    pub max_entries: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct AllocationFile {
    allocation: Option<AllocationOverrides>,
}

impl AllocationConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析 `[allocation]` 區塊，未指定的欄位使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: AllocationFile = toml::from_str(content)?;
        let overrides = validate_required_field("allocation", &file.allocation)?;
        Ok(Self::default().with_overrides(overrides))
    }

    pub fn with_overrides(self, overrides: &AllocationOverrides) -> Self {
        Self {
            min_votes: overrides.min_votes.unwrap_or(self.min_votes),
            max_votes: overrides.max_votes.unwrap_or(self.max_votes),
            min_entries: overrides.min_entries.unwrap_or(self.min_entries),
            max_entries: overrides.max_entries.unwrap_or(self.max_entries),
        }
    }
}

impl Validate for AllocationConfig {
    fn validate(&self) -> Result<()> {
        validate_range("min_votes", self.min_votes, 0.0, f64::MAX)?;
        validate_range("max_votes", self.max_votes, 0.0, f64::MAX)?;
        validate_range("max_entries", self.max_entries, 1, u32::MAX)?;

        if self.max_votes <= self.min_votes {
            return Err(ExportError::InvalidConfigValueError {
                field: "max_votes".to_string(),
                value: self.max_votes.to_string(),
                reason: format!("Must be greater than min_votes ({})", self.min_votes),
            });
        }

        if self.min_entries > self.max_entries {
            return Err(ExportError::InvalidConfigValueError {
                field: "min_entries".to_string(),
                value: self.min_entries.to_string(),
                reason: format!("Must not exceed max_entries ({})", self.max_entries),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = AllocationConfig::default();
        assert_eq!(config.min_votes, 100.0);
        assert_eq!(config.max_votes, 50_000.0);
        assert_eq!(config.min_entries, 3);
        assert_eq!(config.max_entries, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_content = r#"
[allocation]
max_votes = 20000.0
max_entries = 50
"#;

        let config = AllocationConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.min_votes, 100.0);
        assert_eq!(config.max_votes, 20_000.0);
        assert_eq!(config.min_entries, 3);
        assert_eq!(config.max_entries, 50);
    }

    #[test]
    fn test_missing_allocation_table() {
        let err = AllocationConfig::from_toml_str("[other]\nkey = 1\n").unwrap_err();
        assert!(matches!(err, ExportError::MissingConfigError { ref field } if field == "allocation"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = AllocationConfig::from_toml_str("[allocation\nmax_votes = ").unwrap_err();
        assert!(matches!(err, ExportError::TomlError(_)));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let overrides = AllocationOverrides {
            min_votes: Some(10.0),
            min_entries: Some(1),
            ..Default::default()
        };

        let config = AllocationConfig::default().with_overrides(&overrides);

        assert_eq!(config.min_votes, 10.0);
        assert_eq!(config.min_entries, 1);
        assert_eq!(config.max_votes, 50_000.0);
    }

    #[test]
    fn test_validation_rejects_inverted_thresholds() {
        let config = AllocationConfig {
            min_votes: 500.0,
            max_votes: 100.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AllocationConfig {
            min_entries: 200,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[allocation]\nmin_votes = 250.0\n")
            .unwrap();

        let config = AllocationConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.min_votes, 250.0);
    }
}
