use crate::config::{DEFAULT_LISTING_URL, DEFAULT_RANGE_TABLE, MAX_RETRY_ATTEMPTS};
use crate::core::classifier::DEFAULT_FALLBACK;
use crate::core::report::{DEFAULT_HEADING, DEFAULT_UNIT_LABEL};
use crate::core::ConfigProvider;
use crate::domain::model::{OutputFormat, RowPolicy};
use crate::domain::ports::RetryPolicy;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

static ENV_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: Option<PipelineConfig>,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub report: ReportConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub listing_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationConfig {
    pub range_table: Option<String>,
    pub row_policy: Option<RowPolicy>,
    pub fallback: Option<String>,
    pub fallback_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub unit_label: Option<String>,
    pub heading: Option<String>,
    pub show_heading: Option<bool>,
    pub format: Option<OutputFormat>,
    pub list_entities: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// "compact" 或 "json"
    pub log_format: Option<String>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LISTING_URL})；找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn pipeline_name(&self) -> &str {
        self.pipeline
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("zodiac-etl")
    }

    pub fn json_logging(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.verbose)
            .unwrap_or(false)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.listing_url", self.listing_url())?;
        validation::validate_path("classification.range_table", self.range_table_path())?;
        validation::validate_non_empty_string("report.unit_label", self.unit_label())?;
        validation::validate_range(
            "source.retry_attempts",
            self.retry_policy().attempts,
            1,
            MAX_RETRY_ATTEMPTS,
        )?;

        if let Some(row) = self.fallback_row() {
            validation::validate_range_row("classification.fallback", row)?;
        }

        if let Some(format) = self.monitoring.as_ref().and_then(|m| m.log_format.as_deref()) {
            if !["compact", "json"].contains(&format.to_ascii_lowercase().as_str()) {
                return Err(EtlError::InvalidConfigValueError {
                    field: "monitoring.log_format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn listing_url(&self) -> &str {
        self.source.listing_url.as_deref().unwrap_or(DEFAULT_LISTING_URL)
    }

    fn range_table_path(&self) -> &str {
        self.classification
            .range_table
            .as_deref()
            .unwrap_or(DEFAULT_RANGE_TABLE)
    }

    fn unit_label(&self) -> &str {
        self.report.unit_label.as_deref().unwrap_or(DEFAULT_UNIT_LABEL)
    }

    fn heading(&self) -> Option<&str> {
        if !self.report.show_heading.unwrap_or(true) {
            return None;
        }
        Some(self.report.heading.as_deref().unwrap_or(DEFAULT_HEADING))
    }

    fn row_policy(&self) -> RowPolicy {
        self.classification.row_policy.unwrap_or_default()
    }

    fn fallback_row(&self) -> Option<&str> {
        if !self.classification.fallback_enabled.unwrap_or(true) {
            return None;
        }
        Some(self.classification.fallback.as_deref().unwrap_or(DEFAULT_FALLBACK))
    }

    fn retry_policy(&self) -> RetryPolicy {
        let default = RetryPolicy::default();
        RetryPolicy {
            attempts: self.source.retry_attempts.unwrap_or(default.attempts),
            delay: self
                .source
                .retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(default.delay),
        }
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(10))
    }

    fn output_format(&self) -> OutputFormat {
        self.report.format.unwrap_or_default()
    }

    fn list_entities(&self) -> bool {
        self.report.list_entities.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[pipeline]
name = "wrc-zodiac"
description = "WRC drivers by sign"

[source]
listing_url = "https://en.wikipedia.org/wiki/List_of_World_Rally_Championship_drivers"
timeout_seconds = 5
retry_attempts = 2
retry_delay_ms = 250

[classification]
range_table = "./data/zodiac.txt"
row_policy = "strict"
fallback = "Capricorn | 22.12 - 19.01"

[report]
unit_label = "drivers"
heading = "Sign counts:"
format = "json"
list_entities = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline_name(), "wrc-zodiac");
        assert_eq!(config.range_table_path(), "./data/zodiac.txt");
        assert_eq!(config.row_policy(), RowPolicy::Strict);
        assert_eq!(config.fallback_row(), Some("Capricorn | 22.12 - 19.01"));
        assert_eq!(config.unit_label(), "drivers");
        assert_eq!(config.heading(), Some("Sign counts:"));
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert!(config.list_entities());
        assert_eq!(
            config.retry_policy(),
            RetryPolicy {
                attempts: 2,
                delay: Duration::from_millis(250)
            }
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.listing_url(), DEFAULT_LISTING_URL);
        assert_eq!(config.range_table_path(), DEFAULT_RANGE_TABLE);
        assert_eq!(config.unit_label(), "Fahrer");
        assert_eq!(config.fallback_row(), Some(DEFAULT_FALLBACK));
        assert_eq!(config.row_policy(), RowPolicy::Skip);
        assert!(!config.json_logging());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_disable_fallback_and_heading() {
        let config = TomlConfig::from_toml_str(
            "[classification]\nfallback_enabled = false\n[report]\nshow_heading = false\n",
        )
        .unwrap();
        assert_eq!(config.fallback_row(), None);
        assert_eq!(config.heading(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ZODIAC_TEST_LISTING_URL", "https://test.example.com/list");

        let config = TomlConfig::from_toml_str(
            "[source]\nlisting_url = \"${ZODIAC_TEST_LISTING_URL}\"\n",
        )
        .unwrap();
        assert_eq!(config.listing_url(), "https://test.example.com/list");

        std::env::remove_var("ZODIAC_TEST_LISTING_URL");
    }

    #[test]
    fn test_config_validation() {
        let config =
            TomlConfig::from_toml_str("[source]\nlisting_url = \"invalid-url\"\n").unwrap();
        assert!(config.validate().is_err());

        let config =
            TomlConfig::from_toml_str("[classification]\nfallback = \"Steinbock\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[monitoring]\nlog_format = \"xml\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_row_policy_is_parse_error() {
        let result = TomlConfig::from_toml_str("[classification]\nrow_policy = \"lenient\"\n");
        assert!(matches!(result, Err(EtlError::ConfigValidationError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[pipeline]\nname = \"file-test\"\n[monitoring]\nlog_format = \"json\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline_name(), "file-test");
        assert!(config.json_logging());
    }
}
