pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::classifier::DEFAULT_FALLBACK;
#[cfg(feature = "cli")]
use crate::core::report::{DEFAULT_HEADING, DEFAULT_UNIT_LABEL};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{OutputFormat, RowPolicy};
#[cfg(feature = "cli")]
use crate::domain::ports::RetryPolicy;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

pub const DEFAULT_LISTING_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_World_Rally_Championship_drivers";
pub const DEFAULT_RANGE_TABLE: &str = "zodiac.txt";
pub const MAX_RETRY_ATTEMPTS: u32 = 10;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "zodiac-etl")]
#[command(about = "Groups the drivers of a Wikipedia listing by zodiac sign")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_LISTING_URL)]
    pub listing_url: String,

    #[arg(long, default_value = DEFAULT_RANGE_TABLE, help = "Path to the sign range table")]
    pub range_table: String,

    #[arg(long, default_value = DEFAULT_UNIT_LABEL, help = "Word printed after each count")]
    pub unit_label: String,

    #[arg(long, default_value = DEFAULT_HEADING)]
    pub heading: String,

    #[arg(long, help = "Do not print the report heading")]
    pub no_heading: bool,

    #[arg(long, value_enum, default_value_t = RowPolicy::Skip)]
    pub row_policy: RowPolicy,

    #[arg(long, default_value = DEFAULT_FALLBACK, help = "Interval used when no table row matches")]
    pub fallback: String,

    #[arg(long, help = "Disable the year-end fallback interval")]
    pub no_fallback: bool,

    #[arg(long, default_value = "3")]
    pub retry_attempts: u32,

    #[arg(long, default_value = "2000")]
    pub retry_delay_ms: u64,

    #[arg(long, default_value = "10")]
    pub timeout_seconds: u64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long, help = "Print every entity before the report")]
    pub list_entities: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn listing_url(&self) -> &str {
        &self.listing_url
    }

    fn range_table_path(&self) -> &str {
        &self.range_table
    }

    fn unit_label(&self) -> &str {
        &self.unit_label
    }

    fn heading(&self) -> Option<&str> {
        (!self.no_heading).then_some(self.heading.as_str())
    }

    fn row_policy(&self) -> RowPolicy {
        self.row_policy
    }

    fn fallback_row(&self) -> Option<&str> {
        (!self.no_fallback).then_some(self.fallback.as_str())
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry_attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }

    fn list_entities(&self) -> bool {
        self.list_entities
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("listing_url", &self.listing_url)?;
        validation::validate_path("range_table", &self.range_table)?;
        validation::validate_non_empty_string("unit_label", &self.unit_label)?;
        validation::validate_range("retry_attempts", self.retry_attempts, 1, MAX_RETRY_ATTEMPTS)?;
        validation::validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        if !self.no_fallback {
            validation::validate_range_row("fallback", &self.fallback)?;
        }
        Ok(())
    }
}
