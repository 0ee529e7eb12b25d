pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use self::adapters::{HttpFetcher, WikipediaSource};
pub use self::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use self::core::{
    classifier::Classifier, etl::EtlEngine, pipeline::ZodiacPipeline, range_table::RangeTable,
};
pub use utils::error::{EtlError, Result};
