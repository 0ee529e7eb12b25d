pub mod aggregator;
pub mod classifier;
pub mod date_normalizer;
pub mod etl;
pub mod pipeline;
pub mod range_table;
pub mod report;

pub use crate::domain::model::{Entity, Report, TransformResult};
pub use crate::domain::ports::{ConfigProvider, EntitySource, Pipeline, Storage};
pub use crate::utils::error::Result;
