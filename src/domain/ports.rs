use crate::domain::model::{Entity, OutputFormat, RowPolicy, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn listing_url(&self) -> &str;
    fn range_table_path(&self) -> &str;
    fn unit_label(&self) -> &str;
    fn heading(&self) -> Option<&str>;
    fn row_policy(&self) -> RowPolicy;
    /// `None` 表示停用年底 fallback
    fn fallback_row(&self) -> Option<&str>;
    fn retry_policy(&self) -> RetryPolicy;
    fn request_timeout(&self) -> Duration;
    fn output_format(&self) -> OutputFormat;
    fn list_entities(&self) -> bool;
}

/// 提供尚未分類的實體（名稱、個人頁連結、原始出生日期）
#[async_trait]
pub trait EntitySource: Send + Sync {
    async fn fetch_entities(&self) -> Result<Vec<Entity>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Entity>>;
    async fn transform(&self, entities: Vec<Entity>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
