use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// 依序執行 extract → transform → load，回傳渲染後的報表
    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting ETL process...");

        // Extract
        tracing::info!("📡 Extracting entities...");
        let entities = self.pipeline.extract().await?;
        tracing::info!("Extracted {} entities", entities.len());

        // Transform
        tracing::info!("🔄 Classifying entities...");
        let transformed = self.pipeline.transform(entities).await?;
        tracing::info!(
            "Built report with {} groups ({} unclassified)",
            transformed.report.groups.len(),
            transformed.report.unclassified
        );

        // Load
        tracing::info!("📝 Rendering report...");
        let output = self.pipeline.load(transformed).await?;

        Ok(output)
    }
}
