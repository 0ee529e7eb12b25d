use crate::core::aggregator::aggregate;
use crate::core::classifier::Classifier;
use crate::core::date_normalizer;
use crate::core::range_table::{parse_row, RangeTable};
use crate::core::report::{self, ReportOptions};
use crate::core::{ConfigProvider, Entity, EntitySource, Pipeline, Storage, TransformResult};
use crate::domain::model::RowPolicy;
use crate::utils::error::{EtlError, Result};

/// 抓取列表、依出生日期分類並輸出統計報表
pub struct ZodiacPipeline<C: ConfigProvider, E: EntitySource> {
    config: C,
    source: E,
    classifier: Classifier,
}

impl<C: ConfigProvider, E: EntitySource> ZodiacPipeline<C, E> {
    /// 讀取並解析範圍表；範圍表有誤時在抓取任何資料前就失敗
    pub async fn initialize<S: Storage>(storage: &S, config: C, source: E) -> Result<Self> {
        let path = config.range_table_path();
        tracing::info!("📁 Loading range table from: {}", path);

        let bytes = storage.read_file(path).await?;
        let text = String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
            message: format!("range table {} is not valid UTF-8: {}", path, e),
        })?;

        let classifier = build_classifier(&text, config.row_policy(), config.fallback_row())?;
        tracing::info!(
            "✅ Loaded {} category intervals",
            classifier.table().len()
        );

        Ok(Self::with_classifier(config, source, classifier))
    }

    pub fn with_classifier(config: C, source: E, classifier: Classifier) -> Self {
        Self {
            config,
            source,
            classifier,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}

pub fn build_classifier(
    table_text: &str,
    policy: RowPolicy,
    fallback_row: Option<&str>,
) -> Result<Classifier> {
    let table = RangeTable::load_with_policy(table_text, policy)?;
    let fallback = fallback_row.map(|row| parse_row(0, row)).transpose()?;
    Ok(Classifier::new(table, fallback))
}

/// 正規化出生日期並填入標籤；日期缺漏或格式錯誤時該實體維持未分類
pub fn classify_entity(entity: &mut Entity, classifier: &Classifier) {
    entity.label = None;
    entity.birth_date = None;

    match date_normalizer::normalize(entity.raw_birth_date.as_deref()) {
        Ok(date) => {
            entity.birth_date = Some(date);
            entity.label = classifier.classify(&date).map(str::to_string);
            if entity.label.is_none() {
                tracing::debug!("No interval matches {} ({})", entity.name, date);
            }
        }
        Err(EtlError::MissingInput) => {
            tracing::debug!("No birth date known for {}", entity.name);
        }
        Err(e) => {
            tracing::warn!("⚠️ Leaving {} unclassified: {}", entity.name, e);
        }
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider, E: EntitySource> Pipeline for ZodiacPipeline<C, E> {
    async fn extract(&self) -> Result<Vec<Entity>> {
        self.source.fetch_entities().await
    }

    async fn transform(&self, mut entities: Vec<Entity>) -> Result<TransformResult> {
        for entity in entities.iter_mut() {
            classify_entity(entity, &self.classifier);
        }

        let report = aggregate(&entities);
        tracing::info!(
            "🔄 Classified {} of {} entities into {} groups",
            report.classified(),
            entities.len(),
            report.groups.len()
        );

        Ok(TransformResult { entities, report })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let options = ReportOptions {
            unit_label: self.config.unit_label(),
            heading: self.config.heading(),
            format: self.config.output_format(),
            list_entities: self.config.list_entities(),
        };
        report::render(&result.report, &result.entities, &options)
    }
}
