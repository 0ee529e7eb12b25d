use crate::core::range_table::{parse_row, RangeTable};
use crate::domain::model::{BirthDate, CategoryInterval, DayMonth};
use crate::utils::error::Result;

/// 預設的年底 fallback：範圍表沒有涵蓋時，22.12 之後與 19.01 之前歸為摩羯座
pub const DEFAULT_FALLBACK: &str = "Steinbock | 22.12 - 19.01";

/// 以範圍表將日期對應到分類標籤
#[derive(Debug, Clone)]
pub struct Classifier {
    table: RangeTable,
    fallback: Option<CategoryInterval>,
}

impl Classifier {
    pub fn new(table: RangeTable, fallback: Option<CategoryInterval>) -> Self {
        Self { table, fallback }
    }

    /// 使用預設 fallback
    pub fn with_default_fallback(table: RangeTable) -> Result<Self> {
        let fallback = parse_row(0, DEFAULT_FALLBACK)?;
        Ok(Self::new(table, Some(fallback)))
    }

    pub fn table(&self) -> &RangeTable {
        &self.table
    }

    pub fn fallback(&self) -> Option<&CategoryInterval> {
        self.fallback.as_ref()
    }

    pub fn classify(&self, date: &BirthDate) -> Option<&str> {
        self.classify_day_month(date.day_month())
    }

    pub fn classify_day_month(&self, day_month: DayMonth) -> Option<&str> {
        if let Some(interval) = self.table.find(day_month) {
            return Some(interval.label.as_str());
        }

        self.fallback
            .as_ref()
            .filter(|f| f.contains(day_month))
            .map(|f| f.label.as_str())
    }
}
