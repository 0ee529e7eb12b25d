use crate::domain::model::{CategoryInterval, DayMonth, RowPolicy};
use crate::utils::error::{EtlError, Result};

/// 表頭與分隔線，載入時一律略過
const HEADER_LINES: usize = 2;

/// 依檔案順序排列的分類區間
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeTable {
    intervals: Vec<CategoryInterval>,
}

impl RangeTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// 由現成的區間建立；最多只能有一個跨年區間
    pub fn from_intervals(intervals: Vec<CategoryInterval>) -> Result<Self> {
        let mut table = Self::empty();
        for (index, interval) in intervals.into_iter().enumerate() {
            table.push(index + 1, interval)?;
        }
        Ok(table)
    }

    pub fn load(text: &str) -> Result<Self> {
        Self::load_with_policy(text, RowPolicy::Skip)
    }

    pub fn load_with_policy(text: &str, policy: RowPolicy) -> Result<Self> {
        let mut table = Self::empty();

        for (index, line) in text.lines().enumerate().skip(HEADER_LINES) {
            let line_no = index + 1;
            if line.trim().is_empty() {
                continue;
            }

            match parse_row(line_no, line) {
                Ok(interval) => table.push(line_no, interval)?,
                Err(e @ EtlError::MalformedRangeRow { .. }) if policy == RowPolicy::Skip => {
                    tracing::warn!("⚠️ Skipping range table row: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!("Loaded {} category intervals", table.len());
        Ok(table)
    }

    fn push(&mut self, line_no: usize, interval: CategoryInterval) -> Result<()> {
        if interval.is_wraparound() {
            if let Some(existing) = self.wraparound() {
                return Err(EtlError::ConflictingWraparound {
                    line: line_no,
                    label: interval.label,
                    existing: existing.label.clone(),
                });
            }
        }
        self.intervals.push(interval);
        Ok(())
    }

    pub fn intervals(&self) -> &[CategoryInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn wraparound(&self) -> Option<&CategoryInterval> {
        self.intervals.iter().find(|i| i.is_wraparound())
    }

    /// 依儲存順序回傳第一個包含該日期的區間
    pub fn find(&self, day_month: DayMonth) -> Option<&CategoryInterval> {
        self.intervals.iter().find(|i| i.contains(day_month))
    }
}

/// 解析一列 `<label> | <DD.MM> - <DD.MM>`
pub fn parse_row(line_no: usize, line: &str) -> Result<CategoryInterval> {
    let malformed = |reason: String| EtlError::MalformedRangeRow {
        line: line_no,
        content: line.trim().to_string(),
        reason,
    };

    let fields: Vec<&str> = line.trim().split('|').map(str::trim).collect();
    if fields.len() != 2 {
        return Err(malformed(format!(
            "expected 2 '|' separated fields, found {}",
            fields.len()
        )));
    }

    let label = fields[0];
    let dates: Vec<&str> = fields[1].split('-').map(str::trim).collect();
    if dates.len() != 2 {
        return Err(malformed(format!(
            "expected 2 '-' separated dates, found {}",
            dates.len()
        )));
    }

    let start = parse_day_month(line_no, dates[0])?;
    let end = parse_day_month(line_no, dates[1])?;
    Ok(CategoryInterval::new(label, start, end))
}

fn parse_day_month(line_no: usize, token: &str) -> Result<DayMonth> {
    let invalid = || EtlError::InvalidRangeEndpoint {
        line: line_no,
        value: token.to_string(),
    };

    let (day, month) = token.split_once('.').ok_or_else(invalid)?;
    let day = parse_component(day).ok_or_else(invalid)?;
    let month = parse_component(month).ok_or_else(invalid)?;
    DayMonth::new(day, month).ok_or_else(invalid)
}

fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
