use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// 用來驗證範圍表端點的固定年份（非閏年）
pub const REFERENCE_YEAR: i32 = 1900;

/// 不含年份的日期，依月、日排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayMonth {
    day: u32,
    month: u32,
}

impl DayMonth {
    /// 建立範圍表端點；必須是參考年份中存在的日期，所以 29.02 不合法
    pub fn new(day: u32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day).map(|_| Self { day, month })
    }

    /// 取出真實日期的月日，不驗證參考年份（閏日排在 28.02 與 01.03 之間）
    pub fn of(date: &NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.month(),
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl Ord for DayMonth {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.month, self.day).cmp(&(other.month, other.day))
    }
}

impl PartialOrd for DayMonth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DayMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}", self.day, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInterval {
    pub label: String,
    pub start: DayMonth,
    pub end: DayMonth,
}

impl CategoryInterval {
    pub fn new(label: impl Into<String>, start: DayMonth, end: DayMonth) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    /// 結束日早於開始日的區間跨越年底
    pub fn is_wraparound(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, day_month: DayMonth) -> bool {
        if self.is_wraparound() {
            day_month >= self.start || day_month <= self.end
        } else {
            self.start <= day_month && day_month <= self.end
        }
    }
}

impl fmt::Display for CategoryInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} - {}", self.label, self.start, self.end)
    }
}

/// 出生日期，標準表示法為 `DD-MM-YYYY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn day_month(&self) -> DayMonth {
        DayMonth::of(&self.0)
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%d-%m-%Y"))
    }
}

impl Serialize for BirthDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 列表中的一筆資料（一位車手）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub name: String,
    pub source_ref: Option<String>,
    pub raw_birth_date: Option<String>,
    pub birth_date: Option<BirthDate>,
    pub label: Option<String>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_ref: None,
            raw_birth_date: None,
            birth_date: None,
            label: None,
        }
    }

    pub fn with_source_ref(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }

    pub fn with_raw_birth_date(mut self, raw: impl Into<String>) -> Self {
        self.raw_birth_date = Some(raw.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportGroup {
    pub label: String,
    pub count: usize,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub groups: Vec<ReportGroup>,
    pub unclassified: usize,
}

impl Report {
    pub fn classified(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }

    pub fn group(&self, label: &str) -> Option<&ReportGroup> {
        self.groups.iter().find(|g| g.label == label)
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub entities: Vec<Entity>,
    pub report: Report,
}

/// 範圍表資料列格式錯誤時的處理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// 記錄警告並略過該列
    #[default]
    Skip,
    /// 任何錯誤都中止載入
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dm(day: u32, month: u32) -> DayMonth {
        DayMonth::new(day, month).unwrap()
    }

    #[test]
    fn test_day_month_orders_by_month_first() {
        assert!(dm(31, 1) < dm(1, 2));
        assert!(dm(21, 3) > dm(20, 3));
        assert_eq!(dm(5, 5), dm(5, 5));
    }

    #[test]
    fn test_day_month_rejects_invalid_reference_dates() {
        assert!(DayMonth::new(29, 2).is_none());
        assert!(DayMonth::new(31, 4).is_none());
        assert!(DayMonth::new(0, 1).is_none());
        assert!(DayMonth::new(1, 13).is_none());
    }

    #[test]
    fn test_leap_day_sorts_inside_february() {
        let leap = DayMonth::of(&NaiveDate::from_ymd_opt(1988, 2, 29).unwrap());
        assert!(leap > dm(28, 2));
        assert!(leap < dm(1, 3));
    }

    #[test]
    fn test_interval_contains_endpoints() {
        let ram = CategoryInterval::new("Ram", dm(21, 3), dm(19, 4));
        assert!(!ram.is_wraparound());
        assert!(ram.contains(dm(21, 3)));
        assert!(ram.contains(dm(19, 4)));
        assert!(!ram.contains(dm(20, 3)));
        assert!(!ram.contains(dm(20, 4)));
    }

    #[test]
    fn test_wraparound_interval() {
        let steinbock = CategoryInterval::new("Steinbock", dm(22, 12), dm(19, 1));
        assert!(steinbock.is_wraparound());
        assert!(steinbock.contains(dm(22, 12)));
        assert!(steinbock.contains(dm(31, 12)));
        assert!(steinbock.contains(dm(1, 1)));
        assert!(steinbock.contains(dm(19, 1)));
        assert!(!steinbock.contains(dm(20, 1)));
        assert!(!steinbock.contains(dm(21, 12)));
    }

    #[test]
    fn test_birth_date_display_is_canonical() {
        let date = BirthDate::new(NaiveDate::from_ymd_opt(1985, 3, 1).unwrap());
        assert_eq!(date.to_string(), "01-03-1985");
        assert_eq!(
            serde_json::to_value(date).unwrap(),
            serde_json::json!("01-03-1985")
        );
    }
}
