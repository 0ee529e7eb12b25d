use crate::domain::model::BirthDate;
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

// Static regexes - these patterns are compile-time constants.
static OWN_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})-(\d{2})-(\d{4})$").unwrap());

static EXTERNAL_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());

/// 解析標準格式 `DD-MM-YYYY`
pub fn parse_own_format(s: &str) -> Result<BirthDate> {
    let s = non_empty(s)?;
    let caps = OWN_FORMAT.captures(s).ok_or_else(|| EtlError::DateFormat {
        input: s.to_string(),
        reason: "expected DD-MM-YYYY".to_string(),
    })?;
    build(s, &caps[3], &caps[2], &caps[1])
}

/// 解析外部網站使用的 `YYYY-MM-DD`
pub fn parse_external_format(s: &str) -> Result<BirthDate> {
    let s = non_empty(s)?;
    let caps = EXTERNAL_FORMAT.captures(s).ok_or_else(|| EtlError::DateFormat {
        input: s.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })?;
    build(s, &caps[1], &caps[2], &caps[3])
}

/// 接受任一格式；`None` 或空字串視為沒有出生日期
pub fn normalize(raw: Option<&str>) -> Result<BirthDate> {
    let raw = non_empty(raw.unwrap_or_default())?;
    if EXTERNAL_FORMAT.is_match(raw) {
        parse_external_format(raw)
    } else if OWN_FORMAT.is_match(raw) {
        parse_own_format(raw)
    } else {
        Err(EtlError::DateFormat {
            input: raw.to_string(),
            reason: "expected YYYY-MM-DD or DD-MM-YYYY".to_string(),
        })
    }
}

fn non_empty(s: &str) -> Result<&str> {
    let s = s.trim();
    if s.is_empty() {
        return Err(EtlError::MissingInput);
    }
    Ok(s)
}

fn build(input: &str, year: &str, month: &str, day: &str) -> Result<BirthDate> {
    let out_of_range = || EtlError::DateFormat {
        input: input.to_string(),
        reason: "day or month out of range".to_string(),
    };

    // 正規表達式只允許數字，解析不會失敗；日期本身仍需驗證
    let year: i32 = year.parse().map_err(|_| out_of_range())?;
    let month: u32 = month.parse().map_err(|_| out_of_range())?;
    let day: u32 = day.parse().map_err(|_| out_of_range())?;

    NaiveDate::from_ymd_opt(year, month, day)
        .map(BirthDate::new)
        .ok_or_else(out_of_range)
}
