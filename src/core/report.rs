use crate::domain::model::{Entity, OutputFormat, Report};
use crate::utils::error::Result;

pub const DEFAULT_HEADING: &str = "Zodiac Sign Counts:";
pub const DEFAULT_UNIT_LABEL: &str = "Fahrer";

#[derive(Debug, Clone)]
pub struct ReportOptions<'a> {
    pub unit_label: &'a str,
    pub heading: Option<&'a str>,
    pub format: OutputFormat,
    pub list_entities: bool,
}

impl Default for ReportOptions<'_> {
    fn default() -> Self {
        Self {
            unit_label: DEFAULT_UNIT_LABEL,
            heading: Some(DEFAULT_HEADING),
            format: OutputFormat::Text,
            list_entities: false,
        }
    }
}

pub fn render(report: &Report, entities: &[Entity], options: &ReportOptions<'_>) -> Result<String> {
    match options.format {
        OutputFormat::Text => {
            let mut out = String::new();
            if options.list_entities {
                out.push_str(&render_entity_listing(entities));
                out.push('\n');
            }
            if let Some(heading) = options.heading {
                out.push_str(heading);
                out.push('\n');
            }
            out.push_str(&render_groups(report, options.unit_label));
            Ok(out)
        }
        OutputFormat::Json => {
            let value = if options.list_entities {
                serde_json::json!({ "entities": entities, "report": report })
            } else {
                serde_json::to_value(report)?
            };
            Ok(serde_json::to_string_pretty(&value)?)
        }
    }
}

/// 每個分組兩行：`<label>: <count> <unit>` 與逗號分隔的名單
pub fn render_groups(report: &Report, unit_label: &str) -> String {
    let mut out = String::new();
    for group in &report.groups {
        out.push_str(&format!("{}: {} {}\n", group.label, group.count, unit_label));
        out.push_str(&group.members.join(", "));
        out.push('\n');
    }
    out
}

/// 依原始順序列出每個實體；沒有個人頁連結的只列名稱
pub fn render_entity_listing(entities: &[Entity]) -> String {
    let mut out = String::new();
    for entity in entities {
        match &entity.source_ref {
            Some(link) => {
                let birth_date = entity
                    .birth_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "None".to_string());
                let label = entity.label.as_deref().unwrap_or("None");
                out.push_str(&format!("{}, {}, {}, {}\n", entity.name, birth_date, label, link));
            }
            None => {
                out.push_str(&entity.name);
                out.push('\n');
            }
        }
    }
    out
}
