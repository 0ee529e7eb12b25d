use crate::domain::model::{Entity, Report, ReportGroup};
use std::collections::HashMap;

/// 依標籤分組並依人數遞減排序。
///
/// 沒有標籤的實體不列入任何分組，只計入 `unclassified`。
/// 人數相同時保留各標籤第一次出現的順序。
pub fn aggregate(entities: &[Entity]) -> Report {
    let mut groups: Vec<ReportGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut unclassified = 0;

    for entity in entities {
        let Some(label) = entity.label.as_deref().filter(|l| !l.is_empty()) else {
            unclassified += 1;
            continue;
        };

        let slot = *index.entry(label).or_insert_with(|| {
            groups.push(ReportGroup {
                label: label.to_string(),
                count: 0,
                members: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.count += 1;
        group.members.push(entity.name.clone());
    }

    // sort_by 是穩定排序
    groups.sort_by(|a, b| b.count.cmp(&a.count));

    Report {
        groups,
        unclassified,
    }
}
