use itertools::Itertools;

use crate::data::Threshold;

/// Order thresholds ascending by value. Equal values keep their input order.
pub fn sequence(thresholds: &[Threshold]) -> Vec<Threshold> {
    thresholds
        .iter()
        .cloned()
        .sorted_by(|a, b| a.value.total_cmp(&b.value))
        .collect()
}

/// First threshold whose label matches `name`, ignoring ASCII case.
pub fn find_by_label<'a>(thresholds: &'a [Threshold], name: &str) -> Option<&'a Threshold> {
    let name = name.trim();
    thresholds.iter().find(|threshold| {
        threshold
            .label
            .as_deref()
            .is_some_and(|label| label.eq_ignore_ascii_case(name))
    })
}
