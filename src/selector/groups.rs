use super::types::TierMode;
use crate::store::RaceResultRecord;

/// Display order of tier labels across both schemes
pub const CANONICAL_GROUP_ORDER: [&str; 5] = ["I", "I-II", "II", "III", "IV"];

fn canonical_position(label: &str) -> usize {
    CANONICAL_GROUP_ORDER
        .iter()
        .position(|known| *known == label)
        .unwrap_or(CANONICAL_GROUP_ORDER.len())
}

/// Distinct group labels present under `tier`, in canonical order
///
/// Labels outside the canonical list keep their first-seen order after it.
pub fn resolve_groups(records: &[RaceResultRecord], tier: TierMode) -> Vec<String> {
    let mut groups: Vec<String> = Vec::new();
    for label in records.iter().filter_map(|record| tier.group_of(record)) {
        if !groups.iter().any(|seen| seen == label) {
            groups.push(label.to_string());
        }
    }

    // sort_by_key is stable, unknown labels share one key
    groups.sort_by_key(|label| canonical_position(label));
    groups
}
