use std::cmp::Ordering;

use super::{
    metrics::{Direction, MetricKey},
    models::{Rank, StatValue},
};

/// Orders `(entity, value)` pairs best first for `metric`
///
/// Entities without data always go last. Equal values fall back to the entity
/// name so the order is deterministic.
pub fn sort_group(group_values: &mut [(String, StatValue)], metric: MetricKey) {
    let direction = metric.direction();
    group_values.sort_by(|(name_a, a), (name_b, b)| {
        compare_values(*a, *b, direction).then_with(|| name_a.cmp(name_b))
    });
}

/// Compares two values best first, `NoData` after any value
pub fn compare_values(a: StatValue, b: StatValue, direction: Direction) -> Ordering {
    match (a.raw(), b.raw()) {
        (Some(a), Some(b)) => match direction {
            Direction::LowerIsBetter => a.total_cmp(&b),
            Direction::HigherIsBetter => b.total_cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 1-based rank of `entity` among precomputed group values
pub fn rank_in_group(entity: &str, group_values: &[(String, StatValue)], metric: MetricKey) -> Rank {
    let mut ordered = group_values.to_vec();
    sort_group(&mut ordered, metric);

    ordered
        .iter()
        .position(|(name, _)| name == entity)
        .map(|index| Rank::Ranked(index + 1))
        .unwrap_or(Rank::NotRanked)
}
