use super::{
    aggregate::{entity_average, entity_sum},
    errors::StatsError,
    filter::RaceFilter,
    metrics::MetricKey,
    models::StatValue,
};
use crate::selector::{DateWindow, EntityKind};
use crate::store::RaceResultRecord;

/// The two windows of a season-over-season comparison
///
/// `previous_aligned` must already be cut to the number of races run so far
/// in the current season (see `resolve_date_windows`).
#[derive(Debug, Clone, Copy)]
pub struct SeasonPair<'a> {
    pub current: &'a DateWindow,
    pub previous_aligned: &'a DateWindow,
}

/// `average(current) - average(previous)`, `NoData` if either side has none
pub fn compare_to_previous_season(
    records: &[RaceResultRecord],
    kind: EntityKind,
    entity: &str,
    seasons: SeasonPair,
    filter: RaceFilter,
    metric: MetricKey,
) -> StatValue {
    let current = entity_average(records, kind, entity, seasons.current, filter, metric);
    let previous = entity_average(records, kind, entity, seasons.previous_aligned, filter, metric);
    current.zip_with(previous, |current, previous| current - previous)
}

/// Difference of season totals, e.g. points gained on last year's pace
pub fn compare_sum_to_previous_season(
    records: &[RaceResultRecord],
    kind: EntityKind,
    entity: &str,
    seasons: SeasonPair,
    filter: RaceFilter,
    metric: MetricKey,
) -> Result<StatValue, StatsError> {
    let current = entity_sum(records, kind, entity, seasons.current, filter, metric)?;
    let previous = entity_sum(records, kind, entity, seasons.previous_aligned, filter, metric)?;
    Ok(current.zip_with(previous, |current, previous| current - previous))
}
