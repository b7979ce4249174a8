use chrono::NaiveDate;
use tracing::debug;

use super::{
    errors::StatsError,
    filter::{filter_entity_race_on, filter_entity_races, RaceFilter},
    metrics::MetricKey,
    models::{RaceValue, StatValue},
};
use crate::selector::{DateWindow, EntityKind};
use crate::store::{RaceResultRecord, RaceStatus};

/// Total and count of `metric` over `records`, leaving out records that carry
/// no usable value
fn fold_metric<'a, I>(records: I, metric: MetricKey) -> (f64, usize)
where
    I: IntoIterator<Item = &'a RaceResultRecord>,
{
    records
        .into_iter()
        .fold((0.0, 0usize), |(total, count), record| match metric.value(record) {
            Ok(Some(value)) => (total + value, count + 1),
            Ok(None) => (total, count),
            Err(e) => {
                debug!(error = %e, "Skipping invalid record");
                (total, count)
            }
        })
}

/// Arithmetic mean of `metric` over `records`
pub fn average<'a, I>(records: I, metric: MetricKey) -> StatValue
where
    I: IntoIterator<Item = &'a RaceResultRecord>,
{
    let (total, count) = fold_metric(records, metric);

    if count == 0 {
        StatValue::NoData
    } else {
        StatValue::from_option(Some(total / count as f64))
    }
}

/// Plain total of an additive metric over every record, all cars included
pub fn sum<'a, I>(records: I, metric: MetricKey) -> Result<StatValue, StatsError>
where
    I: IntoIterator<Item = &'a RaceResultRecord>,
{
    if !metric.is_additive() {
        return Err(StatsError::UnsupportedMetric {
            metric,
            operation: "sum",
        });
    }

    let (total, count) = fold_metric(records, metric);

    Ok(if count == 0 {
        StatValue::NoData
    } else {
        StatValue::from_option(Some(total))
    })
}

/// Share of records satisfying `predicate`, in percent
pub fn percentage<'a, I, P>(records: I, predicate: P) -> StatValue
where
    I: IntoIterator<Item = &'a RaceResultRecord>,
    P: Fn(&RaceResultRecord) -> bool,
{
    let (matching, total) = records
        .into_iter()
        .fold((0usize, 0usize), |(matching, total), record| {
            (matching + usize::from(predicate(record)), total + 1)
        });

    if total == 0 {
        StatValue::NoData
    } else {
        StatValue::from_option(Some(100.0 * matching as f64 / total as f64))
    }
}

/// "% finished races"
pub fn finished_percentage<'a, I>(records: I) -> StatValue
where
    I: IntoIterator<Item = &'a RaceResultRecord>,
{
    percentage(records, |record| record.status == RaceStatus::Finished)
}

/// Portion of championship points that came from stage results
///
/// `Σstage / (Σstage + Σseason - Σplayoff)`, in percent.
pub fn stage_points_percentage<'a, I>(records: I) -> StatValue
where
    I: IntoIterator<Item = &'a RaceResultRecord>,
{
    let (stage, season, playoff) = records.into_iter().fold(
        (0i64, 0i64, 0i64),
        |(stage, season, playoff), record| {
            (
                stage + record.stage_points as i64,
                season + record.season_points as i64,
                playoff + record.playoff_points as i64,
            )
        },
    );

    stage_share(stage, season, playoff)
}

pub(crate) fn stage_share(stage: i64, season: i64, playoff: i64) -> StatValue {
    let denominator = stage + season - playoff;
    if denominator == 0 {
        StatValue::NoData
    } else {
        StatValue::from_option(Some(100.0 * stage as f64 / denominator as f64))
    }
}

/// Complement of [`stage_points_percentage`]
pub fn finish_position_points_percentage<'a, I>(records: I) -> StatValue
where
    I: IntoIterator<Item = &'a RaceResultRecord>,
{
    stage_points_percentage(records).map(|pct| 100.0 - pct)
}

/// Average of `metric` for one entity over a date window
///
/// The one entry point every table cell goes through.
pub fn entity_average(
    records: &[RaceResultRecord],
    kind: EntityKind,
    entity: &str,
    window: &DateWindow,
    filter: RaceFilter,
    metric: MetricKey,
) -> StatValue {
    average(
        filter_entity_races(records, entity, kind, window, filter),
        metric,
    )
}

pub fn entity_sum(
    records: &[RaceResultRecord],
    kind: EntityKind,
    entity: &str,
    window: &DateWindow,
    filter: RaceFilter,
    metric: MetricKey,
) -> Result<StatValue, StatsError> {
    sum(
        filter_entity_races(records, entity, kind, window, filter),
        metric,
    )
}

/// Value of `metric` for `entity` in the race held on `race_date`
///
/// A multi-car team gets the average across its cars, flagged with the first
/// non-finish among them.
pub fn single_race_value(
    records: &[RaceResultRecord],
    kind: EntityKind,
    entity: &str,
    race_date: NaiveDate,
    filter: RaceFilter,
    metric: MetricKey,
) -> RaceValue {
    let matches = filter_entity_race_on(records, entity, kind, race_date, filter);
    race_value(&matches, metric)
}

fn race_value(matches: &[&RaceResultRecord], metric: MetricKey) -> RaceValue {
    if matches.is_empty() {
        return RaceValue::unknown();
    }

    let status = matches
        .iter()
        .map(|record| &record.status)
        .find(|status| !status.is_finished())
        .unwrap_or(&matches[0].status)
        .clone();

    RaceValue {
        value: average(matches.iter().copied(), metric),
        status: Some(status),
    }
}

/// Values of the `n` most recent races of `entity` in `window`, newest first
///
/// Filters and sorts once. Cars of one team or manufacturer in the same race
/// make up a single entry, keyed by `(season_year, race_number)`.
pub fn previous_races(
    records: &[RaceResultRecord],
    kind: EntityKind,
    entity: &str,
    window: &DateWindow,
    filter: RaceFilter,
    metric: MetricKey,
    n: usize,
) -> Vec<((i32, u32), RaceValue)> {
    let mut races = filter_entity_races(records, entity, kind, window, filter);
    races.sort_by(|a, b| b.race_key().cmp(&a.race_key()));

    let mut values = Vec::new();
    let mut rest = races.as_slice();
    while values.len() < n {
        let Some(first) = rest.first() else {
            break;
        };
        let key = first.race_key();
        let split = rest
            .iter()
            .position(|record| record.race_key() != key)
            .unwrap_or(rest.len());
        let (same_race, tail) = rest.split_at(split);
        values.push((key, race_value(same_race, metric)));
        rest = tail;
    }
    values
}

/// Value of the `n`-th most recent race (1 = latest) of `entity` in `window`
pub fn nth_previous_race(
    records: &[RaceResultRecord],
    kind: EntityKind,
    entity: &str,
    window: &DateWindow,
    filter: RaceFilter,
    metric: MetricKey,
    n: usize,
) -> RaceValue {
    if n == 0 {
        return RaceValue::unknown();
    }

    previous_races(records, kind, entity, window, filter, metric, n)
        .into_iter()
        .nth(n - 1)
        .map(|(_, value)| value)
        .unwrap_or_else(RaceValue::unknown)
}
