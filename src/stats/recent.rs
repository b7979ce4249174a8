use std::collections::HashMap;

use super::{
    aggregate::{average, stage_share},
    filter::RaceFilter,
    metrics::MetricKey,
    models::{RaceSummary, StatValue},
};
use crate::selector::EntityKind;
use crate::store::RaceResultRecord;

type RaceGroupKey<'a> = (i32, u32, &'a str);

fn total(cars: &[&RaceResultRecord], field: impl Fn(&RaceResultRecord) -> Option<f64>) -> f64 {
    cars.iter().filter_map(|record| field(*record)).sum()
}

fn points(cars: &[&RaceResultRecord], field: impl Fn(&RaceResultRecord) -> i32) -> i32 {
    cars.iter().map(|record| field(*record)).sum()
}

/// Collapses every car an entity ran in one race into a single row
fn summarize(cars: &[&RaceResultRecord]) -> Option<RaceSummary> {
    let first = cars.first()?;
    let count = cars.len() as u32;

    let stage_points = points(cars, |r| r.stage_points);
    let season_points = points(cars, |r| r.season_points);
    let playoff_points = points(cars, |r| r.playoff_points);

    Some(RaceSummary {
        season_year: first.season_year,
        race_number: first.race_number,
        track_name: first.track_name.clone(),
        race_date: first.race_date,
        cars: count,
        is_playoff: cars.iter().any(|r| r.season_stage.is_playoff()),
        status: (count == 1).then(|| first.status.to_string()),

        race_pos: average(cars.iter().copied(), MetricKey::RacePos),
        quali_pos: average(cars.iter().copied(), MetricKey::QualiPos),
        avg_pos: average(cars.iter().copied(), MetricKey::AvgPos),
        driver_rating: average(cars.iter().copied(), MetricKey::DriverRating),

        finish_position_points: points(cars, |r| r.finish_position_points),
        stage_points,
        playoff_points,
        season_points,
        fantasy_points: points(cars, |r| r.fantasy_points()),

        green_flag_passes: total(cars, |r| r.green_flag_passes),
        green_flag_times_passed: total(cars, |r| r.green_flag_times_passed),
        quality_passes: total(cars, |r| r.quality_passes),
        pass_diff: total(cars, |r| r.pass_diff),
        top_15_laps: total(cars, |r| r.top_15_laps),
        total_laps: total(cars, |r| r.total_laps),
        laps_led: total(cars, |r| r.laps_led),

        stage_points_pct: stage_share(
            stage_points as i64,
            season_points as i64,
            playoff_points as i64,
        ),
        avg_points_per_car: StatValue::from_option(Some(season_points as f64 / count as f64)),
    })
}

/// The `n` most recent races of `entity`, newest first
///
/// A driver gets one row per record. Teams and manufacturers are merged per
/// (season, race, track) before the cut, so `n` counts races, not cars.
pub fn last_n_race_summary(
    records: &[RaceResultRecord],
    kind: EntityKind,
    entity: &str,
    n: usize,
    filter: RaceFilter,
) -> Vec<RaceSummary> {
    let mut order: Vec<RaceGroupKey> = Vec::new();
    let mut by_race: HashMap<RaceGroupKey, Vec<&RaceResultRecord>> = HashMap::new();

    for record in records
        .iter()
        .filter(|record| kind.name_of(record) == entity && filter.admits(record))
    {
        let key = (record.season_year, record.race_number, record.track_name.as_str());
        by_race
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(record);
    }

    // newest first; the track breaks ties so the output never depends on hashing
    order.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)).then_with(|| a.2.cmp(b.2)));
    order.truncate(n);

    order
        .iter()
        .filter_map(|key| by_race.get(key))
        .filter_map(|cars| summarize(cars))
        .collect()
}
