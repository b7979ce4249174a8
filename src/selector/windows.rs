use serde::Serialize;
use tracing::debug;

use super::types::{DateWindow, SeasonContext};
use crate::store::{RaceResultRecord, TrackSimilarityMap};

/// Default first season the history windows reach back to
pub const DEFAULT_MIN_YEAR: i32 = 2022;

/// Every date window a track view needs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DateWindows {
    pub track_dates: DateWindow,
    pub similar_dates: DateWindow,
    pub all_dates: DateWindow,
    pub season_dates: DateWindow,
    /// Previous season, cut at the number of races run so far this season
    pub past_season_aligned_dates: DateWindow,
}

fn dates_where<F>(records: &[RaceResultRecord], predicate: F) -> DateWindow
where
    F: Fn(&RaceResultRecord) -> bool,
{
    DateWindow::from_dates(
        records
            .iter()
            .filter(|record| predicate(record))
            .map(|record| record.race_date),
    )
}

pub fn resolve_date_windows(
    records: &[RaceResultRecord],
    target_track: &str,
    similarity: &TrackSimilarityMap,
    min_year: i32,
    context: &SeasonContext,
) -> DateWindows {
    let similar_tracks: &[String] = similarity
        .get(target_track)
        .map(|tracks| tracks.as_slice())
        .unwrap_or_default();
    if similar_tracks.is_empty() {
        debug!(track = %target_track, "No similar tracks configured");
    }

    let previous_season = context.previous_season();
    let completed_races = context.completed_races();

    DateWindows {
        track_dates: dates_where(records, |r| {
            r.track_name == target_track && r.season_year >= min_year
        }),
        similar_dates: dates_where(records, |r| {
            r.season_year >= min_year && similar_tracks.iter().any(|t| t == &r.track_name)
        }),
        all_dates: dates_where(records, |r| r.season_year >= min_year),
        season_dates: dates_where(records, |r| r.season_year == context.current_season),
        past_season_aligned_dates: dates_where(records, |r| {
            r.season_year == previous_season && r.race_number <= completed_races
        }),
    }
}
