use crate::store::StandingsRecord;

/// Standings rows of `season` after `race_number`, leader first
///
/// Ties on points are ordered by driver name.
pub fn current_standings(
    standings: &[StandingsRecord],
    season: i32,
    race_number: u32,
) -> Vec<&StandingsRecord> {
    let mut rows: Vec<&StandingsRecord> = standings
        .iter()
        .filter(|row| row.season_year == season && row.race_number == race_number)
        .collect();

    rows.sort_by(|a, b| {
        b.season_points
            .cmp(&a.season_points)
            .then_with(|| a.driver_name.cmp(&b.driver_name))
    });
    rows
}

/// Latest race number with standings for `season`
pub fn latest_standings_race(standings: &[StandingsRecord], season: i32) -> Option<u32> {
    standings
        .iter()
        .filter(|row| row.season_year == season)
        .map(|row| row.race_number)
        .max()
}

/// Best finishing position `driver` holds across `rows`
pub fn best_finish(rows: &[&StandingsRecord], driver: &str) -> Option<u32> {
    rows.iter()
        .filter(|row| row.driver_name == driver)
        .filter_map(|row| row.best_position)
        .min()
}

/// The standings row of `driver` within an already selected race
pub fn standing_value<'a>(
    rows: &[&'a StandingsRecord],
    driver: &str,
) -> Option<&'a StandingsRecord> {
    rows.iter().copied().find(|row| row.driver_name == driver)
}
