use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    selector::{
        resolve_date_windows, resolve_entities, resolve_groups, DateWindow, DateWindows, EntityKind,
        EntitySelection, GroupSelection, SeasonContext, TierMode, DEFAULT_MIN_YEAR,
    },
    store::{Dataset, RaceResultRecord, StandingsRecord},
};

use super::{
    aggregate::{
        average, entity_average, finish_position_points_percentage, finished_percentage,
        previous_races, stage_points_percentage, sum,
    },
    comparison::{compare_sum_to_previous_season, compare_to_previous_season, SeasonPair},
    entity::{entity_car_number, latest_entity_record},
    errors::StatsError,
    filter::{filter_entity_races, RaceFilter},
    metrics::{Direction, MetricKey},
    models::{Rank, RaceSummary, RaceValue, StatValue},
    ranking::{compare_values, rank_in_group, sort_group},
    recent::last_n_race_summary,
    standings::{best_finish, current_standings, latest_standings_race},
};

/// Races shown in a form strip when the caller does not ask for a length
pub const DEFAULT_FORM_RACES: usize = 8;

/// Parameters of one comparison table
#[derive(Debug, Clone)]
pub struct TableQuery {
    pub kind: EntityKind,
    pub tier: TierMode,
    pub group: GroupSelection,
    pub metric: MetricKey,
    pub track: Option<String>, // defaults to the next race's track
    pub min_year: Option<i32>,
    pub filter: RaceFilter,
    pub eligible_only: bool,
}

impl TableQuery {
    pub fn new(kind: EntityKind, metric: MetricKey) -> Self {
        Self {
            kind,
            tier: TierMode::default(),
            group: GroupSelection::All,
            metric,
            track: None,
            min_year: None,
            filter: RaceFilter::default(),
            eligible_only: false,
        }
    }
}

/// One entity's line in a comparison table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRow {
    pub entity: String,
    pub car_number: Option<String>,
    pub team: Option<String>,
    pub this_track: StatValue,
    pub similar_tracks: StatValue,
    pub all_tracks: StatValue,
    pub season: StatValue,
    pub previous_season: StatValue, // aligned to races run so far
    pub season_delta: StatValue,
    pub rank: Rank, // within the listed group, on this-track averages
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsTable {
    pub kind: EntityKind,
    pub metric: MetricKey,
    pub track: String,
    pub context: SeasonContext,
    pub rows: Vec<EntityRow>,
}

/// One entity's line in the points breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsRow {
    pub entity: String,
    pub car_number: Option<String>,
    pub team: Option<String>,
    pub season_points: StatValue,
    pub playoff_points: StatValue,
    pub stage_points: StatValue,
    pub stage_points_pct: StatValue,
    pub finish_position_points_pct: StatValue,
    pub avg_race_points: StatValue,
    pub points_diff_to_previous: StatValue,
    pub finished_pct: StatValue,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointsTable {
    pub kind: EntityKind,
    pub season_year: i32,
    pub context: SeasonContext,
    pub rows: Vec<PointsRow>, // most season points first
}

/// One cell of the "Race -1 .. Race -n" strip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormEntry {
    pub offset: usize,
    pub label: String,
    pub value: StatValue,
    pub status: String,
    pub is_playoff: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandingRow {
    pub position: usize,
    pub driver_name: String,
    pub car_number: String,
    pub season_points: i32,
    pub gap_to_leader: i32,
    pub wins: u32,
    pub stage_wins: u32,
    pub playoff_points: i32,
    pub best_finish: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandingsTable {
    pub season_year: i32,
    pub race_number: Option<u32>,
    pub race_label: Option<String>,
    pub rows: Vec<StandingRow>,
}

/// Read-only facade over one dataset snapshot
///
/// Every request builds a service over the `Arc<Dataset>` it cloned, so a
/// response is computed entirely against a single snapshot.
pub struct StatsService {
    dataset: Arc<Dataset>,
    min_year: i32,
}

/// Every date of `season_year` found in the records
fn season_window(records: &[RaceResultRecord], season_year: i32) -> DateWindow {
    DateWindow::from_dates(
        records
            .iter()
            .filter(|record| record.season_year == season_year)
            .map(|record| record.race_date),
    )
}

impl StatsService {
    pub fn builder(dataset: Arc<Dataset>) -> StatsServiceBuilder {
        StatsServiceBuilder::new(dataset)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn context(&self) -> SeasonContext {
        SeasonContext::from_next_race(&self.dataset.next_race)
    }

    pub fn groups(&self, tier: TierMode) -> Vec<String> {
        resolve_groups(&self.dataset.races, tier)
    }

    /// Entity names a table for `kind` lists
    ///
    /// Teams and manufacturers are scoped to the current season. Drivers are
    /// narrowed to the entry list when `eligible_only` is set and a list exists.
    pub fn entities(
        &self,
        kind: EntityKind,
        tier: TierMode,
        group: GroupSelection,
        season: Option<i32>,
        eligible_only: bool,
    ) -> Vec<String> {
        let current_season = self.context().current_season;

        let mut selection = match kind {
            EntityKind::Driver => EntitySelection::drivers(tier, group),
            EntityKind::Team | EntityKind::Manufacturer => {
                EntitySelection::of_kind(kind).in_season(current_season)
            }
        };
        if let Some(season) = season {
            selection = selection.in_season(season);
        }
        if eligible_only && kind == EntityKind::Driver {
            match self.dataset.eligible_drivers(current_season) {
                Some(eligible) => selection = selection.with_eligible(eligible),
                None => debug!(season = current_season, "No entry list, listing every driver"),
            }
        }

        resolve_entities(&self.dataset.races, &selection)
    }

    /// Whether any record names `entity` as a `kind`
    pub fn has_entity(&self, kind: EntityKind, entity: &str) -> bool {
        self.dataset
            .races
            .iter()
            .any(|record| kind.name_of(record) == entity)
    }

    /// Car number and team shown next to a driver; nothing for teams and makes
    fn identity(
        &self,
        kind: EntityKind,
        entity: &str,
        season: &DateWindow,
    ) -> (Option<String>, Option<String>) {
        let records = &self.dataset.races;
        match kind {
            EntityKind::Driver => (
                entity_car_number(records, entity, season),
                latest_entity_record(records, entity).map(|r| r.team_name.clone()),
            ),
            EntityKind::Team | EntityKind::Manufacturer => (None, None),
        }
    }

    pub fn windows(&self, track: Option<&str>, min_year: Option<i32>) -> DateWindows {
        let context = self.context();
        let track = track.unwrap_or(&context.next_race_track);
        resolve_date_windows(
            &self.dataset.races,
            track,
            &self.dataset.similarity,
            min_year.unwrap_or(self.min_year),
            &context,
        )
    }

    #[instrument(skip(self), fields(kind = %query.kind, metric = %query.metric))]
    pub fn table(&self, query: &TableQuery) -> StatsTable {
        let context = self.context();
        let track = query
            .track
            .clone()
            .unwrap_or_else(|| context.next_race_track.clone());
        let windows = self.windows(Some(&track), query.min_year);
        let entities = self.entities(
            query.kind,
            query.tier,
            query.group.clone(),
            None,
            query.eligible_only,
        );

        let records = &self.dataset.races;
        let average_over = |entity: &str, window: &DateWindow| {
            entity_average(records, query.kind, entity, window, query.filter, query.metric)
        };

        let track_averages: Vec<(String, StatValue)> = entities
            .iter()
            .map(|entity| (entity.clone(), average_over(entity, &windows.track_dates)))
            .collect();

        let mut rows: Vec<EntityRow> = track_averages
            .iter()
            .map(|(entity, this_track)| {
                let seasons = SeasonPair {
                    current: &windows.season_dates,
                    previous_aligned: &windows.past_season_aligned_dates,
                };
                let (car_number, team) = self.identity(query.kind, entity, &windows.season_dates);

                EntityRow {
                    entity: entity.clone(),
                    car_number,
                    team,
                    this_track: *this_track,
                    similar_tracks: average_over(entity, &windows.similar_dates),
                    all_tracks: average_over(entity, &windows.all_dates),
                    season: average_over(entity, &windows.season_dates),
                    previous_season: average_over(entity, &windows.past_season_aligned_dates),
                    season_delta: compare_to_previous_season(
                        records,
                        query.kind,
                        entity,
                        seasons,
                        query.filter,
                        query.metric,
                    ),
                    rank: rank_in_group(entity, &track_averages, query.metric),
                }
            })
            .collect();

        // same order the ranks were assigned in
        let mut order = track_averages.clone();
        sort_group(&mut order, query.metric);
        rows.sort_by_key(|row| {
            order
                .iter()
                .position(|(entity, _)| entity == &row.entity)
                .unwrap_or(usize::MAX)
        });

        debug!(rows = rows.len(), track = %track, "Built stats table");

        StatsTable {
            kind: query.kind,
            metric: query.metric,
            track,
            context,
            rows,
        }
    }

    pub fn recent(
        &self,
        kind: EntityKind,
        entity: &str,
        n: usize,
        filter: RaceFilter,
    ) -> Vec<RaceSummary> {
        last_n_race_summary(&self.dataset.races, kind, entity, n, filter)
    }

    /// Season point totals and shares per entity, plus the points gained on
    /// last season's pace
    ///
    /// The current season is compared with the aligned previous-season window.
    /// A past season is compared with the whole season before it.
    #[instrument(skip(self))]
    pub fn points_table(
        &self,
        kind: EntityKind,
        season: Option<i32>,
        filter: RaceFilter,
    ) -> Result<PointsTable, StatsError> {
        let context = self.context();
        let season_year = season.unwrap_or(context.current_season);
        let records = &self.dataset.races;

        let (current, previous) = if season_year == context.current_season {
            let windows = self.windows(None, None);
            (windows.season_dates, windows.past_season_aligned_dates)
        } else {
            (
                season_window(records, season_year),
                season_window(records, season_year - 1),
            )
        };
        let seasons = SeasonPair {
            current: &current,
            previous_aligned: &previous,
        };

        let entities = resolve_entities(
            records,
            &EntitySelection::of_kind(kind).in_season(season_year),
        );

        let mut rows = entities
            .iter()
            .map(|entity| -> Result<PointsRow, StatsError> {
                let races = filter_entity_races(records, entity, kind, &current, filter);
                let total = |metric: MetricKey| sum(races.iter().copied(), metric);
                let (car_number, team) = self.identity(kind, entity, &current);

                Ok(PointsRow {
                    entity: entity.clone(),
                    car_number,
                    team,
                    season_points: total(MetricKey::SeasonPoints)?,
                    playoff_points: total(MetricKey::PlayoffPoints)?,
                    stage_points: total(MetricKey::StagePoints)?,
                    stage_points_pct: stage_points_percentage(races.iter().copied()),
                    finish_position_points_pct: finish_position_points_percentage(
                        races.iter().copied(),
                    ),
                    avg_race_points: average(races.iter().copied(), MetricKey::SeasonPoints),
                    points_diff_to_previous: compare_sum_to_previous_season(
                        records,
                        kind,
                        entity,
                        seasons,
                        filter,
                        MetricKey::SeasonPoints,
                    )?,
                    finished_pct: finished_percentage(races.iter().copied()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        rows.sort_by(|a, b| {
            compare_values(a.season_points, b.season_points, Direction::HigherIsBetter)
                .then_with(|| a.entity.cmp(&b.entity))
        });

        debug!(rows = rows.len(), season = season_year, "Built points table");

        Ok(PointsTable {
            kind,
            season_year,
            context,
            rows,
        })
    }

    /// `metric` in each of the entity's last `n` races of the current season
    ///
    /// Always `n` cells long. Cells past the races run are `unknown`.
    pub fn form(
        &self,
        kind: EntityKind,
        entity: &str,
        metric: MetricKey,
        n: usize,
        filter: RaceFilter,
    ) -> Vec<FormEntry> {
        let windows = self.windows(None, None);
        let mut races = previous_races(
            &self.dataset.races,
            kind,
            entity,
            &windows.season_dates,
            filter,
            metric,
            n,
        )
        .into_iter();

        (1..=n)
            .map(|offset| {
                let (is_playoff, race) = match races.next() {
                    Some(((season_year, race_number), race)) => (
                        self.dataset.is_playoff_race(season_year, race_number),
                        race,
                    ),
                    None => (false, RaceValue::unknown()),
                };
                FormEntry {
                    offset,
                    label: format!("Race -{}", offset),
                    value: race.value,
                    status: race.status_label().to_string(),
                    is_playoff,
                }
            })
            .collect()
    }

    /// Standings after `race_number`, or after the latest race with standings
    pub fn standings(&self, season: Option<i32>, race_number: Option<u32>) -> StandingsTable {
        let season_year = season.unwrap_or_else(|| self.context().current_season);
        let race_number =
            race_number.or_else(|| latest_standings_race(&self.dataset.standings, season_year));

        let rows: Vec<&StandingsRecord> = race_number
            .map(|race| current_standings(&self.dataset.standings, season_year, race))
            .unwrap_or_default();
        let leader_points = rows.first().map(|row| row.season_points).unwrap_or(0);

        StandingsTable {
            season_year,
            race_number,
            race_label: race_number.map(|race| self.dataset.race_label(season_year, race)),
            rows: rows
                .iter()
                .enumerate()
                .map(|(index, row)| StandingRow {
                    position: index + 1,
                    driver_name: row.driver_name.clone(),
                    car_number: row.car_number.clone(),
                    season_points: row.season_points,
                    gap_to_leader: row.season_points - leader_points,
                    wins: row.wins,
                    stage_wins: row.stage_wins,
                    playoff_points: row.playoff_points,
                    best_finish: best_finish(&rows, &row.driver_name),
                })
                .collect(),
        }
    }
}

pub struct StatsServiceBuilder {
    dataset: Arc<Dataset>,
    min_year: i32,
}

impl StatsServiceBuilder {
    fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            min_year: DEFAULT_MIN_YEAR,
        }
    }

    pub fn with_min_year(mut self, min_year: i32) -> Self {
        self.min_year = min_year;
        self
    }

    pub fn build(self) -> StatsService {
        StatsService {
            dataset: self.dataset,
            min_year: self.min_year,
        }
    }
}
