use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::str::FromStr;
use tracing::{info, instrument, warn};

use super::types::{
    EntitiesQuery, EntitiesResponse, ExclusionFlags, FormQuery, GroupsQuery, GroupsResponse,
    HealthResponse, PointsQuery, RecentQuery, ReloadResponse, StandingsQuery, TableParams,
    WindowsQuery, WindowsResponse,
};
use crate::selector::{EntityKind, GroupSelection, SeasonContext, TierMode};
use crate::shared::{AppError, AppState};
use crate::stats::{
    service::{FormEntry, StandingsTable, DEFAULT_FORM_RACES},
    MetricKey, PointsTable, RaceSummary, StatsService, StatsTable, TableQuery,
};
use crate::store::season_label;

/// Rows returned by the recent-races endpoint when `n` is not given
const DEFAULT_RECENT_RACES: usize = 10;
/// Upper bound on `n` for the recent-races endpoint
const MAX_RECENT_RACES: usize = 100;
/// Upper bound on `n` for the form strip; longer than any season
const MAX_FORM_RACES: usize = 40;

fn parse_or<T: FromStr>(name: &str, raw: Option<&str>, default: T) -> Result<T, AppError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Invalid {}: {}", name, raw))),
    }
}

/// `n` from the query string, or `default`, rejected above `max`
fn race_count(raw: Option<usize>, default: usize, max: usize) -> Result<usize, AppError> {
    match raw.unwrap_or(default) {
        n if n > max => Err(AppError::BadRequest(format!(
            "n must be at most {}, got {}",
            max, n
        ))),
        n => Ok(n),
    }
}

fn ensure_entity(stats: &StatsService, kind: EntityKind, name: &str) -> Result<(), AppError> {
    if stats.has_entity(kind, name) {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("No {} named {}", kind, name)))
    }
}

fn group_selection(raw: Option<&str>) -> GroupSelection {
    raw.map(GroupSelection::parse).unwrap_or(GroupSelection::All)
}

/// HTTP handler for liveness and dataset size
///
/// GET /health
#[instrument(name = "health", skip(state))]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.stats().await;
    Json(HealthResponse {
        status: "ok",
        races: stats.dataset().races.len(),
        context: stats.context(),
    })
}

/// HTTP handler for the season context
///
/// GET /context
#[instrument(name = "get_context", skip(state))]
pub async fn get_context(State(state): State<AppState>) -> Json<SeasonContext> {
    Json(state.stats().await.context())
}

/// HTTP handler listing the tier groups present in the data
///
/// GET /groups?tier=star|open
#[instrument(name = "list_groups", skip(state))]
pub async fn list_groups(
    State(state): State<AppState>,
    Query(query): Query<GroupsQuery>,
) -> Result<Json<GroupsResponse>, AppError> {
    let tier = parse_or("tier", query.tier.as_deref(), TierMode::default())?;
    let groups = state.stats().await.groups(tier);

    info!(tier = %tier, group_count = groups.len(), "Groups listed");

    Ok(Json(GroupsResponse { tier, groups }))
}

/// HTTP handler listing the entities a table would show
///
/// GET /entities?kind=&tier=&group=&season=&eligible_only=
#[instrument(name = "list_entities", skip(state))]
pub async fn list_entities(
    State(state): State<AppState>,
    Query(query): Query<EntitiesQuery>,
) -> Result<Json<EntitiesResponse>, AppError> {
    let kind = parse_or("kind", query.kind.as_deref(), EntityKind::Driver)?;
    let tier = parse_or("tier", query.tier.as_deref(), TierMode::default())?;

    let entities = state.stats().await.entities(
        kind,
        tier,
        group_selection(query.group.as_deref()),
        query.season,
        query.eligible_only,
    );

    info!(kind = %kind, entity_count = entities.len(), "Entities listed");

    Ok(Json(EntitiesResponse { kind, entities }))
}

/// HTTP handler for the date windows of a track
///
/// GET /windows?track=&min_year=
/// Defaults to the next race's track.
#[instrument(name = "get_windows", skip(state))]
pub async fn get_windows(
    State(state): State<AppState>,
    Query(query): Query<WindowsQuery>,
) -> Json<WindowsResponse> {
    let stats = state.stats().await;
    let windows = stats.windows(query.track.as_deref(), query.min_year);
    let track_date_labels = windows
        .track_dates
        .descending()
        .into_iter()
        .map(season_label)
        .collect();

    Json(WindowsResponse {
        windows,
        track_date_labels,
    })
}

/// HTTP handler for the per-entity comparison table
///
/// GET /table?kind=&tier=&group=&metric=&track=&min_year=&exclude_playoffs=&exclude_dnf=
#[instrument(name = "get_table", skip(state))]
pub async fn get_table(
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> Result<Json<StatsTable>, AppError> {
    let mut query = TableQuery::new(
        parse_or("kind", params.kind.as_deref(), EntityKind::Driver)?,
        MetricKey::parse(&params.metric)?,
    );
    query.tier = parse_or("tier", params.tier.as_deref(), TierMode::default())?;
    query.group = group_selection(params.group.as_deref());
    query.track = params.track.clone();
    query.min_year = params.min_year;
    query.filter = params.race_filter();
    query.eligible_only = params.eligible_only;

    let table = state.stats().await.table(&query);

    info!(
        kind = %table.kind,
        metric = %table.metric,
        track = %table.track,
        row_count = table.rows.len(),
        "Table built"
    );

    Ok(Json(table))
}

/// HTTP handler for an entity's most recent races
///
/// GET /entities/:kind/:name/recent?n=&exclude_playoffs=&exclude_dnf=
#[instrument(name = "get_recent", skip(state))]
pub async fn get_recent(
    State(state): State<AppState>,
    Path((kind, name)): Path<(String, String)>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<RaceSummary>>, AppError> {
    let kind = parse_or("kind", Some(kind.as_str()), EntityKind::Driver)?;
    let n = race_count(query.n, DEFAULT_RECENT_RACES, MAX_RECENT_RACES)?;
    let stats = state.stats().await;
    ensure_entity(&stats, kind, &name)?;

    let rows = stats.recent(kind, &name, n, query.race_filter());

    info!(kind = %kind, entity = %name, row_count = rows.len(), "Recent races summarized");

    Ok(Json(rows))
}

/// HTTP handler for the "Race -1 .. Race -n" strip of the current season
///
/// GET /entities/:kind/:name/form?metric=&n=
#[instrument(name = "get_form", skip(state))]
pub async fn get_form(
    State(state): State<AppState>,
    Path((kind, name)): Path<(String, String)>,
    Query(query): Query<FormQuery>,
) -> Result<Json<Vec<FormEntry>>, AppError> {
    let kind = parse_or("kind", Some(kind.as_str()), EntityKind::Driver)?;
    let metric = MetricKey::parse(&query.metric)?;
    let n = race_count(query.n, DEFAULT_FORM_RACES, MAX_FORM_RACES)?;
    let stats = state.stats().await;
    ensure_entity(&stats, kind, &name)?;

    let form = stats.form(kind, &name, metric, n, query.race_filter());

    info!(kind = %kind, entity = %name, metric = %metric, n, "Form strip built");

    Ok(Json(form))
}

/// HTTP handler for season points totals and shares
///
/// GET /points?kind=&season=&exclude_playoffs=&exclude_dnf=
/// Defaults to drivers in the current season.
#[instrument(name = "get_points", skip(state))]
pub async fn get_points(
    State(state): State<AppState>,
    Query(query): Query<PointsQuery>,
) -> Result<Json<PointsTable>, AppError> {
    let kind = parse_or("kind", query.kind.as_deref(), EntityKind::Driver)?;

    let table = state
        .stats()
        .await
        .points_table(kind, query.season, query.race_filter())?;

    info!(
        kind = %table.kind,
        season = table.season_year,
        row_count = table.rows.len(),
        "Points table built"
    );

    Ok(Json(table))
}

/// HTTP handler for championship standings
///
/// GET /standings?season=&race=
/// Without `race`, returns standings after the latest race that has them.
#[instrument(name = "get_standings", skip(state))]
pub async fn get_standings(
    State(state): State<AppState>,
    Query(query): Query<StandingsQuery>,
) -> Json<StandingsTable> {
    let table = state.stats().await.standings(query.season, query.race);

    info!(
        season = table.season_year,
        race = ?table.race_number,
        row_count = table.rows.len(),
        "Standings listed"
    );

    Json(table)
}

/// HTTP handler that reloads the dataset and swaps it in
///
/// POST /reload
/// On failure the previous dataset stays in service.
#[instrument(name = "reload", skip(state))]
pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, AppError> {
    let previous_races = state.snapshot.current().await.races.len();

    let current = state
        .snapshot
        .reload_from(state.source.as_ref())
        .await
        .map_err(|e| {
            warn!(error = %e, "Reload failed, keeping current dataset");
            e
        })?;

    info!(previous_races, races = current.races.len(), "Dataset reloaded");

    Ok(Json(ReloadResponse {
        races: current.races.len(),
        previous_races,
        context: SeasonContext::from_next_race(&current.next_race),
    }))
}
