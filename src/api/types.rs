use serde::{Deserialize, Serialize};

use crate::selector::{DateWindows, EntityKind, SeasonContext, TierMode};
use crate::stats::RaceFilter;

#[derive(Debug, Deserialize)]
pub struct GroupsQuery {
    pub tier: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EntitiesQuery {
    pub kind: Option<String>,
    pub tier: Option<String>,
    pub group: Option<String>,
    pub season: Option<i32>,
    #[serde(default)]
    pub eligible_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct WindowsQuery {
    pub track: Option<String>,
    pub min_year: Option<i32>,
}

/// Query string of `GET /table`
///
/// Exclusion flags are spelled out as plain fields: nested structs do not
/// survive urlencoded deserialization of booleans.
#[derive(Debug, Deserialize)]
pub struct TableParams {
    pub kind: Option<String>,
    pub tier: Option<String>,
    pub group: Option<String>,
    pub metric: String,
    pub track: Option<String>,
    pub min_year: Option<i32>,
    #[serde(default)]
    pub exclude_playoffs: bool,
    #[serde(default)]
    pub exclude_dnf: bool,
    #[serde(default)]
    pub eligible_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub n: Option<usize>,
    #[serde(default)]
    pub exclude_playoffs: bool,
    #[serde(default)]
    pub exclude_dnf: bool,
}

#[derive(Debug, Deserialize)]
pub struct FormQuery {
    pub metric: String,
    pub n: Option<usize>,
    #[serde(default)]
    pub exclude_playoffs: bool,
    #[serde(default)]
    pub exclude_dnf: bool,
}

#[derive(Debug, Deserialize)]
pub struct PointsQuery {
    pub kind: Option<String>,
    pub season: Option<i32>,
    #[serde(default)]
    pub exclude_playoffs: bool,
    #[serde(default)]
    pub exclude_dnf: bool,
}

#[derive(Debug, Deserialize)]
pub struct StandingsQuery {
    pub season: Option<i32>,
    pub race: Option<u32>,
}

/// Anything carrying the two exclusion flags
pub trait ExclusionFlags {
    fn flags(&self) -> (bool, bool);

    fn race_filter(&self) -> RaceFilter {
        let (exclude_playoffs, exclude_dnf) = self.flags();
        RaceFilter::new(exclude_playoffs, exclude_dnf)
    }
}

impl ExclusionFlags for TableParams {
    fn flags(&self) -> (bool, bool) {
        (self.exclude_playoffs, self.exclude_dnf)
    }
}

impl ExclusionFlags for RecentQuery {
    fn flags(&self) -> (bool, bool) {
        (self.exclude_playoffs, self.exclude_dnf)
    }
}

impl ExclusionFlags for PointsQuery {
    fn flags(&self) -> (bool, bool) {
        (self.exclude_playoffs, self.exclude_dnf)
    }
}

impl ExclusionFlags for FormQuery {
    fn flags(&self) -> (bool, bool) {
        (self.exclude_playoffs, self.exclude_dnf)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub races: usize,
    pub context: SeasonContext,
}

#[derive(Debug, Serialize)]
pub struct GroupsResponse {
    pub tier: TierMode,
    pub groups: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EntitiesResponse {
    pub kind: EntityKind,
    pub entities: Vec<String>,
}

/// Date windows of a track, with a "Spring 2024" style header per track date
#[derive(Debug, Serialize)]
pub struct WindowsResponse {
    #[serde(flatten)]
    pub windows: DateWindows,
    pub track_date_labels: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub races: usize,
    pub previous_races: usize,
    pub context: SeasonContext,
}
