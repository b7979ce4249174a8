use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::store::{NextRacePointer, RaceResultRecord};

/// What a row of a table represents
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Driver,
    Team,
    Manufacturer,
}

impl EntityKind {
    /// The record field identifying an entity of this kind
    pub fn name_of<'a>(&self, record: &'a RaceResultRecord) -> &'a str {
        match self {
            EntityKind::Driver => &record.driver_name,
            EntityKind::Team => &record.team_name,
            EntityKind::Manufacturer => &record.manufacturer,
        }
    }
}

/// Which of the two tiering schemes groups drivers
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TierMode {
    #[default]
    Star,
    Open,
}

impl TierMode {
    pub fn group_of<'a>(&self, record: &'a RaceResultRecord) -> Option<&'a str> {
        match self {
            TierMode::Star => record.star_group.as_deref(),
            TierMode::Open => record.open_group.as_deref(),
        }
    }
}

pub const ALL_GROUPS: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSelection {
    All,
    Group(String),
}

impl GroupSelection {
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_GROUPS {
            GroupSelection::All
        } else {
            GroupSelection::Group(raw.to_string())
        }
    }

    pub fn matches(&self, group: Option<&str>) -> bool {
        match self {
            GroupSelection::All => true,
            GroupSelection::Group(selected) => group == Some(selected.as_str()),
        }
    }
}

/// Set of race dates an aggregation is restricted to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateWindow {
    dates: BTreeSet<NaiveDate>,
}

impl DateWindow {
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self::from_dates([date])
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.dates.contains(date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Most recent date first
    pub fn descending(&self) -> Vec<NaiveDate> {
        self.dates.iter().rev().copied().collect()
    }
}

impl Serialize for DateWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.dates.iter().rev())
    }
}

/// Where "now" is in the championship
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonContext {
    pub current_season: i32,
    pub next_race_number: u32,
    pub next_race_track: String,
}

impl SeasonContext {
    pub fn new(current_season: i32, next_race_number: u32, next_race_track: &str) -> Self {
        Self {
            current_season,
            next_race_number,
            next_race_track: next_race_track.to_string(),
        }
    }

    pub fn from_next_race(next_race: &NextRacePointer) -> Self {
        Self::new(
            next_race.next_race_season,
            next_race.next_race_number,
            &next_race.next_race_track,
        )
    }

    /// Races already run in the current season
    pub fn completed_races(&self) -> u32 {
        self.next_race_number.saturating_sub(1)
    }

    pub fn previous_season(&self) -> i32 {
        self.current_season - 1
    }
}
