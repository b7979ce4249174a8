use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::store::RaceStatus;

pub const NO_DATA_PLACEHOLDER: &str = "-";

/// Result of an aggregation that may have had nothing to aggregate
///
/// Empty filters and zero denominators produce `NoData`, never `NaN` and never
/// a zero that could be mistaken for a real score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    Value(f64),
    NoData,
}

impl StatValue {
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => StatValue::Value(v),
            _ => StatValue::NoData,
        }
    }

    /// Unrounded value, for sorting and comparisons
    pub fn raw(&self) -> Option<f64> {
        match self {
            StatValue::Value(v) => Some(*v),
            StatValue::NoData => None,
        }
    }

    /// Value rounded to two decimals, for display
    pub fn rounded(&self) -> Option<f64> {
        self.raw().map(|v| (v * 100.0).round() / 100.0)
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, StatValue::NoData)
    }

    pub fn display(&self) -> String {
        match self {
            StatValue::Value(v) => format!("{:.2}", v),
            StatValue::NoData => NO_DATA_PLACEHOLDER.to_string(),
        }
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> StatValue {
        match self {
            StatValue::Value(v) => StatValue::from_option(Some(f(v))),
            StatValue::NoData => StatValue::NoData,
        }
    }

    /// Combines two values, `NoData` if either side has none
    pub fn zip_with(self, other: StatValue, f: impl FnOnce(f64, f64) -> f64) -> StatValue {
        match (self, other) {
            (StatValue::Value(a), StatValue::Value(b)) => StatValue::from_option(Some(f(a, b))),
            _ => StatValue::NoData,
        }
    }
}

#[derive(Serialize)]
struct StatValueRepr {
    value: Option<f64>,
    raw: Option<f64>,
    display: String,
}

impl Serialize for StatValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StatValueRepr {
            value: self.rounded(),
            raw: self.raw(),
            display: self.display(),
        }
        .serialize(serializer)
    }
}

/// Position of an entity within its comparison group, 1 being best
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Rank {
    Ranked(usize),
    NotRanked,
}

/// One metric value for one race, with how the race ended
#[derive(Debug, Clone, PartialEq)]
pub struct RaceValue {
    pub value: StatValue,
    pub status: Option<RaceStatus>,
}

impl RaceValue {
    pub fn unknown() -> Self {
        Self {
            value: StatValue::NoData,
            status: None,
        }
    }

    pub fn status_label(&self) -> &str {
        self.status
            .as_ref()
            .map(|status| status.as_str())
            .unwrap_or("unknown")
    }
}

/// One row of a "last N races" table
///
/// For a driver this mirrors a single record. For a team or manufacturer it
/// merges every car entered in that race: countable stats are summed and
/// positional stats are averaged across cars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceSummary {
    pub season_year: i32,
    pub race_number: u32,
    pub track_name: String,
    pub race_date: NaiveDate,
    pub cars: u32,
    pub is_playoff: bool,
    pub status: Option<String>, // only meaningful for a single car

    pub race_pos: StatValue,
    pub quali_pos: StatValue,
    pub avg_pos: StatValue,
    pub driver_rating: StatValue,

    pub finish_position_points: i32,
    pub stage_points: i32,
    pub playoff_points: i32,
    pub season_points: i32,
    pub fantasy_points: i32,

    pub green_flag_passes: f64,
    pub green_flag_times_passed: f64,
    pub quality_passes: f64,
    pub pass_diff: f64,
    pub top_15_laps: f64,
    pub total_laps: f64,
    pub laps_led: f64,

    pub stage_points_pct: StatValue,
    pub avg_points_per_car: StatValue,
}
