use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};

use super::errors::StatsError;
use crate::store::RaceResultRecord;

/// Whether smaller or larger values rank higher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LowerIsBetter,
    HigherIsBetter,
}

/// Every per-race quantity the dashboard aggregates
///
/// `value` is the single definition of how each metric is read from a
/// record. Derived metrics (fantasy points, percentages) are computed per
/// record here and nowhere else.
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
pub enum MetricKey {
    RacePos,
    QualiPos,
    AvgPos,
    DriverRating,
    FinishPositionPoints,
    StagePoints,
    PlayoffPoints,
    SeasonPoints,
    FantasyPoints,
    GreenFlagPasses,
    GreenFlagTimesPassed,
    QualityPasses,
    PassDiff,
    #[serde(rename = "top_15_laps")]
    #[strum(serialize = "top_15_laps")]
    Top15Laps,
    TotalLaps,
    LapsLed,
    PctQualityPasses,
    #[serde(rename = "pct_top_15_laps")]
    #[strum(serialize = "pct_top_15_laps")]
    PctTop15Laps,
    PctLapsLed,
}

impl MetricKey {
    pub fn parse(raw: &str) -> Result<Self, StatsError> {
        MetricKey::from_str(raw).map_err(|_| StatsError::UnknownMetric(raw.to_string()))
    }

    pub fn direction(&self) -> Direction {
        match self {
            MetricKey::RacePos
            | MetricKey::QualiPos
            | MetricKey::AvgPos
            | MetricKey::GreenFlagTimesPassed => Direction::LowerIsBetter,
            _ => Direction::HigherIsBetter,
        }
    }

    /// Whether totals of this metric across races mean anything
    pub fn is_additive(&self) -> bool {
        !matches!(
            self,
            MetricKey::RacePos
                | MetricKey::QualiPos
                | MetricKey::AvgPos
                | MetricKey::DriverRating
                | MetricKey::PctQualityPasses
                | MetricKey::PctTop15Laps
                | MetricKey::PctLapsLed
        )
    }

    /// Reads this metric from one record
    ///
    /// `Ok(None)` means the record carries no value for the metric (a measured
    /// stat that was not recorded, or a ratio with a zero denominator) and the
    /// record must be left out of this metric's aggregation.
    pub fn value(&self, record: &RaceResultRecord) -> Result<Option<f64>, StatsError> {
        let value = match self {
            MetricKey::RacePos => Some(record.race_pos as f64),
            MetricKey::QualiPos => Some(record.quali_pos as f64),
            MetricKey::AvgPos => record.avg_pos,
            MetricKey::DriverRating => record.driver_rating,
            MetricKey::FinishPositionPoints => Some(record.finish_position_points as f64),
            MetricKey::StagePoints => Some(record.stage_points as f64),
            MetricKey::PlayoffPoints => Some(record.playoff_points as f64),
            MetricKey::SeasonPoints => Some(record.season_points as f64),
            MetricKey::FantasyPoints => Some(record.fantasy_points() as f64),
            MetricKey::GreenFlagPasses => record.green_flag_passes,
            MetricKey::GreenFlagTimesPassed => record.green_flag_times_passed,
            MetricKey::QualityPasses => record.quality_passes,
            MetricKey::PassDiff => record.pass_diff,
            MetricKey::Top15Laps => record.top_15_laps,
            MetricKey::TotalLaps => record.total_laps,
            MetricKey::LapsLed => record.laps_led,
            MetricKey::PctQualityPasses => ratio(record.quality_passes, record.green_flag_passes),
            MetricKey::PctTop15Laps => ratio(record.top_15_laps, record.total_laps),
            MetricKey::PctLapsLed => ratio(record.laps_led, record.total_laps),
        };

        match value {
            Some(v) if !v.is_finite() => Err(StatsError::InvalidRecord {
                driver: record.driver_name.clone(),
                season: record.season_year,
                race: record.race_number,
                reason: format!("{} is not a finite number", self),
            }),
            other => Ok(other),
        }
    }
}

fn ratio(part: Option<f64>, whole: Option<f64>) -> Option<f64> {
    match (part, whole) {
        (Some(part), Some(whole)) if whole != 0.0 => Some(100.0 * part / whole),
        _ => None,
    }
}
