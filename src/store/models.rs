use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::{AsRefStr, Display, EnumString};

/// Competition phase a race belongs to
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum SeasonStage {
    #[default]
    #[serde(rename = "season")]
    #[strum(serialize = "season")]
    Season,
    #[serde(rename = "playoff_16")]
    #[strum(serialize = "playoff_16")]
    Playoff16,
    #[serde(rename = "playoff_12")]
    #[strum(serialize = "playoff_12")]
    Playoff12,
    #[serde(rename = "playoff_8")]
    #[strum(serialize = "playoff_8")]
    Playoff8,
    #[serde(rename = "playoff_4")]
    #[strum(serialize = "playoff_4")]
    Playoff4,
}

impl SeasonStage {
    pub fn is_playoff(&self) -> bool {
        !matches!(self, SeasonStage::Season)
    }
}

/// How a driver's race ended
///
/// Only `Finished` counts as a completed race. Every other value is a
/// non-finish for DNF exclusion and finish percentages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RaceStatus {
    Finished,
    Crash,
    Disqualified,
    Failure,
    Other(String),
}

impl RaceStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, RaceStatus::Finished)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RaceStatus::Finished => "finished",
            RaceStatus::Crash => "crash",
            RaceStatus::Disqualified => "dq",
            RaceStatus::Failure => "failure",
            RaceStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for RaceStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "finished" | "running" => RaceStatus::Finished,
            "crash" => RaceStatus::Crash,
            "dq" | "disqualified" => RaceStatus::Disqualified,
            "failure" => RaceStatus::Failure,
            _ => RaceStatus::Other(raw),
        }
    }
}

impl From<RaceStatus> for String {
    fn from(status: RaceStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for RaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const UNKNOWN_TEAM: &str = "unknown";

fn unknown_team() -> String {
    UNKNOWN_TEAM.to_string()
}

/// One driver's result in one race, joined with team and calendar context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResultRecord {
    pub driver_name: String,
    #[serde(default = "unknown_team")]
    pub team_name: String, // "unknown" when the entry list had no team
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default, deserialize_with = "de::car_number")]
    pub car_number: String,

    pub season_year: i32,
    pub race_number: u32, // 1-based within the season
    #[serde(deserialize_with = "de::race_date")]
    pub race_date: NaiveDate,
    pub track_name: String,
    #[serde(default)]
    pub season_stage: SeasonStage,
    #[serde(default)]
    pub star_group: Option<String>,
    #[serde(default)]
    pub open_group: Option<String>,

    #[serde(deserialize_with = "de::position")]
    pub race_pos: u32,
    #[serde(deserialize_with = "de::position")]
    pub quali_pos: u32,
    #[serde(default)]
    pub avg_pos: Option<f64>, // average running position
    pub status: RaceStatus,
    #[serde(default)]
    pub driver_rating: Option<f64>,
    #[serde(default, deserialize_with = "de::points")]
    pub finish_position_points: i32,
    #[serde(default, deserialize_with = "de::points")]
    pub stage_points: i32,
    #[serde(default, deserialize_with = "de::points")]
    pub playoff_points: i32,
    #[serde(default, deserialize_with = "de::points")]
    pub season_points: i32,

    #[serde(default)]
    pub green_flag_passes: Option<f64>,
    #[serde(default)]
    pub green_flag_times_passed: Option<f64>,
    #[serde(default)]
    pub quality_passes: Option<f64>, // passes while running in the top 15
    #[serde(default)]
    pub pass_diff: Option<f64>,
    #[serde(default)]
    pub top_15_laps: Option<f64>,
    #[serde(default)]
    pub total_laps: Option<f64>,
    #[serde(default)]
    pub laps_led: Option<f64>,
}

impl RaceResultRecord {
    /// Fantasy score for this race: finish position points plus stage points
    pub fn fantasy_points(&self) -> i32 {
        self.finish_position_points + self.stage_points
    }

    /// Ordering key for "most recent" comparisons
    pub fn race_key(&self) -> (i32, u32) {
        (self.season_year, self.race_number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub season_year: i32,
    pub race_number: u32,
    #[serde(default)]
    pub race_name: String,
    #[serde(deserialize_with = "de::race_date")]
    pub race_date: NaiveDate,
    #[serde(default, alias = "season_stage")]
    pub stage: SeasonStage,
}

/// Championship standings snapshot for a driver after a given race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRecord {
    pub driver_name: String,
    pub season_year: i32,
    pub race_number: u32,
    #[serde(default, deserialize_with = "de::points")]
    pub season_points: i32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default, deserialize_with = "de::points")]
    pub race_stage_points: i32,
    #[serde(default)]
    pub stage_wins: u32,
    #[serde(default, deserialize_with = "de::points")]
    pub playoff_points: i32,
    #[serde(default)]
    pub best_position: Option<u32>,
    #[serde(default, deserialize_with = "de::car_number")]
    pub car_number: String,
}

/// Pointer to the upcoming race, refreshed together with the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextRacePointer {
    pub next_race_track: String,
    pub next_race_season: i32,
    pub next_race_number: u32,
    #[serde(default, deserialize_with = "de::optional_race_date")]
    pub next_race_date: Option<NaiveDate>,
}

/// Directed mapping from a track to the tracks considered comparable to it
pub type TrackSimilarityMap = HashMap<String, Vec<String>>;

/// Season (as written in the source file, e.g. "2025") to eligible driver names
pub type EntryList = HashMap<String, Vec<String>>;

/// "Spring 2024" style label used for race-date column headers
pub fn season_label(date: NaiveDate) -> String {
    let year = date.year();
    match date.month() {
        m if m < 6 => format!("Spring {}", year),
        m if m < 9 => format!("Summer {}", year),
        _ => format!("Fall {}", year),
    }
}

mod de {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(f64),
    }

    pub fn car_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<TextOrNumber>::deserialize(deserializer)? {
            Some(TextOrNumber::Text(text)) => Ok(text),
            Some(TextOrNumber::Number(number)) => Ok(format!("{}", number as i64)),
            None => Ok(String::new()),
        }
    }

    /// Missing or null point awards count as zero points
    pub fn points<'de, D>(deserializer: D) -> Result<i32, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?
            .filter(|value| value.is_finite())
            .map(|value| value.round() as i32)
            .unwrap_or_default())
    }

    pub fn position<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() || value < 1.0 {
            return Err(D::Error::custom(format!("invalid position {}", value)));
        }
        Ok(value.round() as u32)
    }

    fn parse_date<E: Error>(raw: &str) -> Result<NaiveDate, E> {
        // Exports sometimes carry a time component ("2024-03-01T00:00:00")
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|e| E::custom(format!("invalid date '{}': {}", raw, e)))
    }

    pub fn race_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw)
    }

    pub fn optional_race_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse_date(&raw).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn raw_record() -> serde_json::Value {
        json!({
            "driver_name": "Ross Chastain",
            "team_name": "Trackhouse Racing",
            "manufacturer": "Chevrolet",
            "car_number": 1,
            "season_year": 2024,
            "race_number": 4,
            "race_date": "2024-03-10T00:00:00",
            "track_name": "Phoenix Raceway",
            "season_stage": "season",
            "star_group": "II",
            "open_group": "I-II",
            "race_pos": 5,
            "quali_pos": 12.0,
            "avg_pos": 8.4,
            "status": "finished",
            "driver_rating": 101.3,
            "finish_position_points": 32,
            "stage_points": null,
            "playoff_points": 0,
            "season_points": 140,
            "green_flag_passes": 88
        })
    }

    #[test]
    fn deserializes_lenient_export_row() {
        let record: RaceResultRecord = serde_json::from_value(raw_record()).unwrap();

        assert_eq!(record.car_number, "1");
        assert_eq!(
            record.race_date,
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
        assert_eq!(record.quali_pos, 12);
        assert_eq!(record.stage_points, 0);
        assert_eq!(record.fantasy_points(), 32);
        assert_eq!(record.green_flag_passes, Some(88.0));
        assert_eq!(record.laps_led, None);
        assert_eq!(record.status, RaceStatus::Finished);
    }

    #[test]
    fn missing_team_defaults_to_unknown() {
        let mut raw = raw_record();
        raw.as_object_mut().unwrap().remove("team_name");

        let record: RaceResultRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.team_name, UNKNOWN_TEAM);
    }

    #[test]
    fn rejects_zero_position() {
        let mut raw = raw_record();
        raw["race_pos"] = json!(0);

        assert!(serde_json::from_value::<RaceResultRecord>(raw).is_err());
    }

    #[rstest]
    #[case("finished", RaceStatus::Finished, true)]
    #[case("running", RaceStatus::Finished, true)]
    #[case("crash", RaceStatus::Crash, false)]
    #[case("disqualified", RaceStatus::Disqualified, false)]
    #[case("engine", RaceStatus::Other("engine".to_string()), false)]
    fn maps_status_strings(
        #[case] raw: &str,
        #[case] expected: RaceStatus,
        #[case] finished: bool,
    ) {
        let status = RaceStatus::from(raw.to_string());
        assert_eq!(status, expected);
        assert_eq!(status.is_finished(), finished);
    }

    #[rstest]
    #[case("playoff_8", SeasonStage::Playoff8)]
    #[case("season", SeasonStage::Season)]
    fn parses_season_stage(#[case] raw: &str, #[case] expected: SeasonStage) {
        let stage: SeasonStage = raw.parse().unwrap();
        assert_eq!(stage, expected);
        assert_eq!(stage.as_ref(), raw);
    }

    #[rstest]
    #[case(2024, 3, "Spring 2024")]
    #[case(2024, 6, "Summer 2024")]
    #[case(2023, 8, "Summer 2023")]
    #[case(2023, 10, "Fall 2023")]
    fn labels_race_dates_by_part_of_season(
        #[case] year: i32,
        #[case] month: u32,
        #[case] expected: &str,
    ) {
        let date = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        assert_eq!(season_label(date), expected);
    }
}
