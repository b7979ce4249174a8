//! Builders for export rows and data directories
#![allow(dead_code)] // Test utilities may not all be used in every test

use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use racedash::store::loader::{
    CALENDAR_FILE, ENTRY_LIST_FILE, NEXT_RACE_FILE, RACES_FILE, SIMILARITY_FILE, STANDINGS_FILE,
};

// ============================================================================
// Race Rows
// ============================================================================

/// One row of `data.json`, shaped like the export pipeline writes it
pub struct RaceRow {
    row: Value,
}

impl RaceRow {
    pub fn new(driver: &str, season: i32, race_number: u32, race_date: &str) -> Self {
        Self {
            row: json!({
                "driver_name": driver,
                "team_name": "Team A",
                "manufacturer": "Chevrolet",
                "car_number": "1",
                "season_year": season,
                "race_number": race_number,
                "race_date": race_date,
                "track_name": "Phoenix Raceway",
                "season_stage": "season",
                "star_group": "I",
                "open_group": "I-II",
                "race_pos": 1,
                "quali_pos": 1,
                "avg_pos": 1.0,
                "status": "finished",
                "driver_rating": 100.0,
                "finish_position_points": 0,
                "stage_points": 0,
                "playoff_points": 0,
                "season_points": 0
            }),
        }
    }

    fn set(mut self, field: &str, value: Value) -> Self {
        self.row[field] = value;
        self
    }

    pub fn team(self, team: &str) -> Self {
        self.set("team_name", json!(team))
    }

    pub fn manufacturer(self, manufacturer: &str) -> Self {
        self.set("manufacturer", json!(manufacturer))
    }

    pub fn car(self, car_number: &str) -> Self {
        self.set("car_number", json!(car_number))
    }

    pub fn track(self, track: &str) -> Self {
        self.set("track_name", json!(track))
    }

    pub fn playoff(self, stage: &str) -> Self {
        self.set("season_stage", json!(stage))
    }

    pub fn star_group(self, group: &str) -> Self {
        self.set("star_group", json!(group))
    }

    pub fn finish(self, race_pos: u32) -> Self {
        self.set("race_pos", json!(race_pos))
    }

    pub fn quali(self, quali_pos: u32) -> Self {
        self.set("quali_pos", json!(quali_pos))
    }

    pub fn status(self, status: &str) -> Self {
        self.set("status", json!(status))
    }

    pub fn points(self, finish: i32, stage: i32) -> Self {
        self.set("finish_position_points", json!(finish))
            .set("stage_points", json!(stage))
    }

    pub fn season_points(self, season: i32, playoff: i32) -> Self {
        self.set("season_points", json!(season))
            .set("playoff_points", json!(playoff))
    }

    pub fn laps(self, total: f64, top_15: f64, led: f64) -> Self {
        self.set("total_laps", json!(total))
            .set("top_15_laps", json!(top_15))
            .set("laps_led", json!(led))
    }

    /// Drops a field entirely, as older exports do
    pub fn without(mut self, field: &str) -> Self {
        if let Some(row) = self.row.as_object_mut() {
            row.remove(field);
        }
        self
    }

    pub fn build(self) -> Value {
        self.row
    }
}

// ============================================================================
// Data Directory
// ============================================================================

/// Collects everything the loader reads and writes it to a directory
pub struct DataDirBuilder {
    races: Vec<Value>,
    next_race: Value,
    similarity: Option<Value>,
    calendar: Option<Value>,
    standings: Option<Value>,
    entry_list: Option<Value>,
}

impl DataDirBuilder {
    pub fn new(next_track: &str, season: i32, next_race_number: u32) -> Self {
        Self {
            races: vec![],
            next_race: json!({
                "next_race_track": next_track,
                "next_race_season": season,
                "next_race_number": next_race_number
            }),
            similarity: None,
            calendar: None,
            standings: None,
            entry_list: None,
        }
    }

    pub fn with_race(mut self, row: RaceRow) -> Self {
        self.races.push(row.build());
        self
    }

    pub fn with_races(mut self, rows: impl IntoIterator<Item = RaceRow>) -> Self {
        self.races.extend(rows.into_iter().map(RaceRow::build));
        self
    }

    /// Adds a row the loader is expected to skip
    pub fn with_raw_row(mut self, row: Value) -> Self {
        self.races.push(row);
        self
    }

    pub fn with_similarity(mut self, track: &str, similar: &[&str]) -> Self {
        let map = self.similarity.get_or_insert_with(|| json!({}));
        map[track] = json!(similar);
        self
    }

    pub fn with_calendar(mut self, calendar: Value) -> Self {
        self.calendar = Some(calendar);
        self
    }

    pub fn with_standings(mut self, standings: Value) -> Self {
        self.standings = Some(standings);
        self
    }

    pub fn with_entry_list(mut self, entry_list: Value) -> Self {
        self.entry_list = Some(entry_list);
        self
    }

    pub fn write_to(&self, dir: &Path) {
        write(dir, RACES_FILE, &Value::Array(self.races.clone()));
        write(dir, NEXT_RACE_FILE, &self.next_race);
        for (name, contents) in [
            (SIMILARITY_FILE, &self.similarity),
            (CALENDAR_FILE, &self.calendar),
            (STANDINGS_FILE, &self.standings),
            (ENTRY_LIST_FILE, &self.entry_list),
        ] {
            if let Some(contents) = contents {
                write(dir, name, contents);
            }
        }
    }
}

fn write(dir: &Path, name: &str, value: &Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}
