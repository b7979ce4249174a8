use chrono::NaiveDate;

use crate::store::{RaceResultRecord, RaceStatus, SeasonStage};

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

/// Builds race records with sensible defaults for unit tests
pub struct RecordBuilder {
    record: RaceResultRecord,
}

impl RecordBuilder {
    pub fn new(driver: &str) -> Self {
        Self {
            record: RaceResultRecord {
                driver_name: driver.to_string(),
                team_name: "Team A".to_string(),
                manufacturer: "Chevrolet".to_string(),
                car_number: "1".to_string(),
                season_year: 2024,
                race_number: 1,
                race_date: date("2024-03-01"),
                track_name: "Phoenix Raceway".to_string(),
                season_stage: SeasonStage::Season,
                star_group: Some("I".to_string()),
                open_group: Some("I-II".to_string()),
                race_pos: 1,
                quali_pos: 1,
                avg_pos: Some(1.0),
                status: RaceStatus::Finished,
                driver_rating: Some(100.0),
                finish_position_points: 0,
                stage_points: 0,
                playoff_points: 0,
                season_points: 0,
                green_flag_passes: None,
                green_flag_times_passed: None,
                quality_passes: None,
                pass_diff: None,
                top_15_laps: None,
                total_laps: None,
                laps_led: None,
            },
        }
    }

    pub fn team(mut self, team: &str) -> Self {
        self.record.team_name = team.to_string();
        self
    }

    pub fn manufacturer(mut self, manufacturer: &str) -> Self {
        self.record.manufacturer = manufacturer.to_string();
        self
    }

    pub fn car(mut self, car_number: &str) -> Self {
        self.record.car_number = car_number.to_string();
        self
    }

    pub fn race(mut self, season_year: i32, race_number: u32, race_date: &str) -> Self {
        self.record.season_year = season_year;
        self.record.race_number = race_number;
        self.record.race_date = date(race_date);
        self
    }

    pub fn track(mut self, track: &str) -> Self {
        self.record.track_name = track.to_string();
        self
    }

    pub fn stage(mut self, stage: SeasonStage) -> Self {
        self.record.season_stage = stage;
        self
    }

    pub fn groups(mut self, star: Option<&str>, open: Option<&str>) -> Self {
        self.record.star_group = star.map(str::to_string);
        self.record.open_group = open.map(str::to_string);
        self
    }

    pub fn finish(mut self, race_pos: u32) -> Self {
        self.record.race_pos = race_pos;
        self
    }

    pub fn quali(mut self, quali_pos: u32) -> Self {
        self.record.quali_pos = quali_pos;
        self
    }

    pub fn avg_pos(mut self, avg_pos: f64) -> Self {
        self.record.avg_pos = Some(avg_pos);
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.record.status = RaceStatus::from(status.to_string());
        self
    }

    pub fn rating(mut self, rating: Option<f64>) -> Self {
        self.record.driver_rating = rating;
        self
    }

    pub fn finish_points(mut self, points: i32) -> Self {
        self.record.finish_position_points = points;
        self
    }

    pub fn stage_points(mut self, points: i32) -> Self {
        self.record.stage_points = points;
        self
    }

    pub fn playoff_points(mut self, points: i32) -> Self {
        self.record.playoff_points = points;
        self
    }

    pub fn season_points(mut self, points: i32) -> Self {
        self.record.season_points = points;
        self
    }

    pub fn passes(mut self, green_flag: f64, times_passed: f64, quality: f64) -> Self {
        self.record.green_flag_passes = Some(green_flag);
        self.record.green_flag_times_passed = Some(times_passed);
        self.record.quality_passes = Some(quality);
        self.record.pass_diff = Some(green_flag - times_passed);
        self
    }

    pub fn laps(mut self, total: f64, top_15: f64, led: f64) -> Self {
        self.record.total_laps = Some(total);
        self.record.top_15_laps = Some(top_15);
        self.record.laps_led = Some(led);
        self
    }

    pub fn build(self) -> RaceResultRecord {
        self.record
    }
}
