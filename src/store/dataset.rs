use super::models::{
    CalendarEntry, EntryList, NextRacePointer, RaceResultRecord, StandingsRecord,
    TrackSimilarityMap,
};

/// Everything the dashboard aggregates over, loaded wholesale and never mutated
#[derive(Debug, Clone)]
pub struct Dataset {
    pub races: Vec<RaceResultRecord>,
    pub calendar: Vec<CalendarEntry>,
    pub standings: Vec<StandingsRecord>,
    pub similarity: TrackSimilarityMap,
    pub next_race: NextRacePointer,
    pub entry_list: EntryList,
}

impl Dataset {
    pub fn new(races: Vec<RaceResultRecord>, next_race: NextRacePointer) -> Self {
        Self {
            races,
            calendar: Vec::new(),
            standings: Vec::new(),
            similarity: TrackSimilarityMap::new(),
            next_race,
            entry_list: EntryList::new(),
        }
    }

    pub fn with_calendar(mut self, calendar: Vec<CalendarEntry>) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_standings(mut self, standings: Vec<StandingsRecord>) -> Self {
        self.standings = standings;
        self
    }

    pub fn with_similarity(mut self, similarity: TrackSimilarityMap) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn with_entry_list(mut self, entry_list: EntryList) -> Self {
        self.entry_list = entry_list;
        self
    }

    /// Drivers entered for a season, if an entry list exists for it
    pub fn eligible_drivers(&self, season_year: i32) -> Option<&[String]> {
        self.entry_list
            .get(&season_year.to_string())
            .map(|drivers| drivers.as_slice())
    }

    pub fn calendar_entry(&self, season_year: i32, race_number: u32) -> Option<&CalendarEntry> {
        self.calendar
            .iter()
            .find(|entry| entry.season_year == season_year && entry.race_number == race_number)
    }

    /// Whether a race is a playoff round according to the calendar
    ///
    /// Falls back to the stage carried on the race records when the calendar
    /// has no entry for that race.
    pub fn is_playoff_race(&self, season_year: i32, race_number: u32) -> bool {
        if let Some(entry) = self.calendar_entry(season_year, race_number) {
            return entry.stage.is_playoff();
        }
        self.races
            .iter()
            .find(|r| r.season_year == season_year && r.race_number == race_number)
            .map(|r| r.season_stage.is_playoff())
            .unwrap_or(false)
    }

    /// Calendar race name, or a "<season> #<n>" placeholder
    pub fn race_label(&self, season_year: i32, race_number: u32) -> String {
        self.calendar_entry(season_year, race_number)
            .filter(|entry| !entry.race_name.is_empty())
            .map(|entry| entry.race_name.clone())
            .unwrap_or_else(|| format!("{} #{}", season_year, race_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::SeasonStage;
    use chrono::NaiveDate;

    fn next_race() -> NextRacePointer {
        NextRacePointer {
            next_race_track: "Phoenix Raceway".to_string(),
            next_race_season: 2025,
            next_race_number: 6,
            next_race_date: None,
        }
    }

    fn calendar_entry(race_number: u32, stage: SeasonStage) -> CalendarEntry {
        CalendarEntry {
            season_year: 2025,
            race_number,
            race_name: format!("Race {}", race_number),
            race_date: NaiveDate::from_ymd_opt(2025, 3, race_number).unwrap(),
            stage,
        }
    }

    #[test]
    fn looks_up_eligible_drivers_by_season() {
        let mut entry_list = EntryList::new();
        entry_list.insert("2025".to_string(), vec!["Ross Chastain".to_string()]);
        let dataset = Dataset::new(vec![], next_race()).with_entry_list(entry_list);

        assert_eq!(
            dataset.eligible_drivers(2025),
            Some(&["Ross Chastain".to_string()][..])
        );
        assert!(dataset.eligible_drivers(2024).is_none());
    }

    #[test]
    fn playoff_flag_comes_from_calendar() {
        let dataset = Dataset::new(vec![], next_race()).with_calendar(vec![
            calendar_entry(1, SeasonStage::Season),
            calendar_entry(2, SeasonStage::Playoff16),
        ]);

        assert!(!dataset.is_playoff_race(2025, 1));
        assert!(dataset.is_playoff_race(2025, 2));
        assert!(!dataset.is_playoff_race(2025, 3));
    }

    #[test]
    fn race_label_falls_back_to_number() {
        let dataset =
            Dataset::new(vec![], next_race()).with_calendar(vec![calendar_entry(1, SeasonStage::Season)]);

        assert_eq!(dataset.race_label(2025, 1), "Race 1");
        assert_eq!(dataset.race_label(2025, 9), "2025 #9");
    }
}
