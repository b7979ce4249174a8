use crate::selector::DateWindow;
use crate::store::RaceResultRecord;

/// Most recent record of `driver` by (season, race number)
pub fn latest_entity_record<'a>(
    records: &'a [RaceResultRecord],
    driver: &str,
) -> Option<&'a RaceResultRecord> {
    records
        .iter()
        .filter(|record| record.driver_name == driver)
        .max_by_key(|record| record.race_key())
}

/// Car number a driver ran most recently
///
/// Prefers the latest race inside the current season window so mid-season
/// number changes show up; falls back to the driver's latest record overall.
pub fn entity_car_number(
    records: &[RaceResultRecord],
    driver: &str,
    current_season: &DateWindow,
) -> Option<String> {
    records
        .iter()
        .filter(|record| record.driver_name == driver && current_season.contains(&record.race_date))
        .max_by_key(|record| record.race_key())
        .or_else(|| latest_entity_record(records, driver))
        .map(|record| record.car_number.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::test_support::{date, RecordBuilder};

    fn records() -> Vec<RaceResultRecord> {
        vec![
            RecordBuilder::new("A").car("5").race(2024, 36, "2024-11-10").build(),
            RecordBuilder::new("A").car("9").race(2025, 1, "2025-02-16").build(),
            RecordBuilder::new("A").car("99").race(2025, 2, "2025-02-23").build(),
            RecordBuilder::new("B").car("24").race(2023, 10, "2023-04-23").build(),
        ]
    }

    #[test]
    fn uses_latest_race_of_current_season() {
        let window = DateWindow::from_dates([date("2025-02-16"), date("2025-02-23")]);
        assert_eq!(entity_car_number(&records(), "A", &window).as_deref(), Some("99"));
    }

    #[test]
    fn falls_back_to_latest_record_overall() {
        let window = DateWindow::from_dates([date("2025-02-16"), date("2025-02-23")]);
        assert_eq!(entity_car_number(&records(), "B", &window).as_deref(), Some("24"));

        let empty = DateWindow::default();
        assert_eq!(entity_car_number(&records(), "A", &empty).as_deref(), Some("99"));
    }

    #[test]
    fn no_history_means_no_number() {
        let window = DateWindow::default();
        assert_eq!(entity_car_number(&records(), "Nobody", &window), None);
        assert!(latest_entity_record(&records(), "Nobody").is_none());
    }
}
