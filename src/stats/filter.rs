use chrono::NaiveDate;

use crate::selector::{DateWindow, EntityKind};
use crate::store::RaceResultRecord;

/// Exclusion flags applied to every aggregation
///
/// Both default to `false`: everything is included unless a view asks otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RaceFilter {
    pub exclude_playoffs: bool,
    pub exclude_dnf: bool,
}

impl RaceFilter {
    pub fn new(exclude_playoffs: bool, exclude_dnf: bool) -> Self {
        Self {
            exclude_playoffs,
            exclude_dnf,
        }
    }

    pub fn admits(&self, record: &RaceResultRecord) -> bool {
        (!self.exclude_playoffs || !record.season_stage.is_playoff())
            && (!self.exclude_dnf || record.status.is_finished())
    }
}

/// Whether `record` belongs to `entity` inside `window` and passes `filter`
pub fn qualifies(
    record: &RaceResultRecord,
    entity: &str,
    kind: EntityKind,
    window: &DateWindow,
    filter: RaceFilter,
) -> bool {
    kind.name_of(record) == entity && window.contains(&record.race_date) && filter.admits(record)
}

pub fn filter_entity_races<'a>(
    records: &'a [RaceResultRecord],
    entity: &str,
    kind: EntityKind,
    window: &DateWindow,
    filter: RaceFilter,
) -> Vec<&'a RaceResultRecord> {
    records
        .iter()
        .filter(|record| qualifies(record, entity, kind, window, filter))
        .collect()
}

/// Records of `entity` in the single race held on `race_date`
pub fn filter_entity_race_on<'a>(
    records: &'a [RaceResultRecord],
    entity: &str,
    kind: EntityKind,
    race_date: NaiveDate,
    filter: RaceFilter,
) -> Vec<&'a RaceResultRecord> {
    records
        .iter()
        .filter(|record| {
            kind.name_of(record) == entity && record.race_date == race_date && filter.admits(record)
        })
        .collect()
}
