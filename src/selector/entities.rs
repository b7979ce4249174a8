use std::collections::HashSet;

use super::types::{EntityKind, GroupSelection, TierMode};
use crate::store::{RaceResultRecord, UNKNOWN_TEAM};

/// Parameters choosing which entities a table lists
#[derive(Debug, Clone)]
pub struct EntitySelection<'a> {
    pub kind: EntityKind,
    pub tier: TierMode,
    pub group: GroupSelection,
    pub eligible: Option<&'a [String]>, // entry-list allow-list, drivers only
    pub season: Option<i32>,
}

impl<'a> EntitySelection<'a> {
    pub fn drivers(tier: TierMode, group: GroupSelection) -> Self {
        Self {
            kind: EntityKind::Driver,
            tier,
            group,
            eligible: None,
            season: None,
        }
    }

    pub fn of_kind(kind: EntityKind) -> Self {
        Self {
            kind,
            tier: TierMode::default(),
            group: GroupSelection::All,
            eligible: None,
            season: None,
        }
    }

    pub fn with_eligible(mut self, eligible: &'a [String]) -> Self {
        self.eligible = Some(eligible);
        self
    }

    pub fn in_season(mut self, season: i32) -> Self {
        self.season = Some(season);
        self
    }

    fn admits(&self, record: &RaceResultRecord) -> bool {
        if self.season.is_some_and(|season| record.season_year != season) {
            return false;
        }

        match self.kind {
            EntityKind::Driver => {
                self.group.matches(self.tier.group_of(record))
                    && self
                        .eligible
                        .map_or(true, |allowed| allowed.iter().any(|d| d == &record.driver_name))
            }
            EntityKind::Team | EntityKind::Manufacturer => {
                record.team_name != UNKNOWN_TEAM && !self.kind.name_of(record).is_empty()
            }
        }
    }
}

/// Distinct entity names matching `selection`, in order of first appearance
pub fn resolve_entities(records: &[RaceResultRecord], selection: &EntitySelection) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| selection.admits(record))
        .map(|record| selection.kind.name_of(record))
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}
