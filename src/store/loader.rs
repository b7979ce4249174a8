use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use super::{
    dataset::Dataset,
    errors::StoreError,
    models::{
        CalendarEntry, EntryList, NextRacePointer, RaceResultRecord, StandingsRecord,
        TrackSimilarityMap,
    },
};

pub const RACES_FILE: &str = "data.json";
pub const CALENDAR_FILE: &str = "calendar.json";
pub const STANDINGS_FILE: &str = "standings.json";
pub const SIMILARITY_FILE: &str = "track_similarity.json";
pub const NEXT_RACE_FILE: &str = "next_race_data.json";
pub const ENTRY_LIST_FILE: &str = "entry_list.json";

/// Where a complete dataset snapshot comes from
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn load(&self) -> Result<Dataset, StoreError>;

    fn describe(&self) -> String;
}

/// Reads the dashboard export files from a single directory
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    dir: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read_required(&self, name: &str) -> Result<String, StoreError> {
        let path = self.dir.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::MissingFile(path))
            }
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    async fn read_optional(&self, name: &str) -> Result<Option<String>, StoreError> {
        match self.read_required(name).await {
            Ok(contents) => Ok(Some(contents)),
            Err(StoreError::MissingFile(path)) => {
                debug!(path = %path.display(), "Optional data file not present");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn parse_optional<T: DeserializeOwned + Default>(
        &self,
        name: &str,
    ) -> Result<T, StoreError> {
        match self.read_optional(name).await? {
            Some(contents) => parse(&self.dir.join(name), &contents),
            None => Ok(T::default()),
        }
    }
}

#[async_trait]
impl DatasetSource for JsonDirectorySource {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn load(&self) -> Result<Dataset, StoreError> {
        let races_raw = self.read_required(RACES_FILE).await?;
        let races = parse_race_rows(&self.dir.join(RACES_FILE), &races_raw)?;

        let next_race_raw = self.read_required(NEXT_RACE_FILE).await?;
        let next_race: NextRacePointer = parse(&self.dir.join(NEXT_RACE_FILE), &next_race_raw)?;

        let calendar: Vec<CalendarEntry> = self.parse_optional(CALENDAR_FILE).await?;
        let standings: Vec<StandingsRecord> = self.parse_optional(STANDINGS_FILE).await?;
        let entry_list: EntryList = self.parse_optional(ENTRY_LIST_FILE).await?;
        let similarity = match self.read_optional(SIMILARITY_FILE).await? {
            Some(contents) => parse_similarity(&self.dir.join(SIMILARITY_FILE), &contents)?,
            None => TrackSimilarityMap::new(),
        };

        info!(
            races = races.len(),
            calendar = calendar.len(),
            standings = standings.len(),
            similar_tracks = similarity.len(),
            next_race_track = %next_race.next_race_track,
            "Dataset loaded"
        );

        Ok(Dataset::new(races, next_race)
            .with_calendar(calendar)
            .with_standings(standings)
            .with_similarity(similarity)
            .with_entry_list(entry_list))
    }

    fn describe(&self) -> String {
        format!("json directory {}", self.dir.display())
    }
}

/// Serves a prebuilt dataset, used when the data is assembled in process
#[derive(Debug, Clone)]
pub struct StaticSource {
    dataset: Dataset,
}

impl StaticSource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

#[async_trait]
impl DatasetSource for StaticSource {
    async fn load(&self) -> Result<Dataset, StoreError> {
        Ok(self.dataset.clone())
    }

    fn describe(&self) -> String {
        "static dataset".to_string()
    }
}

fn parse<T: DeserializeOwned>(path: &Path, contents: &str) -> Result<T, StoreError> {
    serde_json::from_str(contents).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses race rows one by one, skipping rows that do not fit the schema
fn parse_race_rows(path: &Path, contents: &str) -> Result<Vec<RaceResultRecord>, StoreError> {
    let rows: Vec<serde_json::Value> = parse(path, contents)?;
    let total = rows.len();

    let mut records = Vec::with_capacity(total);
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<RaceResultRecord>(row) {
            Ok(record) => records.push(record),
            Err(e) => warn!(index, error = %e, "Skipping malformed race row"),
        }
    }

    if records.len() < total {
        warn!(
            skipped = total - records.len(),
            total,
            "Some race rows were skipped"
        );
    }

    Ok(records)
}

/// Keeps only entries whose value is a list of track names
fn parse_similarity(path: &Path, contents: &str) -> Result<TrackSimilarityMap, StoreError> {
    let raw: HashMap<String, serde_json::Value> = parse(path, contents)?;

    Ok(raw
        .into_iter()
        .filter_map(|(track, value)| match value {
            serde_json::Value::Array(items) => {
                let similar = items
                    .into_iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect();
                Some((track, similar))
            }
            _ => {
                warn!(track = %track, "Ignoring similarity entry that is not a list");
                None
            }
        })
        .collect())
}
