use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use super::{dataset::Dataset, errors::StoreError, loader::DatasetSource};

/// Shared handle to the dataset currently being served
///
/// Readers take a cheap `Arc` clone and keep computing over it even if a reload
/// swaps in a new dataset meanwhile. A reload never exposes a half-built dataset.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    current: Arc<RwLock<Arc<Dataset>>>,
}

impl DatasetSnapshot {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(dataset))),
        }
    }

    pub async fn current(&self) -> Arc<Dataset> {
        self.current.read().await.clone()
    }

    /// Swaps in a new dataset and returns the one it replaced
    pub async fn replace(&self, dataset: Dataset) -> Arc<Dataset> {
        let mut guard = self.current.write().await;
        std::mem::replace(&mut *guard, Arc::new(dataset))
    }

    /// Loads a fresh dataset from `source` and swaps it in once fully built
    #[instrument(skip(self, source), fields(source = %source.describe()))]
    pub async fn reload_from(&self, source: &dyn DatasetSource) -> Result<Arc<Dataset>, StoreError> {
        let dataset = source.load().await?;
        self.replace(dataset).await;
        let current = self.current().await;
        info!(races = current.races.len(), "Dataset snapshot replaced");
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{loader::StaticSource, models::NextRacePointer};

    fn dataset(next_race_number: u32) -> Dataset {
        Dataset::new(
            vec![],
            NextRacePointer {
                next_race_track: "Phoenix Raceway".to_string(),
                next_race_season: 2025,
                next_race_number,
                next_race_date: None,
            },
        )
    }

    #[tokio::test]
    async fn in_flight_readers_keep_their_snapshot() {
        let snapshot = DatasetSnapshot::new(dataset(4));
        let held = snapshot.current().await;

        let previous = snapshot.replace(dataset(5)).await;

        assert_eq!(held.next_race.next_race_number, 4);
        assert_eq!(previous.next_race.next_race_number, 4);
        assert_eq!(snapshot.current().await.next_race.next_race_number, 5);
    }

    #[tokio::test]
    async fn reload_swaps_in_source_dataset() {
        let snapshot = DatasetSnapshot::new(dataset(1));
        let source = StaticSource::new(dataset(9));

        let current = snapshot.reload_from(&source).await.unwrap();

        assert_eq!(current.next_race.next_race_number, 9);
    }
}
