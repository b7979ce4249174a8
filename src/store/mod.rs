pub mod dataset;
mod errors;
pub mod loader;
pub mod models;
pub mod snapshot;

pub use dataset::Dataset;
pub use errors::StoreError;
pub use loader::{DatasetSource, JsonDirectorySource, StaticSource};
pub use models::*;
pub use snapshot::DatasetSnapshot;
