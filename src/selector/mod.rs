pub mod entities;
pub mod groups;
pub mod types;
pub mod windows;

pub use entities::{resolve_entities, EntitySelection};
pub use groups::{resolve_groups, CANONICAL_GROUP_ORDER};
pub use types::*;
pub use windows::{resolve_date_windows, DateWindows, DEFAULT_MIN_YEAR};
