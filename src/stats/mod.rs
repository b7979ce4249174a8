//! The aggregation engine
//!
//! Everything in here is synchronous and pure: functions take records plus
//! selection parameters and return derived values. Nothing is cached.

pub mod aggregate;
pub mod comparison;
pub mod entity;
pub mod filter;
pub mod metrics;
pub mod ranking;
pub mod recent;
pub mod service;
pub mod standings;

mod errors;
pub mod models;

#[cfg(test)]
pub mod test_support;

pub use aggregate::{
    average, entity_average, entity_sum, finish_position_points_percentage, finished_percentage,
    nth_previous_race, percentage, previous_races, single_race_value, stage_points_percentage, sum,
};
pub use comparison::{compare_sum_to_previous_season, compare_to_previous_season, SeasonPair};
pub use entity::{entity_car_number, latest_entity_record};
pub use errors::StatsError;
pub use filter::{filter_entity_races, qualifies, RaceFilter};
pub use metrics::{Direction, MetricKey};
pub use models::*;
pub use ranking::{rank_in_group, sort_group};
pub use recent::last_n_race_summary;
pub use service::{EntityRow, PointsRow, PointsTable, StatsService, StatsTable, TableQuery};
pub use standings::{best_finish, current_standings, standing_value};
