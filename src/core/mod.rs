pub mod alert;
pub mod bulk;
pub mod cache_keys;
pub mod map_style;
pub mod poller;
pub mod stop_place_table;
pub mod validation_grouping;

pub use crate::domain::ports::{AdminApi, GbfsApi, StatusApi, ValidationApi};
pub use crate::utils::error::Result;
