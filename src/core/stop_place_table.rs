//! Sorting and paging for the stop-place overview table.

use crate::core::map_style::StopPlaceLayer;
use crate::utils::error::{ConsoleError, Result};
use crate::utils::validation::Validate;
use serde::Serialize;
use std::cmp::Reverse;

pub const DEFAULT_PER_PAGE: usize = 10;
const MAX_PER_PAGE: usize = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SortKey {
    #[default]
    Name,
    Id,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPlaceRow {
    pub system_id: String,
    pub station_id: String,
    pub name: String,
    pub capacity: Option<u32>,
}

impl StopPlaceRow {
    fn sort_value(&self, key: SortKey) -> String {
        match key {
            SortKey::Name => self.name.to_lowercase(),
            SortKey::Id => self.station_id.to_lowercase(),
        }
    }
}

/// Flattens loaded layers in load order. A missing name falls back to the
/// station id.
pub fn stop_place_rows(layers: &[StopPlaceLayer]) -> Vec<StopPlaceRow> {
    layers
        .iter()
        .flat_map(|layer| {
            layer.stations.iter().map(move |station| StopPlaceRow {
                system_id: layer.system_id.clone(),
                station_id: station.station_id.clone(),
                name: station
                    .name
                    .clone()
                    .unwrap_or_else(|| station.station_id.clone()),
                capacity: station.capacity,
            })
        })
        .collect()
}

/// Case-insensitive stable sort; equal values keep their load order in both
/// directions.
pub fn sort_stop_places(rows: &mut [StopPlaceRow], key: SortKey, order: SortOrder) {
    match order {
        SortOrder::Ascending => rows.sort_by_cached_key(|row| row.sort_value(key)),
        SortOrder::Descending => rows.sort_by_cached_key(|row| Reverse(row.sort_value(key))),
    }
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: usize,
    pub per_page: usize,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Validate for Paging {
    fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(ConsoleError::validation("page", "pages start at 1"));
        }
        if !(1..=MAX_PER_PAGE).contains(&self.per_page) {
            return Err(ConsoleError::validation(
                "perPage",
                format!("expected 1 to {}", MAX_PER_PAGE),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPlacePage {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub rows: Vec<StopPlaceRow>,
}

pub fn paginate(rows: Vec<StopPlaceRow>, paging: Paging) -> StopPlacePage {
    let total = rows.len();
    let start = paging.page.saturating_sub(1).saturating_mul(paging.per_page);
    let rows = rows.into_iter().skip(start).take(paging.per_page).collect();
    StopPlacePage {
        page: paging.page,
        per_page: paging.per_page,
        total,
        rows,
    }
}
