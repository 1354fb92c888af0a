use crate::config::MapConfig;
use crate::core::alert::{plural, Alert};
use crate::core::map_style::{compose_style, MapComposition, StopPlaceLayer};
use crate::core::stop_place_table::{
    paginate, sort_stop_places, stop_place_rows, Paging, SortKey, SortOrder, StopPlacePage,
};
use crate::domain::ports::GbfsApi;
use crate::utils::error::{ConsoleError, Result};
use crate::utils::validation::Validate;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct LayerFailure {
    pub system_id: String,
    pub reason: String,
}

pub struct StopPlaceMap<'a, G: GbfsApi> {
    api: &'a G,
    config: &'a MapConfig,
    layers: Vec<StopPlaceLayer>,
    failures: Vec<LayerFailure>,
    alert: Option<Alert>,
}

impl<'a, G: GbfsApi> StopPlaceMap<'a, G> {
    pub fn new(api: &'a G, config: &'a MapConfig) -> Self {
        Self {
            api,
            config,
            layers: Vec::new(),
            failures: Vec::new(),
            alert: None,
        }
    }

    pub fn failures(&self) -> &[LayerFailure] {
        &self.failures
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Fetches stations per system in request order, once per distinct id. A
    /// system that fails to load is left off the map; the load only fails
    /// when every system did.
    pub async fn load(&mut self, system_ids: &[String]) -> Result<()> {
        let mut seen = BTreeSet::new();
        let system_ids: Vec<&str> = system_ids
            .iter()
            .map(String::as_str)
            .filter(|id| seen.insert(*id))
            .collect();
        if system_ids.is_empty() {
            return Err(ConsoleError::validation(
                "systemIds",
                "name at least one system",
            ));
        }

        self.layers.clear();
        self.failures.clear();
        for &system_id in &system_ids {
            match self.api.get_stations(system_id).await {
                Ok(stations) => {
                    tracing::debug!("Loaded {} stations for {}", stations.len(), system_id);
                    self.layers.push(StopPlaceLayer {
                        system_id: system_id.to_string(),
                        stations,
                    });
                }
                Err(e) => {
                    tracing::warn!("Failed to load stations for {}: {}", system_id, e);
                    self.failures.push(LayerFailure {
                        system_id: system_id.to_string(),
                        reason: e.user_friendly_message(),
                    });
                    if self.failures.len() == system_ids.len() {
                        self.alert = Some(Alert::error("Failed to load stop places"));
                        return Err(e);
                    }
                }
            }
        }

        self.alert = Some(if self.failures.is_empty() {
            Alert::success(format!("Loaded {}", plural(self.layers.len(), "system")))
        } else {
            let names: Vec<&str> = self.failures.iter().map(|f| f.system_id.as_str()).collect();
            Alert::warning(format!(
                "Loaded {}, failed: {}",
                plural(self.layers.len(), "system"),
                names.join(", ")
            ))
        });
        Ok(())
    }

    pub fn compose(&self) -> MapComposition {
        compose_style(&self.layers, self.config)
    }

    /// One page of the loaded stations as overview rows.
    pub fn page(&self, key: SortKey, order: SortOrder, paging: Paging) -> Result<StopPlacePage> {
        paging.validate()?;
        let mut rows = stop_place_rows(&self.layers);
        sort_stop_places(&mut rows, key, order);
        Ok(paginate(rows, paging))
    }
}
