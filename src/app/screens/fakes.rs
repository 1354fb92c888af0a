//! In-memory backend for screen tests.

use crate::domain::model::{
    BulkResponse, FeedProvider, PublicFeedProviderStatus, ShortValidationReport,
    StationInformation, SubscriptionStatus,
};
use crate::domain::ports::{AdminApi, GbfsApi, StatusApi, ValidationApi};
use crate::utils::error::{ConsoleError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeBackend {
    pub providers: Mutex<Vec<FeedProvider>>,
    pub statuses: Mutex<HashMap<String, SubscriptionStatus>>,
    /// Statuses handed out by successive single-status probes.
    pub status_sequence: Mutex<Vec<SubscriptionStatus>>,
    pub bulk_response: Mutex<BulkResponse>,
    pub cache_keys: Mutex<Vec<String>>,
    pub orphans: Mutex<Vec<String>>,
    pub public: Mutex<Vec<PublicFeedProviderStatus>>,
    pub reports: Mutex<HashMap<String, ShortValidationReport>>,
    pub history: Mutex<HashMap<String, Vec<ShortValidationReport>>>,
    pub stations: Mutex<HashMap<String, Vec<StationInformation>>>,
    /// Calls whose name starts with this prefix fail with the given status.
    pub failing: Mutex<Option<(String, u16)>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_providers(ids: &[&str]) -> Self {
        let fake = Self::new();
        {
            let mut providers = fake.providers.lock().unwrap();
            let mut statuses = fake.statuses.lock().unwrap();
            for id in ids {
                providers.push(valid_provider(id));
                statuses.insert(id.to_string(), SubscriptionStatus::Stopped);
            }
        }
        fake
    }

    pub fn fail(&self, call_prefix: &str, status: u16) {
        *self.failing.lock().unwrap() = Some((call_prefix.to_string(), status));
    }

    pub fn recover(&self) {
        *self.failing.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn call(&self, name: &str) -> Result<()> {
        self.calls.lock().unwrap().push(name.to_string());
        if let Some((prefix, status)) = self.failing.lock().unwrap().as_ref() {
            if name.starts_with(prefix.as_str()) {
                let path = format!("/fake/{}", name);
                return Err(match status {
                    404 => ConsoleError::NotFoundError { path },
                    409 => ConsoleError::ConflictError { path },
                    other => ConsoleError::ApiError {
                        status: *other,
                        path,
                        body: String::new(),
                    },
                });
            }
        }
        Ok(())
    }

    fn set_status(&self, system_id: &str, status: SubscriptionStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert(system_id.to_string(), status);
    }
}

pub fn valid_provider(system_id: &str) -> FeedProvider {
    let mut provider = FeedProvider::new(system_id);
    provider.operator_id = Some(format!("YXX:Operator:{}", system_id));
    provider.operator_name = Some(format!("Operator {}", system_id));
    provider.codespace = Some("YXX".to_string());
    provider.url = Some(format!("https://gbfs.example.com/{}/gbfs.json", system_id));
    provider.language = Some("en".to_string());
    provider.version = Some("2.3".to_string());
    provider
}

#[async_trait]
impl AdminApi for FakeBackend {
    async fn get_all_providers(&self) -> Result<Vec<FeedProvider>> {
        self.call("get_all_providers")?;
        Ok(self.providers.lock().unwrap().clone())
    }

    async fn get_provider(&self, system_id: &str) -> Result<FeedProvider> {
        self.call("get_provider")?;
        self.providers
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.system_id == system_id)
            .cloned()
            .ok_or(ConsoleError::NotFoundError {
                path: format!("/feed-providers/{}", system_id),
            })
    }

    async fn create_provider(&self, provider: &FeedProvider) -> Result<FeedProvider> {
        self.call("create_provider")?;
        let mut providers = self.providers.lock().unwrap();
        if providers.iter().any(|p| p.system_id == provider.system_id) {
            return Err(ConsoleError::ConflictError {
                path: "/feed-providers".to_string(),
            });
        }
        providers.push(provider.clone());
        Ok(provider.clone())
    }

    async fn update_provider(&self, provider: &FeedProvider) -> Result<FeedProvider> {
        self.call("update_provider")?;
        let mut providers = self.providers.lock().unwrap();
        match providers
            .iter_mut()
            .find(|p| p.system_id == provider.system_id)
        {
            Some(existing) => {
                *existing = provider.clone();
                Ok(provider.clone())
            }
            None => Err(ConsoleError::NotFoundError {
                path: format!("/feed-providers/{}", provider.system_id),
            }),
        }
    }

    async fn delete_provider(&self, system_id: &str) -> Result<()> {
        self.call("delete_provider")?;
        self.providers
            .lock()
            .unwrap()
            .retain(|p| p.system_id != system_id);
        self.statuses.lock().unwrap().remove(system_id);
        Ok(())
    }

    async fn migrate_providers_from_file(&self) -> Result<u64> {
        self.call("migrate_providers_from_file")?;
        Ok(self.providers.lock().unwrap().len() as u64)
    }

    async fn start_subscription(&self, system_id: &str) -> Result<()> {
        self.call("start_subscription")?;
        self.set_status(system_id, SubscriptionStatus::Starting);
        Ok(())
    }

    async fn stop_subscription(&self, system_id: &str) -> Result<()> {
        self.call("stop_subscription")?;
        self.set_status(system_id, SubscriptionStatus::Stopping);
        Ok(())
    }

    async fn restart_subscription(&self, system_id: &str) -> Result<()> {
        self.call("restart_subscription")?;
        self.set_status(system_id, SubscriptionStatus::Starting);
        Ok(())
    }

    async fn get_subscription_statuses(&self) -> Result<HashMap<String, SubscriptionStatus>> {
        self.call("get_subscription_statuses")?;
        Ok(self.statuses.lock().unwrap().clone())
    }

    async fn get_subscription_status(&self, system_id: &str) -> Result<SubscriptionStatus> {
        self.call("get_subscription_status")?;
        let mut sequence = self.status_sequence.lock().unwrap();
        if !sequence.is_empty() {
            let next = sequence.remove(0);
            self.set_status(system_id, next);
            return Ok(next);
        }
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(system_id)
            .copied()
            .unwrap_or(SubscriptionStatus::Unknown))
    }

    async fn set_provider_enabled(&self, system_id: &str, enabled: bool) -> Result<()> {
        self.call("set_provider_enabled")?;
        if let Some(p) = self
            .providers
            .lock()
            .unwrap()
            .iter_mut()
            .find(|p| p.system_id == system_id)
        {
            p.enabled = enabled;
        }
        Ok(())
    }

    async fn bulk_start(&self, _system_ids: &[String]) -> Result<BulkResponse> {
        self.call("bulk_start")?;
        Ok(self.bulk_response.lock().unwrap().clone())
    }

    async fn bulk_stop(&self, _system_ids: &[String]) -> Result<BulkResponse> {
        self.call("bulk_stop")?;
        Ok(self.bulk_response.lock().unwrap().clone())
    }

    async fn bulk_restart(&self, _system_ids: &[String]) -> Result<BulkResponse> {
        self.call("bulk_restart")?;
        Ok(self.bulk_response.lock().unwrap().clone())
    }

    async fn bulk_set_enabled(
        &self,
        _system_ids: &[String],
        _enabled: bool,
    ) -> Result<BulkResponse> {
        self.call("bulk_set_enabled")?;
        Ok(self.bulk_response.lock().unwrap().clone())
    }

    async fn get_cache_keys(&self) -> Result<Vec<String>> {
        self.call("get_cache_keys")?;
        Ok(self.cache_keys.lock().unwrap().clone())
    }

    async fn clear_vehicle_cache(&self) -> Result<u64> {
        self.call("clear_vehicle_cache")?;
        let mut keys = self.cache_keys.lock().unwrap();
        let before = keys.len();
        keys.retain(|k| !k.starts_with("vehicles_"));
        Ok((before - keys.len()) as u64)
    }

    async fn clear_old_cache(&self) -> Result<Vec<String>> {
        self.call("clear_old_cache")?;
        let mut keys = self.cache_keys.lock().unwrap();
        let (old, current): (Vec<String>, Vec<String>) =
            keys.drain(..).partition(|k| !k.ends_with("_12"));
        *keys = current;
        Ok(old)
    }

    async fn clear_database(&self) -> Result<()> {
        self.call("clear_database")?;
        self.cache_keys.lock().unwrap().clear();
        Ok(())
    }

    async fn get_vehicle_orphans(&self) -> Result<Vec<String>> {
        self.call("get_vehicle_orphans")?;
        Ok(self.orphans.lock().unwrap().clone())
    }

    async fn clear_vehicle_orphans(&self) -> Result<Vec<String>> {
        self.call("clear_vehicle_orphans")?;
        Ok(std::mem::take(&mut *self.orphans.lock().unwrap()))
    }
}

#[async_trait]
impl StatusApi for FakeBackend {
    async fn get_public_providers(&self) -> Result<Vec<PublicFeedProviderStatus>> {
        self.call("get_public_providers")?;
        Ok(self.public.lock().unwrap().clone())
    }

    async fn get_public_provider(&self, system_id: &str) -> Result<PublicFeedProviderStatus> {
        self.call("get_public_provider")?;
        self.public
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.system_id == system_id)
            .cloned()
            .ok_or(ConsoleError::NotFoundError {
                path: format!("/feed-providers/{}", system_id),
            })
    }
}

#[async_trait]
impl ValidationApi for FakeBackend {
    async fn get_latest_reports(&self) -> Result<HashMap<String, ShortValidationReport>> {
        self.call("get_latest_reports")?;
        Ok(self.reports.lock().unwrap().clone())
    }

    async fn get_report_history(&self, system_id: &str) -> Result<Vec<ShortValidationReport>> {
        self.call("get_report_history")?;
        Ok(self
            .history
            .lock()
            .unwrap()
            .get(system_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl GbfsApi for FakeBackend {
    async fn get_stations(&self, system_id: &str) -> Result<Vec<StationInformation>> {
        self.call(&format!("get_stations:{}", system_id))?;
        self.stations
            .lock()
            .unwrap()
            .get(system_id)
            .cloned()
            .ok_or(ConsoleError::NotFoundError {
                path: format!("/{}/station_information", system_id),
            })
    }
}
