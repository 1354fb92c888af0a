use crate::app::screens::Confirmation;
use crate::core::alert::{plural, Alert};
use crate::core::cache_keys::{group_cache_keys, CacheKeyGroup};
use crate::domain::ports::AdminApi;
use crate::utils::error::{ConsoleError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    ClearVehicleCache,
    ClearOldCache,
    ClearDatabase,
}

impl CacheAction {
    pub fn confirmation(self) -> Confirmation {
        match self {
            CacheAction::ClearVehicleCache => Confirmation {
                title: "Clear vehicle cache",
                message: "Remove all cached vehicle data?",
                warning: None,
                button: "Clear vehicles",
            },
            CacheAction::ClearOldCache => Confirmation {
                title: "Clear old cache",
                message: "Remove cache entries left over from previous versions?",
                warning: None,
                button: "Clear old keys",
            },
            CacheAction::ClearDatabase => Confirmation {
                title: "Clear database",
                message: "Remove every entry in the cache database?",
                warning: Some("This cannot be undone. All subscriptions must be restarted afterwards."),
                button: "Clear database",
            },
        }
    }
}

pub struct CacheScreen<'a, A: AdminApi> {
    api: &'a A,
    keys: Vec<String>,
    loading: bool,
    in_progress: Option<CacheAction>,
    alert: Option<Alert>,
}

impl<'a, A: AdminApi> CacheScreen<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            keys: Vec::new(),
            loading: false,
            in_progress: None,
            alert: None,
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn groups(&self) -> Vec<CacheKeyGroup> {
        group_cache_keys(&self.keys)
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn in_progress(&self) -> Option<CacheAction> {
        self.in_progress
    }

    pub fn can_run(&self) -> bool {
        self.in_progress.is_none() && !self.loading
    }

    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.api.get_cache_keys().await;
        self.loading = false;

        match result {
            Ok(keys) => {
                tracing::debug!("Loaded {} cache keys", keys.len());
                self.keys = keys;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load cache keys: {}", e);
                self.alert = Some(Alert::error(format!(
                    "Failed to load cache keys: {}",
                    e.user_friendly_message()
                )));
                Err(e)
            }
        }
    }

    pub async fn run(&mut self, action: CacheAction) -> Result<()> {
        if let Some(running) = self.in_progress {
            return Err(ConsoleError::validation(
                "action",
                format!("{:?} is still in progress", running),
            ));
        }
        self.in_progress = Some(action);
        tracing::info!("Running cache action {:?}", action);

        let result = match action {
            CacheAction::ClearVehicleCache => self
                .api
                .clear_vehicle_cache()
                .await
                .map(|count| {
                    let noun = if count == 1 { "entry" } else { "entries" };
                    format!("Cleared {} vehicle cache {}", count, noun)
                }),
            CacheAction::ClearOldCache => self
                .api
                .clear_old_cache()
                .await
                .map(|deleted| format!("Deleted {}", plural(deleted.len(), "old cache key"))),
            CacheAction::ClearDatabase => self
                .api
                .clear_database()
                .await
                .map(|()| "Cleared the cache database".to_string()),
        };
        self.in_progress = None;

        match result {
            Ok(message) => {
                self.alert = Some(Alert::success(message));
                if let Err(e) = self.load().await {
                    tracing::warn!("Reloading cache keys failed: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Cache action {:?} failed: {}", action, e);
                self.alert = Some(Alert::error(format!(
                    "{} failed: {}",
                    action.confirmation().title,
                    e.user_friendly_message()
                )));
                Err(e)
            }
        }
    }
}
