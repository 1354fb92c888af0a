use crate::app::screens::Confirmation;
use crate::core::alert::{plural, Alert};
use crate::domain::ports::AdminApi;
use crate::utils::error::{ConsoleError, Result};

pub const CLEAR_ORPHANS: Confirmation = Confirmation {
    title: "Clear spatial index orphans",
    message: "Remove vehicle entries from the spatial index that no longer exist in the cache?",
    warning: None,
    button: "Clear orphans",
};

pub struct SpatialIndexScreen<'a, A: AdminApi> {
    api: &'a A,
    orphans: Vec<String>,
    loading: bool,
    clearing: bool,
    alert: Option<Alert>,
}

impl<'a, A: AdminApi> SpatialIndexScreen<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            orphans: Vec::new(),
            loading: false,
            clearing: false,
            alert: None,
        }
    }

    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn can_clear_orphans(&self) -> bool {
        !self.loading && !self.clearing && !self.orphans.is_empty()
    }

    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.api.get_vehicle_orphans().await;
        self.loading = false;

        match result {
            Ok(orphans) => {
                self.orphans = orphans;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load spatial index orphans: {}", e);
                self.alert = Some(Alert::error(format!(
                    "Failed to load orphans: {}",
                    e.user_friendly_message()
                )));
                Err(e)
            }
        }
    }

    pub async fn clear_orphans(&mut self) -> Result<usize> {
        if !self.can_clear_orphans() {
            return Err(ConsoleError::validation(
                "orphans",
                "there are no orphans to clear",
            ));
        }
        self.clearing = true;
        let result = self.api.clear_vehicle_orphans().await;
        self.clearing = false;

        match result {
            Ok(cleared) => {
                self.orphans.clear();
                self.alert = Some(Alert::success(format!(
                    "Cleared {}",
                    plural(cleared.len(), "orphan")
                )));
                Ok(cleared.len())
            }
            Err(e) => {
                tracing::warn!("Failed to clear spatial index orphans: {}", e);
                self.alert = Some(Alert::error(format!(
                    "Failed to clear orphans: {}",
                    e.user_friendly_message()
                )));
                Err(e)
            }
        }
    }
}
