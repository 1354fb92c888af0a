pub mod cache;
pub mod feed_providers;
pub mod spatial_index;
pub mod status_board;
pub mod stop_places;
pub mod validation_report;

#[cfg(test)]
pub mod fakes;

pub use cache::{CacheAction, CacheScreen};
pub use feed_providers::{FeedProvidersScreen, Lifecycle, ProviderRow};
pub use spatial_index::SpatialIndexScreen;
pub use status_board::{StatusBoard, ValidationIndicator};
pub use stop_places::StopPlaceMap;
pub use validation_report::{ReportView, ValidationScreen};

use crate::utils::prompt::Question;

/// Text for a destructive action's confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub title: &'static str,
    pub message: &'static str,
    /// Extra line for actions that cannot be undone.
    pub warning: Option<&'static str>,
    pub button: &'static str,
}

impl Confirmation {
    pub fn question(&self) -> Question<'static> {
        Question {
            title: self.title,
            message: self.message,
            warning: self.warning,
            action: self.button,
        }
    }
}
