use crate::domain::model::{
    BulkResponse, FeedProvider, PublicFeedProviderStatus, ShortValidationReport,
    StationInformation, SubscriptionStatus,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn get_all_providers(&self) -> Result<Vec<FeedProvider>>;
    async fn get_provider(&self, system_id: &str) -> Result<FeedProvider>;
    async fn create_provider(&self, provider: &FeedProvider) -> Result<FeedProvider>;
    async fn update_provider(&self, provider: &FeedProvider) -> Result<FeedProvider>;
    async fn delete_provider(&self, system_id: &str) -> Result<()>;
    async fn migrate_providers_from_file(&self) -> Result<u64>;

    async fn start_subscription(&self, system_id: &str) -> Result<()>;
    async fn stop_subscription(&self, system_id: &str) -> Result<()>;
    async fn restart_subscription(&self, system_id: &str) -> Result<()>;
    async fn get_subscription_statuses(&self) -> Result<HashMap<String, SubscriptionStatus>>;
    async fn get_subscription_status(&self, system_id: &str) -> Result<SubscriptionStatus>;
    async fn set_provider_enabled(&self, system_id: &str, enabled: bool) -> Result<()>;

    async fn bulk_start(&self, system_ids: &[String]) -> Result<BulkResponse>;
    async fn bulk_stop(&self, system_ids: &[String]) -> Result<BulkResponse>;
    async fn bulk_restart(&self, system_ids: &[String]) -> Result<BulkResponse>;
    async fn bulk_set_enabled(&self, system_ids: &[String], enabled: bool)
        -> Result<BulkResponse>;

    async fn get_cache_keys(&self) -> Result<Vec<String>>;
    async fn clear_vehicle_cache(&self) -> Result<u64>;
    async fn clear_old_cache(&self) -> Result<Vec<String>>;
    async fn clear_database(&self) -> Result<()>;

    async fn get_vehicle_orphans(&self) -> Result<Vec<String>>;
    async fn clear_vehicle_orphans(&self) -> Result<Vec<String>>;
}

#[async_trait]
pub trait StatusApi: Send + Sync {
    async fn get_public_providers(&self) -> Result<Vec<PublicFeedProviderStatus>>;
    async fn get_public_provider(&self, system_id: &str) -> Result<PublicFeedProviderStatus>;
}

#[async_trait]
pub trait ValidationApi: Send + Sync {
    async fn get_latest_reports(&self) -> Result<HashMap<String, ShortValidationReport>>;
    async fn get_report_history(&self, system_id: &str) -> Result<Vec<ShortValidationReport>>;
}

#[async_trait]
pub trait GbfsApi: Send + Sync {
    async fn get_stations(&self, system_id: &str) -> Result<Vec<StationInformation>>;
}
