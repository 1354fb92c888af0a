use crate::adapters::http::HttpClient;
use crate::domain::model::{BulkResponse, FeedProvider, SubscriptionStatus};
use crate::domain::ports::AdminApi;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use std::collections::HashMap;

const PROVIDERS: &str = "feed-providers";

/// `/admin` endpoints of the aggregation backend.
pub struct HttpAdminApi {
    http: HttpClient,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkSetEnabledRequest<'a> {
    system_ids: &'a [String],
    enabled: bool,
}

impl HttpAdminApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn get_all_providers(&self) -> Result<Vec<FeedProvider>> {
        self.http.json(Method::GET, &[PROVIDERS]).await
    }

    async fn get_provider(&self, system_id: &str) -> Result<FeedProvider> {
        self.http
            .json(Method::GET, &[PROVIDERS, system_id])
            .await
    }

    async fn create_provider(&self, provider: &FeedProvider) -> Result<FeedProvider> {
        self.http
            .json_with_body(Method::POST, &[PROVIDERS], provider)
            .await
    }

    async fn update_provider(&self, provider: &FeedProvider) -> Result<FeedProvider> {
        self.http
            .json_with_body(
                Method::PUT,
                &[PROVIDERS, provider.system_id.as_str()],
                provider,
            )
            .await
    }

    async fn delete_provider(&self, system_id: &str) -> Result<()> {
        self.http
            .empty(Method::DELETE, &[PROVIDERS, system_id], &[])
            .await
    }

    async fn migrate_providers_from_file(&self) -> Result<u64> {
        self.http
            .json(Method::POST, &[PROVIDERS, "migrate-from-file"])
            .await
    }

    async fn start_subscription(&self, system_id: &str) -> Result<()> {
        let path = [PROVIDERS, system_id, "start"];
        self.http.empty(Method::POST, &path, &[]).await
    }

    async fn stop_subscription(&self, system_id: &str) -> Result<()> {
        let path = [PROVIDERS, system_id, "stop"];
        self.http.empty(Method::POST, &path, &[]).await
    }

    async fn restart_subscription(&self, system_id: &str) -> Result<()> {
        let path = [PROVIDERS, system_id, "restart"];
        self.http.empty(Method::POST, &path, &[]).await
    }

    async fn get_subscription_statuses(&self) -> Result<HashMap<String, SubscriptionStatus>> {
        self.http
            .json(Method::GET, &[PROVIDERS, "subscription-statuses"])
            .await
    }

    async fn get_subscription_status(&self, system_id: &str) -> Result<SubscriptionStatus> {
        let path = [PROVIDERS, system_id, "subscription-status"];
        self.http.json(Method::GET, &path).await
    }

    async fn set_provider_enabled(&self, system_id: &str, enabled: bool) -> Result<()> {
        let path = [PROVIDERS, system_id, "set-enabled"];
        self.http
            .empty(Method::POST, &path, &[("enabled", enabled.to_string())])
            .await
    }

    async fn bulk_start(&self, system_ids: &[String]) -> Result<BulkResponse> {
        self.http
            .json_with_body(Method::POST, &[PROVIDERS, "bulk", "start"], system_ids)
            .await
    }

    async fn bulk_stop(&self, system_ids: &[String]) -> Result<BulkResponse> {
        self.http
            .json_with_body(Method::POST, &[PROVIDERS, "bulk", "stop"], system_ids)
            .await
    }

    async fn bulk_restart(&self, system_ids: &[String]) -> Result<BulkResponse> {
        self.http
            .json_with_body(Method::POST, &[PROVIDERS, "bulk", "restart"], system_ids)
            .await
    }

    async fn bulk_set_enabled(
        &self,
        system_ids: &[String],
        enabled: bool,
    ) -> Result<BulkResponse> {
        let body = BulkSetEnabledRequest {
            system_ids,
            enabled,
        };
        self.http
            .json_with_body(Method::POST, &[PROVIDERS, "bulk", "set-enabled"], &body)
            .await
    }

    async fn get_cache_keys(&self) -> Result<Vec<String>> {
        self.http.json(Method::GET, &["cache_keys"]).await
    }

    async fn clear_vehicle_cache(&self) -> Result<u64> {
        self.http.json(Method::POST, &["clear_vehicle_cache"]).await
    }

    async fn clear_old_cache(&self) -> Result<Vec<String>> {
        self.http.json(Method::POST, &["clear_old_cache"]).await
    }

    async fn clear_database(&self) -> Result<()> {
        self.http.empty(Method::POST, &["clear_db"], &[]).await
    }

    async fn get_vehicle_orphans(&self) -> Result<Vec<String>> {
        self.http.json(Method::GET, &["vehicle_orphans"]).await
    }

    async fn clear_vehicle_orphans(&self) -> Result<Vec<String>> {
        self.http.json(Method::DELETE, &["vehicle_orphans"]).await
    }
}
