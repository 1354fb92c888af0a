use crate::adapters::http::HttpClient;
use crate::domain::model::{PublicFeedProviderStatus, ShortValidationReport, StationInformation, StationInformationFeed};
use crate::domain::ports::{GbfsApi, StatusApi, ValidationApi};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use std::collections::HashMap;

/// Public `/status` endpoints; no credentials are sent.
pub struct HttpStatusApi {
    http: HttpClient,
}

impl HttpStatusApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl StatusApi for HttpStatusApi {
    async fn get_public_providers(&self) -> Result<Vec<PublicFeedProviderStatus>> {
        self.http.json(Method::GET, &["feed-providers"]).await
    }

    async fn get_public_provider(&self, system_id: &str) -> Result<PublicFeedProviderStatus> {
        self.http
            .json(Method::GET, &["feed-providers", system_id])
            .await
    }
}

pub struct HttpValidationApi {
    http: HttpClient,
}

impl HttpValidationApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ValidationApi for HttpValidationApi {
    async fn get_latest_reports(&self) -> Result<HashMap<String, ShortValidationReport>> {
        self.http.json(Method::GET, &["systems"]).await
    }

    async fn get_report_history(&self, system_id: &str) -> Result<Vec<ShortValidationReport>> {
        self.http
            .json(Method::GET, &["systems", system_id])
            .await
    }
}

pub struct HttpGbfsApi {
    http: HttpClient,
}

impl HttpGbfsApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl GbfsApi for HttpGbfsApi {
    async fn get_stations(&self, system_id: &str) -> Result<Vec<StationInformation>> {
        let feed: StationInformationFeed = self
            .http
            .json(Method::GET, &[system_id, "station_information"])
            .await?;
        Ok(feed.data.stations)
    }
}
