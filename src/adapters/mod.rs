// Adapters layer: reqwest implementations of the domain ports.

pub mod admin;
pub mod http;
pub mod status;

use crate::adapters::admin::HttpAdminApi;
use crate::adapters::http::{build_client, ApiBase, HttpClient};
use crate::adapters::status::{HttpGbfsApi, HttpStatusApi, HttpValidationApi};
use crate::config::ConsoleConfig;
use crate::utils::error::Result;
use std::time::Duration;

/// All backend clients, built once from the console configuration.
pub struct Backend {
    pub base: ApiBase,
    pub admin: HttpAdminApi,
    pub status: HttpStatusApi,
    pub validation: HttpValidationApi,
    pub gbfs: HttpGbfsApi,
}

impl Backend {
    pub fn from_config(config: &ConsoleConfig) -> Result<Self> {
        let base = ApiBase::detect(&config.server.base_url)?;
        let client = build_client(
            Duration::from_secs(config.server.timeout_seconds),
            &config.server.client_name,
        )?;
        tracing::debug!("Backend root resolved to {}", base.root);

        let admin_http = HttpClient::new(client.clone(), base.admin())
            .with_bearer_token(config.auth.bearer_token.clone());

        Ok(Self {
            admin: HttpAdminApi::new(admin_http),
            status: HttpStatusApi::new(HttpClient::new(client.clone(), base.status())),
            validation: HttpValidationApi::new(HttpClient::new(client.clone(), base.validation())),
            gbfs: HttpGbfsApi::new(HttpClient::new(client, base.gbfs())),
            base,
        })
    }
}
