use crate::core::alert::Alert;
use crate::domain::model::{PublicFeedProviderStatus, ShortValidationReport, SubscriptionStatus};
use crate::domain::ports::{StatusApi, ValidationApi};
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Success,
    Info,
    Warning,
    Default,
}

pub fn status_tone(status: SubscriptionStatus) -> StatusTone {
    match status {
        SubscriptionStatus::Started => StatusTone::Success,
        SubscriptionStatus::Starting => StatusTone::Info,
        SubscriptionStatus::Stopping => StatusTone::Warning,
        SubscriptionStatus::Stopped | SubscriptionStatus::Unknown => StatusTone::Default,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationIndicator {
    Unknown,
    Invalid,
    Valid,
}

impl ValidationIndicator {
    pub fn for_report(report: Option<&ShortValidationReport>) -> Self {
        match report {
            None => ValidationIndicator::Unknown,
            Some(r) if r.has_errors() => ValidationIndicator::Invalid,
            Some(_) => ValidationIndicator::Valid,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ValidationIndicator::Unknown => "unknown",
            ValidationIndicator::Invalid => "invalid",
            ValidationIndicator::Valid => "valid",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRow {
    #[serde(flatten)]
    pub provider: PublicFeedProviderStatus,
    pub tone: StatusTone,
    pub validation: ValidationIndicator,
    pub errors_count: Option<u64>,
}

/// Public dashboard. Provider statuses are polled; validation reports are
/// fetched once per `load`.
pub struct StatusBoard<'a, S: StatusApi, V: ValidationApi> {
    status_api: &'a S,
    validation_api: &'a V,
    providers: Vec<PublicFeedProviderStatus>,
    reports: HashMap<String, ShortValidationReport>,
    alert: Option<Alert>,
}

impl<'a, S: StatusApi, V: ValidationApi> StatusBoard<'a, S, V> {
    pub fn new(status_api: &'a S, validation_api: &'a V) -> Self {
        Self {
            status_api,
            validation_api,
            providers: Vec::new(),
            reports: HashMap::new(),
            alert: None,
        }
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn can_show_validation(&self, system_id: &str) -> bool {
        self.reports.contains_key(system_id)
    }

    pub fn rows(&self) -> Vec<BoardRow> {
        let mut rows: Vec<BoardRow> = self
            .providers
            .iter()
            .map(|provider| {
                let report = self.reports.get(&provider.system_id);
                BoardRow {
                    provider: provider.clone(),
                    tone: status_tone(provider.subscription_status),
                    validation: ValidationIndicator::for_report(report),
                    errors_count: report.map(|r| r.summary.errors_count),
                }
            })
            .collect();
        rows.sort_by(|a, b| a.provider.system_id.cmp(&b.provider.system_id));
        rows
    }

    pub async fn load(&mut self) -> Result<()> {
        let result = tokio::try_join!(
            self.status_api.get_public_providers(),
            self.validation_api.get_latest_reports()
        );

        match result {
            Ok((providers, reports)) => {
                self.providers = providers;
                self.reports = reports;
                self.alert = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load status board: {}", e);
                self.alert = Some(Alert::error("Failed to load feed provider data"));
                Err(e)
            }
        }
    }

    /// Polling tick. Keeps the previous rows when the fetch fails.
    pub async fn refresh(&mut self) {
        match self.status_api.get_public_providers().await {
            Ok(providers) => self.providers = providers,
            Err(e) => tracing::warn!("Failed to refresh provider statuses: {}", e),
        }
    }
}
