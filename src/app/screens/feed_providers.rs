use crate::core::alert::Alert;
use crate::core::bulk::{BulkAction, BulkReport};
use crate::core::poller::{Poller, Settled};
use crate::domain::model::{Authentication, AuthenticationScheme, FeedProvider, SubscriptionStatus};
use crate::domain::ports::AdminApi;
use crate::utils::error::{ConsoleError, Result};
use crate::utils::validation::FieldErrors;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::time::Duration;

pub const SUPPORTED_GBFS_VERSIONS: [&str; 7] = ["1.0", "1.1", "2.0", "2.1", "2.2", "2.3", "3.0"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Start,
    Stop,
    Restart,
}

impl Lifecycle {
    fn past_tense(self) -> &'static str {
        match self {
            Lifecycle::Start => "Started",
            Lifecycle::Stop => "Stopped",
            Lifecycle::Restart => "Restarted",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Lifecycle::Start => "start",
            Lifecycle::Stop => "stop",
            Lifecycle::Restart => "restart",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderAction {
    Create,
    Update,
    Delete,
    Lifecycle(Lifecycle),
    SetEnabled,
    Bulk(BulkAction),
    Migrate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRow {
    #[serde(flatten)]
    pub provider: FeedProvider,
    pub subscription_status: SubscriptionStatus,
}

/// Client-side checks run before a provider is sent to the backend. Every
/// failing field is reported.
pub fn validate_provider(provider: &FeedProvider) -> Result<()> {
    let mut errors = FieldErrors::new();
    errors.require("systemId", Some(provider.system_id.as_str()));
    errors.require("operatorId", provider.operator_id.as_deref());
    errors.require("operatorName", provider.operator_name.as_deref());
    errors.require("codespace", provider.codespace.as_deref());
    errors.require_http_url("url", provider.url.as_deref());
    errors.require("language", provider.language.as_deref());

    if let Some(version) = provider.version.as_deref().filter(|v| !v.trim().is_empty()) {
        if !SUPPORTED_GBFS_VERSIONS.contains(&version) {
            errors.push(
                "version",
                format!(
                    "must be one of {}",
                    SUPPORTED_GBFS_VERSIONS.join(", ")
                ),
            );
        }
    }

    if let Some(auth) = &provider.authentication {
        validate_authentication(auth, &mut errors);
    }

    errors.into_result()
}

fn validate_authentication(auth: &Authentication, errors: &mut FieldErrors) {
    let field = |key: &str| format!("authentication.properties.{}", key);
    match auth.scheme {
        AuthenticationScheme::Oauth2ClientCredentialsGrant => {
            errors.require_http_url(
                &field(Authentication::TOKEN_URL),
                auth.property(Authentication::TOKEN_URL),
            );
            errors.require(
                &field(Authentication::CLIENT_ID),
                auth.property(Authentication::CLIENT_ID),
            );
            errors.require(
                &field(Authentication::CLIENT_PASSWORD),
                auth.property(Authentication::CLIENT_PASSWORD),
            );
        }
        AuthenticationScheme::BearerToken => {
            errors.require(
                &field(Authentication::ACCESS_TOKEN),
                auth.property(Authentication::ACCESS_TOKEN),
            );
        }
        AuthenticationScheme::HttpHeaders => {
            if auth.properties.is_empty() {
                errors.push("authentication.properties", "needs at least one header");
            }
        }
    }
}

/// Admin feed provider screen: provider table joined with subscription
/// statuses, a selection set for bulk actions and the current alert.
pub struct FeedProvidersScreen<'a, A: AdminApi> {
    api: &'a A,
    rows: Vec<ProviderRow>,
    selection: BTreeSet<String>,
    loading: bool,
    in_progress: Option<ProviderAction>,
    alert: Option<Alert>,
}

impl<'a, A: AdminApi> FeedProvidersScreen<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            rows: Vec::new(),
            selection: BTreeSet::new(),
            loading: false,
            in_progress: None,
            alert: None,
        }
    }

    pub fn rows(&self) -> &[ProviderRow] {
        &self.rows
    }

    pub fn row(&self, system_id: &str) -> Option<&ProviderRow> {
        self.rows.iter().find(|r| r.provider.system_id == system_id)
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Hands the current alert to the caller so it is shown only once.
    pub fn take_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn in_progress(&self) -> Option<ProviderAction> {
        self.in_progress
    }

    fn fail(&mut self, context: &str, error: ConsoleError) -> ConsoleError {
        tracing::warn!("{}: {}", context, error);
        self.alert = Some(Alert::error(format!(
            "{}: {}",
            context,
            error.user_friendly_message()
        )));
        error
    }

    fn begin(&mut self, action: ProviderAction) -> Result<()> {
        if let Some(running) = self.in_progress {
            return Err(ConsoleError::validation(
                "action",
                format!("{:?} is still in progress", running),
            ));
        }
        self.in_progress = Some(action);
        Ok(())
    }

    fn apply_statuses(&mut self, statuses: &HashMap<String, SubscriptionStatus>) {
        for row in &mut self.rows {
            row.subscription_status = statuses
                .get(&row.provider.system_id)
                .copied()
                .unwrap_or(SubscriptionStatus::Unknown);
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.loading = true;
        let result = tokio::try_join!(
            self.api.get_all_providers(),
            self.api.get_subscription_statuses()
        );
        self.loading = false;

        let (providers, statuses) = match result {
            Ok(data) => data,
            Err(e) => return Err(self.fail("Failed to load feed providers", e)),
        };

        let mut rows: Vec<ProviderRow> = providers
            .into_iter()
            .map(|provider| ProviderRow {
                provider,
                subscription_status: SubscriptionStatus::Unknown,
            })
            .collect();
        rows.sort_by(|a, b| a.provider.system_id.cmp(&b.provider.system_id));
        self.rows = rows;
        self.apply_statuses(&statuses);

        let known: BTreeSet<&str> = self
            .rows
            .iter()
            .map(|r| r.provider.system_id.as_str())
            .collect();
        self.selection.retain(|id| known.contains(id.as_str()));

        tracing::debug!("Loaded {} feed providers", self.rows.len());
        Ok(())
    }

    /// Polling tick: statuses only. A failed refresh keeps the old values.
    pub async fn refresh_statuses(&mut self) {
        match self.api.get_subscription_statuses().await {
            Ok(statuses) => self.apply_statuses(&statuses),
            Err(e) => tracing::warn!("Failed to refresh subscription statuses: {}", e),
        }
    }

    pub async fn create(&mut self, provider: FeedProvider) -> Result<()> {
        validate_provider(&provider)?;
        self.begin(ProviderAction::Create)?;
        let result = self.api.create_provider(&provider).await;
        self.in_progress = None;

        match result {
            Ok(created) => {
                self.alert = Some(Alert::success(format!(
                    "Created feed provider {}",
                    created.system_id
                )));
                self.reload_quietly().await;
                Ok(())
            }
            Err(e @ ConsoleError::ConflictError { .. }) => {
                let context = format!("Feed provider {} already exists", provider.system_id);
                Err(self.fail(&context, e))
            }
            Err(e) => Err(self.fail("Failed to create feed provider", e)),
        }
    }

    /// `system_id` is the provider being edited; the id itself cannot change.
    pub async fn update(&mut self, system_id: &str, provider: FeedProvider) -> Result<()> {
        if provider.system_id != system_id {
            return Err(ConsoleError::validation(
                "systemId",
                format!("must stay {} when editing", system_id),
            ));
        }
        validate_provider(&provider)?;
        self.begin(ProviderAction::Update)?;
        let result = self.api.update_provider(&provider).await;
        self.in_progress = None;

        match result {
            Ok(_) => {
                self.alert = Some(Alert::success(format!("Updated feed provider {}", system_id)));
                self.reload_quietly().await;
                Ok(())
            }
            Err(e) => Err(self.fail("Failed to update feed provider", e)),
        }
    }

    pub async fn delete(&mut self, system_id: &str) -> Result<()> {
        self.begin(ProviderAction::Delete)?;
        let result = self.api.delete_provider(system_id).await;
        self.in_progress = None;

        match result {
            Ok(()) => {
                self.rows.retain(|r| r.provider.system_id != system_id);
                self.selection.remove(system_id);
                self.alert = Some(Alert::success(format!("Deleted feed provider {}", system_id)));
                Ok(())
            }
            Err(e) => Err(self.fail("Failed to delete feed provider", e)),
        }
    }

    pub async fn lifecycle(&mut self, system_id: &str, action: Lifecycle) -> Result<()> {
        self.begin(ProviderAction::Lifecycle(action))?;
        let result = match action {
            Lifecycle::Start => self.api.start_subscription(system_id).await,
            Lifecycle::Stop => self.api.stop_subscription(system_id).await,
            Lifecycle::Restart => self.api.restart_subscription(system_id).await,
        };
        self.in_progress = None;

        match result {
            Ok(()) => {
                self.alert = Some(Alert::success(format!(
                    "{} subscription for {}",
                    action.past_tense(),
                    system_id
                )));
                self.refresh_statuses().await;
                Ok(())
            }
            Err(e) => {
                let context = format!("Failed to {} subscription for {}", action, system_id);
                Err(self.fail(&context, e))
            }
        }
    }

    pub async fn set_enabled(&mut self, system_id: &str, enabled: bool) -> Result<()> {
        self.begin(ProviderAction::SetEnabled)?;
        let result = self.api.set_provider_enabled(system_id, enabled).await;
        self.in_progress = None;

        match result {
            Ok(()) => {
                if let Some(row) = self
                    .rows
                    .iter_mut()
                    .find(|r| r.provider.system_id == system_id)
                {
                    row.provider.enabled = enabled;
                }
                let state = if enabled { "Enabled" } else { "Disabled" };
                self.alert = Some(Alert::success(format!("{} feed provider {}", state, system_id)));
                self.refresh_statuses().await;
                Ok(())
            }
            Err(e) => Err(self.fail("Failed to change enabled state", e)),
        }
    }

    /// Polls the provider's status until it leaves STARTING/STOPPING.
    pub async fn wait_until_settled(
        &mut self,
        system_id: &str,
        poller: Poller,
        timeout: Duration,
    ) -> Settled<SubscriptionStatus> {
        let api = self.api;
        let outcome = poller
            .until(
                timeout,
                || api.get_subscription_status(system_id),
                |status| !status.is_transitional(),
            )
            .await;

        let latest = match &outcome {
            Settled::Reached(status) => Some(*status),
            Settled::TimedOut(last) => *last,
        };
        if let (Some(status), Some(row)) = (
            latest,
            self.rows
                .iter_mut()
                .find(|r| r.provider.system_id == system_id),
        ) {
            row.subscription_status = status;
        }
        if let Settled::TimedOut(_) = outcome {
            self.alert = Some(Alert::warning(format!(
                "{} is still changing state after {:?}",
                system_id, timeout
            )));
        }
        outcome
    }

    pub fn toggle(&mut self, system_id: &str) -> bool {
        if self.selection.remove(system_id) {
            false
        } else {
            self.selection.insert(system_id.to_string());
            true
        }
    }

    pub fn select<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection.extend(ids.into_iter().map(Into::into));
    }

    pub fn select_all(&mut self) {
        let ids: Vec<String> = self
            .rows
            .iter()
            .map(|r| r.provider.system_id.clone())
            .collect();
        self.selection.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn can_run_bulk(&self) -> bool {
        !self.selection.is_empty() && self.in_progress.is_none()
    }

    /// Runs `action` for the selection. Afterwards only the ids that did not
    /// succeed stay selected.
    pub async fn bulk(&mut self, action: BulkAction) -> Result<BulkReport> {
        if self.selection.is_empty() {
            return Err(ConsoleError::validation(
                "selection",
                "select at least one feed provider",
            ));
        }
        self.begin(ProviderAction::Bulk(action))?;

        let ids: Vec<String> = self.selection.iter().cloned().collect();
        tracing::info!("Bulk {} for {} providers", action, ids.len());
        let result = match action {
            BulkAction::Start => self.api.bulk_start(&ids).await,
            BulkAction::Stop => self.api.bulk_stop(&ids).await,
            BulkAction::Restart => self.api.bulk_restart(&ids).await,
            BulkAction::Enable => self.api.bulk_set_enabled(&ids, true).await,
            BulkAction::Disable => self.api.bulk_set_enabled(&ids, false).await,
        };
        self.in_progress = None;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let context = format!("Bulk {} failed", action);
                return Err(self.fail(&context, e));
            }
        };

        let report = BulkReport::reconcile(action, &ids, &response);
        for id in &report.unexpected {
            tracing::warn!("Bulk {} returned a result for unrequested provider {}", action, id);
        }
        self.selection = report.retry_ids();
        self.alert = Some(report.alert());

        if matches!(action, BulkAction::Enable | BulkAction::Disable) {
            self.reload_quietly().await;
        } else {
            self.refresh_statuses().await;
        }
        Ok(report)
    }

    pub async fn migrate_from_file(&mut self) -> Result<u64> {
        self.begin(ProviderAction::Migrate)?;
        let result = self.api.migrate_providers_from_file().await;
        self.in_progress = None;

        match result {
            Ok(count) => {
                self.alert = Some(Alert::success(format!(
                    "Migrated {} feed providers from file",
                    count
                )));
                self.reload_quietly().await;
                Ok(count)
            }
            Err(e) => Err(self.fail("Failed to migrate feed providers", e)),
        }
    }

    async fn reload_quietly(&mut self) {
        let alert = self.alert.take();
        if let Err(e) = self.load().await {
            tracing::warn!("Reload after action failed: {}", e);
        }
        self.alert = alert;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::screens::fakes::{valid_provider, FakeBackend};
    use crate::core::alert::AlertSeverity;
    use crate::utils::error::FieldError;

    fn invalid_fields(result: Result<()>) -> Vec<String> {
        match result {
            Err(ConsoleError::ValidationError { errors }) => {
                errors.into_iter().map(|FieldError { field, .. }| field).collect()
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn complete_provider_passes_validation() {
        assert!(validate_provider(&valid_provider("oslobysykkel")).is_ok());
    }

    #[test]
    fn every_missing_field_is_reported() {
        let provider = FeedProvider::new("");
        assert_eq!(
            invalid_fields(validate_provider(&provider)),
            vec!["systemId", "operatorId", "operatorName", "codespace", "url", "language"]
        );
    }

    #[test]
    fn url_and_version_are_checked() {
        let mut provider = valid_provider("x");
        provider.url = Some("ftp://gbfs.example.com/gbfs.json".to_string());
        provider.version = Some("2.4".to_string());
        assert_eq!(invalid_fields(validate_provider(&provider)), vec!["url", "version"]);
    }

    #[test]
    fn authentication_properties_depend_on_scheme() {
        let mut provider = valid_provider("x");
        provider.authentication = Some(Authentication {
            scheme: AuthenticationScheme::Oauth2ClientCredentialsGrant,
            properties: [(Authentication::CLIENT_ID.to_string(), "console".to_string())]
                .into_iter()
                .collect(),
        });
        assert_eq!(
            invalid_fields(validate_provider(&provider)),
            vec![
                "authentication.properties.tokenUrl",
                "authentication.properties.clientPassword"
            ]
        );

        provider.authentication = Some(Authentication {
            scheme: AuthenticationScheme::BearerToken,
            properties: Default::default(),
        });
        assert_eq!(
            invalid_fields(validate_provider(&provider)),
            vec!["authentication.properties.accessToken"]
        );

        provider.authentication = Some(Authentication {
            scheme: AuthenticationScheme::HttpHeaders,
            properties: [("x-api-key".to_string(), "secret".to_string())]
                .into_iter()
                .collect(),
        });
        assert!(validate_provider(&provider).is_ok());
    }

    #[tokio::test]
    async fn load_joins_statuses_and_sorts_rows() {
        let fake = FakeBackend::with_providers(&["b", "a", "c"]);
        fake.statuses
            .lock()
            .unwrap()
            .insert("a".to_string(), SubscriptionStatus::Started);
        fake.statuses.lock().unwrap().remove("c");

        let mut screen = FeedProvidersScreen::new(&fake);
        screen.load().await.unwrap();

        let ids: Vec<_> = screen
            .rows()
            .iter()
            .map(|r| r.provider.system_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(screen.rows()[0].subscription_status, SubscriptionStatus::Started);
        assert_eq!(screen.rows()[2].subscription_status, SubscriptionStatus::Unknown);
        assert!(!screen.is_loading());
    }

    #[tokio::test]
    async fn load_failure_sets_error_alert() {
        let fake = FakeBackend::with_providers(&["a"]);
        fake.fail("get_all_providers", 500);

        let mut screen = FeedProvidersScreen::new(&fake);
        assert!(screen.load().await.is_err());
        assert_eq!(screen.alert().unwrap().severity, AlertSeverity::Error);
        assert!(!screen.is_loading());
    }

    #[tokio::test]
    async fn invalid_provider_never_reaches_backend() {
        let fake = FakeBackend::new();
        let mut screen = FeedProvidersScreen::new(&fake);

        assert!(screen.create(FeedProvider::new("x")).await.is_err());
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn duplicate_create_reports_conflict() {
        let fake = FakeBackend::with_providers(&["a"]);
        let mut screen = FeedProvidersScreen::new(&fake);

        let err = screen.create(valid_provider("a")).await.unwrap_err();
        assert!(matches!(err, ConsoleError::ConflictError { .. }));
        assert!(screen.alert().unwrap().message.contains("already exists"));
        assert_eq!(screen.in_progress(), None);
    }

    #[tokio::test]
    async fn update_rejects_changed_system_id() {
        let fake = FakeBackend::with_providers(&["a"]);
        let mut screen = FeedProvidersScreen::new(&fake);

        let err = screen.update("a", valid_provider("b")).await.unwrap_err();
        assert!(matches!(err, ConsoleError::ValidationError { .. }));
        assert!(!fake.calls().contains(&"update_provider".to_string()));
    }

    #[tokio::test]
    async fn create_then_delete_updates_rows() {
        let fake = FakeBackend::new();
        let mut screen = FeedProvidersScreen::new(&fake);

        screen.create(valid_provider("new")).await.unwrap();
        assert_eq!(screen.rows().len(), 1);
        assert_eq!(screen.alert().unwrap().message, "Created feed provider new");

        screen.toggle("new");
        screen.delete("new").await.unwrap();
        assert!(screen.rows().is_empty());
        assert!(screen.selection().is_empty());
    }

    #[tokio::test]
    async fn lifecycle_refreshes_status() {
        let fake = FakeBackend::with_providers(&["a"]);
        let mut screen = FeedProvidersScreen::new(&fake);
        screen.load().await.unwrap();

        screen.lifecycle("a", Lifecycle::Start).await.unwrap();
        assert_eq!(screen.row("a").unwrap().subscription_status, SubscriptionStatus::Starting);
        assert_eq!(screen.alert().unwrap().message, "Started subscription for a");

        fake.fail("stop_subscription", 500);
        assert!(screen.lifecycle("a", Lifecycle::Stop).await.is_err());
        assert!(screen
            .alert()
            .unwrap()
            .message
            .starts_with("Failed to stop subscription for a"));
    }

    #[tokio::test]
    async fn wait_until_settled_follows_transition() {
        let fake = FakeBackend::with_providers(&["a"]);
        *fake.status_sequence.lock().unwrap() = vec![
            SubscriptionStatus::Starting,
            SubscriptionStatus::Starting,
            SubscriptionStatus::Started,
        ];
        let mut screen = FeedProvidersScreen::new(&fake);
        screen.load().await.unwrap();

        let outcome = screen
            .wait_until_settled("a", Poller::new(Duration::from_millis(5)), Duration::from_secs(5))
            .await;
        assert_eq!(outcome, Settled::Reached(SubscriptionStatus::Started));
        assert_eq!(screen.row("a").unwrap().subscription_status, SubscriptionStatus::Started);
    }

    #[tokio::test]
    async fn bulk_needs_a_selection() {
        let fake = FakeBackend::with_providers(&["a"]);
        let mut screen = FeedProvidersScreen::new(&fake);
        screen.load().await.unwrap();

        assert!(!screen.can_run_bulk());
        assert!(screen.bulk(BulkAction::Start).await.is_err());
        assert!(!fake.calls().contains(&"bulk_start".to_string()));

        screen.toggle("a");
        assert!(screen.can_run_bulk());
        assert!(!screen.toggle("a"));
        assert!(!screen.can_run_bulk());
    }

    #[tokio::test]
    async fn bulk_keeps_unsuccessful_ids_selected() {
        let fake = FakeBackend::with_providers(&["a", "b", "c"]);
        *fake.bulk_response.lock().unwrap() = [
            ("a".to_string(), "SUCCESS".to_string()),
            ("b".to_string(), "Subscription not found".to_string()),
        ]
        .into_iter()
        .collect();

        let mut screen = FeedProvidersScreen::new(&fake);
        screen.load().await.unwrap();
        screen.select_all();

        let report = screen.bulk(BulkAction::Restart).await.unwrap();
        assert_eq!(report.succeeded(), 1);
        assert_eq!(
            screen.selection().iter().cloned().collect::<Vec<_>>(),
            vec!["b".to_string(), "c".to_string()]
        );
        assert_eq!(screen.alert().unwrap().severity, AlertSeverity::Warning);
        assert_eq!(screen.in_progress(), None);
    }

    #[tokio::test]
    async fn bulk_transport_failure_keeps_selection() {
        let fake = FakeBackend::with_providers(&["a"]);
        fake.fail("bulk_set_enabled", 503);

        let mut screen = FeedProvidersScreen::new(&fake);
        screen.load().await.unwrap();
        screen.select(["a"]);

        assert!(screen.bulk(BulkAction::Disable).await.is_err());
        assert!(screen.selection().contains("a"));
        assert!(screen.alert().unwrap().is_error());
    }

    #[tokio::test]
    async fn reload_prunes_vanished_selection() {
        let fake = FakeBackend::with_providers(&["a", "b"]);
        let mut screen = FeedProvidersScreen::new(&fake);
        screen.load().await.unwrap();
        screen.select_all();

        fake.providers.lock().unwrap().retain(|p| p.system_id == "a");
        screen.load().await.unwrap();
        assert_eq!(screen.selection().len(), 1);
    }

    #[tokio::test]
    async fn bulk_is_blocked_while_another_action_runs() {
        let fake = FakeBackend::with_providers(&["a", "b"]);
        let mut screen = FeedProvidersScreen::new(&fake);
        screen.load().await.unwrap();
        screen.select_all();
        assert!(screen.can_run_bulk());

        screen.in_progress = Some(ProviderAction::Bulk(BulkAction::Start));
        assert!(!screen.can_run_bulk());

        let err = screen.bulk(BulkAction::Restart).await.unwrap_err();
        assert!(matches!(err, ConsoleError::ValidationError { .. }));
        assert!(!fake.calls().iter().any(|call| call.starts_with("bulk")));
        assert_eq!(screen.selection().len(), 2);
        assert_eq!(
            screen.in_progress(),
            Some(ProviderAction::Bulk(BulkAction::Start))
        );
    }

    #[tokio::test]
    async fn lifecycle_alert_is_taken_once() {
        let fake = FakeBackend::with_providers(&["a"]);
        let mut screen = FeedProvidersScreen::new(&fake);
        screen.load().await.unwrap();

        screen.lifecycle("a", Lifecycle::Start).await.unwrap();
        assert!(screen.take_alert().is_some());
        assert!(screen.alert().is_none());
        assert!(screen.take_alert().is_none());
    }
}
