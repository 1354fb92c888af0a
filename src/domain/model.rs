use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Feed provider configuration as stored by the backend.
///
/// `vehicleTypes` and `pricingPlans` are GBFS documents the console never
/// interprets, so they travel as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedProvider {
    pub system_id: String,
    #[serde(default)]
    pub operator_id: Option<String>,
    #[serde(default)]
    pub operator_name: Option<String>,
    #[serde(default)]
    pub codespace: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_feeds: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub aggregate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_types: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_plans: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl FeedProvider {
    pub fn new(system_id: impl Into<String>) -> Self {
        Self {
            system_id: system_id.into(),
            operator_id: None,
            operator_name: None,
            codespace: None,
            url: None,
            language: None,
            authentication: None,
            exclude_feeds: None,
            aggregate: true,
            vehicle_types: None,
            pricing_plans: None,
            version: None,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthenticationScheme {
    Oauth2ClientCredentialsGrant,
    BearerToken,
    HttpHeaders,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authentication {
    pub scheme: AuthenticationScheme,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Authentication {
    pub const TOKEN_URL: &'static str = "tokenUrl";
    pub const CLIENT_ID: &'static str = "clientId";
    pub const CLIENT_PASSWORD: &'static str = "clientPassword";
    pub const ACCESS_TOKEN: &'static str = "accessToken";

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Started,
    Starting,
    Stopped,
    Stopping,
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    /// The backend is still moving the subscription between states.
    pub fn is_transitional(self) -> bool {
        matches!(self, SubscriptionStatus::Starting | SubscriptionStatus::Stopping)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionStatus::Started => "STARTED",
            SubscriptionStatus::Starting => "STARTING",
            SubscriptionStatus::Stopped => "STOPPED",
            SubscriptionStatus::Stopping => "STOPPING",
            SubscriptionStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public view of a provider: no url, no credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicFeedProviderStatus {
    pub system_id: String,
    #[serde(default)]
    pub operator_id: Option<String>,
    #[serde(default)]
    pub operator_name: Option<String>,
    #[serde(default)]
    pub codespace: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default = "unknown_status")]
    pub subscription_status: SubscriptionStatus,
}

fn unknown_status() -> SubscriptionStatus {
    SubscriptionStatus::Unknown
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    #[serde(default)]
    pub version: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub errors_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileValidationError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub schema_path: String,
    #[serde(default)]
    pub violation_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortFileValidationResult {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub exists: bool,
    #[serde(default)]
    pub errors_count: u64,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub errors: Vec<FileValidationError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortValidationReport {
    pub summary: ValidationSummary,
    #[serde(default)]
    pub files: BTreeMap<String, ShortFileValidationResult>,
}

impl ShortValidationReport {
    pub fn has_errors(&self) -> bool {
        self.summary.errors_count > 0
    }
}

/// Raw per-system outcome of a `/bulk/*` call.
pub type BulkResponse = HashMap<String, String>;

/// One entry of a GBFS `station_information` feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInformation {
    pub station_id: String,
    #[serde(default, deserialize_with = "deserialize_station_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

impl StationInformation {
    /// `(lon, lat)` when both are present and inside WGS84 bounds.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let (lat, lon) = (self.lat?, self.lon?);
        ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)).then_some((lon, lat))
    }
}

/// GBFS 2.x names are plain strings, 3.0 names are localized arrays; the
/// first translation wins.
fn deserialize_station_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Localized {
        text: String,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Name {
        Plain(String),
        Localized(Vec<Localized>),
    }

    let name = Option::<Name>::deserialize(deserializer)?;
    Ok(name.and_then(|n| match n {
        Name::Plain(s) => Some(s),
        Name::Localized(list) => list.into_iter().next().map(|l| l.text),
    }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationInformationFeed {
    pub data: StationInformationData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationInformationData {
    #[serde(default)]
    pub stations: Vec<StationInformation>,
}
