use crate::utils::error::{ConsoleError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

pub const CLIENT_NAME_HEADER: &str = "ET-Client-Name";

/// Service roots derived from one configured URL.
///
/// The console may be pointed at the backend root or at a browser console
/// path behind a reverse proxy (`/mobility/v2/admin/ui`); both resolve to the
/// same roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    pub root: String,
}

impl ApiBase {
    pub fn detect(base_url: &str) -> Result<Self> {
        let mut url = Url::parse(base_url).map_err(|e| ConsoleError::InvalidConfigValueError {
            field: "server.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        url.set_query(None);
        url.set_fragment(None);

        let path = url.path().trim_end_matches('/').to_string();
        let root_path = if let Some(idx) = path.find("/admin/ui") {
            &path[..idx]
        } else if let Some(idx) = path.find("/status/ui") {
            &path[..idx]
        } else if let Some(prefix) = path.strip_suffix("/admin") {
            prefix
        } else if let Some(prefix) = path.strip_suffix("/status") {
            prefix
        } else {
            path.as_str()
        };

        url.set_path(root_path);
        let root = url.as_str().trim_end_matches('/').to_string();
        Ok(Self { root })
    }

    pub fn admin(&self) -> String {
        format!("{}/admin", self.root)
    }

    pub fn status(&self) -> String {
        format!("{}/status", self.root)
    }

    pub fn validation(&self) -> String {
        format!("{}/validation", self.root)
    }

    pub fn gbfs(&self) -> String {
        format!("{}/gbfs", self.root)
    }
}

pub fn build_client(timeout: Duration, client_name: &str) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let name = HeaderValue::from_str(client_name).map_err(|e| {
        ConsoleError::InvalidConfigValueError {
            field: "server.client_name".to_string(),
            value: client_name.to_string(),
            reason: e.to_string(),
        }
    })?;
    headers.insert(HeaderName::from_static("et-client-name"), name);

    let client = Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .user_agent(concat!("gbfs-console/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// A reqwest client bound to one service root.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base: String,
    bearer_token: Option<String>,
}

impl HttpClient {
    pub fn new(client: Client, base: impl Into<String>) -> Self {
        Self {
            client,
            base: base.into(),
            bearer_token: None,
        }
    }

    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Appends path segments to the service root, percent-encoding each one
    /// so a system id can never escape its segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let invalid = |reason: String| ConsoleError::InvalidConfigValueError {
            field: "server.base_url".to_string(),
            value: self.base.clone(),
            reason,
        };
        let mut url = Url::parse(&self.base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response> {
        let url = self.endpoint(segments)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        tracing::debug!("{} -> {}", url, response.status());
        check_status(url.path(), response).await
    }

    pub async fn json<T: DeserializeOwned>(&self, method: Method, segments: &[&str]) -> Result<T> {
        let response = self.send::<()>(method, segments, &[], None).await?;
        Ok(response.json().await?)
    }

    pub async fn json_with_body<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        let response = self.send(method, segments, &[], Some(body)).await?;
        Ok(response.json().await?)
    }

    /// Sends a request whose response body carries nothing the console uses.
    pub async fn empty(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<()> {
        self.send::<()>(method, segments, query, None).await?;
        Ok(())
    }
}

async fn check_status(path: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let path = path.to_string();
    Err(match status {
        StatusCode::NOT_FOUND => ConsoleError::NotFoundError { path },
        StatusCode::CONFLICT => ConsoleError::ConflictError { path },
        StatusCode::BAD_REQUEST => ConsoleError::BadRequestError { path, body },
        other => ConsoleError::ApiError {
            status: other.as_u16(),
            path,
            body,
        },
    })
}
