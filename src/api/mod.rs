use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::model::{
    ClientSummary, Deliverable, PublishingStats, PublishingTask, RecordId, Submission,
};

pub mod model;

pub use model::{AssetStatusPatch, CalendarResponse, SubmissionPatch};

/// Shown when the backend fails without a `detail` message.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to reach backend: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("invalid backend response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Text suitable for showing to the user: the backend detail verbatim,
    /// otherwise a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Backend surface consumed by the dashboard pages.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn fetch_calendar(&self, year: i32, month: u32) -> Result<Vec<Submission>, ApiError>;

    async fn fetch_deliverables(&self) -> Result<Vec<Deliverable>, ApiError>;

    async fn fetch_publishing_tasks(
        &self,
        client_id: Option<RecordId>,
    ) -> Result<Vec<PublishingTask>, ApiError>;

    async fn fetch_publishing_stats(
        &self,
        client_id: Option<RecordId>,
    ) -> Result<PublishingStats, ApiError>;

    async fn fetch_clients(&self) -> Result<Vec<ClientSummary>, ApiError>;

    /// Returns whatever fields the backend echoes back (may be empty).
    async fn patch_submission(
        &self,
        id: RecordId,
        patch: &SubmissionPatch,
    ) -> Result<SubmissionPatch, ApiError>;

    async fn patch_asset_status(
        &self,
        id: RecordId,
        patch: &AssetStatusPatch,
    ) -> Result<AssetStatusPatch, ApiError>;
}

/// reqwest-backed [`DashboardApi`].
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, token: String, timeout: Duration) -> Result<Self, ApiError> {
        // Url::join drops the last path segment unless it ends with '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let http = Client::builder()
            .user_agent(concat!("content-dash/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ApiError> {
        Self::new(
            &cfg.api.base_url,
            cfg.api.token.clone(),
            Duration::from_secs(cfg.api.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Build an authenticated request; `body` is sent as JSON when present.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<reqwest::Request, ApiError> {
        let url = self.endpoint(path, query)?;
        let mut builder = self
            .http
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Ok(builder.build()?)
    }

    async fn execute<T: DeserializeOwned>(&self, request: reqwest::Request) -> Result<T, ApiError> {
        debug!(method = %request.method(), url = %request.url(), "sending backend request");
        let res = self.http.execute(request).await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let detail = extract_detail(&body);
            warn!(%status, detail = detail.as_deref().unwrap_or(""), "backend request failed");
            return Err(ApiError::Status { status, detail });
        }
        decode_body(&body)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self.build_request(Method::GET, path, query, None)?;
        self.execute(request).await
    }

    async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        let request = self.build_request(Method::PATCH, path, &[], Some(&body))?;
        self.execute(request).await
    }
}

fn client_query(client_id: Option<RecordId>) -> Vec<(&'static str, String)> {
    client_id
        .map(|id| vec![("clientId", id.to_string())])
        .unwrap_or_default()
}

/// Decode a success body. An empty body (e.g. 204) decodes as JSON `null`,
/// so callers that tolerate it ask for an `Option<T>`.
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    if body.trim().is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_str(body)?)
}

/// Pull `detail` out of an error body. Non-string details (validation error
/// lists) are rendered as compact JSON.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl DashboardApi for ApiClient {
    #[instrument(skip(self))]
    async fn fetch_calendar(&self, year: i32, month: u32) -> Result<Vec<Submission>, ApiError> {
        let query = [("year", year.to_string()), ("month", month.to_string())];
        let resp: CalendarResponse = self.get("api/calendar", &query).await?;
        Ok(resp.submissions)
    }

    #[instrument(skip(self))]
    async fn fetch_deliverables(&self) -> Result<Vec<Deliverable>, ApiError> {
        self.get("api/deliverables", &[]).await
    }

    #[instrument(skip(self))]
    async fn fetch_publishing_tasks(
        &self,
        client_id: Option<RecordId>,
    ) -> Result<Vec<PublishingTask>, ApiError> {
        self.get("api/publishing-tasks", &client_query(client_id))
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_publishing_stats(
        &self,
        client_id: Option<RecordId>,
    ) -> Result<PublishingStats, ApiError> {
        self.get("api/publishing-stats", &client_query(client_id))
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_clients(&self) -> Result<Vec<ClientSummary>, ApiError> {
        self.get("api/admin/clients", &[]).await
    }

    #[instrument(skip(self))]
    async fn patch_submission(
        &self,
        id: RecordId,
        patch: &SubmissionPatch,
    ) -> Result<SubmissionPatch, ApiError> {
        let echoed: Option<SubmissionPatch> = self
            .patch(&format!("api/submissions/{}", id), patch)
            .await?;
        Ok(echoed.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn patch_asset_status(
        &self,
        id: RecordId,
        patch: &AssetStatusPatch,
    ) -> Result<AssetStatusPatch, ApiError> {
        let echoed: Option<AssetStatusPatch> = self
            .patch(&format!("api/assets/{}/status", id), patch)
            .await?;
        Ok(echoed.unwrap_or_default())
    }
}
