pub mod auth;
pub mod models;
pub mod prompts;
pub mod run;
pub mod test_cases;
pub mod versions;

pub use models::*;

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};

const USER_AGENT: &str = "promptdeck";

/// Errors from backend calls.
///
/// `Unauthorized` means the stored credential is missing or rejected; the
/// caller should send the user through the login flow rather than retry.
/// `NotFound` on `/versions/current/{id}` is the normal "no version yet"
/// signal, not a failure.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("not authenticated — run `promptdeck login` first")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP client for the prompt backend. One instance per process; attaches
/// the bearer credential to every request when one is loaded.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("User-Agent", USER_AGENT);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.url(path)))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.post(self.url(path)))
    }

    pub(crate) fn patch(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.patch(self.url(path)))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.delete(self.url(path)))
    }

    /// Map non-2xx responses into the error taxonomy. `resource` names what
    /// was being fetched so NotFound errors read sensibly.
    pub(crate) async fn check(resp: Response, resource: &str) -> ApiResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = detail_from_body(&body).unwrap_or(body);
        tracing::debug!(%status, resource, detail = %message, "backend request failed");
        if status == StatusCode::NOT_FOUND {
            let what = if message.is_empty() {
                resource.to_string()
            } else {
                message
            };
            return Err(ApiError::NotFound(what));
        }
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Extract the `detail` field from a FastAPI-style error body, if present.
fn detail_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .map(String::from)
}
