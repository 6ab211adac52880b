//! Shared HTTP context, error types, and response classification for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::cli::Cli;

pub(crate) const HEADER_APP_KEY: &str = "X-App-Key";
pub(crate) const HEADER_USER_KEY: &str = "X-User-Key";
pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type to distinguish validation from operational failures.
///
/// The split drives message construction only; the process exit code does not
/// differentiate between the two.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) org_id: String,
    pub(crate) app_key: Option<String>,
    pub(crate) user_key: Option<String>,
}

impl AppContext {
    /// Construct the HTTP client and credential context for one invocation.
    pub(crate) fn from_cli(cli: &Cli, org_id: String) -> CliResult<Self> {
        let request_id = Uuid::new_v4().to_string();
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(&request_id).map_err(|_| {
            CliError::failure(anyhow!("request identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let client = Client::builder()
            .timeout(Duration::from_secs(cli.timeout))
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: cli.api_url.clone(),
            org_id,
            app_key: cli.api_key.clone(),
            user_key: cli.user_key.clone(),
        })
    }

    /// Attach whichever API credentials were supplied to an outgoing request.
    ///
    /// Missing keys do not block the request; the server's 401 is surfaced
    /// through [`classify_problem`].
    pub(crate) fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.app_key {
            Some(key) => request.header(HEADER_APP_KEY, key.as_str()),
            None => request,
        };
        match &self.user_key {
            Some(key) => request.header(HEADER_USER_KEY, key.as_str()),
            None => request,
        }
    }
}

/// Parse the API base URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<Value>,
}

/// Classify an HTTP error response into a CLI error.
///
/// Request-shaped rejections (400/409/422) become validation errors carrying
/// the API's own message; everything else is an operational failure.
pub(crate) async fn classify_problem(response: reqwest::Response) -> CliError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();

    let body_text = String::from_utf8_lossy(&bytes).to_string();
    let body = serde_json::from_slice::<ApiErrorBody>(&bytes).ok();

    let message = body
        .as_ref()
        .and_then(|b| b.error.clone())
        .or_else(|| body.as_ref().and_then(|b| b.errors.as_ref()).map(render_errors))
        .unwrap_or_else(|| body_text.trim().to_string());

    if matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY
    ) {
        if message.is_empty() {
            CliError::validation(format!("request rejected with status {status}"))
        } else {
            CliError::validation(message)
        }
    } else if message.is_empty() {
        CliError::failure(anyhow!("request failed with status {status}"))
    } else {
        CliError::failure(anyhow!("{message} (status {status})"))
    }
}

fn render_errors(errors: &Value) -> String {
    match errors {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}
