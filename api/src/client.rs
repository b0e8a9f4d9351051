use crate::{DateKey, League};
use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const ESPN_SITE_V2: &str = "https://site.api.espn.com/apis/site/v2/sports";
pub(crate) const USER_AGENT: &str = "morning-digest/0.1 (daily scoreboard recap)";

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Status(StatusCode, String),
    Parsing(String, String),
    /// Error reported by the remote service in its own response body.
    Remote(String),
    Other(String),
}

impl ApiError {
    /// HTTP status of a rejected request, if that's what went wrong.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status(status, _) => Some(*status),
            ApiError::Network(e, _) => e.status(),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Status(status, url) => write!(f, "HTTP {status} for {url}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Remote(msg) => write!(f, "{msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Client for ESPN's public per-league scoreboard endpoints.
#[derive(Debug, Clone)]
pub struct ScoreboardApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for ScoreboardApi {
    fn default() -> Self {
        Self::new(ESPN_SITE_V2, Duration::from_secs(10))
    }
}

impl ScoreboardApi {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout,
        }
    }

    pub fn scoreboard_url(&self, league: League, date: &DateKey) -> String {
        format!(
            "{}/{}/scoreboard?dates={date}",
            self.base_url,
            league.scoreboard_path()
        )
    }

    /// Fetch one league's scoreboard for one day. The body is returned
    /// untouched; only its JSON-ness is checked.
    pub async fn fetch_scoreboard(&self, league: League, date: &DateKey) -> ApiResult<Value> {
        let url = self.scoreboard_url(league, date);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status, url));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Parsing(e.to_string(), url))
    }
}
