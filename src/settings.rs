use digest_api::client::ESPN_SITE_V2;
use digest_api::generate::{DEFAULT_MODEL, GEMINI_API};
use log::warn;
use std::time::Duration;

const DEFAULT_SCOREBOARD_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_GEMINI_TIMEOUT: Duration = Duration::from_secs(120);

/// Process configuration, read once at startup and passed down by reference.
#[derive(Clone)]
pub struct Settings {
    /// `None` is not fatal: the summary step reports it instead of a recap.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_url: String,
    pub gemini_timeout: Duration,
    pub scoreboard_url: String,
    pub scoreboard_timeout: Duration,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_url", &self.gemini_url)
            .field("gemini_timeout", &self.gemini_timeout)
            .field("scoreboard_url", &self.scoreboard_url)
            .field("scoreboard_timeout", &self.scoreboard_timeout)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Read from the process environment (after `.env` has been applied).
    pub fn load() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        let seconds = |name: &str, default: Duration| match value(name) {
            None => default,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!("ignoring {name}={raw:?}, using {}s", default.as_secs());
                    default
                }
            },
        };

        Self {
            gemini_api_key: value("GEMINI_API_KEY"),
            gemini_model: value("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            gemini_url: value("GEMINI_API_URL").unwrap_or_else(|| GEMINI_API.to_owned()),
            gemini_timeout: seconds("GEMINI_TIMEOUT_SECS", DEFAULT_GEMINI_TIMEOUT),
            scoreboard_url: value("SCOREBOARD_API_URL").unwrap_or_else(|| ESPN_SITE_V2.to_owned()),
            scoreboard_timeout: seconds("SCOREBOARD_TIMEOUT_SECS", DEFAULT_SCOREBOARD_TIMEOUT),
        }
    }
}
