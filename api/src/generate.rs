use crate::client::{ApiError, ApiResult, USER_AGENT};
use crate::gemini::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, SseDecoder};
use futures_util::stream::{self, Stream, StreamExt, TryStreamExt};
use log::debug;
use reqwest::Client;
use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

pub const GEMINI_API: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-04-17";

/// Text fragments in the order the model produced them. Finite and not
/// restartable; the first `Err` ends the useful part of the stream.
pub type TextStream = Pin<Box<dyn Stream<Item = ApiResult<String>> + Send>>;

/// Streaming client for Gemini's `streamGenerateContent`.
#[derive(Debug, Clone)]
pub struct GeminiApi {
    client: Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GeminiApi {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            model: model.to_owned(),
            timeout,
        }
    }

    pub fn stream_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        )
    }

    /// Send one user prompt and return the response as a fragment stream.
    ///
    /// Rejections that arrive before the stream starts (bad key, quota,
    /// unknown model) are returned here with the service's own message.
    pub async fn stream_text(&self, api_key: &str, prompt: &str) -> ApiResult<TextStream> {
        let url = self.stream_url();
        debug!("POST {url} ({} prompt bytes)", prompt.len());

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest::user_text(prompt))
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.clone()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(ErrorEnvelope { error: Some(err) }) => {
                    ApiError::Remote(format!("HTTP {status}: {}", err.describe()))
                }
                _ => ApiError::Status(status, url),
            });
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()));
        Ok(Box::pin(sse_fragments(body, url)))
    }

    /// Stream a completion and join it into one string.
    pub async fn generate_text(&self, api_key: &str, prompt: &str) -> ApiResult<String> {
        let fragments = self.stream_text(api_key, prompt).await?;
        collect_text(fragments).await
    }
}

/// Concatenate fragments in arrival order. Stops at the first error and
/// discards what was gathered so far.
pub async fn collect_text<S>(fragments: S) -> ApiResult<String>
where
    S: Stream<Item = ApiResult<String>>,
{
    fragments
        .try_fold(String::new(), |mut text, fragment| async move {
            text.push_str(&fragment);
            Ok(text)
        })
        .await
}

struct SseState<S> {
    body: Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    url: String,
    done: bool,
}

/// Turn a raw SSE byte stream into model text fragments.
fn sse_fragments<S>(body: S, url: String) -> impl Stream<Item = ApiResult<String>> + Send
where
    S: Stream<Item = reqwest::Result<Vec<u8>>> + Send,
{
    let state = SseState {
        body: Box::pin(body),
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        url,
        done: false,
    };

    stream::try_unfold(state, |mut state| async move {
        loop {
            if let Some(data) = state.pending.pop_front() {
                let event: GenerateContentResponse = serde_json::from_str(&data)
                    .map_err(|e| ApiError::Parsing(e.to_string(), state.url.clone()))?;
                if let Some(err) = event.error {
                    return Err(ApiError::Remote(err.describe()));
                }
                return Ok(Some((event.text(), state)));
            }
            if state.done {
                return Ok(None);
            }
            match state.body.next().await {
                Some(chunk) => {
                    let chunk = chunk.map_err(|e| ApiError::Network(e, state.url.clone()))?;
                    state.pending.extend(state.decoder.push(&chunk));
                }
                None => {
                    state.done = true;
                    state.pending.extend(state.decoder.finish());
                }
            }
        }
    })
}
