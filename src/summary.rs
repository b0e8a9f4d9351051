use crate::aggregator::Report;
use crate::prompt;
use crate::settings::Settings;
use digest_api::client::{ApiError, ApiResult};
use digest_api::generate::GeminiApi;
use log::{debug, warn};

pub const MISSING_KEY: &str = "Erro: GEMINI_API_KEY não encontrada nas variáveis de ambiente";
pub const GENERATION_ERROR: &str = "Erro ao gerar texto: ";

/// Turns a report into the recap text. Always answers with *some* text:
/// failures come back as a printable error line instead of a summary.
pub struct SummaryGenerator<'a> {
    settings: &'a Settings,
    api: GeminiApi,
}

impl<'a> SummaryGenerator<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        let api = GeminiApi::new(
            &settings.gemini_url,
            &settings.gemini_model,
            settings.gemini_timeout,
        );
        Self { settings, api }
    }

    pub async fn summarize(&self, report: &Report) -> String {
        let Some(api_key) = self.settings.gemini_api_key.as_deref() else {
            warn!("GEMINI_API_KEY is not set, skipping generation");
            return MISSING_KEY.to_owned();
        };

        match self.generate(api_key, report).await {
            Ok(text) => text,
            Err(e) => {
                warn!("generation failed: {e}");
                format!("{GENERATION_ERROR}{e}")
            }
        }
    }

    async fn generate(&self, api_key: &str, report: &Report) -> ApiResult<String> {
        let prompt = prompt::build(report).map_err(|e| ApiError::Other(e.to_string()))?;
        debug!("requesting summary from {}", self.settings.gemini_model);
        self.api.generate_text(api_key, &prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_api::{DateKey, DayScores, League};
    use chrono::NaiveDate;
    use mockito::Matcher;
    use serde_json::json;

    const STREAM_PATH: &str = "/v1beta/models/test-model:streamGenerateContent";

    fn settings(url: &str, key: Option<&str>) -> Settings {
        Settings {
            gemini_api_key: key.map(str::to_owned),
            gemini_model: "test-model".into(),
            gemini_url: url.into(),
            ..Settings::default()
        }
    }

    fn report() -> Report {
        let day = |d| {
            let mut scores =
                DayScores::new(DateKey::from_date(NaiveDate::from_ymd_opt(2024, 3, d).unwrap()));
            for league in League::ALL {
                scores.insert(league, Ok(json!({"events": []})));
            }
            scores
        };
        Report { today: day(15), yesterday: day(14), summary: String::new() }
    }

    fn event(text: &str) -> String {
        let payload = json!({"candidates": [{"content": {"parts": [{"text": text}]}}]});
        format!("data: {payload}\n\n")
    }

    #[tokio::test]
    async fn missing_key_short_circuits() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let settings = settings(&server.url(), None);
        let text = SummaryGenerator::new(&settings).summarize(&report()).await;

        assert_eq!(text, "Erro: GEMINI_API_KEY não encontrada nas variáveis de ambiente");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn streamed_fragments_become_the_summary() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", STREAM_PATH)
            .match_query(Matcher::UrlEncoded("alt".into(), "sse".into()))
            .match_header("x-goog-api-key", "k-123")
            .match_body(Matcher::Regex(r#"\\"hoje\\":\{\\"mlb\\""#.into()))
            .with_status(200)
            .with_body(format!("{}{}", event("Olá Gabriel! "), event("Tudo certo?")))
            .expect(1)
            .create_async()
            .await;

        let settings = settings(&server.url(), Some("k-123"));
        let text = SummaryGenerator::new(&settings).summarize(&report()).await;

        assert_eq!(text, "Olá Gabriel! Tudo certo?");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn mid_stream_failure_becomes_error_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", STREAM_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(format!("{}data: {{truncated\n\n", event("Olá ")))
            .create_async()
            .await;

        let settings = settings(&server.url(), Some("k"));
        let text = SummaryGenerator::new(&settings).summarize(&report()).await;

        assert!(text.starts_with(GENERATION_ERROR), "{text}");
        assert!(text.contains("Parse error"), "{text}");
        assert!(!text.contains("Olá"));
    }

    #[tokio::test]
    async fn rejected_key_becomes_error_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", STREAM_PATH)
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"Permission denied.","status":"PERMISSION_DENIED"}}"#)
            .create_async()
            .await;

        let settings = settings(&server.url(), Some("k"));
        let text = SummaryGenerator::new(&settings).summarize(&report()).await;

        assert_eq!(
            text,
            "Erro ao gerar texto: HTTP 403 Forbidden: PERMISSION_DENIED: Permission denied."
        );
    }
}
