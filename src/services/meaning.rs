use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::gemini::{self, GeminiClient, GeminiError, GenerateContentResponse};

/// Which prompt variant a lookup uses. A card lookup is brief; the detail
/// view asks for the long form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    Brief,
    Detailed,
}

#[derive(Debug, Error)]
pub enum MeaningError {
    #[error("API Error: {status}")]
    Upstream { status: u16, details: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("not configured: {0}")]
    NotConfigured(&'static str),
    #[error("empty response")]
    Empty,
}

impl From<GeminiError> for MeaningError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::HttpStatus { status, body } => Self::Upstream {
                status: status.as_u16(),
                details: body,
            },
            GeminiError::Request(e) => Self::Transport(e),
            GeminiError::Json(e) => Self::Decode(e.to_string()),
            GeminiError::NotConfigured(key) => Self::NotConfigured(key),
            GeminiError::Empty => Self::Empty,
        }
    }
}

/// The one capability the flashcard session needs. The Gemini client, the
/// proxy route, and the offline mock all satisfy it interchangeably.
#[allow(async_fn_in_trait)]
pub trait MeaningProvider {
    async fn generate_meaning(&self, word: &str, detail: Detail) -> Result<String, MeaningError>;
}

/// Talks to the generative-language API directly, server side.
#[derive(Clone)]
pub struct GeminiMeaningProvider {
    client: GeminiClient,
}

impl GeminiMeaningProvider {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    pub fn from_env() -> Self {
        Self::new(GeminiClient::from_env())
    }
}

impl MeaningProvider for GeminiMeaningProvider {
    async fn generate_meaning(&self, word: &str, detail: Detail) -> Result<String, MeaningError> {
        let prompt = match detail {
            Detail::Brief => gemini::brief_prompt(word),
            Detail::Detailed => gemini::detailed_prompt(word),
        };
        let value = self.client.generate(&prompt).await?;
        let response: GenerateContentResponse =
            serde_json::from_value(value).map_err(|e| MeaningError::Decode(e.to_string()))?;
        response
            .first_text()
            .map(str::to_string)
            .ok_or(MeaningError::Empty)
    }
}

#[derive(Debug, Serialize)]
struct ProxyRequestBody<'a> {
    word: &'a str,
    detailed: bool,
}

#[derive(Debug, Deserialize)]
struct ProxyErrorBody {
    error: String,
    details: Option<String>,
}

/// Goes through `POST /api/gemini-proxy`, so the credential stays on the
/// server.
#[derive(Clone)]
pub struct ProxyMeaningProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ProxyMeaningProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl MeaningProvider for ProxyMeaningProvider {
    async fn generate_meaning(&self, word: &str, detail: Detail) -> Result<String, MeaningError> {
        let url = format!("{}/api/gemini-proxy", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&ProxyRequestBody {
                word,
                detailed: matches!(detail, Detail::Detailed),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let details = match response.json::<ProxyErrorBody>().await {
                Ok(body) => body.details.unwrap_or(body.error),
                Err(_) => String::new(),
            };
            return Err(MeaningError::Upstream {
                status: status.as_u16(),
                details,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(MeaningError::Transport)?;
        body.first_text()
            .map(str::to_string)
            .ok_or(MeaningError::Empty)
    }
}

/// The fixed canned answer the original artifact shipped with. Keeps the
/// session usable offline and deterministic under test.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockMeaningProvider;

impl MeaningProvider for MockMeaningProvider {
    async fn generate_meaning(&self, word: &str, _detail: Detail) -> Result<String, MeaningError> {
        Ok(format!("{word}は、「テスト」や「挑戦」を意味する名詞・動詞です。"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_provider_embeds_the_word() {
        let meaning = MockMeaningProvider
            .generate_meaning("challenge", Detail::Brief)
            .await
            .unwrap();
        assert!(meaning.starts_with("challenge"));
    }

    #[test]
    fn gemini_errors_map_to_meaning_errors() {
        let err: MeaningError = GeminiError::HttpStatus {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            body: "quota".to_string(),
        }
        .into();
        match err {
            MeaningError::Upstream { status, details } => {
                assert_eq!(status, 429);
                assert_eq!(details, "quota");
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
