use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::response::ProxyError;
use crate::services::gemini::{self, GeminiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ProxyRequest {
    word: String,
    #[serde(default)]
    detailed: bool,
}

/// One pass-through call to the generative-language API with the
/// server-held key injected. The credential check happens before any
/// upstream traffic; a non-2xx upstream status is relayed as-is with the
/// raw upstream body as `details`.
pub async fn handle(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let request: ProxyRequest =
        serde_json::from_slice(&body).map_err(|e| ProxyError::internal(e.to_string()))?;

    let client = state.gemini();
    if !client.is_available() {
        return Err(ProxyError::missing_credential());
    }

    let prompt = if request.detailed {
        gemini::detailed_prompt(&request.word)
    } else {
        gemini::brief_prompt(&request.word)
    };

    match client.generate(&prompt).await {
        Ok(upstream) => Ok(Json(upstream).into_response()),
        Err(GeminiError::HttpStatus { status, body }) => {
            tracing::warn!(%status, word = %request.word, "upstream rejected generate request");
            Err(ProxyError::upstream(status.as_u16(), body))
        }
        Err(err) => {
            tracing::error!(error = %err, word = %request.word, "proxy request failed");
            Err(ProxyError::internal(err.to_string()))
        }
    }
}
