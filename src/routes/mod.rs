mod gemini_proxy;
mod health;

use axum::routing::post;
use axum::Router;

use crate::response::ProxyError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/gemini-proxy",
            post(gemini_proxy::handle).fallback(method_not_allowed),
        )
        .nest("/health", health::router())
        .fallback(fallback_handler)
        .with_state(state)
}

async fn method_not_allowed() -> ProxyError {
    ProxyError::method_not_allowed()
}

async fn fallback_handler() -> ProxyError {
    ProxyError::not_found()
}
