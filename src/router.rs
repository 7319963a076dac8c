use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::handlers::{self, AppState};

/// Public lead endpoint.
pub const LEAD_PATH: &str = "/api/wizzio-lead";

/// Form submissions are small; anything bigger is rejected before parsing.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Routes exposed to the browser. Callers may add per-route layers
/// (rate limiting) before passing them to [`assemble`].
pub fn lead_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            LEAD_PATH,
            post(handlers::wizzio_lead)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

/// Adds the health check and the shared layers (panic envelope, tracing, CORS).
pub fn assemble(state: Arc<AppState>, lead_routes: Router<Arc<AppState>>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(handlers::health))
        .merge(lead_routes)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handlers::panic_envelope))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Full router without rate limiting.
pub fn build_router(state: Arc<AppState>) -> Router {
    assemble(state, lead_routes())
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match config.cors_allowed_origin.as_deref() {
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!("Invalid CORS_ALLOWED_ORIGIN '{}', allowing any origin", origin);
                AllowOrigin::any()
            }
        },
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}
