use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::post};

use crate::presentation::AppState;
use crate::presentation::http::handlers::auth::{login, register};

// credentials only, no images
const AUTH_BODY_LIMIT_BYTES: usize = 16 * 1024;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .layer(DefaultBodyLimit::max(AUTH_BODY_LIMIT_BYTES))
}
