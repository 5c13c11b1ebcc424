use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::health::healthz;

pub(crate) mod auth;
pub(crate) mod books;

pub(crate) fn routes(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api/auth", auth::router())
        .nest("/api/books", books::router(state.clone()))
        .with_state(state)
}
