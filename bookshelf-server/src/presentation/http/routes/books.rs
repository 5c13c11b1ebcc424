use axum::Router;
use axum::middleware;
use axum::routing::get;

use crate::presentation::AppState;
use crate::presentation::http::handlers::books::{create_book, list_books};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

/// Every books route sits behind the auth guard.
pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
