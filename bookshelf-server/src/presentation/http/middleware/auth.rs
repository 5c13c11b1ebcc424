use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::domain::error::AuthError;
use crate::domain::user::User;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// The caller resolved by `jwt_auth_middleware`.
#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedUser {
    pub(crate) user: User,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Auth(AuthError::NoToken))
    }
}

pub(crate) async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = match bearer_token(request.headers()) {
        Some(token) => state.auth_service.authenticate(token).await,
        None => Err(AuthError::NoToken),
    }
    .inspect_err(|reason| {
        warn!(
            reason = ?reason,
            method = %request.method(),
            path = %request.uri().path(),
            "request rejected by auth guard"
        );
    })?;

    request.extensions_mut().insert(AuthenticatedUser { user });

    Ok(next.run(request).await)
}

/// Single `Authorization` value with the literal `Bearer ` prefix stripped.
/// Header names are matched case-insensitively by `HeaderMap`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{HeaderMap, HeaderName, HeaderValue, Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::bearer_token;
    use crate::presentation::test_support::{TestApp, read_json};

    #[test]
    fn bearer_token_requires_exact_prefix() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[test]
    fn bearer_token_header_name_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        let name = HeaderName::from_bytes(b"AUTHORIZATION").expect("valid header name");
        headers.insert(name, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));
    }

    async fn get_books(app: &TestApp, authorization: Option<&str>) -> StatusCode {
        let mut builder = Request::builder().uri("/api/books");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = builder.body(Body::empty()).expect("request");
        app.router()
            .oneshot(request)
            .await
            .expect("router must respond")
            .status()
    }

    #[tokio::test]
    async fn missing_or_malformed_header_is_rejected_without_lookup() {
        let app = TestApp::with_user();

        assert_eq!(get_books(&app, None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(get_books(&app, Some("Token abc")).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_books(&app, Some(&format!("bearer {}", app.valid_token()))).await,
            StatusCode::UNAUTHORIZED
        );

        assert_eq!(app.user_lookups(), 0);
        assert_eq!(app.list_calls(), 0);
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_before_user_lookup() {
        let app = TestApp::with_user();
        let foreign = app.foreign_token();

        assert_eq!(
            get_books(&app, Some(&format!("Bearer {foreign}"))).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_books(&app, Some("Bearer not.a.jwt")).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(app.user_lookups(), 0);
        assert_eq!(app.list_calls(), 0);
    }

    #[tokio::test]
    async fn token_for_unknown_user_is_rejected() {
        let app = TestApp::without_user();
        let token = app.valid_token();

        assert_eq!(
            get_books(&app, Some(&format!("Bearer {token}"))).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(app.user_lookups(), 1);
        assert_eq!(app.list_calls(), 0);
    }

    #[tokio::test]
    async fn user_store_failure_is_reported_as_unauthorized() {
        let app = TestApp::with_broken_user_store();
        let token = app.valid_token();

        let request = Request::builder()
            .uri("/api/books")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request");
        let response = app.router().oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(response).await;
        assert_eq!(body["message"], "Token is not valid");
    }

    #[tokio::test]
    async fn valid_token_runs_handler_exactly_once() {
        let app = TestApp::with_user();
        let token = app.valid_token();

        assert_eq!(
            get_books(&app, Some(&format!("Bearer {token}"))).await,
            StatusCode::OK
        );
        assert_eq!(app.user_lookups(), 1);
        assert_eq!(app.list_calls(), 1);
    }
}
