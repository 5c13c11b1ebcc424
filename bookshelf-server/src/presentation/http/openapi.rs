use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::handlers::auth::{AuthResponseDto, LoginDto, RegisterDto, UserDto};
use crate::presentation::http::handlers::books::{
    BookDto, BooksQuery, CreateBookDto, ListBooksResponseDto,
};
use crate::presentation::http::handlers::health::HealthzResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::health::healthz,
        crate::presentation::http::handlers::auth::register,
        crate::presentation::http::handlers::auth::login,
        crate::presentation::http::handlers::books::create_book,
        crate::presentation::http::handlers::books::list_books
    ),
    components(
        schemas(
            HealthzResponse,
            RegisterDto,
            LoginDto,
            AuthResponseDto,
            UserDto,
            CreateBookDto,
            BooksQuery,
            BookDto,
            ListBooksResponseDto
        )
    ),
    tags(
        (name = "health", description = "Liveness check"),
        (name = "auth", description = "Registration and login"),
        (name = "books", description = "Book recommendations")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn document_lists_books_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/books"));
        assert!(doc.paths.paths.contains_key("/api/auth/register"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
