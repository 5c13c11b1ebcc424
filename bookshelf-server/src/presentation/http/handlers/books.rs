use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::book_service::ListBooksResult;
use crate::domain::book::{Book, CreateBookRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

const DEFAULT_PAGE_SIZE: u32 = 5;

/// Submission body. Fields are optional at the wire level so that an absent
/// field yields "Please fill all fields" rather than a decoding error.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreateBookDto {
    #[validate(length(max = 255))]
    pub(crate) title: Option<String>,
    pub(crate) caption: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub(crate) rating: Option<i64>,
    /// `data:<mime>;base64,<payload>`
    pub(crate) image: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct BooksQuery {
    #[validate(range(min = 1))]
    pub(crate) page: Option<u32>,
    #[validate(range(min = 1, max = 50))]
    pub(crate) limit: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct BookDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) caption: String,
    pub(crate) rating: i16,
    pub(crate) image: String,
    pub(crate) user: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ListBooksResponseDto {
    pub(crate) books: Vec<BookDto>,
    pub(crate) current_page: u32,
    pub(crate) total_books: i64,
    pub(crate) total_pages: i64,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            caption: book.caption,
            rating: book.rating,
            image: book.image,
            user: book.user_id,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

impl From<ListBooksResult> for ListBooksResponseDto {
    fn from(result: ListBooksResult) -> Self {
        let total_pages = result.total_pages();
        Self {
            books: result.books.into_iter().map(BookDto::from).collect(),
            current_page: result.page,
            total_books: result.total,
            total_pages,
        }
    }
}

impl From<CreateBookDto> for CreateBookRequest {
    fn from(dto: CreateBookDto) -> Self {
        Self {
            title: dto.title,
            caption: dto.caption,
            rating: dto.rating,
            image: dto.image,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateBookDto,
    responses(
        (status = 201, description = "Book recommendation created", body = BookDto),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Image upload or persistence failed")
    )
)]
pub(crate) async fn create_book(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    payload: Result<Json<CreateBookDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<BookDto>)> {
    let Json(dto) = payload?;
    dto.validate()?;

    let result = state
        .book_service
        .create_book(auth.user.id, dto.into())
        .await?;
    Ok((StatusCode::CREATED, Json(BookDto::from(result))))
}

#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("page" = Option<u32>, Query, description = "Page number, starting at 1"),
        ("limit" = Option<u32>, Query, description = "Items per page (1..=50, default 5)")
    ),
    responses(
        (status = 200, description = "Books listed, newest first", body = ListBooksResponseDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_books(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    Query(query): Query<BooksQuery>,
) -> AppResult<(StatusCode, Json<ListBooksResponseDto>)> {
    query.validate()?;
    let page = query.page.unwrap_or(1);
    let page_size = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);

    let result = state.book_service.list_books(page, page_size).await?;

    Ok((StatusCode::OK, Json(ListBooksResponseDto::from(result))))
}
