use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::book_repository::{BookRepository, NewBook, Pagination};
use crate::domain::book::Book;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    caption: String,
    rating: i16,
    image: String,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn create_book(&self, input: NewBook) -> Result<Book, DomainError> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            INSERT INTO books (title, caption, rating, image, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, caption, rating, image, user_id, created_at, updated_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.caption)
        .bind(input.rating)
        .bind(&input.image)
        .bind(input.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_book_db_error)?;

        map_row_to_book(row)
    }

    async fn list_books(&self, pagination: Pagination) -> Result<Vec<Book>, DomainError> {
        let limit = pagination.page_size as i64;
        let offset = (pagination.page.saturating_sub(1) as i64) * limit;

        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT
                id,
                title,
                caption,
                rating,
                image,
                user_id,
                created_at,
                updated_at
            FROM books
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_book_db_error)?;

        rows.into_iter().map(map_row_to_book).collect()
    }

    async fn total_books(&self) -> Result<i64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM books
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_book_db_error)?;

        Ok(count)
    }
}

fn map_row_to_book(row: BookRow) -> Result<Book, DomainError> {
    Book::new(
        row.id,
        row.title,
        row.caption,
        row.rating,
        row.image,
        row.user_id,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_book_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::NotFound("user".to_string());
    }
    DomainError::Persistence(err.to_string())
}
