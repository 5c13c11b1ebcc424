use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::book::Book;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct NewBook {
    pub(crate) title: String,
    pub(crate) caption: String,
    pub(crate) rating: i16,
    pub(crate) image: String,
    pub(crate) user_id: i64,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Pagination {
    pub(crate) page: u32,
    pub(crate) page_size: u32,
}

#[async_trait]
pub(crate) trait BookRepository: Send + Sync {
    async fn create_book(&self, input: NewBook) -> Result<Book, DomainError>;
    async fn list_books(&self, pagination: Pagination) -> Result<Vec<Book>, DomainError>;
    async fn total_books(&self) -> Result<i64, DomainError>;
}

#[async_trait]
impl<T: BookRepository + ?Sized> BookRepository for Arc<T> {
    async fn create_book(&self, input: NewBook) -> Result<Book, DomainError> {
        (**self).create_book(input).await
    }

    async fn list_books(&self, pagination: Pagination) -> Result<Vec<Book>, DomainError> {
        (**self).list_books(pagination).await
    }

    async fn total_books(&self) -> Result<i64, DomainError> {
        (**self).total_books().await
    }
}
