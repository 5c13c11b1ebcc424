use tracing::{error, info};

use crate::data::book_repository::{BookRepository, NewBook, Pagination};
use crate::data::image_host::ImageHost;
use crate::domain::book::{Book, CreateBookRequest, validate_hosted_url};
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct ListBooksResult {
    pub(crate) books: Vec<Book>,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
    pub(crate) total: i64,
}

impl ListBooksResult {
    pub(crate) fn total_pages(&self) -> i64 {
        if self.page_size == 0 {
            return 0;
        }
        let page_size = i64::from(self.page_size);
        (self.total.max(0) + page_size - 1) / page_size
    }
}

pub(crate) struct BookService<R: BookRepository, H: ImageHost> {
    repo: R,
    images: H,
}

impl<R: BookRepository, H: ImageHost> BookService<R, H> {
    pub(crate) fn new(repo: R, images: H) -> Self {
        Self { repo, images }
    }

    /// Uploads the inline image, then stores the book pointing at the hosted
    /// URL. Nothing is stored when the upload fails. A failed insert after a
    /// successful upload leaves the hosted image behind.
    pub(crate) async fn create_book(
        &self,
        user_id: i64,
        req: CreateBookRequest,
    ) -> Result<Book, DomainError> {
        let req = req.validate()?;

        let uploaded = self.images.upload(&req.image).await.map_err(|err| match err {
            DomainError::Upload(_) => err,
            other => DomainError::Upload(other.to_string()),
        })?;
        let image = validate_hosted_url(&uploaded.secure_url).map_err(|err| {
            error!(
                error = %err,
                public_id = %uploaded.public_id,
                "image host returned a non-http(s) url"
            );
            DomainError::Upload(err.to_string())
        })?;

        let new_book = NewBook {
            title: req.title,
            caption: req.caption,
            rating: req.rating,
            image,
            user_id,
        };

        match self.repo.create_book(new_book).await {
            Ok(book) => {
                info!(book_id = book.id, user_id, "book recommendation created");
                Ok(book)
            }
            Err(err) => {
                error!(
                    error = %err,
                    orphaned_image = %uploaded.public_id,
                    user_id,
                    "failed to persist book after image upload"
                );
                Err(match err {
                    DomainError::Persistence(_) => err,
                    other => DomainError::Persistence(other.to_string()),
                })
            }
        }
    }

    pub(crate) async fn list_books(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<ListBooksResult, DomainError> {
        let pagination = Pagination { page, page_size };
        let books = self.repo.list_books(pagination).await?;
        let total = self.repo.total_books().await?;

        Ok(ListBooksResult {
            books,
            page,
            page_size,
            total,
        })
    }
}
