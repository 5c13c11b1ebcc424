use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::book_service::BookService;
use crate::data::book_repository::BookRepository;
use crate::data::image_host::ImageHost;
use crate::data::user_repository::UserRepository;

pub(crate) mod http;

#[cfg(test)]
pub(crate) mod test_support;

pub(crate) type SharedUserRepository = Arc<dyn UserRepository>;
pub(crate) type SharedBookRepository = Arc<dyn BookRepository>;
pub(crate) type SharedImageHost = Arc<dyn ImageHost>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService<SharedUserRepository>>,
    pub(crate) book_service: Arc<BookService<SharedBookRepository, SharedImageHost>>,
}

impl AppState {
    pub(crate) fn new(
        auth_service: Arc<AuthService<SharedUserRepository>>,
        book_service: Arc<BookService<SharedBookRepository, SharedImageHost>>,
    ) -> Self {
        Self {
            auth_service,
            book_service,
        }
    }
}
