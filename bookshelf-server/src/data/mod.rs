pub(crate) mod book_repository;
pub(crate) mod image_host;
pub(crate) mod repositories;
pub(crate) mod user_repository;
