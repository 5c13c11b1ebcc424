pub(crate) mod book_repository;
pub(crate) mod user_repository;
