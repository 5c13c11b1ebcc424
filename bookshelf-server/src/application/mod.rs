pub(crate) mod auth_service;
pub(crate) mod book_service;
pub(crate) mod password;
