pub(crate) mod book;
pub(crate) mod error;
pub(crate) mod image;
pub(crate) mod user;
