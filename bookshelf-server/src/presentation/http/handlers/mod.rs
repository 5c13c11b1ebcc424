pub(crate) mod auth;
pub(crate) mod books;
pub(crate) mod health;
