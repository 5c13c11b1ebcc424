pub(crate) mod cloudinary;
pub(crate) mod database;
pub(crate) mod jwt;
pub(crate) mod logging;
pub(crate) mod settings;
