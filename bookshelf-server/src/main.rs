use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use secrecy::ExposeSecret;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::auth_service::AuthService;
use application::book_service::BookService;
use data::repositories::postgres::book_repository::PostgresBookRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use infrastructure::cloudinary::CloudinaryImageHost;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::{AppState, SharedBookRepository, SharedImageHost, SharedUserRepository};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(settings.database_url()).await?;
    run_migrations(&pool).await?;

    let jwt = JwtService::new(
        settings.jwt_secret.expose_secret(),
        settings.jwt_ttl_seconds,
    );

    let user_repo: SharedUserRepository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let book_repo: SharedBookRepository = Arc::new(PostgresBookRepository::new(pool));
    let image_host: SharedImageHost = Arc::new(CloudinaryImageHost::new(
        &settings.cloudinary,
        Duration::from_secs(settings.http_request_timeout_secs),
    )?);

    let state = AppState::new(
        Arc::new(AuthService::new(user_repo, jwt)),
        Arc::new(BookService::new(book_repo, image_host)),
    );

    server::run_http(&settings, state).await
}
