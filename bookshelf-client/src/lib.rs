//! Клиентская библиотека для `bookshelf-server`.
//!
//! `BookshelfClient` держит сессию (JWT + пользователь), поднимает её из
//! `SessionStore` при старте и подставляет токен в защищённые запросы.
//! Модуль `image` отвечает за выбор обложки и кодирование в base64,
//! `form` за локальную проверку новой рекомендации.
#![warn(missing_docs)]

mod error;
mod form;
mod http_client;
mod image;
mod models;
mod session;

pub use error::{ClientError, ClientResult};
pub use form::{CreateBookForm, DEFAULT_RATING};
pub use image::{
    FsMediaLibrary, MediaLibrary, PickedImage, Platform, SelectedImage, acquire_image,
    encode_file,
};
pub use models::{AuthResponse, Book, ListBooksResponse, User};
pub use session::{FileSessionStore, Session, SessionStore};

use http_client::HttpClient;
use tracing::info;

/// Размер страницы ленты по умолчанию.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Клиент REST API с явной сессией.
pub struct BookshelfClient {
    http: HttpClient,
    store: Box<dyn SessionStore>,
    session: Option<Session>,
}

impl BookshelfClient {
    /// Создаёт клиент и восстанавливает сохранённую сессию.
    pub async fn connect(
        base_url: impl Into<String>,
        store: impl SessionStore + 'static,
    ) -> ClientResult<Self> {
        let http = HttpClient::new(base_url)?;
        let session = store.load().await?;

        Ok(Self {
            http,
            store: Box::new(store),
            session,
        })
    }

    /// Текущая сессия, если пользователь вошёл.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Регистрирует пользователя и сохраняет сессию.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<AuthResponse> {
        let result = self.http.register(username, email, password).await?;
        self.remember(&result).await?;
        Ok(result)
    }

    /// Выполняет вход и сохраняет сессию.
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let result = self.http.login(email, password).await?;
        self.remember(&result).await?;
        Ok(result)
    }

    /// Забывает токен и пользователя, в том числе в хранилище.
    pub async fn logout(&mut self) -> ClientResult<()> {
        self.session = None;
        self.store.clear().await
    }

    /// Отправляет рекомендацию из формы.
    ///
    /// Неполная форма отклоняется без обращения к сети. Ошибка сервера
    /// возвращается с его текстом без изменений, форма при этом не
    /// сбрасывается. После успеха форма возвращается к значениям по
    /// умолчанию.
    pub async fn submit_book(&self, form: &mut CreateBookForm) -> ClientResult<Book> {
        let payload = form.to_payload()?;
        let token = self.require_token()?;

        let book = self.http.create_book(token, &payload).await?;
        info!(book_id = book.id, "book recommendation shared");

        form.reset();
        Ok(book)
    }

    /// Возвращает страницу ленты, новые записи первыми.
    pub async fn list_books(&self, page: u32, limit: u32) -> ClientResult<ListBooksResponse> {
        let token = self.require_token()?;
        self.http.list_books(token, page, limit).await
    }

    async fn remember(&mut self, auth: &AuthResponse) -> ClientResult<()> {
        let session = Session {
            token: auth.token.clone(),
            user: auth.user.clone(),
        };
        self.store.save(&session).await?;
        self.session = Some(session);
        Ok(())
    }

    fn require_token(&self) -> ClientResult<&str> {
        self.session
            .as_ref()
            .map(|session| session.token.as_str())
            .ok_or(ClientError::Unauthorized)
    }
}
