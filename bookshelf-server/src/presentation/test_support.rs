//! Router harness with in-memory collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, header},
    response::Response,
};
use chrono::Utc;
use serde_json::Value;

use crate::application::auth_service::AuthService;
use crate::application::book_service::BookService;
use crate::data::book_repository::{BookRepository, NewBook, Pagination};
use crate::data::image_host::ImageHost;
use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::book::Book;
use crate::domain::error::DomainError;
use crate::domain::image::{DataUrl, UploadedImage};
use crate::domain::user::User;
use crate::infrastructure::jwt::JwtService;
use crate::presentation::AppState;
use crate::presentation::http::routes::routes;

pub(crate) const TEST_USER_ID: i64 = 42;
pub(crate) const STUB_IMAGE_URL: &str = "https://res.cloudinary.test/demo/image/upload/v1/books/cover.jpg";

const JWT_SECRET: &str = "0123456789abcdef0123456789abcdef";
const FOREIGN_SECRET: &str = "fedcba9876543210fedcba9876543210";
const JWT_TTL_SECONDS: i64 = 3600;

#[derive(Clone, Copy)]
enum UserStoreMode {
    Present,
    Absent,
    Broken,
}

struct FakeUserRepo {
    mode: UserStoreMode,
    lookups: AtomicUsize,
}

#[async_trait]
impl UserRepository for FakeUserRepo {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        User::new(
            TEST_USER_ID + 1,
            input.username,
            input.email,
            input.profile_image,
            Utc::now(),
        )
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<UserCredentials>, DomainError> {
        Ok(None)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            UserStoreMode::Present if id == TEST_USER_ID => Ok(Some(test_user()?)),
            UserStoreMode::Present | UserStoreMode::Absent => Ok(None),
            UserStoreMode::Broken => Err(DomainError::Persistence("pool timed out".to_string())),
        }
    }
}

#[derive(Default)]
struct FakeBookRepo {
    fail_create: bool,
    created: Mutex<Vec<NewBook>>,
    list_calls: AtomicUsize,
}

#[async_trait]
impl BookRepository for FakeBookRepo {
    async fn create_book(&self, input: NewBook) -> Result<Book, DomainError> {
        self.created.lock().expect("lock").push(input.clone());
        if self.fail_create {
            return Err(DomainError::Persistence("insert failed".to_string()));
        }
        let now = Utc::now();
        Book::new(
            7,
            input.title,
            input.caption,
            input.rating,
            input.image,
            input.user_id,
            now,
            now,
        )
    }

    async fn list_books(&self, _pagination: Pagination) -> Result<Vec<Book>, DomainError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn total_books(&self) -> Result<i64, DomainError> {
        Ok(0)
    }
}

#[derive(Default)]
struct FakeImageHost {
    fail: bool,
    uploads: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(&self, image: &DataUrl) -> Result<UploadedImage, DomainError> {
        self.uploads.lock().expect("lock").push(image.to_string());
        if self.fail {
            return Err(DomainError::Upload("host returned 502".to_string()));
        }
        Ok(UploadedImage {
            secure_url: STUB_IMAGE_URL.to_string(),
            public_id: "books/cover".to_string(),
        })
    }
}

pub(crate) struct TestApp {
    users: Arc<FakeUserRepo>,
    books: Arc<FakeBookRepo>,
    images: Arc<FakeImageHost>,
}

impl TestApp {
    fn build(mode: UserStoreMode) -> Self {
        Self {
            users: Arc::new(FakeUserRepo {
                mode,
                lookups: AtomicUsize::new(0),
            }),
            books: Arc::new(FakeBookRepo::default()),
            images: Arc::new(FakeImageHost::default()),
        }
    }

    pub(crate) fn with_user() -> Self {
        Self::build(UserStoreMode::Present)
    }

    pub(crate) fn without_user() -> Self {
        Self::build(UserStoreMode::Absent)
    }

    pub(crate) fn with_broken_user_store() -> Self {
        Self::build(UserStoreMode::Broken)
    }

    pub(crate) fn failing_uploads(mut self) -> Self {
        self.images = Arc::new(FakeImageHost {
            fail: true,
            ..FakeImageHost::default()
        });
        self
    }

    pub(crate) fn failing_inserts(mut self) -> Self {
        self.books = Arc::new(FakeBookRepo {
            fail_create: true,
            ..FakeBookRepo::default()
        });
        self
    }

    pub(crate) fn router(&self) -> Router {
        let auth_service = AuthService::new(
            self.users.clone() as Arc<dyn UserRepository>,
            JwtService::new(JWT_SECRET, JWT_TTL_SECONDS),
        );
        let book_service = BookService::new(
            self.books.clone() as Arc<dyn BookRepository>,
            self.images.clone() as Arc<dyn ImageHost>,
        );
        routes(AppState::new(Arc::new(auth_service), Arc::new(book_service)))
    }

    pub(crate) fn valid_token(&self) -> String {
        JwtService::new(JWT_SECRET, JWT_TTL_SECONDS)
            .generate_token(TEST_USER_ID)
            .expect("token")
    }

    pub(crate) fn foreign_token(&self) -> String {
        JwtService::new(FOREIGN_SECRET, JWT_TTL_SECONDS)
            .generate_token(TEST_USER_ID)
            .expect("token")
    }

    pub(crate) fn user_lookups(&self) -> usize {
        self.users.lookups.load(Ordering::SeqCst)
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.books.list_calls.load(Ordering::SeqCst)
    }

    /// Data URLs handed to the image host, in call order.
    pub(crate) fn uploaded(&self) -> Vec<String> {
        self.images.uploads.lock().expect("lock").clone()
    }

    /// Image URLs of successfully stored books.
    pub(crate) fn persisted_images(&self) -> Vec<String> {
        if self.books.fail_create {
            return Vec::new();
        }
        self.books
            .created
            .lock()
            .expect("lock")
            .iter()
            .map(|book| book.image.clone())
            .collect()
    }
}

fn test_user() -> Result<User, DomainError> {
    User::new(
        TEST_USER_ID,
        "book_lover",
        "reader@example.com",
        "https://api.dicebear.com/7.x/avataaars/svg?seed=book_lover",
        Utc::now(),
    )
}

pub(crate) fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = if body.is_null() {
        Body::empty()
    } else {
        Body::from(body.to_string())
    };
    builder.body(body).expect("request")
}

pub(crate) async fn read_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
