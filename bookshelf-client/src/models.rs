use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Публичная модель пользователя.
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Логин.
    pub username: String,
    /// Email.
    pub email: String,
    /// URL аватара.
    #[serde(default)]
    pub profile_image: String,
    /// Дата и время создания пользователя (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Рекомендация книги.
pub struct Book {
    /// Идентификатор записи.
    pub id: i64,
    /// Название книги.
    pub title: String,
    /// Отзыв автора рекомендации.
    pub caption: String,
    /// Оценка 1..=5.
    pub rating: u8,
    /// URL обложки на хостинге изображений.
    pub image: String,
    /// Идентификатор автора.
    pub user: i64,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
    /// Дата и время последнего обновления (UTC).
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Ответ после успешной регистрации или входа.
pub struct AuthResponse {
    /// JWT.
    pub token: String,
    /// Данные пользователя.
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Страница ленты рекомендаций.
pub struct ListBooksResponse {
    /// Книги на текущей странице, новые первыми.
    pub books: Vec<Book>,
    /// Номер страницы, начиная с 1.
    pub current_page: u32,
    /// Общее количество записей.
    pub total_books: i64,
    /// Общее количество страниц.
    pub total_pages: i64,
}
