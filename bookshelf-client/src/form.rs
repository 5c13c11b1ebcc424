use serde::Serialize;

use crate::error::{ClientError, ClientResult};
use crate::image::SelectedImage;

/// Оценка новой формы.
pub const DEFAULT_RATING: u8 = 3;
const MIN_RATING: u8 = 1;
const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Форма новой рекомендации книги.
pub struct CreateBookForm {
    /// Название книги.
    pub title: String,
    /// Отзыв.
    pub caption: String,
    /// Оценка 1..=5.
    pub rating: u8,
    /// Выбранная обложка.
    pub image: Option<SelectedImage>,
}

impl Default for CreateBookForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            caption: String::new(),
            rating: DEFAULT_RATING,
            image: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateBookPayload {
    pub(crate) title: String,
    pub(crate) caption: String,
    pub(crate) rating: u8,
    pub(crate) image: String,
}

impl CreateBookForm {
    /// Пустая форма с оценкой по умолчанию.
    pub fn new() -> Self {
        Self::default()
    }

    /// Проверяет, что все поля заполнены и оценка в диапазоне 1..=5.
    pub fn validate(&self) -> ClientResult<()> {
        if self.title.trim().is_empty() || self.caption.trim().is_empty() || self.image.is_none()
        {
            return Err(ClientError::Validation(
                "Please fill in all fields".to_string(),
            ));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ClientError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        Ok(())
    }

    /// Возвращает форму в исходное состояние.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn to_payload(&self) -> ClientResult<CreateBookPayload> {
        self.validate()?;
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| ClientError::Validation("Please fill in all fields".to_string()))?;

        Ok(CreateBookPayload {
            title: self.title.trim().to_string(),
            caption: self.caption.trim().to_string(),
            rating: self.rating,
            image: image.data_url(),
        })
    }
}
