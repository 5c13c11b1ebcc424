use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::image::DataUrl;

pub(crate) const MIN_RATING: i64 = 1;
pub(crate) const MAX_RATING: i64 = 5;

/// A persisted book recommendation. `image` is always a hosted URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Book {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) caption: String,
    pub(crate) rating: i16,
    pub(crate) image: String,
    pub(crate) user_id: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

/// Raw submission as it arrives from the client. Every field is optional so a
/// missing one can be reported as such instead of as a decoding failure.
#[derive(Debug, Clone, Default)]
pub(crate) struct CreateBookRequest {
    pub(crate) title: Option<String>,
    pub(crate) caption: Option<String>,
    pub(crate) rating: Option<i64>,
    pub(crate) image: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct ValidatedBook {
    pub(crate) title: String,
    pub(crate) caption: String,
    pub(crate) rating: i16,
    pub(crate) image: DataUrl,
}

impl CreateBookRequest {
    pub(crate) fn validate(self) -> Result<ValidatedBook, DomainError> {
        let (Some(title), Some(caption), Some(rating), Some(image)) =
            (self.title, self.caption, self.rating, self.image)
        else {
            return Err(DomainError::MissingFields);
        };
        if title.trim().is_empty() || caption.trim().is_empty() || image.trim().is_empty() {
            return Err(DomainError::MissingFields);
        }

        Ok(ValidatedBook {
            title: normalize_title(&title)?,
            caption: normalize_caption(&caption)?,
            rating: validate_rating(rating)?,
            image: DataUrl::parse(&image)?,
        })
    }
}

impl Book {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: i64,
        title: impl Into<String>,
        caption: impl Into<String>,
        rating: i16,
        image: impl Into<String>,
        user_id: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("user_id", user_id)?;
        let title = normalize_title(&title.into())?;
        let caption = normalize_caption(&caption.into())?;
        let rating = validate_rating(i64::from(rating))?;
        let image = validate_hosted_url(&image.into())?;

        if updated_at < created_at {
            return Err(DomainError::Validation {
                field: "updated_at",
                message: "must be >= created_at",
            });
        }

        Ok(Self {
            id,
            title,
            caption,
            rating,
            image,
            user_id,
            created_at,
            updated_at,
        })
    }
}

pub(crate) fn validate_hosted_url(image: &str) -> Result<String, DomainError> {
    let image = image.trim();
    if !(image.starts_with("https://") || image.starts_with("http://")) {
        return Err(DomainError::Validation {
            field: "image",
            message: "must be a hosted http(s) url",
        });
    }
    Ok(image.to_string())
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

fn validate_rating(rating: i64) -> Result<i16, DomainError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(DomainError::Validation {
            field: "rating",
            message: "must be an integer 1..5",
        });
    }
    Ok(rating as i16)
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    let title_len = title.chars().count();
    if title_len == 0 || title_len > 255 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..255 chars",
        });
    }
    Ok(title.to_string())
}

fn normalize_caption(caption: &str) -> Result<String, DomainError> {
    let caption = caption.trim();
    if caption.is_empty() {
        return Err(DomainError::Validation {
            field: "caption",
            message: "must not be empty",
        });
    }
    Ok(caption.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{Book, CreateBookRequest, DomainError};

    fn full_request() -> CreateBookRequest {
        CreateBookRequest {
            title: Some("  Dune ".to_string()),
            caption: Some(" Great ".to_string()),
            rating: Some(5),
            image: Some("data:image/jpeg;base64,AAAA".to_string()),
        }
    }

    #[test]
    fn create_book_request_validate_normalizes_fields() {
        let validated = full_request().validate().expect("must validate");
        assert_eq!(validated.title, "Dune");
        assert_eq!(validated.caption, "Great");
        assert_eq!(validated.rating, 5);
        assert_eq!(validated.image.mime(), "image/jpeg");
    }

    #[test]
    fn create_book_request_reports_each_missing_field() {
        let strip: [fn(&mut CreateBookRequest); 4] = [
            |r| r.title = None,
            |r| r.caption = None,
            |r| r.rating = None,
            |r| r.image = None,
        ];
        for clear in strip {
            let mut req = full_request();
            clear(&mut req);
            let err = req.validate().expect_err("missing field must be rejected");
            assert!(matches!(err, DomainError::MissingFields));
        }
    }

    #[test]
    fn create_book_request_treats_blank_text_as_missing() {
        let mut req = full_request();
        req.caption = Some("   ".to_string());
        let err = req.validate().expect_err("blank caption must be rejected");
        assert!(matches!(err, DomainError::MissingFields));
    }

    #[test]
    fn create_book_request_rejects_out_of_range_rating() {
        for rating in [0, 6, 7, -1] {
            let mut req = full_request();
            req.rating = Some(rating);
            let err = req.validate().expect_err("rating must be rejected");
            assert_validation_field(err, "rating");
        }
    }

    #[test]
    fn book_new_refuses_inline_image_payloads() {
        let now = Utc::now();
        let err = Book::new(1, "Dune", "Great", 5, "data:image/jpeg;base64,AAAA", 10, now, now)
            .expect_err("data url must never be persisted");
        assert_validation_field(err, "image");
    }

    #[test]
    fn book_new_rejects_updated_before_created() {
        let updated_at = Utc::now();
        let created_at = updated_at + Duration::seconds(1);

        let err = Book::new(
            1,
            "Dune",
            "Great",
            5,
            "https://img.example/dune.jpg",
            10,
            created_at,
            updated_at,
        )
        .expect_err("updated_at < created_at must fail");
        assert_validation_field(err, "updated_at");
    }

    #[test]
    fn title_limit_counts_characters_not_bytes() {
        let mut req = full_request();
        req.title = Some("к".repeat(255));
        let validated = req.validate().expect("255 cyrillic chars fit");
        assert_eq!(validated.title.chars().count(), 255);

        let mut req = full_request();
        req.title = Some("к".repeat(256));
        let err = req.validate().expect_err("256 chars must fail");
        assert_validation_field(err, "title");
    }

    fn assert_validation_field(err: DomainError, expected_field: &'static str) {
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, expected_field),
            other => panic!("expected DomainError::Validation, got {other:?}"),
        }
    }
}
