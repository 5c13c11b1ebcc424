use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};

use super::error::DomainError;

/// Inline image payload of the form `data:<mime>;base64,<payload>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DataUrl {
    mime: String,
    payload: String,
}

impl DataUrl {
    pub(crate) fn parse(raw: &str) -> Result<Self, DomainError> {
        let rest = raw.trim().strip_prefix("data:").ok_or_else(invalid_image)?;
        let (meta, payload) = rest.split_once(',').ok_or_else(invalid_image)?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or_else(invalid_image)?
            .to_ascii_lowercase();

        let subtype = mime.strip_prefix("image/").ok_or_else(invalid_image)?;
        if subtype.is_empty() || payload.is_empty() {
            return Err(invalid_image());
        }
        if STANDARD.decode(payload).is_err() {
            return Err(DomainError::Validation {
                field: "image",
                message: "payload is not valid base64",
            });
        }

        Ok(Self {
            mime,
            payload: payload.to_string(),
        })
    }

    pub(crate) fn mime(&self) -> &str {
        &self.mime
    }

    pub(crate) fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, self.payload)
    }
}

fn invalid_image() -> DomainError {
    DomainError::Validation {
        field: "image",
        message: "must be a data:image/<type>;base64,<payload> url",
    }
}

/// Result of a successful upload to the image host.
#[derive(Debug, Clone)]
pub(crate) struct UploadedImage {
    pub(crate) secure_url: String,
    pub(crate) public_id: String,
}
