use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::image::{DataUrl, UploadedImage};

/// Third-party image storage. Implementations report every failure as
/// `DomainError::Upload`.
#[async_trait]
pub(crate) trait ImageHost: Send + Sync {
    async fn upload(&self, image: &DataUrl) -> Result<UploadedImage, DomainError>;
}

#[async_trait]
impl<T: ImageHost + ?Sized> ImageHost for Arc<T> {
    async fn upload(&self, image: &DataUrl) -> Result<UploadedImage, DomainError> {
        (**self).upload(image).await
    }
}
