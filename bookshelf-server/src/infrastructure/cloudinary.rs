use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::{debug, error, info};

use crate::data::image_host::ImageHost;
use crate::domain::error::DomainError;
use crate::domain::image::{DataUrl, UploadedImage};
use crate::infrastructure::settings::CloudinarySettings;

#[derive(Debug, Deserialize)]
struct UploadResponseDto {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<ErrorDetailDto>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetailDto {
    message: String,
}

/// Signed uploads to Cloudinary's REST upload endpoint.
#[derive(Debug, Clone)]
pub(crate) struct CloudinaryImageHost {
    client: Client,
    upload_url: String,
    api_key: String,
    api_secret: SecretString,
    folder: Option<String>,
}

impl CloudinaryImageHost {
    pub(crate) fn new(settings: &CloudinarySettings, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            upload_url: settings.upload_url(),
            api_key: settings.api_key.clone(),
            api_secret: settings.api_secret.clone(),
            folder: settings.upload_folder.clone(),
        })
    }

    fn signed_params(&self, timestamp: i64) -> Vec<(&'static str, String)> {
        let mut params = vec![("timestamp", timestamp.to_string())];
        if let Some(folder) = &self.folder {
            params.push(("folder", folder.clone()));
        }
        let signature = sign_params(&params, self.api_secret.expose_secret());

        params.push(("api_key", self.api_key.clone()));
        params.push(("signature", signature));
        params
    }
}

#[async_trait]
impl ImageHost for CloudinaryImageHost {
    async fn upload(&self, image: &DataUrl) -> Result<UploadedImage, DomainError> {
        let mut form = self.signed_params(Utc::now().timestamp());
        form.push(("file", image.to_string()));

        debug!(mime = image.mime(), bytes = image.payload_len(), "uploading image");

        let response = self
            .client
            .post(&self.upload_url)
            .form(&form)
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "image host is unreachable");
                DomainError::Upload("image host is unreachable".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorResponseDto>()
                .await
                .ok()
                .and_then(|body| body.error)
                .map(|err| err.message)
                .unwrap_or_default();
            error!(%status, detail = %detail, "image host rejected upload");
            return Err(DomainError::Upload(format!("image host responded with {status}")));
        }

        let body = response.json::<UploadResponseDto>().await.map_err(|err| {
            error!(error = %err, "image host returned an unexpected body");
            DomainError::Upload("unexpected image host response".to_string())
        })?;

        info!(public_id = %body.public_id, "image uploaded");
        Ok(UploadedImage {
            secure_url: body.secure_url,
            public_id: body.public_id,
        })
    }
}

/// Cloudinary signature: params sorted by name, joined as `k=v&k=v`, secret
/// appended, hex SHA-1 of the result.
fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
