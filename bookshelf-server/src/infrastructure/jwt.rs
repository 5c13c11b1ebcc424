use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    #[serde(rename = "userId")]
    pub(crate) user_id: i64,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

/// Issues and verifies HS256 access tokens. Holds derived keys only, so the raw
/// secret cannot end up in a `Debug` dump of the service.
pub(crate) struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
}

impl JwtService {
    const DEFAULT_TTL_SECONDS: i64 = 24 * 60 * 60;
    const LEEWAY_SECONDS: u64 = 10;

    pub(crate) fn new(secret: &str, ttl_seconds: i64) -> Self {
        let ttl_seconds = if ttl_seconds > 0 {
            ttl_seconds
        } else {
            Self::DEFAULT_TTL_SECONDS
        };

        JwtService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    pub(crate) fn generate_token(&self, user_id: i64) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_seconds)).timestamp(),
        };

        self.sign(&claims)
    }

    pub(crate) fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        // Pinning the algorithm list rejects `none` and any alg swap.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = Self::LEEWAY_SECONDS;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(JwtError::Decode)?;

        Ok(token_data.claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(JwtError::Encode)
    }
}
