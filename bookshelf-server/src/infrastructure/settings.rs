use anyhow::{Context, Result, anyhow};
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) database_url: SecretString,
    pub(crate) jwt_secret: SecretString,
    pub(crate) jwt_ttl_seconds: i64,
    pub(crate) http_addr: String,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) log_level: String,
    pub(crate) http_request_body_limit_bytes: usize,
    pub(crate) http_concurrency_limit: usize,
    pub(crate) http_request_timeout_secs: u64,
    pub(crate) cloudinary: CloudinarySettings,
}

#[derive(Debug, Clone)]
pub(crate) struct CloudinarySettings {
    pub(crate) api_base: String,
    pub(crate) cloud_name: String,
    pub(crate) api_key: String,
    pub(crate) api_secret: SecretString,
    pub(crate) upload_folder: Option<String>,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        let database_url = get_required("DATABASE_URL").context("DATABASE_URL is required")?;
        let jwt_secret = get_required("JWT_SECRET").context("JWT_SECRET is required")?;
        let jwt_ttl_seconds: i64 = std::env::var("JWT_TTL_SECONDS")
            .unwrap_or_else(|_| (15 * 24 * 60 * 60).to_string())
            .parse()
            .context("Failed to parse JWT_TTL_SECONDS, expecting integer")?;

        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cors_origins =
            parse_cors_origins(std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 10 * 1024 * 1024)?;
        let http_concurrency_limit = parse_usize_env("HTTP_CONCURRENCY_LIMIT", 256)?;
        let http_request_timeout_secs = parse_u64_env("HTTP_REQUEST_TIMEOUT_SECS", 30)?;

        let cloudinary = CloudinarySettings::from_env()?;

        Ok(Self {
            database_url: SecretString::from(database_url),
            jwt_secret: SecretString::from(jwt_secret),
            jwt_ttl_seconds,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            http_request_timeout_secs,
            cloudinary,
        })
    }

    pub(crate) fn database_url(&self) -> &str {
        self.database_url.expose_secret()
    }
}

impl CloudinarySettings {
    fn from_env() -> Result<Self> {
        let cloud_name =
            get_required("CLOUDINARY_CLOUD_NAME").context("CLOUDINARY_CLOUD_NAME is required")?;
        let api_key =
            get_required("CLOUDINARY_API_KEY").context("CLOUDINARY_API_KEY is required")?;
        let api_secret =
            get_required("CLOUDINARY_API_SECRET").context("CLOUDINARY_API_SECRET is required")?;
        let api_base = std::env::var("CLOUDINARY_API_BASE")
            .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1".to_string());
        let upload_folder = std::env::var("CLOUDINARY_UPLOAD_FOLDER")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Self {
            api_base,
            cloud_name,
            api_key,
            api_secret: SecretString::from(api_secret),
            upload_folder,
        })
    }

    pub(crate) fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.api_base.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
