use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `bookshelf-client`.
pub enum ClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Сервер ответил ошибкой. `message` берётся из тела ответа как есть.
    #[error("{message}")]
    Server {
        /// HTTP-статус ответа.
        status: u16,
        /// Текст ошибки от сервера.
        message: String,
    },

    /// Операция требует входа, а сессии нет.
    #[error("not logged in")]
    Unauthorized,

    /// Локальная проверка формы не прошла. Запрос не отправлялся.
    #[error("{0}")]
    Validation(String),

    /// Пользователь не дал доступ к медиатеке.
    #[error("Permission to access the media library is required")]
    PermissionDenied,

    /// Ошибка чтения файла или хранилища сессии.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Повреждённые данные сессии.
    #[error("session encoding error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Результат операций `bookshelf-client`.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        Self::Server {
            status: status.as_u16(),
            message,
        }
    }

    /// `true`, если сервер отклонил токен.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Unauthorized => true,
            Self::Server { status, .. } => *status == 401,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClientError;

    #[test]
    fn server_error_displays_message_verbatim() {
        let err = ClientError::from_http_status(
            reqwest::StatusCode::BAD_REQUEST,
            Some("Please fill all fields".to_string()),
        );
        assert_eq!(err.to_string(), "Please fill all fields");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn missing_message_falls_back_to_status() {
        let err = ClientError::from_http_status(reqwest::StatusCode::UNAUTHORIZED, None);
        assert!(err.to_string().contains("401"));
        assert!(err.is_unauthorized());
    }
}
