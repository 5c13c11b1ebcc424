use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;
use crate::models::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Состояние входа: токен и пользователь, которому он выдан.
pub struct Session {
    /// JWT для заголовка `Authorization: Bearer`.
    pub token: String,
    /// Вошедший пользователь.
    pub user: User,
}

#[async_trait]
/// Долговременное хранилище сессии между запусками.
pub trait SessionStore: Send + Sync {
    /// Читает сохранённую сессию. `None`, если пользователь не входил.
    async fn load(&self) -> ClientResult<Option<Session>>;
    /// Сохраняет сессию, заменяя предыдущую.
    async fn save(&self, session: &Session) -> ClientResult<()>;
    /// Удаляет сохранённую сессию.
    async fn clear(&self) -> ClientResult<()>;
}

#[derive(Debug, Clone)]
/// Сессия в JSON-файле.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Создаёт хранилище поверх файла `path`. Файл может не существовать.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> ClientResult<Option<Session>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, session: &Session) -> ClientResult<()> {
        let bytes = serde_json::to_vec(session)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
