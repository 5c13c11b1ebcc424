use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) profile_image: String,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError>;
    /// Looks a user up without loading the password hash.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;
}

#[async_trait]
impl<T: UserRepository + ?Sized> UserRepository for Arc<T> {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        (**self).create_user(input).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        (**self).find_by_email(email).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        (**self).find_by_id(id).await
    }
}
