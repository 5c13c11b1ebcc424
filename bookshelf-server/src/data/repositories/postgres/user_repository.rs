use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::User;

// public profile columns; password_hash is only ever selected by email lookup
macro_rules! profile_columns {
    () => {
        "id, username, email, profile_image, created_at"
    };
}

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub(crate) struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    username: String,
    email: String,
    profile_image: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct LoginRow {
    #[sqlx(flatten)]
    profile: ProfileRow,
    password_hash: String,
}

impl TryFrom<ProfileRow> for User {
    type Error = DomainError;

    // rows that break domain rules mean the table was written around us
    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let id = row.id;
        User::new(id, row.username, row.email, row.profile_image, row.created_at)
            .map_err(|err| DomainError::Unexpected(format!("stored user {id}: {err}")))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let NewUser {
            username,
            email,
            password_hash,
            profile_image,
        } = input;

        sqlx::query_as::<_, ProfileRow>(concat!(
            "INSERT INTO users (username, email, password_hash, profile_image) ",
            "VALUES ($1, $2, $3, $4) RETURNING ",
            profile_columns!()
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(profile_image)
        .fetch_one(&self.pool)
        .await
        .map_err(classify_write_error)?
        .try_into()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        let found = sqlx::query_as::<_, LoginRow>(concat!(
            "SELECT ",
            profile_columns!(),
            ", password_hash FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| DomainError::Persistence(err.to_string()))?;

        found
            .map(|row| -> Result<UserCredentials, DomainError> {
                Ok(UserCredentials {
                    user: row.profile.try_into()?,
                    password_hash: row.password_hash,
                })
            })
            .transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        sqlx::query_as::<_, ProfileRow>(concat!(
            "SELECT ",
            profile_columns!(),
            " FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| DomainError::Persistence(err.to_string()))?
        .map(User::try_from)
        .transpose()
    }
}

/// Names the field behind a unique-constraint hit so the API can say which one is taken.
fn conflicting_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_username_key") => "username",
        Some("users_email_key") => "email",
        _ => "user",
    }
}

fn classify_write_error(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            DomainError::AlreadyExists(conflicting_field(db_err.constraint()).to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{ProfileRow, conflicting_field};
    use crate::domain::error::DomainError;
    use crate::domain::user::User;

    #[test]
    fn unique_constraints_map_to_field_names() {
        assert_eq!(conflicting_field(Some("users_username_key")), "username");
        assert_eq!(conflicting_field(Some("users_email_key")), "email");
        assert_eq!(conflicting_field(Some("users_pkey")), "user");
        assert_eq!(conflicting_field(None), "user");
    }

    #[test]
    fn corrupt_row_is_unexpected_and_names_the_id() {
        let row = ProfileRow {
            id: 42,
            username: String::new(),
            email: "reader@example.com".to_string(),
            profile_image: "https://avatar.test/a.svg".to_string(),
            created_at: Utc::now(),
        };

        match User::try_from(row) {
            Err(DomainError::Unexpected(msg)) => assert!(msg.contains("42")),
            other => panic!("expected Unexpected, got {other:?}"),
        }
    }
}
