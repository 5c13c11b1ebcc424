use tracing::{debug, error};

use super::password;
use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::{AuthError, DomainError};
use crate::domain::user::{LoginRequest, RegisterRequest, User, default_avatar_url};
use crate::infrastructure::jwt::JwtService;

/// Account plus a freshly signed bearer token.
#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) token: String,
}

pub(crate) struct AuthService<R: UserRepository> {
    repo: R,
    jwt: JwtService,
}

impl<R: UserRepository> AuthService<R> {
    pub(crate) fn new(repo: R, jwt: JwtService) -> Self {
        Self { repo, jwt }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<AuthResult, DomainError> {
        let RegisterRequest {
            username,
            email,
            password: secret,
        } = req.validate()?;

        let draft = NewUser {
            profile_image: default_avatar_url(&username),
            password_hash: password::hash(&secret)?,
            username,
            email,
        };

        let created = self.repo.create_user(draft).await?;
        self.issue(created)
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let LoginRequest {
            email,
            password: secret,
        } = req.validate()?;

        let Some(stored) = self.repo.find_by_email(&email).await? else {
            // unknown email pays for one verification too
            password::verify_stand_in(&secret)?;
            return Err(DomainError::InvalidCredentials);
        };

        password::verify(&secret, &stored.password_hash)?;
        self.issue(stored.user)
    }

    /// Resolves a bearer token to an existing user. Any failure below the
    /// signature check (store errors included) is reported as `InvalidToken`.
    pub(crate) async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.jwt.verify_token(token).map_err(|err| {
            debug!(error = %err, "token rejected");
            AuthError::InvalidToken
        })?;

        match self.repo.find_by_id(claims.user_id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(AuthError::UserNotFound),
            Err(err) => {
                error!(error = %err, user_id = claims.user_id, "user lookup failed during auth");
                Err(AuthError::InvalidToken)
            }
        }
    }

    fn issue(&self, user: User) -> Result<AuthResult, DomainError> {
        self.jwt
            .generate_token(user.id)
            .map(|token| AuthResult { user, token })
            .map_err(|err| DomainError::Unexpected(err.to_string()))
    }
}
