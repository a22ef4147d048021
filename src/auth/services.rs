use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, RegisterRequest},
        jwt::TokenIssuer,
        password::{hash_password_async, verify_password_async},
        repo::{RepoError, UserRepository},
        repo_types::{NewUser, Role, User},
        validator::{normalize_email, validate_email, validate_password},
    },
    config::JwtConfig,
    error::AuthError,
};

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";

fn required(value: Option<String>, field: &'static str) -> Result<String, AuthError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => {
            warn!(field, "missing required field");
            Err(AuthError::MissingField(field))
        }
    }
}

/// Registration and login over a user store.
#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, jwt: &JwtConfig) -> Self {
        Self {
            repo,
            tokens: TokenIssuer::new(jwt),
        }
    }

    /// Validates a candidate, hashes its password and stores it.
    ///
    /// The returned record still holds the hash; callers project it to
    /// [`PublicUser`](crate::auth::dto::PublicUser) before responding.
    #[instrument(skip(self, candidate))]
    pub async fn register(&self, candidate: RegisterRequest) -> Result<User, AuthError> {
        let first_name = required(candidate.first_name, "firstName")?;
        let last_name = required(candidate.last_name, "lastName")?;
        let email = required(candidate.email, "email")?;
        let password = required(candidate.password, "password")?;
        let role = required(candidate.role, "role")?;

        validate_password(&password).map_err(|e| {
            warn!(error = %e, "password rejected");
            e
        })?;

        let email = normalize_email(&email);
        validate_email(&email).map_err(|e| {
            warn!(email = %email, "invalid email");
            e
        })?;

        let role: Role = role.parse()?;

        let password_hash = hash_password_async(password).await?;

        if self.repo.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "email already registered");
            return Err(AuthError::DuplicateUser);
        }

        let user = self
            .repo
            .create(NewUser {
                first_name: first_name.trim().to_string(),
                last_name: last_name.trim().to_string(),
                email,
                password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                RepoError::DuplicateEmail => {
                    warn!("email registered concurrently");
                    AuthError::DuplicateUser
                }
                RepoError::Other(e) => AuthError::Internal(e),
            })?;

        info!(user_id = %user.id, email = %user.email, role = %user.role, "user registered");
        Ok(user)
    }

    /// Checks credentials and issues a session token built from the stored record.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: LoginRequest) -> Result<LoginResponse, AuthError> {
        let email = normalize_email(&required(credentials.email, "email")?);
        let password = required(credentials.password, "password")?;

        let user = match self.repo.find_by_email(&email).await? {
            Some(u) => u,
            None => {
                warn!(email = %email, "login unknown email");
                return Err(AuthError::UserNotFound);
            }
        };

        if !verify_password_async(password, user.password_hash.clone()).await? {
            warn!(email = %email, user_id = %user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;

        info!(user_id = %user.id, email = %user.email, "user logged in");
        Ok(LoginResponse {
            token,
            message: LOGIN_SUCCESS_MESSAGE.to_string(),
        })
    }
}
