// src/auth.rs
use crate::app_log;
use crate::database::{DatabaseConfig, SessionIdentity, UserRepository};
use crate::types::User;
use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE: &str = "app_session_id";
const SESSION_TTL_DAYS: i64 = 365;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // openId
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

impl From<Claims> for SessionIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            open_id: claims.sub,
            name: claims.name,
            email: claims.email,
            login_method: claims.login_method,
        }
    }
}

/// Secret used to sign and verify session tokens
pub struct AuthConfig {
    pub session_secret: String,
}

impl AuthConfig {
    pub fn new(session_secret: String) -> Self {
        Self { session_secret }
    }

    /// HS256 session token for an identity
    pub fn sign_session(&self, identity: &SessionIdentity) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.open_id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            login_method: identity.login_method.clone(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::days(SESSION_TTL_DAYS)).timestamp() as usize,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.session_secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn verify_session(&self, token: &str) -> Result<SessionIdentity> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.session_secret.as_bytes()),
            &validation,
        )?;

        if token_data.claims.sub.is_empty() {
            anyhow::bail!("Session token has no subject");
        }
        Ok(token_data.claims.into())
    }
}

/// Signed-in user; first sight of an open id creates the users row
pub struct AuthenticatedUser {
    pub user: User,
}

impl AuthenticatedUser {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn id(&self) -> i64 {
        self.user.id
    }
}

/// Bearer header first, then the session cookie
fn session_token(req: &Request<'_>) -> Result<Option<String>, AuthError> {
    if let Some(header) = req.headers().get_one("Authorization") {
        return match header.strip_prefix("Bearer ") {
            Some(token) if !token.is_empty() => Ok(Some(token.to_string())),
            _ => Err(AuthError::InvalidToken),
        };
    }

    Ok(req
        .cookies()
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty()))
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_config = match req.guard::<&State<AuthConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => {
                return Outcome::Error((status, AuthError::DatabaseError))
            }
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let db_config = match req.guard::<&State<DatabaseConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => {
                return Outcome::Error((status, AuthError::DatabaseError))
            }
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let token = match session_token(req) {
            Ok(Some(token)) => token,
            Ok(None) => {
                app_log!(debug, "No session token on request");
                return Outcome::Error((Status::Unauthorized, AuthError::MissingToken));
            }
            Err(e) => {
                app_log!(warn, "Invalid Authorization header format");
                return Outcome::Error((Status::Unauthorized, e));
            }
        };

        let identity = match auth_config.verify_session(&token) {
            Ok(identity) => identity,
            Err(e) => {
                app_log!(warn, "Session verification failed: {}", e);
                return Outcome::Error((Status::Unauthorized, AuthError::TokenVerificationFailed));
            }
        };

        let pool = match db_config.pool() {
            Ok(pool) => pool,
            Err(e) => {
                app_log!(error, "Database connection failed: {}", e);
                return Outcome::Error((Status::InternalServerError, AuthError::DatabaseError));
            }
        };

        match UserRepository::new(pool).upsert_signed_in(&identity).await {
            Ok(user) => {
                app_log!(debug, "User {} authenticated", user.open_id);
                Outcome::Success(AuthenticatedUser { user })
            }
            Err(e) => {
                app_log!(error, "Failed to record sign-in for {}: {}", identity.open_id, e);
                Outcome::Error((Status::InternalServerError, AuthError::DatabaseError))
            }
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenVerificationFailed,
    DatabaseError,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Not authenticated",
            AuthError::InvalidToken => "Invalid authorization token format",
            AuthError::TokenVerificationFailed => "Session verification failed",
            AuthError::DatabaseError => "Database error occurred",
        }
    }
}

// Optional auth guard that doesn't fail if no auth is provided
pub struct OptionalAuth {
    pub user: Option<AuthenticatedUser>,
}

impl OptionalAuth {
    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(AuthenticatedUser::id)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalAuth {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(req).await {
            Outcome::Success(auth) => Outcome::Success(OptionalAuth { user: Some(auth) }),
            _ => Outcome::Success(OptionalAuth { user: None }),
        }
    }
}
