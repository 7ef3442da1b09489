use crate::errors::AppError;
use anyhow::anyhow;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Claims carried by a session token. `sub` holds the user ID as a string.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Signing/verification material shared by the auth handlers and the
/// session middleware.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_hours: i64,
}

impl AuthKeys {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        AuthKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_hours,
        }
    }
}

/// Identity of the authenticated caller, injected into request extensions
/// by [`require_session`].
#[derive(Debug, Clone, Copy)]
pub struct SessionUser(pub i64);

/// Signs a session token (HS256) for the given user ID.
pub fn sign_session_token(keys: &AuthKeys, user_id: i64) -> Result<String, AppError> {
    let expiration = (Utc::now() + Duration::hours(keys.expiry_hours)).timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration,
    };

    encode(&Header::default(), &claims, &keys.encoding)
        .map_err(|e| AppError::InternalServerError(anyhow!("Failed to sign session token: {}", e)))
}

/// Verifies and decodes a session token. Expired or malformed tokens are
/// rejected as 401.
pub fn verify_session_token(keys: &AuthKeys, token: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map_err(|_| AppError::Unauthorized("Invalid session token".to_string()))?;

    Ok(token_data.claims)
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalServerError(anyhow!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::InternalServerError(anyhow!("Stored password hash is invalid: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Axum middleware guarding protected routes.
///
/// Validates the `Authorization: Bearer <token>` header and injects
/// [`SessionUser`] into the request extensions. Requests without a valid
/// session are refused with 401 before reaching the handler.
pub async fn require_session(
    State(keys): State<AuthKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            warn!("Rejecting request without a bearer session token");
            return Err(AppError::Unauthorized("No session found".to_string()));
        }
    };

    let claims = verify_session_token(&keys, token)?;
    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid session token".to_string()))?;

    debug!("Session verified for user_id: {}", user_id);
    req.extensions_mut().insert(SessionUser(user_id));
    Ok(next.run(req).await)
}
