use super::helper;
use crate::auth::{self, AuthKeys};
use crate::model::auth::{AuthResponse, NewUser, UserCredentials, UserData};
use crate::payloads::auth::{LoginPayload, RegisterPayload};
use crate::{
    errors::AppError,
    response::ApiResponse,
    schema::users::dsl as users_dsl,
};
use axum::extract::State;
use axum::response::Json;
use deadpool_diesel::postgres::Pool;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

const INITIAL_RANK: &str = "Beginner";

/// Registers a new user account.
///
/// Request Body: `RegisterPayload`
///
/// Returns (wrapped in `ApiResponse`)
/// * `AuthResponse`: A signed session token plus the public user fields (201 Created).
/// * `400 Bad Request`: If the email is malformed or the password too weak.
/// * `409 Conflict`: If the email is already registered.
/// * `500 Internal Server Error`: If hashing or a database operation fails.
#[instrument(skip(pool, keys, payload))]
pub async fn register(
    State(pool): State<Pool>,
    State(keys): State<AuthKeys>,
    Json(payload): Json<RegisterPayload>,
) -> Result<ApiResponse<AuthResponse>, AppError> {
    info!("Attempting registration for email: {}", payload.email);

    if let Err(validation_errors) = payload.validate() {
        warn!("Registration payload failed validation: {}", validation_errors);
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if !password_is_strong(&payload.password) {
        warn!("Registration rejected: password too weak");
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters long and contain at least one uppercase \
             letter, one lowercase letter, and one number"
                .to_string(),
        ));
    }

    let username = payload
        .username
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| email_local_part(&payload.email));
    debug!("Resolved username '{}' for registration", username);

    let password_hash = auth::hash_password(&payload.password)?;

    let new_user = NewUser {
        username,
        email: payload.email.clone(),
        password_hash,
        total_points: 0,
        rank: INITIAL_RANK.to_string(),
    };

    let conn = pool.get().await?;
    let insert_result: Result<UserData, AppError> = conn
        .interact(move |conn_sync| {
            diesel::insert_into(users_dsl::users)
                .values(&new_user)
                .returning((
                    users_dsl::id,
                    users_dsl::username,
                    users_dsl::email,
                    users_dsl::created_at,
                    users_dsl::total_points,
                    users_dsl::rank,
                ))
                .get_result::<UserData>(conn_sync)
                .map_err(|e| {
                    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) = e {
                        warn!("Registration conflict: email already registered");
                        AppError::Conflict("Email is already registered.".to_string())
                    } else {
                        AppError::from(e)
                    }
                })
        })
        .await?;

    let user = insert_result?;
    let token = auth::sign_session_token(&keys, user.id)?;

    info!("Successfully registered user with id: {}", user.id);
    Ok(ApiResponse::created(AuthResponse { token, user }))
}

/// Authenticates a user and returns a fresh session token.
///
/// Request Body: `LoginPayload`
///
/// Returns (wrapped in `ApiResponse`)
/// * `AuthResponse`: A signed session token plus the public user fields (200 OK).
/// * `400 Bad Request`: If the email is malformed.
/// * `401 Unauthorized`: If the email is unknown or the password wrong
///   (indistinct message for both cases).
/// * `500 Internal Server Error`: If a database operation fails.
#[instrument(skip(pool, keys, payload))]
pub async fn login(
    State(pool): State<Pool>,
    State(keys): State<AuthKeys>,
    Json(payload): Json<LoginPayload>,
) -> Result<ApiResponse<AuthResponse>, AppError> {
    info!("Attempting login for email: {}", payload.email);

    if let Err(validation_errors) = payload.validate() {
        warn!("Login payload failed validation: {}", validation_errors);
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let email = payload.email.clone();
    let credentials = helper::run_query(&pool, move |conn_sync| {
        users_dsl::users
            .filter(users_dsl::email.eq(email))
            .select((
                users_dsl::id,
                users_dsl::username,
                users_dsl::email,
                users_dsl::password_hash,
                users_dsl::created_at,
                users_dsl::total_points,
                users_dsl::rank,
            ))
            .first::<UserCredentials>(conn_sync)
            .optional()
    })
    .await?;

    let credentials = match credentials {
        Some(row) => row,
        None => {
            warn!("Login failed: unknown email");
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }
    };

    if !auth::verify_password(&payload.password, &credentials.password_hash)? {
        warn!("Login failed: wrong password for user {}", credentials.id);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = auth::sign_session_token(&keys, credentials.id)?;
    let user = UserData::from(credentials);

    info!("Successfully logged in user with id: {}", user.id);
    Ok(ApiResponse::ok(AuthResponse { token, user }))
}

/// At least one uppercase letter, one lowercase letter and one digit;
/// the length floor is enforced by the payload validator.
fn password_is_strong(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

fn email_local_part(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
