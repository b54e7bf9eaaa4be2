//! Staff account endpoints.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use till_core::validation::{validate_email, validate_name, validate_password, validate_username};
use till_core::{Money, Role, User};
use till_db::repository::user::{NewUser, UserChanges};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    /// Cents per hour; defaults to zero for salaried staff.
    #[serde(default)]
    pub hourly_rate: Money,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub active: bool,
    #[serde(default)]
    pub hourly_rate: Money,
    /// When present, replaces the password.
    pub password: Option<String>,
}

fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?
        .to_string())
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    validate_username(&req.username)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    validate_name("fullName", &req.full_name)?;

    let user = state
        .db
        .users()
        .insert(&NewUser {
            username: req.username.trim().to_string(),
            email: req.email.trim().to_string(),
            password_hash: hash_password(&req.password)?,
            full_name: req.full_name.trim().to_string(),
            role: req.role,
            hourly_rate: req.hourly_rate,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.db.users().list().await?))
}

/// GET /api/users/:id
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    let user = state
        .db
        .users()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {id}")))?;

    Ok(Json(user))
}

/// PUT /api/users/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    validate_email(&req.email)?;
    validate_name("fullName", &req.full_name)?;

    let password_hash = match &req.password {
        Some(password) => {
            validate_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let user = state
        .db
        .users()
        .update(
            id,
            &UserChanges {
                email: req.email.trim().to_string(),
                full_name: req.full_name.trim().to_string(),
                role: req.role,
                active: req.active,
                hourly_rate: req.hourly_rate,
                password_hash,
            },
        )
        .await?;

    Ok(Json(user))
}

/// DELETE /api/users/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.db.users().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
