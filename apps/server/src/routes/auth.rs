//! Login endpoint.
//!
//! Verifies the argon2 hash and returns the account. Failed lookups and
//! failed verifications produce the same response so usernames cannot be
//! probed.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use till_core::User;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<User>> {
    let denied = || ApiError::Unauthorized("Invalid username or password".to_string());

    let user = state
        .db
        .users()
        .get_by_username(req.username.trim())
        .await?
        .ok_or_else(denied)?;

    if !user.active {
        warn!(username = %user.username, "Login attempt on inactive account");
        return Err(denied());
    }

    let parsed = PasswordHash::new(&user.password_hash)
        .map_err(|e| ApiError::Internal(format!("stored password hash unreadable: {e}")))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed)
        .map_err(|_| denied())?;

    info!(username = %user.username, "Login successful");
    Ok(Json(user))
}
