use axum::{extract::State, routing::post, Json, Router};

use crate::api::errors::ApiError;
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::user::{UserCreate, UserLogin, UserResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/register", post(register)).route("/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<Json<UserResponse>, ApiError> {
    let existing = repositories::users::exists_by_username(state.db(), &payload.username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing user"))?;
    if existing.is_some() {
        return Err(ApiError::BadRequest("Username already exists".to_string()));
    }

    let role = UserRole::parse(&payload.role)
        .ok_or_else(|| ApiError::BadRequest("Role must be 'student' or 'teacher'".to_string()))?;

    let hashed_password = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let user = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            username: &payload.username,
            hashed_password,
            role,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create user"))?;

    tracing::info!(user_id = user.id, role = ?user.role, "registered user");

    Ok(Json(UserResponse::from_db(user)))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<UserLogin>,
) -> Result<Json<UserResponse>, ApiError> {
    // A missing user and a wrong password produce the same response, so the
    // endpoint does not leak which usernames exist.
    let user = repositories::users::find_by_username(state.db(), &payload.username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::Unauthorized("Invalid credentials"))?;

    let verified = security::verify_password(&payload.password, &user.hashed_password)
        .map_err(|e| ApiError::internal(e, "Failed to verify password"))?;
    if !verified {
        return Err(ApiError::Unauthorized("Invalid credentials"));
    }

    Ok(Json(UserResponse::from_db(user)))
}
