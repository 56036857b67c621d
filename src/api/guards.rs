//! Role guards for caller-identified endpoints.
//!
//! Callers identify themselves with a plain id query parameter
//! (`?teacher_id=` / `?student_id=`); the guard confirms the user exists and
//! holds the required role, otherwise the endpoint's denial message is
//! returned with 403.

use serde::Deserialize;
use sqlx::PgPool;

use crate::api::errors::ApiError;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories::users;

#[derive(Debug, Deserialize)]
pub(crate) struct TeacherQuery {
    pub(crate) teacher_id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudentQuery {
    pub(crate) student_id: i64,
}

pub(crate) async fn require_teacher(
    pool: &PgPool,
    teacher_id: i64,
    denied: &'static str,
) -> Result<User, ApiError> {
    users::find_by_id_and_role(pool, teacher_id, UserRole::Teacher)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::Forbidden(denied))
}

pub(crate) async fn require_student(
    pool: &PgPool,
    student_id: i64,
    denied: &'static str,
) -> Result<User, ApiError> {
    users::find_by_id_and_role(pool, student_id, UserRole::Student)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::Forbidden(denied))
}
