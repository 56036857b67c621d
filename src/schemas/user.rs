use serde::{Deserialize, Serialize};

use crate::db::models::User;
use crate::db::types::UserRole;

#[derive(Debug, Deserialize)]
pub(crate) struct UserCreate {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) role: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserLogin {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) role: UserRole,
}

impl UserResponse {
    pub(crate) fn from_db(user: User) -> Self {
        Self { id: user.id, username: user.username, role: user.role }
    }
}
