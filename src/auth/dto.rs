use serde::{Deserialize, Serialize};

use crate::{auth::claims::Principal, users::dto::PublicUser};

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: PublicUser,
    pub token: String,
}

/// Response for `GET /auth/me`: the caller's own identity, as decoded from
/// the presented token.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: Principal,
}
