use serde::{Deserialize, Serialize};

/// Account role. Closed set; policy matches on it exhaustively so a new
/// variant cannot silently inherit regular-user behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Regular,
    Admin,
}

/// JWT payload used for authentication.
///
/// The token carries no absolute expiry; validity is derived from `iat` plus
/// the configured TTL at verification time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: i32,         // user ID
    pub username: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,         // issued at (unix timestamp)
}

/// Authenticated identity for a single in-flight request. Built from verified
/// claims by the extractor, discarded when the request completes.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            email: claims.email,
            role: claims.role,
        }
    }
}
