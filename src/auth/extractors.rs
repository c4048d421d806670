use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    auth::{claims::Principal, jwt::JwtKeys},
    error::{ApiError, AuthError},
};

/// Principal resolver. Pulls the bearer token out of the `Authorization`
/// header and verifies it; any failure rejects the request with 401. There is
/// no anonymous fallback and nothing is cached across requests.
#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or(AuthError::MissingToken)?;

        let claims = keys.verify(token)?;
        Ok(Principal::from(claims))
    }
}
