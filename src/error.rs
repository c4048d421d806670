use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Authentication failures. All of these map to 401.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Error taxonomy surfaced at the HTTP boundary.
///
/// Handlers return this directly; the token service and password hasher return
/// typed failures that convert into it. The response body never carries
/// internal error details for `Internal`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    // Same message for unknown username and wrong password, so login errors
    // cannot be used to enumerate accounts.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("forbidden")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Malformed(String),
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(_) | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            match db.kind() {
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    return ApiError::Conflict(
                        "record is referenced by existing entries".into(),
                    )
                }
                sqlx::error::ErrorKind::UniqueViolation => {
                    return ApiError::Conflict("username or email already in use".into())
                }
                // SQLSTATE fallback for errors the driver leaves unclassified.
                // 23503 foreign_key_violation, 23505 unique_violation
                _ => match db.code().as_deref() {
                    Some("23503") => {
                        return ApiError::Conflict(
                            "record is referenced by existing entries".into(),
                        )
                    }
                    Some("23505") => {
                        return ApiError::Conflict("username or email already in use".into())
                    }
                    _ => {}
                },
            }
        }
        ApiError::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(e) = &self {
            error!(error = %e, "internal error");
        }
        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "status": status.as_u16(),
            }
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::ErrorKind;
    use std::borrow::Cow;

    /// Constraint-violation error as a Postgres driver would report it.
    /// `classified: false` mimics a driver that only carries the SQLSTATE.
    #[derive(Debug)]
    struct StubDbError {
        code: &'static str,
        classified: bool,
    }

    impl std::fmt::Display for StubDbError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "constraint violation ({})", self.code)
        }
    }

    impl std::error::Error for StubDbError {}

    impl sqlx::error::DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "constraint violation"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if !self.classified {
                return ErrorKind::Other;
            }
            match self.code {
                "23503" => ErrorKind::ForeignKeyViolation,
                "23505" => ErrorKind::UniqueViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn database_error(code: &'static str, classified: bool) -> sqlx::Error {
        sqlx::Error::Database(Box::new(StubDbError { code, classified }))
    }

    #[test]
    fn foreign_key_violation_maps_to_conflict() {
        let err = ApiError::from(database_error("23503", true));
        assert!(matches!(err, ApiError::Conflict(_)), "got {err:?}");
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err = ApiError::from(database_error("23505", true));
        assert!(matches!(err, ApiError::Conflict(_)), "got {err:?}");
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn sqlstate_fallback_classifies_unkinded_errors() {
        // Driver reports ErrorKind::Other; the SQLSTATE still decides.
        let fk = ApiError::from(database_error("23503", false));
        assert_eq!(fk.status(), StatusCode::CONFLICT);
        let unique = ApiError::from(database_error("23505", false));
        assert_eq!(unique.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn other_database_errors_map_to_internal() {
        let err = ApiError::from(database_error("42P01", true));
        assert!(matches!(err, ApiError::Internal(_)), "got {err:?}");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_errors_map_to_unauthorized() {
        for e in [
            AuthError::MissingToken,
            AuthError::Malformed,
            AuthError::BadSignature,
            AuthError::Expired,
        ] {
            assert_eq!(ApiError::from(e).status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("entry").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Conflict("in use".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Malformed("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_resource() {
        assert_eq!(ApiError::NotFound("entry").to_string(), "entry not found");
    }

    #[test]
    fn internal_response_hides_the_source() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "internal server error");
    }
}
