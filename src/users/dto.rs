use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{auth::claims::Role, error::ApiError, users::repo::User};

/// Body for registration and profile update. Both operations require every
/// field; partial account updates are not supported. Fields are optional here
/// only so that all violations can be reported in one aggregated error
/// instead of a deserialization failure on the first missing field.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

/// A payload that passed validation, with normalized fields.
#[derive(Debug)]
pub struct ValidUser {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl UserPayload {
    pub fn validate(self) -> Result<ValidUser, ApiError> {
        let mut problems: Vec<&str> = Vec::new();

        let username = self
            .username
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if !(3..=20).contains(&username.chars().count())
            || !username.chars().all(|c| c.is_ascii_alphanumeric())
        {
            problems.push("username must be 3-20 alphanumeric characters");
        }

        let password = self.password.unwrap_or_default();
        if !(8..=128).contains(&password.chars().count()) {
            problems.push("password must be 8-128 characters");
        }

        let email = self
            .email
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();
        if !is_valid_email(&email) {
            problems.push("email must be a valid address");
        }

        if problems.is_empty() {
            Ok(ValidUser {
                username,
                password,
                email,
            })
        } else {
            Err(ApiError::Malformed(problems.join("; ")))
        }
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Public part of an account returned to clients. No password hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

/// Response for a successful account deletion.
#[derive(Debug, Serialize)]
pub struct UserDeleted {
    pub message: String,
    pub user_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(username: &str, password: &str, email: &str) -> UserPayload {
        UserPayload {
            username: Some(username.into()),
            password: Some(password.into()),
            email: Some(email.into()),
        }
    }

    #[test]
    fn valid_payload_passes_and_normalizes() {
        let valid = payload(" johnd ", "examplepass", " JohnD@Example.com ")
            .validate()
            .expect("valid");
        assert_eq!(valid.username, "johnd");
        assert_eq!(valid.email, "johnd@example.com");
    }

    #[test]
    fn missing_fields_are_aggregated_into_one_error() {
        let err = UserPayload {
            username: None,
            password: None,
            email: None,
        }
        .validate()
        .unwrap_err();
        let ApiError::Malformed(msg) = err else {
            panic!("expected Malformed, got {err:?}");
        };
        assert!(msg.contains("username"));
        assert!(msg.contains("password"));
        assert!(msg.contains("email"));
    }

    #[test]
    fn username_rules_are_enforced() {
        assert!(payload("ab", "examplepass", "a@b.com").validate().is_err());
        assert!(payload("john_doe", "examplepass", "a@b.com")
            .validate()
            .is_err());
        assert!(payload(&"x".repeat(21), "examplepass", "a@b.com")
            .validate()
            .is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(payload("johnd", "short", "a@b.com").validate().is_err());
    }

    #[test]
    fn bad_email_shapes_are_rejected() {
        for email in ["plainaddress", "a@b", "a b@c.com", "@example.com"] {
            assert!(payload("johnd", "examplepass", email).validate().is_err());
        }
    }

    #[test]
    fn public_user_serialization_omits_the_hash() {
        let user = User {
            user_id: 1,
            username: "johnd".into(),
            password_hash: "$argon2id$secret".into(),
            email: "johnd@example.com".into(),
            role: Role::Regular,
            created_at: time::OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(json.contains("johnd@example.com"));
        assert!(json.contains("\"regular\""));
        assert!(!json.contains("argon2id"));
    }
}
