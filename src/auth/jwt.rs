use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{
    auth::claims::Claims,
    config::JwtConfig,
    error::AuthError,
    state::AppState,
    users::repo::User,
};

/// Token service. Holds the HMAC keys and TTL; stateless otherwise, so it is
/// safe to rebuild from config on every request. Rotating the secret is the
/// only way to invalidate outstanding tokens.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            ttl_seconds,
        } = state.config.jwt.clone();
        JwtKeys::new(&secret, Duration::from_secs(ttl_seconds))
    }
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a signed token for the given account.
    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        let claims = Claims {
            sub: user.user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: OffsetDateTime::now_utc().unix_timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = user.user_id, "jwt signed");
        Ok(token)
    }

    /// Verify structure, signature and freshness (`now < iat + ttl`).
    ///
    /// The signature is checked before expiry, so an expired token with a
    /// valid signature fails with `Expired`, never `BadSignature`. Whether
    /// the account still exists is not this service's concern.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is not an embedded claim here; it is derived from iat below.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::BadSignature,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed,
            })?;

        let issued = OffsetDateTime::from_unix_timestamp(data.claims.iat)
            .map_err(|_| AuthError::Malformed)?;
        let expires = issued + TimeDuration::seconds(self.ttl.as_secs() as i64);
        if OffsetDateTime::now_utc() >= expires {
            return Err(AuthError::Expired);
        }

        debug!(user_id = data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::Role;

    fn make_user(user_id: i32, role: Role) -> User {
        User {
            user_id,
            username: "johnd".into(),
            password_hash: "$argon2id$fake".into(),
            email: "johnd@example.com".into(),
            role,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn make_keys(secret: &str, ttl_seconds: u64) -> JwtKeys {
        JwtKeys::new(secret, Duration::from_secs(ttl_seconds))
    }

    #[test]
    fn sign_and_verify_returns_claims_unchanged() {
        let keys = make_keys("dev-secret", 3600);
        let user = make_user(21, Role::Regular);
        let token = keys.sign(&user).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 21);
        assert_eq!(claims.username, "johnd");
        assert_eq!(claims.email, "johnd@example.com");
        assert_eq!(claims.role, Role::Regular);
    }

    #[test]
    fn verify_rejects_wrong_secret_with_bad_signature() {
        let good = make_keys("secret-a", 3600);
        let other = make_keys("secret-b", 3600);
        let token = good.sign(&make_user(1, Role::Admin)).expect("sign");
        assert_eq!(other.verify(&token), Err(AuthError::BadSignature));
    }

    #[test]
    fn verify_rejects_expired_token_as_expired_not_bad_signature() {
        let keys = make_keys("dev-secret", 0);
        let token = keys.sign(&make_user(5, Role::Regular)).expect("sign");
        assert_eq!(keys.verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn fresh_token_with_long_ttl_verifies() {
        let keys = make_keys("dev-secret", 3600);
        let token = keys.sign(&make_user(5, Role::Regular)).expect("sign");
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn verify_rejects_garbage_as_malformed() {
        let keys = make_keys("dev-secret", 3600);
        assert_eq!(keys.verify("not-a-token"), Err(AuthError::Malformed));
        assert_eq!(keys.verify(""), Err(AuthError::Malformed));
    }
}
