use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        claims::Principal,
        dto::{LoginRequest, LoginResponse, MeResponse},
        jwt::JwtKeys,
        password::verify_password,
    },
    error::ApiError,
    state::AppState,
    users::repo::User,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = payload.username.trim();

    // Unknown username and wrong password take the same exit.
    let user = User::find_by_username(&state.db, username)
        .await?
        .ok_or_else(|| {
            warn!("login with unknown username");
            ApiError::InvalidCredentials
        })?;

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = user.user_id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user)?;

    info!(user_id = user.user_id, "user logged in");
    Ok(Json(LoginResponse {
        message: "logged in successfully".into(),
        user: user.into(),
        token,
    }))
}

#[instrument(skip(principal))]
async fn me(principal: Principal) -> Json<MeResponse> {
    Json(MeResponse { user: principal })
}
