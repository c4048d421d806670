use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{claims::Principal, password::hash_password},
    error::ApiError,
    policy::{self, ListScope},
    state::AppState,
    users::{
        dto::{PublicUser, UserDeleted, UserPayload},
        repo::User,
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(list_users).post(register).put(update_profile),
        )
        .route("/users/:id", get(get_user).delete(delete_user))
}

/// Registration is the one unauthenticated write.
#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let valid = payload.validate()?;

    if User::find_by_username(&state.db, &valid.username)
        .await?
        .is_some()
    {
        warn!(username = %valid.username, "username already registered");
        return Err(ApiError::Conflict("username already registered".into()));
    }

    let hash = hash_password(&valid.password)?;
    let user = User::create(&state.db, &valid.username, &valid.email, &hash).await?;

    info!(user_id = user.user_id, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, principal))]
async fn list_users(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let users = match policy::account_list_scope(&principal) {
        ListScope::All => User::list_all(&state.db).await?,
        ListScope::Owner(id) => User::find_by_id(&state.db, id)
            .await?
            .into_iter()
            .collect(),
    };
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state, principal))]
async fn get_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<PublicUser>, ApiError> {
    // Existence first: a missing account is 404 regardless of who asks.
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    policy::can_read_account(&principal, user.user_id)?;
    Ok(Json(user.into()))
}

/// Updates the caller's own account; all fields must be present together.
#[instrument(skip(state, principal, payload))]
async fn update_profile(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<UserPayload>,
) -> Result<Json<PublicUser>, ApiError> {
    let valid = payload.validate()?;
    let hash = hash_password(&valid.password)?;

    let user = User::update(
        &state.db,
        principal.user_id,
        &valid.username,
        &valid.email,
        &hash,
    )
    .await?
    .ok_or(ApiError::NotFound("user"))?;

    info!(user_id = user.user_id, "profile updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state, principal))]
async fn delete_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<UserDeleted>, ApiError> {
    policy::can_delete_account(&principal)?;

    // A foreign-key violation from owned entries maps to 409.
    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("user"));
    }

    info!(user_id = id, "user deleted");
    Ok(Json(UserDeleted {
        message: "user deleted".into(),
        user_id: id,
    }))
}
