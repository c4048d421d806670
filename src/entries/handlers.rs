use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::claims::Principal,
    entries::{
        dto::{EntryChanges, EntryDeleted},
        repo::Entry,
    },
    error::ApiError,
    policy::{self, ListScope},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries).post(create_entry))
        .route(
            "/entries/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

#[instrument(skip(state, principal))]
async fn list_entries(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<Vec<Entry>>, ApiError> {
    let entries = match policy::entry_list_scope(&principal) {
        ListScope::All => Entry::list_all(&state.db).await?,
        ListScope::Owner(id) => Entry::list_by_owner(&state.db, id).await?,
    };
    Ok(Json(entries))
}

#[instrument(skip(state, principal))]
async fn get_entry(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<Entry>, ApiError> {
    // Existence check precedes the ownership check.
    let entry = Entry::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("entry"))?;
    policy::can_read_entry(&principal, &entry)?;
    Ok(Json(entry))
}

#[instrument(skip(state, principal, payload))]
async fn create_entry(
    State(state): State<AppState>,
    principal: Principal,
    Json(payload): Json<EntryChanges>,
) -> Result<(StatusCode, Json<Entry>), ApiError> {
    let entry_date = payload.validate_for_create()?;

    // Ownership is taken from the principal, not the body.
    let entry = Entry::create(&state.db, principal.user_id, entry_date, &payload).await?;

    info!(entry_id = entry.entry_id, user_id = principal.user_id, "entry created");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state, principal, payload))]
async fn update_entry(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
    Json(payload): Json<EntryChanges>,
) -> Result<Json<Entry>, ApiError> {
    payload.validate_for_update()?;

    let entry = Entry::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("entry"))?;
    policy::can_modify_entry(&principal, &entry)?;

    let updated = Entry::update(&state.db, id, &payload).await?;
    info!(entry_id = id, "entry updated");
    Ok(Json(updated))
}

#[instrument(skip(state, principal))]
async fn delete_entry(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i32>,
) -> Result<Json<EntryDeleted>, ApiError> {
    let entry = Entry::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("entry"))?;
    policy::can_modify_entry(&principal, &entry)?;

    Entry::delete(&state.db, id).await?;
    info!(entry_id = id, "entry deleted");
    Ok(Json(EntryDeleted {
        message: "entry deleted".into(),
        entry_id: id,
    }))
}
