use crate::state::AppState;
use axum::Router;

pub mod claims;
mod dto;
mod extractors;
mod handlers;
pub mod jwt;
pub mod password;

pub fn router() -> Router<AppState> {
    handlers::router()
}
