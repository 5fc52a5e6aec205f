use axum::Router;

use crate::state::AppState;

pub mod availability;
mod dto;
pub mod handlers;
pub mod repo;
pub mod services;
pub mod status;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
