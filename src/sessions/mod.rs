use axum::{routing::post, Router};

use crate::state::AppState;

pub mod aggregate;
mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session/start", post(handlers::start_session))
        .route("/session/end", post(handlers::end_session))
}
