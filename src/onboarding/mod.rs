use axum::{routing::get, Router};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/onboarding",
        get(handlers::fetch_onboarding).post(handlers::save_onboarding),
    )
}
