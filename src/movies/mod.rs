pub mod client;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub use client::{MovieSearch, OmdbClient};

pub fn router() -> Router<AppState> {
    handlers::movie_routes()
}
