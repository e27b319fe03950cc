use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    auth::{dto::non_blank, extractors::Viewer},
    error::{AppError, AppResult},
    flash::{Flash, Flashes},
    state::AppState,
    views,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub s: Option<String>,
}

pub fn movie_routes() -> Router<AppState> {
    Router::new().route("/movies", get(search))
}

/// GET /movies?s=<term>
#[instrument(skip_all)]
pub async fn search(
    State(state): State<AppState>,
    viewer: Viewer,
    flashes: Flashes,
    Query(query): Query<SearchQuery>,
) -> AppResult<Response> {
    let Some(term) = non_blank(query.s) else {
        let warning = Flash::warning("Please enter a movie title to search for.");
        return Ok((warning, Redirect::to("/")).into_response());
    };

    let results = state
        .movies
        .search(&term)
        .await
        .map_err(|e| AppError::UpstreamFailure(format!("{e:#}")))?;
    info!(%term, "movie search");

    Ok(views::movies::results(&term, &results)
        .viewer(viewer.user())
        .flashes(flashes)
        .into_response())
}
