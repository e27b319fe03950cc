use axum::{extract::State, response::IntoResponse, routing::get, Router};
use tracing::instrument;

use crate::{
    auth::extractors::Viewer,
    error::AppResult,
    flash::Flashes,
    playlists::repo_types::Playlist,
    state::AppState,
    users::handlers::viewer_likes,
    views,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(homepage))
}

/// Logged-in users get everyone else's playlists; anonymous visitors the landing page.
#[instrument(skip_all)]
pub async fn homepage(
    State(state): State<AppState>,
    viewer: Viewer,
    flashes: Flashes,
) -> AppResult<impl IntoResponse> {
    let page = match viewer.user() {
        Some(me) => {
            let others = Playlist::list_not_owned_by(&state.db, me.id).await?;
            let liked = viewer_likes(&state.db, &viewer).await?;
            views::home::feed(me, &others, &liked)
        }
        None => views::home::anonymous(),
    };
    Ok(page.viewer(viewer.user()).flashes(flashes))
}

pub async fn not_found(viewer: Viewer) -> impl IntoResponse {
    views::not_found().viewer(viewer.user())
}
