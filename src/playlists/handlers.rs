use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::{AuthUser, Viewer},
    error::AppResult,
    flash::Flashes,
    playlists::{dto::NewPlaylistForm, repo_types::Playlist, services},
    state::AppState,
    users::handlers::{load_user, viewer_likes},
    views,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/playlists", get(list_playlists))
        .route("/playlists/:playlist_id", get(show_playlist))
        .route("/users/:user_id/playlists", get(list_user_playlists))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/playlists/new", get(new_playlist_form).post(create_playlist))
        .route("/playlist/:playlist_id/delete", post(delete_playlist))
}

#[instrument(skip_all)]
pub async fn list_playlists(
    State(state): State<AppState>,
    viewer: Viewer,
    flashes: Flashes,
) -> AppResult<impl IntoResponse> {
    let all = Playlist::list_all(&state.db).await?;
    let liked = viewer_likes(&state.db, &viewer).await?;
    Ok(views::playlists::index(&all, viewer.user(), &liked)
        .viewer(viewer.user())
        .flashes(flashes))
}

#[instrument(skip(state, viewer, flashes))]
pub async fn show_playlist(
    State(state): State<AppState>,
    viewer: Viewer,
    flashes: Flashes,
    Path(playlist_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let playlist = services::load(&state.db, playlist_id).await?;
    let liked = viewer_likes(&state.db, &viewer).await?;
    Ok(views::playlists::show(&playlist, viewer.user(), &liked)
        .viewer(viewer.user())
        .flashes(flashes))
}

#[instrument(skip(state, viewer, flashes))]
pub async fn list_user_playlists(
    State(state): State<AppState>,
    viewer: Viewer,
    flashes: Flashes,
    Path(user_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let user = load_user(&state.db, user_id).await?;
    let owned = Playlist::list_by_user(&state.db, user.id, None).await?;
    let liked = viewer_likes(&state.db, &viewer).await?;
    Ok(views::users::owned_playlists(&user, &owned, viewer.user(), &liked)
        .viewer(viewer.user())
        .flashes(flashes))
}

#[instrument(skip_all)]
pub async fn new_playlist_form(AuthUser(me): AuthUser, flashes: Flashes) -> impl IntoResponse {
    views::playlists::new_form(&NewPlaylistForm::default(), &[])
        .viewer(Some(&me))
        .flashes(flashes)
}

#[instrument(skip_all, fields(user_id = me.id))]
pub async fn create_playlist(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Form(form): Form<NewPlaylistForm>,
) -> AppResult<Response> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(views::playlists::new_form(&form, &errors)
            .viewer(Some(&me))
            .into_response());
    }

    let playlist = Playlist::create(&state.db, me.id, form.title.trim(), form.text.trim()).await?;
    info!(playlist_id = playlist.id, "playlist created");
    Ok(Redirect::to(&format!("/users/{}", me.id)).into_response())
}

/// POST /playlist/:playlist_id/delete. Owner only.
#[instrument(skip(state, me))]
pub async fn delete_playlist(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(playlist_id): Path<i64>,
) -> AppResult<Redirect> {
    services::delete_owned(&state.db, &me, playlist_id).await?;
    Ok(Redirect::to(&format!("/users/{}", me.id)))
}
