use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::SignedCookieJar;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::non_blank,
        extractors::{AuthUser, Viewer},
        services::authenticate,
        session,
    },
    error::{AppError, AppResult},
    flash::{Flash, Flashes},
    playlists::{self, repo_types::Playlist},
    state::AppState,
    users::{
        dto::{EditProfileForm, UserSearch},
        repo_types::User,
    },
    views,
};

/// How many playlists the profile page shows.
pub const PROFILE_PLAYLIST_LIMIT: i64 = 5;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/profile", get(profile_form).post(update_profile))
        .route("/users/delete", post(delete_user))
        .route("/users/add_like/:playlist_id", post(toggle_like))
        .route("/users/:user_id", get(show_user))
        .route("/users/:user_id/likes", get(show_likes))
}

pub(crate) async fn load_user(db: &PgPool, user_id: i64) -> AppResult<User> {
    User::find_by_id(db, user_id).await?.ok_or(AppError::NotFound)
}

/// Ids of the playlists the viewer liked, for rendering like buttons.
pub(crate) async fn viewer_likes(db: &PgPool, viewer: &Viewer) -> AppResult<HashSet<i64>> {
    match viewer.user() {
        Some(user) => Ok(Playlist::liked_ids(db, user.id).await?.into_iter().collect()),
        None => Ok(HashSet::new()),
    }
}

/// GET /users?q=<substring>
#[instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    viewer: Viewer,
    flashes: Flashes,
    Query(search): Query<UserSearch>,
) -> AppResult<impl IntoResponse> {
    let q = non_blank(search.q);
    let users = User::list(&state.db, q.as_deref()).await?;
    Ok(views::users::index(&users, q.as_deref())
        .viewer(viewer.user())
        .flashes(flashes))
}

#[instrument(skip(state, viewer, flashes))]
pub async fn show_user(
    State(state): State<AppState>,
    viewer: Viewer,
    flashes: Flashes,
    Path(user_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let user = load_user(&state.db, user_id).await?;
    let recent = Playlist::list_by_user(&state.db, user.id, Some(PROFILE_PLAYLIST_LIMIT)).await?;
    let liked_ids = Playlist::liked_ids(&state.db, user.id).await?;
    let mine = viewer_likes(&state.db, &viewer).await?;

    Ok(views::users::show(&user, &recent, &liked_ids, viewer.user(), &mine)
        .viewer(viewer.user())
        .flashes(flashes))
}

#[instrument(skip(state, me, flashes))]
pub async fn show_likes(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    flashes: Flashes,
    Path(user_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let user = load_user(&state.db, user_id).await?;
    let liked = Playlist::liked_by(&state.db, user.id).await?;
    let mine: HashSet<i64> = Playlist::liked_ids(&state.db, me.id).await?.into_iter().collect();

    Ok(views::users::likes(&user, &liked, Some(&me), &mine)
        .viewer(Some(&me))
        .flashes(flashes))
}

/// POST /users/add_like/:playlist_id
#[instrument(skip(state, me))]
pub async fn toggle_like(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(playlist_id): Path<i64>,
) -> AppResult<Redirect> {
    playlists::services::toggle_like(&state.db, &me, playlist_id).await?;
    Ok(Redirect::to("/"))
}

#[instrument(skip_all)]
pub async fn profile_form(AuthUser(me): AuthUser, flashes: Flashes) -> impl IntoResponse {
    views::users::edit(&EditProfileForm::from_user(&me), me.id, &[])
        .viewer(Some(&me))
        .flashes(flashes)
}

/// POST /users/profile. Changes apply only after the current password checks out.
#[instrument(skip_all, fields(user_id = me.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Form(mut form): Form<EditProfileForm>,
) -> AppResult<Response> {
    form.normalize();
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(views::users::edit(&form, me.id, &errors)
            .viewer(Some(&me))
            .into_response());
    }

    if authenticate(&state.db, &me.username, &form.password).await?.is_none() {
        warn!("profile edit with wrong password");
        return Ok(views::users::edit(&form, me.id, &[])
            .viewer(Some(&me))
            .flash(Flash::danger("Incorrect password, please try again"))
            .into_response());
    }

    match User::update_profile(&state.db, me.id, &form.changes()).await {
        Ok(updated) => {
            info!(username = %updated.username, "profile updated");
            Ok(Redirect::to(&format!("/users/{}", updated.id)).into_response())
        }
        Err(AppError::DuplicateCredential) => {
            warn!("profile edit hit a taken username or email");
            Ok(views::users::edit(&form, me.id, &[])
                .viewer(Some(&me))
                .flash(Flash::danger("Username or email already taken"))
                .into_response())
        }
        Err(e) => Err(e),
    }
}

/// POST /users/delete. Logs out, then removes the account and everything it owns.
#[instrument(skip_all, fields(user_id = me.id))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    jar: SignedCookieJar,
) -> AppResult<impl IntoResponse> {
    let jar = session::end(&state.db, jar).await?;
    User::delete_cascade(&state.db, me.id).await?;
    info!("user deleted");
    Ok((jar, Redirect::to("/signup")))
}
