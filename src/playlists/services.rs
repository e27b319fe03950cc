use sqlx::PgPool;
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    playlists::repo_types::Playlist,
    users::repo_types::User,
};

pub async fn load(db: &PgPool, playlist_id: i64) -> AppResult<Playlist> {
    Playlist::find_by_id(db, playlist_id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Likes or unlikes someone else's playlist. Own playlists cannot be liked.
pub async fn toggle_like(db: &PgPool, user: &User, playlist_id: i64) -> AppResult<bool> {
    let playlist = load(db, playlist_id).await?;
    if playlist.is_owned_by(user.id) {
        warn!(user_id = user.id, playlist_id, "tried to like own playlist");
        return Err(AppError::Forbidden);
    }

    let liked = Playlist::toggle_like(db, user.id, playlist.id).await?;
    info!(user_id = user.id, playlist_id, liked, "like toggled");
    Ok(liked)
}

pub async fn delete_owned(db: &PgPool, user: &User, playlist_id: i64) -> AppResult<()> {
    let playlist = load(db, playlist_id).await?;
    if !playlist.is_owned_by(user.id) {
        warn!(user_id = user.id, playlist_id, owner_id = playlist.user_id, "delete by non-owner");
        return Err(AppError::Forbidden);
    }

    Playlist::delete(db, playlist.id).await?;
    info!(user_id = user.id, playlist_id, "playlist deleted");
    Ok(())
}
