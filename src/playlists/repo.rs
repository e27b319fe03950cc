use anyhow::Context;
use sqlx::PgPool;

use crate::playlists::repo_types::Playlist;

impl Playlist {
    pub async fn create(
        db: &PgPool,
        user_id: i64,
        title: &str,
        text: &str,
    ) -> anyhow::Result<Playlist> {
        let playlist = sqlx::query_as::<_, Playlist>(
            r#"
            WITH p AS (
                INSERT INTO playlists (title, text, user_id)
                VALUES ($1, $2, $3)
                RETURNING id, title, text, user_id, created_at
            )
            SELECT p.id, p.title, p.text, p.user_id, u.username AS owner_username, p.created_at
            FROM p
            JOIN users u ON u.id = p.user_id
            "#,
        )
        .bind(title)
        .bind(text)
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("insert playlist")?;
        Ok(playlist)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Playlist>> {
        let playlist = sqlx::query_as::<_, Playlist>(
            r#"
            SELECT p.id, p.title, p.text, p.user_id, u.username AS owner_username, p.created_at
            FROM playlists p
            JOIN users u ON u.id = p.user_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find playlist by id")?;
        Ok(playlist)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Playlist>> {
        let rows = sqlx::query_as::<_, Playlist>(
            r#"
            SELECT p.id, p.title, p.text, p.user_id, u.username AS owner_username, p.created_at
            FROM playlists p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .fetch_all(db)
        .await
        .context("list playlists")?;
        Ok(rows)
    }

    /// Newest first; `limit = None` returns every playlist of the user.
    pub async fn list_by_user(
        db: &PgPool,
        user_id: i64,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<Playlist>> {
        let rows = sqlx::query_as::<_, Playlist>(
            r#"
            SELECT p.id, p.title, p.text, p.user_id, u.username AS owner_username, p.created_at
            FROM playlists p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = $1
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(db)
        .await
        .context("list playlists by user")?;
        Ok(rows)
    }

    pub async fn list_not_owned_by(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<Playlist>> {
        let rows = sqlx::query_as::<_, Playlist>(
            r#"
            SELECT p.id, p.title, p.text, p.user_id, u.username AS owner_username, p.created_at
            FROM playlists p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id <> $1
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list playlists not owned by user")?;
        Ok(rows)
    }

    pub async fn liked_by(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<Playlist>> {
        let rows = sqlx::query_as::<_, Playlist>(
            r#"
            SELECT p.id, p.title, p.text, p.user_id, u.username AS owner_username, p.created_at
            FROM likes l
            JOIN playlists p ON p.id = l.playlist_id
            JOIN users u ON u.id = p.user_id
            WHERE l.user_id = $1
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list liked playlists")?;
        Ok(rows)
    }

    pub async fn liked_ids(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"SELECT playlist_id FROM likes WHERE user_id = $1 ORDER BY playlist_id"#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list liked playlist ids")?;
        Ok(ids)
    }

    /// Flips the (user, playlist) like. Returns whether the pair is liked afterwards.
    pub async fn toggle_like(db: &PgPool, user_id: i64, playlist_id: i64) -> anyhow::Result<bool> {
        let mut tx = db.begin().await.context("begin tx")?;

        let removed = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND playlist_id = $2")
            .bind(user_id)
            .bind(playlist_id)
            .execute(&mut *tx)
            .await
            .context("delete like")?
            .rows_affected();

        if removed == 0 {
            sqlx::query(
                r#"
                INSERT INTO likes (user_id, playlist_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(playlist_id)
            .execute(&mut *tx)
            .await
            .context("insert like")?;
        }

        tx.commit().await.context("commit tx")?;
        Ok(removed == 0)
    }

    /// Removes the playlist and its likes in one transaction.
    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<()> {
        let mut tx = db.begin().await.context("begin tx")?;

        sqlx::query("DELETE FROM likes WHERE playlist_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete likes of playlist")?;

        sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete playlist")?;

        tx.commit().await.context("commit tx")?;
        Ok(())
    }
}
