use anyhow::Context;
use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    users::repo_types::{NewUser, ProfileChanges, User},
};

impl User {
    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, image_url, first_name, last_name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, image_url, first_name, last_name, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    /// All users, or only those whose username contains `filter` (case-sensitive, literal).
    pub async fn list(db: &PgPool, filter: Option<&str>) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, image_url, first_name, last_name, created_at
            FROM users
            WHERE $1::text IS NULL OR strpos(username, $1) > 0
            ORDER BY username
            "#,
        )
        .bind(filter)
        .fetch_all(db)
        .await
        .context("list users")?;
        Ok(users)
    }

    pub async fn create(db: &PgPool, new: &NewUser<'_>) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password, first_name, last_name, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, email, password, image_url, first_name, last_name, created_at
            "#,
        )
        .bind(new.username)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(new.image_url)
        .fetch_one(db)
        .await
        .map_err(unique_to_duplicate)
    }

    pub async fn update_profile(
        db: &PgPool,
        id: i64,
        changes: &ProfileChanges<'_>,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET username = $2, email = $3, image_url = $4, first_name = $5, last_name = $6
             WHERE id = $1
            RETURNING id, username, email, password, image_url, first_name, last_name, created_at
            "#,
        )
        .bind(id)
        .bind(changes.username)
        .bind(changes.email)
        .bind(changes.image_url)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .fetch_optional(db)
        .await
        .map_err(unique_to_duplicate)?
        .ok_or(AppError::NotFound)
    }

    /// Deletes the user with everything that references it, in one transaction:
    /// likes given, likes on the user's playlists, the playlists, sessions, then the row.
    pub async fn delete_cascade(db: &PgPool, id: i64) -> anyhow::Result<()> {
        let mut tx = db.begin().await.context("begin tx")?;

        sqlx::query(
            r#"
            DELETE FROM likes
             WHERE user_id = $1
                OR playlist_id IN (SELECT id FROM playlists WHERE user_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("delete likes of user")?;

        sqlx::query("DELETE FROM playlists WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete playlists of user")?;

        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete sessions of user")?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete user")?;

        tx.commit().await.context("commit tx")?;
        Ok(())
    }
}

fn unique_to_duplicate(e: sqlx::Error) -> AppError {
    if AppError::is_unique_violation(&e) {
        AppError::DuplicateCredential
    } else {
        AppError::Database(e)
    }
}
