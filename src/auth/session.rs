//! Server-side sessions.
//!
//! The client holds a signed `session` cookie whose value is an opaque random
//! token; the `sessions` table maps that token to a user id until it expires.

use anyhow::Context;
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha512};
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::users::repo_types::User;

pub const SESSION_COOKIE: &str = "session";
const TOKEN_LEN: usize = 48;

/// Cookie signing key derived from the configured secret of any length.
pub fn cookie_key(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}

pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Expiry `ttl_hours` from `now`; `Err` instead of overflowing the date range.
pub fn expiry(now: OffsetDateTime, ttl_hours: i64) -> anyhow::Result<OffsetDateTime> {
    ttl_hours
        .checked_mul(3600)
        .map(Duration::seconds)
        .and_then(|ttl| now.checked_add(ttl))
        .with_context(|| format!("session ttl of {ttl_hours}h is out of range"))
}

pub async fn create(db: &PgPool, user_id: i64, ttl_hours: i64) -> anyhow::Result<String> {
    let token = generate_token();
    let expires_at = expiry(OffsetDateTime::now_utc(), ttl_hours)?;
    sqlx::query(
        r#"
        INSERT INTO sessions (token, user_id, expires_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(&token)
    .bind(user_id)
    .bind(expires_at)
    .execute(db)
    .await
    .context("insert session")?;
    debug!(user_id, "session created");
    Ok(token)
}

pub async fn delete(db: &PgPool, token: &str) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(db)
        .await
        .context("delete session")?;
    Ok(())
}

pub async fn purge_expired(db: &PgPool) -> anyhow::Result<u64> {
    let res = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
        .execute(db)
        .await
        .context("purge expired sessions")?;
    Ok(res.rows_affected())
}

pub async fn find_user(db: &PgPool, token: &str) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.username, u.email, u.password, u.image_url,
               u.first_name, u.last_name, u.created_at
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = $1 AND s.expires_at > now()
        "#,
    )
    .bind(token)
    .fetch_optional(db)
    .await
    .context("find session user")?;
    Ok(user)
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Stores a fresh session for `user_id` and returns the jar carrying its cookie.
/// Expired sessions of every user are swept on the way.
pub async fn begin(
    db: &PgPool,
    jar: SignedCookieJar,
    user_id: i64,
    ttl_hours: i64,
) -> anyhow::Result<SignedCookieJar> {
    let purged = purge_expired(db).await?;
    if purged > 0 {
        debug!(purged, "expired sessions removed");
    }
    let token = create(db, user_id, ttl_hours).await?;
    Ok(jar.add(session_cookie(token)))
}

/// Drops the server-side session, if any, and removes the cookie.
pub async fn end(db: &PgPool, jar: SignedCookieJar) -> anyhow::Result<SignedCookieJar> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(jar);
    };
    delete(db, cookie.value()).await?;
    debug!("session ended");
    Ok(forget(jar))
}

/// Removes the session cookie from the client without touching the database.
pub fn forget(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
