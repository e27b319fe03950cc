use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::{debug, error};

use super::{
    dto::SignupForm,
    password::{hash_password, verify_password},
};
use crate::{
    error::AppResult,
    users::repo_types::{NewUser, User, DEFAULT_IMAGE_URL},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Hashes the password and inserts the user.
///
/// A taken username or email surfaces as `AppError::DuplicateCredential`.
pub async fn signup(db: &PgPool, form: &SignupForm) -> AppResult<User> {
    let hash = hash_password(&form.password)?;
    let new_user = NewUser {
        username: &form.username,
        email: &form.email,
        password_hash: &hash,
        first_name: &form.first_name,
        last_name: &form.last_name,
        image_url: form.image_url.as_deref().unwrap_or(DEFAULT_IMAGE_URL),
    };
    User::create(db, &new_user).await
}

/// The user when the credentials match, `None` otherwise.
///
/// Unknown usernames and wrong passwords are indistinguishable to the caller.
pub async fn authenticate(
    db: &PgPool,
    username: &str,
    password: &str,
) -> anyhow::Result<Option<User>> {
    let Some(user) = User::find_by_username(db, username.trim()).await? else {
        debug!("authenticate: unknown username");
        return Ok(None);
    };

    match verify_password(password, &user.password) {
        Ok(true) => Ok(Some(user)),
        Ok(false) => {
            debug!(user_id = user.id, "authenticate: password mismatch");
            Ok(None)
        }
        Err(e) => {
            error!(error = %e, user_id = user.id, "stored password hash unreadable");
            Ok(None)
        }
    }
}
