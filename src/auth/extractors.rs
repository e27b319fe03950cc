use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::debug;

use super::session::{self, SESSION_COOKIE};
use crate::{error::AppError, state::AppState, users::repo_types::User};

/// Who is making the request, resolved from the signed session cookie.
#[derive(Debug, Clone)]
pub enum Viewer {
    Anonymous,
    Authenticated(User),
}

impl Viewer {
    pub fn user(&self) -> Option<&User> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Authenticated(user) => Some(user),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(viewer) = parts.extensions.get::<Viewer>() {
            return Ok(viewer.clone());
        }

        let jar = SignedCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(Viewer::Anonymous);
        };

        match session::find_user(&state.db, cookie.value()).await? {
            Some(user) => Ok(Viewer::Authenticated(user)),
            None => {
                debug!("session cookie without a live session");
                Ok(Viewer::Anonymous)
            }
        }
    }
}

/// Guard for routes that need a login; anonymous requests are rejected with
/// `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Viewer::from_request_parts(parts, state).await? {
            Viewer::Authenticated(user) => Ok(AuthUser(user)),
            Viewer::Anonymous => Err(AppError::Unauthorized),
        }
    }
}
