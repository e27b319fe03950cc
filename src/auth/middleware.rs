use axum::{
    extract::{Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::debug;

use super::{
    extractors::Viewer,
    session::{self, SESSION_COOKIE},
};
use crate::{error::AppError, state::AppState};

/// Resolves the session cookie once per request and leaves the [`Viewer`] in the
/// request extensions. A cookie whose session is gone or expired gets its row
/// deleted and is removed from the client, unless the handler set a new one.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = SignedCookieJar::from_headers(request.headers(), state.cookie_key.clone());
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        return next.run(request).await;
    };

    match session::find_user(&state.db, &token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(Viewer::Authenticated(user));
            return next.run(request).await;
        }
        Ok(None) => {}
        Err(e) => return AppError::from(e).into_response(),
    }

    debug!("dropping stale session cookie");
    if let Err(e) = session::delete(&state.db, &token).await {
        return AppError::from(e).into_response();
    }
    request.extensions_mut().insert(Viewer::Anonymous);

    let res = next.run(request).await;
    if sets_session_cookie(&res) {
        res
    } else {
        (session::forget(jar), res).into_response()
    }
}

fn sets_session_cookie(res: &Response) -> bool {
    let prefix = format!("{SESSION_COOKIE}=");
    res.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&prefix))
}
