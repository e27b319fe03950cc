use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, SignupForm},
        extractors::Viewer,
        services, session,
    },
    error::{AppError, AppResult},
    flash::{Flash, Flashes},
    state::AppState,
    views,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(signup_form).post(signup))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

/// GET /signup. Any existing session is ended first.
#[instrument(skip_all)]
pub async fn signup_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    flashes: Flashes,
) -> AppResult<impl IntoResponse> {
    let jar = session::end(&state.db, jar).await?;
    let page = views::auth::signup(&SignupForm::default(), &[]).flashes(flashes);
    Ok((jar, page))
}

#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(mut form): Form<SignupForm>,
) -> AppResult<Response> {
    let jar = session::end(&state.db, jar).await?;

    form.normalize();
    let errors = form.validate();
    if !errors.is_empty() {
        warn!(count = errors.len(), "signup form invalid");
        return Ok((jar, views::auth::signup(&form, &errors)).into_response());
    }

    let user = match services::signup(&state.db, &form).await {
        Ok(user) => user,
        Err(AppError::DuplicateCredential) => {
            warn!(username = %form.username, "username or email already taken");
            let page = views::auth::signup(&form, &[]).flash(Flash::danger("Username already taken"));
            return Ok((jar, page).into_response());
        }
        Err(e) => return Err(e),
    };

    let jar = session::begin(&state.db, jar, user.id, state.config.session.ttl_hours).await?;
    info!(user_id = user.id, username = %user.username, "user signed up");
    Ok((jar, Redirect::to("/")).into_response())
}

#[instrument(skip_all)]
pub async fn login_form(viewer: Viewer, flashes: Flashes) -> impl IntoResponse {
    views::auth::login(&LoginForm::default(), &[])
        .viewer(viewer.user())
        .flashes(flashes)
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(views::auth::login(&form, &errors).into_response());
    }

    let Some(user) = services::authenticate(&state.db, &form.username, &form.password).await? else {
        warn!(username = %form.username, "login rejected");
        let page = views::auth::login(&form, &[]).flash(Flash::danger("Invalid credentials."));
        return Ok(page.into_response());
    };

    let jar = session::end(&state.db, jar).await?;
    let jar = session::begin(&state.db, jar, user.id, state.config.session.ttl_hours).await?;
    info!(user_id = user.id, "user logged in");
    let greeting = Flash::success(format!("Hello, {}!", user.username));
    Ok((jar, greeting, Redirect::to("/")).into_response())
}

#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<impl IntoResponse> {
    let jar = session::end(&state.db, jar).await?;
    info!("user logged out");
    Ok((
        jar,
        Flash::info("You have successfully logged out."),
        Redirect::to("/login"),
    ))
}
