//! Server-rendered HTML.
//!
//! Every page is a [`Page`]: a title, a body fragment and the request-scoped bits
//! (viewer, flash messages) the shared layout needs. User-provided text must go
//! through [`escape`] before it is interpolated.

pub mod auth;
pub mod home;
pub mod movies;
pub mod playlists;
pub mod users;

use axum::{
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use time::{macros::format_description, OffsetDateTime};

use crate::{
    flash::{self, Flash, Flashes},
    users::repo_types::User,
};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn format_date(ts: OffsetDateTime) -> String {
    ts.format(format_description!("[month repr:short] [day], [year]"))
        .unwrap_or_default()
}

/// Renders `<li>` items for a list of messages, used for form errors.
pub(crate) fn error_list(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", escape(e)))
        .collect();
    format!(r#"<ul class="form-errors">{items}</ul>"#)
}

#[derive(Debug)]
struct NavUser {
    id: i64,
    username: String,
    image_url: String,
}

#[derive(Debug)]
pub struct Page {
    title: String,
    body: String,
    nav: Option<NavUser>,
    flashes: Vec<Flash>,
    clear_flash: bool,
    status: StatusCode,
}

impl Page {
    pub fn new(title: impl Into<String>, body: String) -> Self {
        Self {
            title: title.into(),
            body,
            nav: None,
            flashes: Vec::new(),
            clear_flash: false,
            status: StatusCode::OK,
        }
    }

    pub fn viewer(mut self, user: Option<&User>) -> Self {
        self.nav = user.map(|u| NavUser {
            id: u.id,
            username: u.username.clone(),
            image_url: u.image_url.clone(),
        });
        self
    }

    /// Shows the incoming flashes and clears their cookie.
    pub fn flashes(mut self, incoming: Flashes) -> Self {
        self.clear_flash |= incoming.present;
        self.flashes.extend(incoming.messages);
        self
    }

    pub fn flash(mut self, flash: Flash) -> Self {
        self.flashes.push(flash);
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn render(&self) -> String {
        let nav_links = match &self.nav {
            Some(user) => format!(
                r#"<li><a href="/playlists/new">New playlist</a></li>
        <li><a href="/users/{id}"><img src="{img}" alt="" class="avatar-sm"> @{name}</a></li>
        <li><a href="/users/profile">Edit profile</a></li>
        <li><a href="/logout">Log out</a></li>"#,
                id = user.id,
                img = escape(&user.image_url),
                name = escape(&user.username),
            ),
            None => r#"<li><a href="/signup">Sign up</a></li>
        <li><a href="/login">Log in</a></li>"#
                .to_string(),
        };

        let flashes: String = self
            .flashes
            .iter()
            .map(|f| {
                format!(
                    r#"<div class="alert alert-{}">{}</div>"#,
                    f.level.as_str(),
                    escape(&f.message)
                )
            })
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Movie Passport</title>
    <link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
<nav class="navbar">
    <a class="brand" href="/">Movie Passport</a>
    <ul class="nav-links">
        <li><a href="/playlists">Playlists</a></li>
        <li><a href="/users">Users</a></li>
        {nav_links}
    </ul>
    <form class="nav-search" action="/movies" method="get">
        <input name="s" placeholder="Search movies" aria-label="Search movies">
        <button type="submit">Search</button>
    </form>
</nav>
<main class="container">
{flashes}
{body}
</main>
</body>
</html>
"#,
            title = escape(&self.title),
            body = self.body,
        )
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        let mut res = (self.status, Html(self.render())).into_response();
        if self.clear_flash {
            if let Ok(value) = HeaderValue::from_str(&flash::clear_cookie().to_string()) {
                res.headers_mut().append(SET_COOKIE, value);
            }
        }
        res
    }
}

pub fn not_found() -> Page {
    Page::new(
        "Not found",
        r#"<section class="error-page">
    <h1>404</h1>
    <p>The page you were looking for does not exist.</p>
    <a href="/">Back home</a>
</section>"#
            .to_string(),
    )
    .status(StatusCode::NOT_FOUND)
}

pub fn server_error() -> Page {
    Page::new(
        "Error",
        r#"<section class="error-page">
    <h1>500</h1>
    <p>Something went wrong on our side. Please try again later.</p>
</section>"#
            .to_string(),
    )
    .status(StatusCode::INTERNAL_SERVER_ERROR)
}
