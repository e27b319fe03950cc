use std::collections::HashSet;

use super::{error_list, escape, format_date, Page};
use crate::{
    playlists::{dto::NewPlaylistForm, repo_types::Playlist},
    users::repo_types::User,
};

/// One playlist with the actions available to `viewer`: like/unlike for other
/// people's playlists, delete for the owner's own.
pub fn card(playlist: &Playlist, viewer: Option<&User>, liked: &HashSet<i64>) -> String {
    let action = match viewer {
        Some(v) if playlist.is_owned_by(v.id) => format!(
            r#"<form method="POST" action="/playlist/{id}/delete" class="inline">
            <button class="btn-danger" type="submit">Delete</button>
        </form>"#,
            id = playlist.id
        ),
        Some(_) => {
            let (class, label) = if liked.contains(&playlist.id) {
                ("btn-like liked", "Unlike")
            } else {
                ("btn-like", "Like")
            };
            format!(
                r#"<form method="POST" action="/users/add_like/{id}" class="inline">
            <button class="{class}" type="submit">{label}</button>
        </form>"#,
                id = playlist.id
            )
        }
        None => String::new(),
    };

    format!(
        r#"<li class="playlist-card">
    <h3><a href="/playlists/{id}">{title}</a></h3>
    <p class="meta"><a href="/users/{owner_id}">@{owner}</a> &middot; {date}</p>
    <p class="playlist-text">{text}</p>
    {action}
</li>"#,
        id = playlist.id,
        title = escape(&playlist.title),
        owner_id = playlist.user_id,
        owner = escape(&playlist.owner_username),
        date = format_date(playlist.created_at),
        text = escape(&playlist.text),
    )
}

pub fn list(playlists: &[Playlist], viewer: Option<&User>, liked: &HashSet<i64>) -> String {
    if playlists.is_empty() {
        return r#"<p class="empty">No playlists yet.</p>"#.to_string();
    }
    let cards: String = playlists.iter().map(|p| card(p, viewer, liked)).collect();
    format!(r#"<ul class="playlist-list">{cards}</ul>"#)
}

pub fn index(playlists: &[Playlist], viewer: Option<&User>, liked: &HashSet<i64>) -> Page {
    let body = format!(
        r#"<section>
    <h2>All playlists</h2>
    {list}
</section>"#,
        list = list(playlists, viewer, liked),
    );
    Page::new("Playlists", body)
}

pub fn show(playlist: &Playlist, viewer: Option<&User>, liked: &HashSet<i64>) -> Page {
    let body = format!(
        r#"<section class="playlist-detail">
    <ul class="playlist-list">{card}</ul>
</section>"#,
        card = card(playlist, viewer, liked),
    );
    Page::new(playlist.title.clone(), body)
}

pub fn new_form(form: &NewPlaylistForm, errors: &[String]) -> Page {
    let body = format!(
        r#"<section class="playlist-form">
    <h2>New playlist</h2>
    {errors}
    <form method="POST" action="/playlists/new">
        <input name="title" placeholder="Title" value="{title}" required>
        <textarea name="text" rows="8" placeholder="Which movies, and why?" required>{text}</textarea>
        <button type="submit">Save</button>
    </form>
</section>"#,
        errors = error_list(errors),
        title = escape(&form.title),
        text = escape(&form.text),
    );
    Page::new("New playlist", body)
}
