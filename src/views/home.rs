use std::collections::HashSet;

use super::{escape, playlists, Page};
use crate::{playlists::repo_types::Playlist, users::repo_types::User};

pub fn anonymous() -> Page {
    Page::new(
        "Welcome",
        r#"<section class="home-hero">
    <h1>What's on your watchlist?</h1>
    <p>Build movie playlists, see what other people are watching, and like the ones you love.</p>
    <a class="btn" href="/signup">Sign up now</a>
    <a class="btn-secondary" href="/login">Log in</a>
</section>"#
            .to_string(),
    )
}

/// Feed of other people's playlists.
pub fn feed(viewer: &User, others: &[Playlist], liked: &HashSet<i64>) -> Page {
    let body = format!(
        r#"<section class="home-feed">
    <aside class="viewer-card">
        <img class="avatar-lg" src="{img}" alt="">
        <a href="/users/{id}">@{username}</a>
        <a href="/playlists/new" class="btn">New playlist</a>
    </aside>
    <div>
        <h2>From the community</h2>
        {list}
    </div>
</section>"#,
        id = viewer.id,
        img = escape(&viewer.image_url),
        username = escape(&viewer.username),
        list = playlists::list(others, Some(viewer), liked),
    );
    Page::new("Home", body)
}
