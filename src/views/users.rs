use std::collections::HashSet;

use super::{error_list, escape, format_date, playlists, Page};
use crate::{
    playlists::repo_types::Playlist,
    users::{dto::EditProfileForm, repo_types::User},
};

fn user_card(user: &User) -> String {
    format!(
        r#"<li class="user-card">
    <a href="/users/{id}"><img class="avatar" src="{img}" alt=""></a>
    <a href="/users/{id}">@{username}</a>
    <span class="full-name">{name}</span>
</li>"#,
        id = user.id,
        img = escape(&user.image_url),
        username = escape(&user.username),
        name = escape(&user.full_name()),
    )
}

pub fn index(users: &[User], query: Option<&str>) -> Page {
    let list = if users.is_empty() {
        match query {
            Some(q) => format!(r#"<p class="empty">Sorry, no users found matching "{}".</p>"#, escape(q)),
            None => r#"<p class="empty">No users yet.</p>"#.to_string(),
        }
    } else {
        let cards: String = users.iter().map(user_card).collect();
        format!(r#"<ul class="user-list">{cards}</ul>"#)
    };

    let body = format!(
        r#"<section>
    <h2>Users</h2>
    <form method="GET" action="/users" class="user-search">
        <input name="q" placeholder="Search users" value="{q}">
        <button type="submit">Search</button>
    </form>
    {list}
</section>"#,
        q = escape(query.unwrap_or_default()),
    );
    Page::new("Users", body)
}

fn profile_header(user: &User, like_count: usize) -> String {
    format!(
        r#"<header class="profile-header">
    <img class="avatar-lg" src="{img}" alt="">
    <div>
        <h2>@{username}</h2>
        <p>{name}</p>
        <p class="meta">Member since {since}</p>
        <p><a href="/users/{id}/playlists">Playlists</a> &middot; <a href="/users/{id}/likes">Likes ({like_count})</a></p>
    </div>
</header>"#,
        id = user.id,
        img = escape(&user.image_url),
        username = escape(&user.username),
        name = escape(&user.full_name()),
        since = format_date(user.created_at),
    )
}

/// Profile page with the user's newest playlists and how many playlists they liked.
pub fn show(
    user: &User,
    recent: &[Playlist],
    liked_ids: &[i64],
    viewer: Option<&User>,
    viewer_likes: &HashSet<i64>,
) -> Page {
    let owner_actions = match viewer {
        Some(v) if v.id == user.id => r#"<div class="owner-actions">
    <a href="/users/profile">Edit profile</a>
    <form method="POST" action="/users/delete" class="inline">
        <button class="btn-danger" type="submit">Delete account</button>
    </form>
</div>"#
            .to_string(),
        _ => String::new(),
    };

    let body = format!(
        r#"<section class="profile">
    {header}
    {owner_actions}
    <h3>Recent playlists</h3>
    {list}
</section>"#,
        header = profile_header(user, liked_ids.len()),
        list = playlists::list(recent, viewer, viewer_likes),
    );
    Page::new(format!("@{}", user.username), body)
}

pub fn likes(
    user: &User,
    liked: &[Playlist],
    viewer: Option<&User>,
    viewer_likes: &HashSet<i64>,
) -> Page {
    let body = format!(
        r#"<section class="profile">
    {header}
    <h3>Liked playlists</h3>
    {list}
</section>"#,
        header = profile_header(user, liked.len()),
        list = playlists::list(liked, viewer, viewer_likes),
    );
    Page::new(format!("@{} likes", user.username), body)
}

pub fn owned_playlists(
    user: &User,
    owned: &[Playlist],
    viewer: Option<&User>,
    viewer_likes: &HashSet<i64>,
) -> Page {
    let body = format!(
        r#"<section>
    <h2>Playlists by <a href="/users/{id}">@{username}</a></h2>
    {list}
</section>"#,
        id = user.id,
        username = escape(&user.username),
        list = playlists::list(owned, viewer, viewer_likes),
    );
    Page::new(format!("@{} playlists", user.username), body)
}

pub fn edit(form: &EditProfileForm, user_id: i64, errors: &[String]) -> Page {
    let body = format!(
        r#"<section class="auth-form">
    <h2>Edit your profile.</h2>
    {errors}
    <form method="POST" action="/users/profile">
        <input name="username" placeholder="Username" value="{username}" required>
        <input name="email" type="email" placeholder="E-mail" value="{email}" required>
        <input name="image_url" placeholder="(Optional) Image URL" value="{image_url}">
        <input name="first_name" placeholder="First name" value="{first_name}" required>
        <input name="last_name" placeholder="Last name" value="{last_name}" required>
        <p>To confirm changes, enter your password:</p>
        <input name="password" type="password" placeholder="Password" required>
        <button type="submit">Edit this user!</button>
        <a href="/users/{user_id}">Cancel</a>
    </form>
</section>"#,
        errors = error_list(errors),
        username = escape(&form.username),
        email = escape(&form.email),
        image_url = escape(form.image_url.as_deref().unwrap_or_default()),
        first_name = escape(&form.first_name),
        last_name = escape(&form.last_name),
    );
    Page::new("Edit profile", body)
}
