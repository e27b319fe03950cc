use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Method, Request, StatusCode,
    },
    response::Response,
    Router,
};
use movie_passport::{
    app::build_app,
    auth::services::authenticate,
    config::AppConfig,
    movies::MovieSearch,
    playlists::repo_types::Playlist,
    state::AppState,
    users::repo_types::User,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

struct NoResults;

#[async_trait]
impl MovieSearch for NoResults {
    async fn search(&self, _term: &str) -> anyhow::Result<Value> {
        Ok(json!({"Response": "False", "Error": "Movie not found!"}))
    }
}

fn app(pool: PgPool) -> Router {
    let config = AppConfig::from_lookup(|key| match key {
        "SECRET_KEY" => Some("flows-secret".into()),
        _ => None,
    });
    build_app(AppState::from_parts(pool, Arc::new(config), Arc::new(NoResults)))
}

/// A browser stand-in that keeps whatever cookies the app sets.
struct Browser {
    app: Router,
    cookies: BTreeMap<String, String>,
}

impl Browser {
    fn new(pool: &PgPool) -> Self {
        Self {
            app: app(pool.clone()),
            cookies: BTreeMap::new(),
        }
    }

    async fn send(&mut self, method: Method, uri: &str, form: Option<&str>) -> Response {
        let mut req = Request::builder().method(method).uri(uri);
        if !self.cookies.is_empty() {
            let header = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            req = req.header(COOKIE, header);
        }
        let body = match form {
            Some(form) => {
                req = req.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };

        let res = self
            .app
            .clone()
            .oneshot(req.body(body).unwrap())
            .await
            .unwrap();

        for raw in res.headers().get_all(SET_COOKIE) {
            let raw = raw.to_str().unwrap();
            let pair = raw.split(';').next().unwrap();
            let (name, value) = pair.split_once('=').unwrap();
            if value.is_empty() {
                self.cookies.remove(name);
            } else {
                self.cookies.insert(name.to_string(), value.to_string());
            }
        }
        res
    }

    async fn get(&mut self, uri: &str) -> Response {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> Response {
        self.send(Method::POST, uri, Some(form)).await
    }

    async fn signup(&mut self, username: &str) -> Response {
        let form = format!(
            "username={username}&password=pw12345&email={username}%40x.com&first_name=Test&last_name=User"
        );
        self.post("/signup", &form).await
    }
}

async fn text(res: Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(res: &Response) -> String {
    res.headers()
        .get(LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

async fn user(pool: &PgPool, username: &str) -> User {
    User::find_by_username(pool, username).await.unwrap().unwrap()
}

async fn create_playlist(browser: &mut Browser, title: &str) -> Response {
    browser
        .post("/playlists/new", &format!("title={title}&text=Some+movies"))
        .await
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn signup_logs_in_and_shows_empty_profile(pool: PgPool) {
    let mut alice = Browser::new(&pool);
    let res = alice.signup("alice").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    assert!(alice.cookies.contains_key("session"));

    let id = user(&pool, "alice").await.id;
    let res = alice.get(&format!("/users/{id}")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = text(res).await;
    assert!(html.contains("No playlists yet."));
    assert!(html.contains(r#"action="/users/delete""#));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn duplicate_signup_keeps_original_account(pool: PgPool) {
    Browser::new(&pool).signup("alice").await;

    let mut impostor = Browser::new(&pool);
    let res = impostor
        .post(
            "/signup",
            "username=alice&password=other-pass&email=evil%40x.com&first_name=E&last_name=Vil",
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(!impostor.cookies.contains_key("session"));
    assert!(text(res).await.contains("Username already taken"));

    let original = authenticate(&pool, "alice", "pw12345").await.unwrap();
    assert_eq!(original.map(|u| u.email), Some("alice@x.com".to_string()));
    assert!(authenticate(&pool, "alice", "other-pass").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn login_and_logout_round_trip(pool: PgPool) {
    Browser::new(&pool).signup("alice").await;

    let mut browser = Browser::new(&pool);
    let res = browser.post("/login", "username=alice&password=wrong-pw").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(text(res).await.contains("Invalid credentials."));

    let res = browser.post("/login", "username=alice&password=pw12345").await;
    assert_eq!(location(&res), "/");
    assert!(browser.cookies.contains_key("session"));

    let res = browser.get("/logout").await;
    assert_eq!(location(&res), "/login");
    assert!(!browser.cookies.contains_key("session"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1, "only the signup session remains");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn liking_twice_restores_original_state(pool: PgPool) {
    let mut alice = Browser::new(&pool);
    alice.signup("alice").await;
    let res = create_playlist(&mut alice, "Heist").await;
    let alice_id = user(&pool, "alice").await.id;
    assert_eq!(location(&res), format!("/users/{alice_id}"));
    let playlist = Playlist::list_by_user(&pool, alice_id, None).await.unwrap()[0].id;

    let mut bob = Browser::new(&pool);
    bob.signup("bob").await;
    let bob_id = user(&pool, "bob").await.id;

    let res = bob.post(&format!("/users/add_like/{playlist}"), "").await;
    assert_eq!(location(&res), "/");
    assert_eq!(Playlist::liked_ids(&pool, bob_id).await.unwrap(), vec![playlist]);

    bob.post(&format!("/users/add_like/{playlist}"), "").await;
    assert!(Playlist::liked_ids(&pool, bob_id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn own_playlist_cannot_be_liked(pool: PgPool) {
    let mut alice = Browser::new(&pool);
    alice.signup("alice").await;
    create_playlist(&mut alice, "Mine").await;
    let alice_id = user(&pool, "alice").await.id;
    let playlist = Playlist::list_by_user(&pool, alice_id, None).await.unwrap()[0].id;

    let res = alice.post(&format!("/users/add_like/{playlist}"), "").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    assert!(alice.cookies.contains_key("flash"));
    assert!(Playlist::liked_ids(&pool, alice_id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn only_owner_deletes_playlist(pool: PgPool) {
    let mut alice = Browser::new(&pool);
    alice.signup("alice").await;
    create_playlist(&mut alice, "Keep").await;
    let alice_id = user(&pool, "alice").await.id;
    let playlist = Playlist::list_by_user(&pool, alice_id, None).await.unwrap()[0].id;

    let mut bob = Browser::new(&pool);
    bob.signup("bob").await;
    let res = bob.post(&format!("/playlist/{playlist}/delete"), "").await;
    assert_eq!(location(&res), "/");
    assert!(Playlist::find_by_id(&pool, playlist).await.unwrap().is_some());

    let res = alice.post(&format!("/playlist/{playlist}/delete"), "").await;
    assert_eq!(location(&res), format!("/users/{alice_id}"));
    assert!(Playlist::find_by_id(&pool, playlist).await.unwrap().is_none());

    let res = alice.post(&format!("/playlist/{playlist}/delete"), "").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn deleting_account_removes_everything_it_owns(pool: PgPool) {
    let mut alice = Browser::new(&pool);
    alice.signup("alice").await;
    create_playlist(&mut alice, "Gone").await;
    let alice_id = user(&pool, "alice").await.id;
    let alice_playlist = Playlist::list_by_user(&pool, alice_id, None).await.unwrap()[0].id;

    let mut bob = Browser::new(&pool);
    bob.signup("bob").await;
    create_playlist(&mut bob, "Stays").await;
    let bob_id = user(&pool, "bob").await.id;
    let bob_playlist = Playlist::list_by_user(&pool, bob_id, None).await.unwrap()[0].id;

    bob.post(&format!("/users/add_like/{alice_playlist}"), "").await;
    alice.post(&format!("/users/add_like/{bob_playlist}"), "").await;

    let res = alice.post("/users/delete", "").await;
    assert_eq!(location(&res), "/signup");
    assert!(!alice.cookies.contains_key("session"));

    assert!(User::find_by_id(&pool, alice_id).await.unwrap().is_none());
    for (sql, what) in [
        ("SELECT COUNT(*) FROM playlists WHERE user_id = $1", "playlists"),
        ("SELECT COUNT(*) FROM likes WHERE user_id = $1", "likes"),
        ("SELECT COUNT(*) FROM sessions WHERE user_id = $1", "sessions"),
    ] {
        let count: i64 = sqlx::query_scalar(sql)
            .bind(alice_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0, "{what} left behind");
    }
    assert!(Playlist::liked_ids(&pool, bob_id).await.unwrap().is_empty());
    assert!(Playlist::find_by_id(&pool, bob_playlist).await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn anonymous_profile_edit_changes_nothing(pool: PgPool) {
    Browser::new(&pool).signup("alice").await;

    let mut anonymous = Browser::new(&pool);
    let res = anonymous.get("/users/profile").await;
    assert_eq!(location(&res), "/");

    let res = anonymous
        .post(
            "/users/profile",
            "username=mallory&email=m%40x.com&first_name=M&last_name=M&password=pw12345",
        )
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    assert_eq!(user(&pool, "alice").await.email, "alice@x.com");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn profile_edit_requires_current_password(pool: PgPool) {
    let mut alice = Browser::new(&pool);
    alice.signup("alice").await;
    Browser::new(&pool).signup("bob").await;
    let alice_id = user(&pool, "alice").await.id;

    let res = alice
        .post(
            "/users/profile",
            "username=alicia&email=alice%40x.com&first_name=Alice&last_name=L&password=nope-nope",
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(text(res).await.contains("Incorrect password, please try again"));

    let res = alice
        .post(
            "/users/profile",
            "username=bob&email=alice%40x.com&first_name=Alice&last_name=L&password=pw12345",
        )
        .await;
    assert!(text(res).await.contains("Username or email already taken"));

    let res = alice
        .post(
            "/users/profile",
            "username=alicia&email=alice%40x.com&first_name=Alice&last_name=L&password=pw12345",
        )
        .await;
    assert_eq!(location(&res), format!("/users/{alice_id}"));
    assert_eq!(user(&pool, "alicia").await.id, alice_id);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn search_renders_upstream_error_message(pool: PgPool) {
    let mut browser = Browser::new(&pool);
    let res = browser.get("/movies?s=zzzz").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(text(res).await.contains("Movie not found!"));
}

fn card_count(html: &str) -> usize {
    html.matches(r#"class="playlist-card""#).count()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn profile_shows_five_newest_playlists(pool: PgPool) {
    let mut alice = Browser::new(&pool);
    alice.signup("alice").await;
    for n in 1..=7 {
        create_playlist(&mut alice, &format!("Reel-{n}")).await;
    }
    let alice_id = user(&pool, "alice").await.id;

    let res = Browser::new(&pool).get(&format!("/users/{alice_id}")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = text(res).await;
    assert_eq!(card_count(&html), 5);
    assert!(!html.contains("Reel-1<") && !html.contains("Reel-2<"));

    let positions: Vec<usize> = (3..=7)
        .rev()
        .map(|n| html.find(&format!("Reel-{n}")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "newest first");

    let res = Browser::new(&pool)
        .get(&format!("/users/{alice_id}/playlists"))
        .await;
    assert_eq!(card_count(&text(res).await), 7);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn user_search_matches_substrings_literally(pool: PgPool) {
    Browser::new(&pool).signup("alice").await;
    Browser::new(&pool).signup("bob").await;
    let mut visitor = Browser::new(&pool);

    let html = text(visitor.get("/users?q=li").await).await;
    assert!(html.contains("@alice"));
    assert!(!html.contains("@bob"));

    let html = text(visitor.get("/users?q=%25").await).await;
    assert!(!html.contains("@alice"));
    assert!(html.contains("no users found"));

    let html = text(visitor.get("/users").await).await;
    assert!(html.contains("@alice") && html.contains("@bob"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn likes_page_lists_exactly_the_liked_playlists(pool: PgPool) {
    let mut alice = Browser::new(&pool);
    alice.signup("alice").await;
    create_playlist(&mut alice, "Liked-one").await;
    create_playlist(&mut alice, "Ignored-one").await;
    let alice_id = user(&pool, "alice").await.id;
    let owned = Playlist::list_by_user(&pool, alice_id, None).await.unwrap();
    let liked = owned.iter().find(|p| p.title == "Liked-one").unwrap().id;

    let mut bob = Browser::new(&pool);
    bob.signup("bob").await;
    let bob_id = user(&pool, "bob").await.id;
    bob.post(&format!("/users/add_like/{liked}"), "").await;

    let res = bob.get(&format!("/users/{bob_id}/likes")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = text(res).await;
    assert_eq!(card_count(&html), 1);
    assert!(html.contains("Liked-one"));
    assert!(!html.contains("Ignored-one"));
    assert!(html.contains("Likes (1)"));
}

async fn expire_all_sessions(pool: &PgPool) {
    sqlx::query("UPDATE sessions SET expires_at = now() - interval '1 hour'")
        .execute(pool)
        .await
        .unwrap();
}

async fn session_rows(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn expired_session_cookie_is_dropped(pool: PgPool) {
    let mut alice = Browser::new(&pool);
    alice.signup("alice").await;
    expire_all_sessions(&pool).await;

    let res = alice.get("/").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(text(res).await.contains("Sign up now"));
    assert!(!alice.cookies.contains_key("session"));
    assert_eq!(session_rows(&pool).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn new_sessions_sweep_expired_ones(pool: PgPool) {
    Browser::new(&pool).signup("alice").await;
    Browser::new(&pool).signup("bob").await;
    expire_all_sessions(&pool).await;
    assert_eq!(session_rows(&pool).await, 2);

    Browser::new(&pool).signup("carol").await;
    assert_eq!(session_rows(&pool).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs Postgres via DATABASE_URL"]
async fn login_over_an_expired_cookie_keeps_the_new_session(pool: PgPool) {
    let mut alice = Browser::new(&pool);
    alice.signup("alice").await;
    expire_all_sessions(&pool).await;

    let res = alice.post("/login", "username=alice&password=pw12345").await;
    assert_eq!(location(&res), "/");
    assert!(alice.cookies.contains_key("session"));

    let res = alice.get("/users/profile").await;
    assert_eq!(res.status(), StatusCode::OK);
}
