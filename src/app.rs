use std::{net::SocketAddr, time::Duration};

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{CACHE_CONTROL, EXPIRES, PRAGMA},
        HeaderValue, Request, Response,
    },
    middleware, Router,
};
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{field, info, info_span, Span};

use crate::state::AppState;
use crate::{auth, home, movies, playlists, users};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(home::router())
        .merge(auth::router())
        .merge(users::router())
        .merge(playlists::router())
        .merge(movies::router())
        .nest_service("/static", ServeDir::new("static"))
        .fallback(home::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::resolve_session,
        ))
        .with_state(state)
        // no page may be cached
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            EXPIRES,
            HeaderValue::from_static("0"),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(page_span)
                .on_response(log_page_response),
        )
}

/// Span named after the route template, so `/users/7` and `/users/9` group together.
fn page_span(req: &Request<Body>) -> Span {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    info_span!(
        "page",
        method = %req.method(),
        route = %route,
        status = field::Empty,
        latency_ms = field::Empty
    )
}

fn log_page_response(res: &Response<Body>, latency: Duration, span: &Span) {
    let status = res.status();
    span.record("status", field::display(status));
    span.record("latency_ms", latency.as_millis() as u64);
    if status.is_server_error() {
        tracing::error!(%status, "page failed");
    } else {
        tracing::debug!(%status, "page served");
    }
}

/// Binds `APP_HOST:APP_PORT` and serves until Ctrl+C.
pub async fn serve(app: Router) -> anyhow::Result<()> {
    let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port = std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into());
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "movie passport listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutting down");
            }
        })
        .await?;
    Ok(())
}
