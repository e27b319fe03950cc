//! One-shot messages carried across a redirect in a cookie.
//!
//! A handler attaches a [`Flash`] to its response; the next rendered page reads
//! it through the [`Flashes`] extractor and clears the cookie.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::SET_COOKIE, request::Parts, HeaderValue},
    response::{IntoResponseParts, ResponseParts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Danger,
    Warning,
    Info,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Danger => "danger",
            Level::Warning => "warning",
            Level::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(Level::Danger, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    pub fn cookie(&self) -> Cookie<'static> {
        Cookie::build((FLASH_COOKIE, encode(std::slice::from_ref(self))))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }
}

impl IntoResponseParts for Flash {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if let Ok(value) = HeaderValue::from_str(&self.cookie().to_string()) {
            res.headers_mut().append(SET_COOKIE, value);
        }
        Ok(res)
    }
}

/// Cookie that deletes the flash on the client.
pub fn clear_cookie() -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .expires(time::OffsetDateTime::now_utc() - time::Duration::days(1))
        .build()
}

pub fn encode(flashes: &[Flash]) -> String {
    // Serializing plain strings and unit enums cannot fail.
    let json = serde_json::to_vec(flashes).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

pub fn decode(raw: &str) -> Option<Vec<Flash>> {
    let bytes = URL_SAFE_NO_PAD.decode(raw).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Flash messages sent by the client, if any.
#[derive(Debug, Default, Clone)]
pub struct Flashes {
    pub messages: Vec<Flash>,
    /// The request carried a flash cookie that must be cleared once rendered.
    pub present: bool,
}

impl Flashes {
    pub fn from_jar(jar: &CookieJar) -> Self {
        let Some(cookie) = jar.get(FLASH_COOKIE) else {
            return Self::default();
        };
        let messages = decode(cookie.value()).unwrap_or_else(|| {
            debug!("discarding undecodable flash cookie");
            Vec::new()
        });
        Self {
            messages,
            present: true,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Flashes
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Flashes::from_jar(&CookieJar::from_headers(&parts.headers)))
    }
}
