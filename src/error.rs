use axum::response::{IntoResponse, Redirect, Response};
use tracing::{error, warn};

use crate::{flash::Flash, views};

pub const ACCESS_UNAUTHORIZED: &str = "Access unauthorized.";
pub const SEARCH_FAILED: &str =
    "Search criteria did not return any results. Please try searching again with a different keyword.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("username or email already taken")]
    DuplicateCredential,
    #[error("not found")]
    NotFound,
    #[error("login required")]
    Unauthorized,
    #[error("not the owner")]
    Forbidden,
    #[error("movie search failed: {0}")]
    UpstreamFailure(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        err.as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => views::not_found().into_response(),
            // Both authorization failures share one policy: back home with a warning.
            AppError::Unauthorized | AppError::Forbidden => {
                warn!(reason = %self, "access denied");
                (Flash::danger(ACCESS_UNAUTHORIZED), Redirect::to("/")).into_response()
            }
            AppError::UpstreamFailure(reason) => {
                warn!(%reason, "movie search failed");
                (Flash::warning(SEARCH_FAILED), Redirect::to("/")).into_response()
            }
            AppError::DuplicateCredential => (
                Flash::danger("Username already taken"),
                Redirect::to("/signup"),
            )
                .into_response(),
            AppError::Database(e) => {
                error!(error = %e, "database error");
                views::server_error().into_response()
            }
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                views::server_error().into_response()
            }
        }
    }
}
