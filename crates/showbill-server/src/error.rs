use askama::Template;
use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::templates::{NotFoundPage, ServerErrorPage};
use showbill_db::StoreError;

/// Failure of a page that renders (as opposed to a mutation, which flashes).
#[derive(Error, Debug)]
pub enum PageError {
    #[error("page not found")]
    NotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for PageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

/// A record id that does not parse names no record.
impl From<PathRejection> for PageError {
    fn from(err: PathRejection) -> Self {
        tracing::debug!("unroutable path: {err}");
        Self::NotFound
    }
}

impl From<askama::Error> for PageError {
    fn from(err: askama::Error) -> Self {
        Self::Internal(format!("template error: {err}"))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, rendered) = match self {
            Self::NotFound => (StatusCode::NOT_FOUND, NotFoundPage { flash: None }.render()),
            Self::Internal(msg) => {
                tracing::error!("{msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ServerErrorPage { flash: None }.render(),
                )
            }
        };

        match rendered {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("failed to render error page: {e}");
                (status, status.canonical_reason().unwrap_or("error")).into_response()
            }
        }
    }
}
