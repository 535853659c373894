use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::{render, PageResult};
use crate::error::PageError;
use crate::flash;
use crate::templates::HomePage;

#[derive(Serialize)]
pub struct ApiStatus {
    status: &'static str,
    version: &'static str,
}

/// GET /
pub async fn index(jar: CookieJar) -> PageResult {
    let (jar, flash) = flash::take(jar);
    render(jar, HomePage { flash })
}

/// GET /healthz
pub async fn healthz() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Fallback for unknown routes.
pub async fn not_found() -> PageError {
    PageError::NotFound
}
