use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use showbill_db::AppState;
use std::path::Path;
use std::sync::Arc;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod flash;
pub mod forms;
pub mod pages;
pub mod templates;

use pages::{artists, home, shows, venues};

/// Build the full application router.
pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let venue_routes = Router::new()
        .route("/", get(venues::list_venues))
        .route("/search", post(venues::search_venues))
        .route(
            "/create",
            get(venues::create_venue_form).post(venues::create_venue_submission),
        )
        .route(
            "/{id}",
            get(venues::show_venue).delete(venues::delete_venue),
        )
        .route(
            "/{id}/edit",
            get(venues::edit_venue_form).post(venues::edit_venue_submission),
        )
        .route("/{id}/delete", post(venues::delete_venue));

    let artist_routes = Router::new()
        .route("/", get(artists::list_artists))
        .route("/search", post(artists::search_artists))
        .route(
            "/create",
            get(artists::create_artist_form).post(artists::create_artist_submission),
        )
        .route(
            "/{id}",
            get(artists::show_artist).delete(artists::delete_artist),
        )
        .route(
            "/{id}/edit",
            get(artists::edit_artist_form).post(artists::edit_artist_submission),
        )
        .route("/{id}/delete", post(artists::delete_artist));

    let show_routes = Router::new()
        .route("/", get(shows::list_shows))
        .route(
            "/create",
            get(shows::create_show_form).post(shows::create_show_submission),
        );

    Router::new()
        .route("/", get(home::index))
        .route("/healthz", get(home::healthz))
        .nest("/venues", venue_routes)
        .nest("/artists", artist_routes)
        .nest("/shows", show_routes)
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(home::not_found)
        .layer(TraceLayer::new_for_http())
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}
