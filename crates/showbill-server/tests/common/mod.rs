// Shared test utilities for integration tests
#![allow(dead_code)]

use axum::Router;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use showbill_db::entities::{artist, show, venue};
use showbill_db::AppState;
use std::path::Path;
use std::sync::Arc;

pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the application router over the given connection.
pub fn test_app(db: DatabaseConnection) -> Router {
    showbill_server::router(Arc::new(AppState { db }), Path::new(STATIC_DIR))
}

/// A router whose database answers nothing.
pub fn empty_app() -> Router {
    test_app(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

pub fn stamp(offset: Duration) -> DateTime<FixedOffset> {
    (Utc::now() + offset).fixed_offset()
}

pub fn sample_venue(id: i32, name: &str) -> venue::Model {
    venue::Model {
        id,
        name: name.into(),
        genres: vec!["Jazz".into(), "Reggae".into()],
        address: Some("1015 Folsom Street".into()),
        city: "San Francisco".into(),
        state: "CA".into(),
        phone: Some("123-123-1234".into()),
        image_link: None,
        facebook_link: None,
        website_link: None,
        seeking_talent: true,
        seeking_description: Some("We are on the lookout for a local artist".into()),
        created_at: stamp(Duration::days(-30)),
    }
}

pub fn sample_artist(id: i32, name: &str) -> artist::Model {
    artist::Model {
        id,
        name: name.into(),
        genres: vec!["Rock n Roll".into()],
        city: "San Francisco".into(),
        state: "CA".into(),
        phone: None,
        website_link: None,
        image_link: None,
        facebook_link: None,
        seeking_venue: false,
        seeking_description: None,
        created_at: stamp(Duration::days(-30)),
    }
}

pub fn sample_show(id: i32, artist_id: i32, venue_id: i32, offset: Duration) -> show::Model {
    show::Model {
        id,
        artist_id,
        venue_id,
        start_time: stamp(offset),
        created_at: stamp(Duration::days(-30)),
    }
}
