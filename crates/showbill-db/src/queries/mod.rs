//! Query and mutation layer.
//!
//! Every function takes the store handle explicitly. Functions that split
//! shows into past and upcoming also take the reference instant, which the
//! caller evaluates once per request.

pub mod artists;
pub mod shows;
pub mod venues;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use std::collections::HashMap;

use crate::entities::show;
use crate::StoreError;

/// Display format for show start times.
pub const SHOW_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of a name search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

impl SearchResults {
    pub fn new(data: Vec<SearchHit>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// A show is upcoming when it starts strictly after `now`.
pub fn is_upcoming(show: &show::Model, now: DateTime<Utc>) -> bool {
    show.start_time.with_timezone(&Utc) > now
}

/// Split shows into `(past, upcoming)` against a single boundary.
pub fn partition_shows(
    shows: Vec<show::Model>,
    now: DateTime<Utc>,
) -> (Vec<show::Model>, Vec<show::Model>) {
    let (upcoming, past): (Vec<_>, Vec<_>) =
        shows.into_iter().partition(|s| is_upcoming(s, now));
    (past, upcoming)
}

pub fn format_start_time(show: &show::Model) -> String {
    show.start_time
        .with_timezone(&Utc)
        .format(SHOW_TIME_FORMAT)
        .to_string()
}

/// Build a `LIKE` pattern for a case-insensitive substring match.
pub fn like_pattern(term: &str) -> String {
    // escape LIKE wildcards so a term matches literally
    let escaped = term
        .trim()
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// `LOWER(column) LIKE pattern`
pub(crate) fn name_matches<C: ColumnTrait>(column: C, term: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(like_pattern(term))
}

/// Which parent a show is counted against.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ShowOwner {
    Venue,
    Artist,
}

impl ShowOwner {
    fn column(self) -> show::Column {
        match self {
            Self::Venue => show::Column::VenueId,
            Self::Artist => show::Column::ArtistId,
        }
    }

    fn key(self, show: &show::Model) -> i32 {
        match self {
            Self::Venue => show.venue_id,
            Self::Artist => show.artist_id,
        }
    }
}

/// Count upcoming shows per owner id in one query.
pub(crate) async fn upcoming_counts<C: ConnectionTrait>(
    db: &C,
    owner: ShowOwner,
    ids: Vec<i32>,
    now: DateTime<Utc>,
) -> Result<HashMap<i32, usize>, StoreError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let shows = show::Entity::find()
        .filter(owner.column().is_in(ids))
        .filter(show::Column::StartTime.gt(now))
        .all(db)
        .await?;

    let mut counts = HashMap::new();
    for s in shows.iter().filter(|s| is_upcoming(s, now)) {
        *counts.entry(owner.key(s)).or_insert(0) += 1;
    }
    Ok(counts)
}
