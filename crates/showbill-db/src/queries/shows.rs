use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::format_start_time;
use crate::entities::{artist, show, venue};
use crate::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowInput {
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_time: DateTime<Utc>,
}

/// A show joined with the names of both parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

/// Every show with its venue and artist, ordered by start time.
pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<ShowListing>, StoreError> {
    let shows = show::Entity::find()
        .order_by_asc(show::Column::StartTime)
        .all(db)
        .await?;
    if shows.is_empty() {
        return Ok(Vec::new());
    }

    let venue_ids: HashSet<i32> = shows.iter().map(|s| s.venue_id).collect();
    let artist_ids: HashSet<i32> = shows.iter().map(|s| s.artist_id).collect();

    let venues: HashMap<i32, venue::Model> = venue::Entity::find()
        .filter(venue::Column::Id.is_in(venue_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|v| (v.id, v))
        .collect();
    let artists: HashMap<i32, artist::Model> = artist::Entity::find()
        .filter(artist::Column::Id.is_in(artist_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    Ok(shows
        .iter()
        .filter_map(|s| {
            let v = venues.get(&s.venue_id)?;
            let a = artists.get(&s.artist_id)?;
            Some(ShowListing {
                venue_id: v.id,
                venue_name: v.name.clone(),
                artist_id: a.id,
                artist_name: a.name.clone(),
                artist_image_link: a.image_link.clone(),
                start_time: format_start_time(s),
            })
        })
        .collect())
}

/// Insert a show. Unknown artist or venue ids surface as
/// [`StoreError::MissingReference`] from the foreign keys.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    input: ShowInput,
) -> Result<show::Model, StoreError> {
    let created = show::ActiveModel {
        artist_id: Set(input.artist_id),
        venue_id: Set(input.venue_id),
        start_time: Set(input.start_time.fixed_offset()),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(
        show_id = created.id,
        artist_id = created.artist_id,
        venue_id = created.venue_id,
        "show listed"
    );
    Ok(created)
}
