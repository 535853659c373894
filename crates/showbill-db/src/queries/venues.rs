use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::{
    format_start_time, name_matches, partition_shows, upcoming_counts, SearchHit, SearchResults,
    ShowOwner,
};
use crate::entities::{artist, show, venue};
use crate::StoreError;

/// Every mutable venue field, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueInput {
    pub name: String,
    pub genres: Vec<String>,
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueInput {
    /// Overwrite every mutable column on `active`.
    fn apply(self, active: &mut venue::ActiveModel) {
        active.name = Set(self.name);
        active.genres = Set(self.genres);
        active.address = Set(self.address);
        active.city = Set(self.city);
        active.state = Set(self.state);
        active.phone = Set(self.phone);
        active.image_link = Set(self.image_link);
        active.facebook_link = Set(self.facebook_link);
        active.website_link = Set(self.website_link);
        active.seeking_talent = Set(self.seeking_talent);
        active.seeking_description = Set(self.seeking_description);
    }
}

impl From<venue::Model> for VenueInput {
    fn from(v: venue::Model) -> Self {
        Self {
            name: v.name,
            genres: v.genres,
            address: v.address,
            city: v.city,
            state: v.state,
            phone: v.phone,
            image_link: v.image_link,
            facebook_link: v.facebook_link,
            website_link: v.website_link,
            seeking_talent: v.seeking_talent,
            seeking_description: v.seeking_description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueSummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues sharing a city and state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// A show seen from the venue side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistBooking {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueDetail {
    pub venue: venue::Model,
    pub past_shows: Vec<ArtistBooking>,
    pub upcoming_shows: Vec<ArtistBooking>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<venue::Model>, StoreError> {
    Ok(venue::Entity::find()
        .order_by_asc(venue::Column::Id)
        .all(db)
        .await?)
}

/// All venues grouped by `(city, state)`, each with its upcoming show count.
pub async fn list_by_area<C: ConnectionTrait>(
    db: &C,
    now: DateTime<Utc>,
) -> Result<Vec<VenueArea>, StoreError> {
    let venues = list(db).await?;
    let ids = venues.iter().map(|v| v.id).collect();
    let counts = upcoming_counts(db, ShowOwner::Venue, ids, now).await?;
    Ok(group_by_area(venues, &counts))
}

/// Group venues by area, keeping areas in first-seen order.
pub fn group_by_area(venues: Vec<venue::Model>, counts: &HashMap<i32, usize>) -> Vec<VenueArea> {
    let mut areas: Vec<VenueArea> = Vec::new();
    for v in venues {
        let summary = VenueSummary {
            id: v.id,
            name: v.name,
            num_upcoming_shows: counts.get(&v.id).copied().unwrap_or(0),
        };
        match areas
            .iter_mut()
            .find(|a| a.city == v.city && a.state == v.state)
        {
            Some(area) => area.venues.push(summary),
            None => areas.push(VenueArea {
                city: v.city,
                state: v.state,
                venues: vec![summary],
            }),
        }
    }
    areas
}

/// Case-insensitive substring search on the venue name.
pub async fn search<C: ConnectionTrait>(
    db: &C,
    term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults, StoreError> {
    let matches = venue::Entity::find()
        .filter(name_matches(venue::Column::Name, term))
        .all(db)
        .await?;

    let ids = matches.iter().map(|v| v.id).collect();
    let counts = upcoming_counts(db, ShowOwner::Venue, ids, now).await?;

    Ok(SearchResults::new(
        matches
            .into_iter()
            .map(|v| SearchHit {
                num_upcoming_shows: counts.get(&v.id).copied().unwrap_or(0),
                id: v.id,
                name: v.name,
            })
            .collect(),
    ))
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<venue::Model, StoreError> {
    venue::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::not_found("venue", id))
}

/// Fetch a venue with its shows split into past and upcoming around `now`.
pub async fn find_with_shows<C: ConnectionTrait>(
    db: &C,
    id: i32,
    now: DateTime<Utc>,
) -> Result<VenueDetail, StoreError> {
    let venue = find(db, id).await?;

    let shows = show::Entity::find()
        .filter(show::Column::VenueId.eq(id))
        .order_by_asc(show::Column::StartTime)
        .all(db)
        .await?;

    // Batch-fetch the performing artists
    let artist_ids: Vec<i32> = shows
        .iter()
        .map(|s| s.artist_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let artists: HashMap<i32, artist::Model> = if !artist_ids.is_empty() {
        artist::Entity::find()
            .filter(artist::Column::Id.is_in(artist_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect()
    } else {
        HashMap::new()
    };

    let booking = |s: show::Model| -> Option<ArtistBooking> {
        let a = artists.get(&s.artist_id)?;
        Some(ArtistBooking {
            artist_id: a.id,
            artist_name: a.name.clone(),
            artist_image_link: a.image_link.clone(),
            start_time: format_start_time(&s),
        })
    };

    let (past, upcoming) = partition_shows(shows, now);
    let past_shows: Vec<ArtistBooking> = past.into_iter().filter_map(booking).collect();
    let upcoming_shows: Vec<ArtistBooking> = upcoming.into_iter().filter_map(booking).collect();

    Ok(VenueDetail {
        venue,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    input: VenueInput,
) -> Result<venue::Model, StoreError> {
    let mut active = venue::ActiveModel {
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    };
    input.apply(&mut active);

    let created = active.insert(db).await?;
    tracing::info!(venue_id = created.id, name = %created.name, "venue listed");
    Ok(created)
}

/// Overwrite every mutable field of an existing venue.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i32,
    input: VenueInput,
) -> Result<venue::Model, StoreError> {
    let existing = find(db, id).await?;
    let mut active: venue::ActiveModel = existing.into();
    input.apply(&mut active);

    let updated = active.update(db).await?;
    tracing::info!(venue_id = id, "venue updated");
    Ok(updated)
}

/// Delete a venue and its shows in one transaction.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), StoreError> {
    let txn = db.begin().await?;

    match delete_within(&txn, id).await {
        Ok(shows) => {
            txn.commit().await?;
            tracing::info!(venue_id = id, shows, "venue deleted");
            Ok(())
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!(venue_id = id, "rollback failed: {rollback_err}");
            }
            Err(e)
        }
    }
}

/// Returns the number of shows removed along with the venue.
async fn delete_within<C: ConnectionTrait>(txn: &C, id: i32) -> Result<u64, StoreError> {
    let removed_shows = show::Entity::delete_many()
        .filter(show::Column::VenueId.eq(id))
        .exec(txn)
        .await?;
    let removed = venue::Entity::delete_by_id(id).exec(txn).await?;
    if removed.rows_affected == 0 {
        return Err(StoreError::not_found("venue", id));
    }
    Ok(removed_shows.rows_affected)
}
