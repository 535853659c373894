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

/// Every mutable artist field, as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistInput {
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistInput {
    fn apply(self, active: &mut artist::ActiveModel) {
        active.name = Set(self.name);
        active.genres = Set(self.genres);
        active.city = Set(self.city);
        active.state = Set(self.state);
        active.phone = Set(self.phone);
        active.image_link = Set(self.image_link);
        active.facebook_link = Set(self.facebook_link);
        active.website_link = Set(self.website_link);
        active.seeking_venue = Set(self.seeking_venue);
        active.seeking_description = Set(self.seeking_description);
    }
}

impl From<artist::Model> for ArtistInput {
    fn from(a: artist::Model) -> Self {
        Self {
            name: a.name,
            genres: a.genres,
            city: a.city,
            state: a.state,
            phone: a.phone,
            image_link: a.image_link,
            facebook_link: a.facebook_link,
            website_link: a.website_link,
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description,
        }
    }
}

/// A show seen from the artist side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueBooking {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    pub artist: artist::Model,
    pub past_shows: Vec<VenueBooking>,
    pub upcoming_shows: Vec<VenueBooking>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<artist::Model>, StoreError> {
    Ok(artist::Entity::find()
        .order_by_asc(artist::Column::Id)
        .all(db)
        .await?)
}

/// Case-insensitive substring search on the artist name.
pub async fn search<C: ConnectionTrait>(
    db: &C,
    term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults, StoreError> {
    let matches = artist::Entity::find()
        .filter(name_matches(artist::Column::Name, term))
        .all(db)
        .await?;

    let ids = matches.iter().map(|a| a.id).collect();
    let counts = upcoming_counts(db, ShowOwner::Artist, ids, now).await?;

    Ok(SearchResults::new(
        matches
            .into_iter()
            .map(|a| SearchHit {
                num_upcoming_shows: counts.get(&a.id).copied().unwrap_or(0),
                id: a.id,
                name: a.name,
            })
            .collect(),
    ))
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<artist::Model, StoreError> {
    artist::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::not_found("artist", id))
}

/// Fetch an artist with its shows split into past and upcoming around `now`.
pub async fn find_with_shows<C: ConnectionTrait>(
    db: &C,
    id: i32,
    now: DateTime<Utc>,
) -> Result<ArtistDetail, StoreError> {
    let artist = find(db, id).await?;

    let shows = show::Entity::find()
        .filter(show::Column::ArtistId.eq(id))
        .order_by_asc(show::Column::StartTime)
        .all(db)
        .await?;

    let venue_ids: Vec<i32> = shows
        .iter()
        .map(|s| s.venue_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let venues: HashMap<i32, venue::Model> = if !venue_ids.is_empty() {
        venue::Entity::find()
            .filter(venue::Column::Id.is_in(venue_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect()
    } else {
        HashMap::new()
    };

    let booking = |s: show::Model| -> Option<VenueBooking> {
        let v = venues.get(&s.venue_id)?;
        Some(VenueBooking {
            venue_id: v.id,
            venue_name: v.name.clone(),
            venue_image_link: v.image_link.clone(),
            start_time: format_start_time(&s),
        })
    };

    let (past, upcoming) = partition_shows(shows, now);
    let past_shows: Vec<VenueBooking> = past.into_iter().filter_map(booking).collect();
    let upcoming_shows: Vec<VenueBooking> = upcoming.into_iter().filter_map(booking).collect();

    Ok(ArtistDetail {
        artist,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    input: ArtistInput,
) -> Result<artist::Model, StoreError> {
    let mut active = artist::ActiveModel {
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    };
    input.apply(&mut active);

    let created = active.insert(db).await?;
    tracing::info!(artist_id = created.id, name = %created.name, "artist listed");
    Ok(created)
}

/// Overwrite every mutable field of an existing artist.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i32,
    input: ArtistInput,
) -> Result<artist::Model, StoreError> {
    let existing = find(db, id).await?;
    let mut active: artist::ActiveModel = existing.into();
    input.apply(&mut active);

    let updated = active.update(db).await?;
    tracing::info!(artist_id = id, "artist updated");
    Ok(updated)
}

/// Delete an artist and its shows in one transaction.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), StoreError> {
    let txn = db.begin().await?;

    match delete_within(&txn, id).await {
        Ok(shows) => {
            txn.commit().await?;
            tracing::info!(artist_id = id, shows, "artist deleted");
            Ok(())
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!(artist_id = id, "rollback failed: {rollback_err}");
            }
            Err(e)
        }
    }
}

async fn delete_within<C: ConnectionTrait>(txn: &C, id: i32) -> Result<u64, StoreError> {
    let removed_shows = show::Entity::delete_many()
        .filter(show::Column::ArtistId.eq(id))
        .exec(txn)
        .await?;
    let removed = artist::Entity::delete_by_id(id).exec(txn).await?;
    if removed.rows_affected == 0 {
        return Err(StoreError::not_found("artist", id));
    }
    Ok(removed_shows.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_find_with_shows_exposes_venue_side() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![artist(4, "Guns N Petals")]])
            .append_query_results([vec![
                show_at(1, 4, 1, Duration::days(-30)),
                show_at(2, 4, 1, Duration::minutes(-1)),
                show_at(3, 4, 1, Duration::hours(3)),
            ]])
            .append_query_results([vec![venue(1, "The Musical Hop")]])
            .into_connection();

        let detail = find_with_shows(&db, 4, now()).await.unwrap();
        assert_eq!(detail.past_shows_count, 2);
        assert_eq!(detail.upcoming_shows_count, 1);
        assert_eq!(
            detail.past_shows_count + detail.upcoming_shows_count,
            3,
            "every show lands in exactly one list"
        );
        let upcoming = &detail.upcoming_shows[0];
        assert_eq!(upcoming.venue_id, 1);
        assert_eq!(upcoming.venue_name, "The Musical Hop");
        assert_eq!(
            upcoming.venue_image_link.as_deref(),
            Some("https://img.example.com/venue.jpg")
        );
    }

    #[tokio::test]
    async fn test_find_missing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<artist::Model>::new()])
            .into_connection();
        let err = find_with_shows(&db, 3, now()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "artist", id: 3 }));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![artist(1, "Guns N Petals")]])
            .append_query_results([Vec::<show::Model>::new()])
            .into_connection();

        let results = search(&db, "PETAL", now()).await.unwrap();
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].num_upcoming_shows, 0);

        let sql = format!("{:?}", db.into_transaction_log());
        assert!(sql.contains("%petal%"));
    }

    #[tokio::test]
    async fn test_create_sets_seeking_flag() {
        let mut stored = artist(9, "The Wild Sax Band");
        stored.seeking_venue = true;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored]])
            .into_connection();

        let created = create(
            &db,
            ArtistInput {
                name: "The Wild Sax Band".into(),
                city: "San Francisco".into(),
                state: "CA".into(),
                seeking_venue: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(created.seeking_venue);
    }

    #[tokio::test]
    async fn test_update_overwrites_every_field() {
        let existing = artist(2, "Matt Quevedo");
        let mut updated = existing.clone();
        updated.phone = None;
        updated.genres = vec!["Jazz".into()];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing.clone()], vec![updated]])
            .into_connection();

        let mut input = ArtistInput::from(existing);
        input.phone = None;
        input.genres = vec!["Jazz".into()];
        let result = update(&db, 2, input).await.unwrap();
        assert!(result.phone.is_none());
        assert_eq!(result.genres, vec!["Jazz".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_commits() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        delete(&db, 2).await.unwrap();
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("DELETE FROM \\\"artists\\\""));
    }
}
