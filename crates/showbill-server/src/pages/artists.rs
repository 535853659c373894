use axum::extract::{Path, State};
use axum_extra::extract::{CookieJar, Form, WithRejection};
use chrono::Utc;
use std::sync::Arc;

use super::{land, render, Landing, PageResult, RecordId, Rejected, Submitted};
use crate::flash::{self, Flash};
use crate::forms::{genre_options, state_options, ArtistForm, SearchForm};
use crate::templates::{
    ArtistDetailPage, ArtistSearchPage, ArtistsPage, EditArtistPage, NewArtistPage,
};
use showbill_db::artists::{self, ArtistInput};
use showbill_db::entities::artist;
use showbill_db::sea_orm::DatabaseConnection;
use showbill_db::AppState;

/// GET /artists
pub async fn list_artists(State(state): State<Arc<AppState>>, jar: CookieJar) -> PageResult {
    let (jar, flash) = flash::take(jar);
    let artists = artists::list(&state.db).await?;
    render(jar, ArtistsPage { flash, artists })
}

/// POST /artists/search
pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Form(params), _): Submitted<SearchForm>,
) -> PageResult {
    let (jar, flash) = flash::take(jar);
    let results = artists::search(&state.db, &params.search_term, Utc::now()).await?;
    render(
        jar,
        ArtistSearchPage {
            flash,
            search_term: params.search_term,
            results,
        },
    )
}

/// GET /artists/{id}
pub async fn show_artist(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Path(id), _): RecordId,
) -> PageResult {
    let (jar, flash) = flash::take(jar);
    let detail = artists::find_with_shows(&state.db, id, Utc::now()).await?;
    render(jar, ArtistDetailPage { flash, detail })
}

/// GET /artists/create
pub async fn create_artist_form(jar: CookieJar) -> PageResult {
    let (jar, flash) = flash::take(jar);
    render(
        jar,
        NewArtistPage {
            flash,
            form: ArtistForm::default(),
            genres: genre_options(&[]),
            states: state_options(""),
        },
    )
}

/// POST /artists/create
pub async fn create_artist_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Form(form), _): Submitted<ArtistForm>,
) -> Landing {
    match submit_new(&state.db, form).await {
        Ok(artist) => land(
            jar,
            Flash::success(format!(
                "Artist {} was successfully listed!",
                flash::quote_name(&artist.name)
            )),
            "/",
        ),
        Err(rejected) => {
            rejected.log("artist", "create");
            land(jar, rejected.notice("Artist", "listed"), "/")
        }
    }
}

/// GET /artists/{id}/edit
pub async fn edit_artist_form(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Path(id), _): RecordId,
) -> PageResult {
    let (jar, flash) = flash::take(jar);
    let artist = artists::find(&state.db, id).await?;
    let form = ArtistForm::from(ArtistInput::from(artist));
    render(
        jar,
        EditArtistPage {
            flash,
            artist_id: id,
            genres: genre_options(&form.genres),
            states: state_options(&form.state),
            form,
        },
    )
}

/// POST /artists/{id}/edit
pub async fn edit_artist_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Path(id), _): RecordId,
    WithRejection(Form(form), _): Submitted<ArtistForm>,
) -> Landing {
    let detail_page = format!("/artists/{id}");
    match submit_edit(&state.db, id, form).await {
        Ok(artist) => land(
            jar,
            Flash::success(format!(
                "Artist {} was successfully edited!",
                flash::quote_name(&artist.name)
            )),
            &detail_page,
        ),
        Err(rejected) => {
            rejected.log("artist", "update");
            let to = if rejected.is_not_found() {
                "/"
            } else {
                detail_page.as_str()
            };
            land(jar, rejected.notice("Artist", "edited"), to)
        }
    }
}

async fn submit_new(db: &DatabaseConnection, form: ArtistForm) -> Result<artist::Model, Rejected> {
    let input = form.into_input()?;
    Ok(artists::create(db, input).await?)
}

async fn submit_edit(
    db: &DatabaseConnection,
    id: i32,
    form: ArtistForm,
) -> Result<artist::Model, Rejected> {
    let input = form.into_input()?;
    Ok(artists::update(db, id, input).await?)
}

/// DELETE /artists/{id}, POST /artists/{id}/delete
pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Path(id), _): RecordId,
) -> Landing {
    match artists::delete(&state.db, id).await {
        Ok(()) => land(jar, Flash::success("Artist was successfully deleted."), "/"),
        Err(e) => {
            let rejected = Rejected::from(e);
            rejected.log("artist", "delete");
            land(jar, rejected.notice("Artist", "deleted"), "/")
        }
    }
}
