use axum::extract::{Path, State};
use axum_extra::extract::{CookieJar, Form, WithRejection};
use chrono::Utc;
use std::sync::Arc;

use super::{land, render, Landing, PageResult, RecordId, Rejected, Submitted};
use crate::flash::{self, Flash};
use crate::forms::{genre_options, state_options, SearchForm, VenueForm};
use crate::templates::{EditVenuePage, NewVenuePage, VenueDetailPage, VenueSearchPage, VenuesPage};
use showbill_db::entities::venue;
use showbill_db::sea_orm::DatabaseConnection;
use showbill_db::venues::{self, VenueInput};
use showbill_db::AppState;

/// GET /venues
pub async fn list_venues(State(state): State<Arc<AppState>>, jar: CookieJar) -> PageResult {
    let (jar, flash) = flash::take(jar);
    let areas = venues::list_by_area(&state.db, Utc::now()).await?;
    render(jar, VenuesPage { flash, areas })
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Form(params), _): Submitted<SearchForm>,
) -> PageResult {
    let (jar, flash) = flash::take(jar);
    let results = venues::search(&state.db, &params.search_term, Utc::now()).await?;
    render(
        jar,
        VenueSearchPage {
            flash,
            search_term: params.search_term,
            results,
        },
    )
}

/// GET /venues/{id}
pub async fn show_venue(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Path(id), _): RecordId,
) -> PageResult {
    let (jar, flash) = flash::take(jar);
    let detail = venues::find_with_shows(&state.db, id, Utc::now()).await?;
    render(jar, VenueDetailPage { flash, detail })
}

/// GET /venues/create
pub async fn create_venue_form(jar: CookieJar) -> PageResult {
    let (jar, flash) = flash::take(jar);
    render(
        jar,
        NewVenuePage {
            flash,
            form: VenueForm::default(),
            genres: genre_options(&[]),
            states: state_options(""),
        },
    )
}

/// POST /venues/create
pub async fn create_venue_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Form(form), _): Submitted<VenueForm>,
) -> Landing {
    match submit_new(&state.db, form).await {
        Ok(venue) => land(
            jar,
            Flash::success(format!(
                "Venue {} was successfully listed!",
                flash::quote_name(&venue.name)
            )),
            "/",
        ),
        Err(rejected) => {
            rejected.log("venue", "create");
            land(jar, rejected.notice("Venue", "listed"), "/")
        }
    }
}

/// GET /venues/{id}/edit
pub async fn edit_venue_form(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Path(id), _): RecordId,
) -> PageResult {
    let (jar, flash) = flash::take(jar);
    let venue = venues::find(&state.db, id).await?;
    let form = VenueForm::from(VenueInput::from(venue));
    render(
        jar,
        EditVenuePage {
            flash,
            venue_id: id,
            genres: genre_options(&form.genres),
            states: state_options(&form.state),
            form,
        },
    )
}

/// POST /venues/{id}/edit
pub async fn edit_venue_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Path(id), _): RecordId,
    WithRejection(Form(form), _): Submitted<VenueForm>,
) -> Landing {
    let detail_page = format!("/venues/{id}");
    match submit_edit(&state.db, id, form).await {
        Ok(venue) => land(
            jar,
            Flash::success(format!(
                "Venue {} was successfully edited!",
                flash::quote_name(&venue.name)
            )),
            &detail_page,
        ),
        Err(rejected) => {
            rejected.log("venue", "update");
            let to = if rejected.is_not_found() {
                "/"
            } else {
                detail_page.as_str()
            };
            land(jar, rejected.notice("Venue", "edited"), to)
        }
    }
}

async fn submit_new(db: &DatabaseConnection, form: VenueForm) -> Result<venue::Model, Rejected> {
    let input = form.into_input()?;
    Ok(venues::create(db, input).await?)
}

async fn submit_edit(
    db: &DatabaseConnection,
    id: i32,
    form: VenueForm,
) -> Result<venue::Model, Rejected> {
    let input = form.into_input()?;
    Ok(venues::update(db, id, input).await?)
}

/// DELETE /venues/{id}, POST /venues/{id}/delete
pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Path(id), _): RecordId,
) -> Landing {
    match venues::delete(&state.db, id).await {
        Ok(()) => land(jar, Flash::success("Venue was successfully deleted."), "/"),
        Err(e) => {
            let rejected = Rejected::from(e);
            rejected.log("venue", "delete");
            land(jar, rejected.notice("Venue", "deleted"), "/")
        }
    }
}
