use axum::extract::State;
use axum_extra::extract::{CookieJar, Form, WithRejection};
use chrono::Utc;
use std::sync::Arc;

use super::{land, render, Landing, PageResult, Rejected, Submitted};
use crate::flash::{self, Flash};
use crate::forms::ShowForm;
use crate::templates::{NewShowPage, ShowsPage};
use showbill_db::entities::show;
use showbill_db::sea_orm::DatabaseConnection;
use showbill_db::{artists, shows, venues, AppState};

/// GET /shows
pub async fn list_shows(State(state): State<Arc<AppState>>, jar: CookieJar) -> PageResult {
    let (jar, flash) = flash::take(jar);
    let shows = shows::list(&state.db).await?;
    render(jar, ShowsPage { flash, shows })
}

/// GET /shows/create
pub async fn create_show_form(State(state): State<Arc<AppState>>, jar: CookieJar) -> PageResult {
    let (jar, flash) = flash::take(jar);
    let artists = artists::list(&state.db).await?;
    let venues = venues::list(&state.db).await?;
    render(
        jar,
        NewShowPage {
            flash,
            form: ShowForm::starting_at(Utc::now()),
            artists,
            venues,
        },
    )
}

/// POST /shows/create
pub async fn create_show_submission(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Form(form), _): Submitted<ShowForm>,
) -> Landing {
    match submit_new(&state.db, form).await {
        Ok(_) => land(jar, Flash::success("Show was successfully listed!"), "/"),
        Err(rejected) => {
            rejected.log("show", "create");
            land(jar, rejected.notice("Show", "listed"), "/")
        }
    }
}

async fn submit_new(db: &DatabaseConnection, form: ShowForm) -> Result<show::Model, Rejected> {
    let input = form.into_input()?;
    Ok(shows::create(db, input).await?)
}
