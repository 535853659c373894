pub mod artists;
pub mod home;
pub mod shows;
pub mod venues;

use askama::Template;
use axum::extract::Path;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::{CookieJar, Form, FormRejection, WithRejection};

use crate::error::PageError;
use crate::flash::{self, Flash};
use crate::forms::FormError;
use showbill_db::StoreError;

pub type PageResult = Result<(CookieJar, Html<String>), PageError>;

/// Landing target of every mutation.
pub type Landing = (CookieJar, Redirect);

/// Record id from the path; an unparseable id renders the 404 page.
pub type RecordId = WithRejection<Path<i32>, PageError>;

/// Form body; an unreadable body lands home with an error notice.
pub type Submitted<T> = WithRejection<Form<T>, BadSubmission>;

#[derive(Debug)]
pub struct BadSubmission(FormRejection);

impl From<FormRejection> for BadSubmission {
    fn from(err: FormRejection) -> Self {
        Self(err)
    }
}

impl IntoResponse for BadSubmission {
    fn into_response(self) -> Response {
        tracing::warn!("unreadable form body: {}", self.0);
        land(
            CookieJar::new(),
            Flash::error("Error! The submitted form could not be read."),
            "/",
        )
        .into_response()
    }
}

pub fn render<T: Template>(jar: CookieJar, page: T) -> PageResult {
    let html = page.render()?;
    Ok((jar, Html(html)))
}

pub fn land(jar: CookieJar, notice: Flash, to: &str) -> Landing {
    (flash::push(jar, notice), Redirect::to(to))
}

/// Why a mutation did not happen.
#[derive(Debug)]
pub enum Rejected {
    Form(FormError),
    Store(StoreError),
}

impl From<FormError> for Rejected {
    fn from(err: FormError) -> Self {
        Self::Form(err)
    }
}

impl From<StoreError> for Rejected {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl Rejected {
    /// Notice shown to the user for a failed `action` on `subject`,
    /// e.g. `("Venue", "listed")`.
    pub fn notice(&self, subject: &str, action: &str) -> Flash {
        match self {
            Self::Form(e) => {
                Flash::error(format!("Error! {subject} could not be {action}: {e}."))
            }
            Self::Store(StoreError::NotFound { .. }) => {
                Flash::error(format!("Error! {subject} no longer exists."))
            }
            Self::Store(StoreError::MissingReference(_)) => Flash::error(format!(
                "Error! {subject} could not be {action}: the artist or venue does not exist."
            )),
            Self::Store(StoreError::Database(_)) => {
                Flash::error(format!("Error! {subject} could not be {action}."))
            }
        }
    }

    pub fn log(&self, subject: &str, action: &str) {
        match self {
            Self::Form(e) => tracing::info!(subject, action, "rejected submission: {e}"),
            Self::Store(e @ StoreError::Database(_)) => {
                tracing::error!(subject, action, "mutation failed: {e}")
            }
            Self::Store(e) => tracing::warn!(subject, action, "mutation failed: {e}"),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_not_found())
    }
}
