//! Page models. One struct per rendered page; the base layout reads `flash`.

use askama::Template;

use crate::flash::Flash;
use crate::forms::{ArtistForm, ChoiceOption, ShowForm, VenueForm};
use showbill_db::artists::ArtistDetail;
use showbill_db::entities::{artist, venue};
use showbill_db::queries::SearchResults;
use showbill_db::shows::ShowListing;
use showbill_db::venues::{VenueArea, VenueDetail};

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomePage {
    pub flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "pages/venues.html")]
pub struct VenuesPage {
    pub flash: Option<Flash>,
    pub areas: Vec<VenueArea>,
}

#[derive(Template)]
#[template(path = "pages/artists.html")]
pub struct ArtistsPage {
    pub flash: Option<Flash>,
    pub artists: Vec<artist::Model>,
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
pub struct ShowsPage {
    pub flash: Option<Flash>,
    pub shows: Vec<ShowListing>,
}

#[derive(Template)]
#[template(path = "pages/search_venues.html")]
pub struct VenueSearchPage {
    pub flash: Option<Flash>,
    pub search_term: String,
    pub results: SearchResults,
}

#[derive(Template)]
#[template(path = "pages/search_artists.html")]
pub struct ArtistSearchPage {
    pub flash: Option<Flash>,
    pub search_term: String,
    pub results: SearchResults,
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
pub struct VenueDetailPage {
    pub flash: Option<Flash>,
    pub detail: VenueDetail,
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
pub struct ArtistDetailPage {
    pub flash: Option<Flash>,
    pub detail: ArtistDetail,
}

#[derive(Template)]
#[template(path = "forms/new_venue.html")]
pub struct NewVenuePage {
    pub flash: Option<Flash>,
    pub form: VenueForm,
    pub genres: Vec<ChoiceOption>,
    pub states: Vec<ChoiceOption>,
}

#[derive(Template)]
#[template(path = "forms/edit_venue.html")]
pub struct EditVenuePage {
    pub flash: Option<Flash>,
    pub venue_id: i32,
    pub form: VenueForm,
    pub genres: Vec<ChoiceOption>,
    pub states: Vec<ChoiceOption>,
}

#[derive(Template)]
#[template(path = "forms/new_artist.html")]
pub struct NewArtistPage {
    pub flash: Option<Flash>,
    pub form: ArtistForm,
    pub genres: Vec<ChoiceOption>,
    pub states: Vec<ChoiceOption>,
}

#[derive(Template)]
#[template(path = "forms/edit_artist.html")]
pub struct EditArtistPage {
    pub flash: Option<Flash>,
    pub artist_id: i32,
    pub form: ArtistForm,
    pub genres: Vec<ChoiceOption>,
    pub states: Vec<ChoiceOption>,
}

#[derive(Template)]
#[template(path = "forms/new_show.html")]
pub struct NewShowPage {
    pub flash: Option<Flash>,
    pub form: ShowForm,
    pub artists: Vec<artist::Model>,
    pub venues: Vec<venue::Model>,
}

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundPage {
    pub flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "errors/500.html")]
pub struct ServerErrorPage {
    pub flash: Option<Flash>,
}

mod filters {
    use chrono::NaiveDateTime;
    use showbill_db::queries::SHOW_TIME_FORMAT;

    /// Render a stored start time as `full` or `medium` display text.
    /// Unparseable input passes through unchanged.
    pub fn datetime<T: std::fmt::Display>(value: T, style: &str) -> ::askama::Result<String> {
        let raw = value.to_string();
        let Ok(parsed) = NaiveDateTime::parse_from_str(&raw, SHOW_TIME_FORMAT) else {
            return Ok(raw);
        };
        let pattern = match style {
            "medium" => "%a %m, %d, %Y %-I:%M%p",
            _ => "%A %B %-d, %Y at %-I:%M%p",
        };
        Ok(parsed.format(pattern).to_string())
    }
}
