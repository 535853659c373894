//! Form bodies and their validation.
//!
//! Every field is optional at the wire level so that a missing field becomes a
//! [`FormError`] naming it instead of an extractor rejection. Checkboxes are
//! read by key presence: a checked box submits `y`, an unchecked one nothing.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use showbill_db::artists::ArtistInput;
use showbill_db::shows::ShowInput;
use showbill_db::venues::VenueInput;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} is not valid: {value:?}")]
    Invalid { field: &'static str, value: String },
}

pub const GENRES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

pub const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// One `<option>` of a select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    pub selected: bool,
}

/// Genre options with the current selection marked. Tags outside the
/// vocabulary are kept so an edit does not drop them.
pub fn genre_options(selected: &[String]) -> Vec<ChoiceOption> {
    let mut options: Vec<ChoiceOption> = GENRES
        .iter()
        .map(|g| ChoiceOption {
            value: (*g).to_string(),
            selected: selected.iter().any(|s| s == g),
        })
        .collect();
    for extra in selected.iter().filter(|s| !GENRES.contains(&s.as_str())) {
        options.push(ChoiceOption {
            value: extra.clone(),
            selected: true,
        });
    }
    options
}

pub fn state_options(selected: &str) -> Vec<ChoiceOption> {
    let mut options: Vec<ChoiceOption> = STATES
        .iter()
        .map(|s| ChoiceOption {
            value: (*s).to_string(),
            selected: *s == selected,
        })
        .collect();
    if !selected.is_empty() && !STATES.contains(&selected) {
        options.push(ChoiceOption {
            value: selected.to_string(),
            selected: true,
        });
    }
    options
}

fn required(field: &'static str, value: String) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::Missing(field));
    }
    Ok(trimmed.to_string())
}

/// Blank optional text is stored as NULL.
fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn checked(value: &Option<String>) -> bool {
    value.is_some()
}

fn genre_tags(genres: Vec<String>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(genres.len());
    for g in genres {
        let g = g.trim();
        if !g.is_empty() && !tags.iter().any(|t| t == g) {
            tags.push(g.to_string());
        }
    }
    tags
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub search_term: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_talent: Option<String>,
    pub seeking_description: String,
}

impl VenueForm {
    pub fn into_input(self) -> Result<VenueInput, FormError> {
        Ok(VenueInput {
            name: required("name", self.name)?,
            city: required("city", self.city)?,
            state: required("state", self.state)?,
            address: Some(required("address", self.address)?),
            phone: optional(self.phone),
            image_link: optional(self.image_link),
            genres: genre_tags(self.genres),
            facebook_link: optional(self.facebook_link),
            website_link: optional(self.website_link),
            seeking_talent: checked(&self.seeking_talent),
            seeking_description: optional(self.seeking_description),
        })
    }
}

impl From<VenueInput> for VenueForm {
    fn from(v: VenueInput) -> Self {
        Self {
            name: v.name,
            city: v.city,
            state: v.state,
            address: v.address.unwrap_or_default(),
            phone: v.phone.unwrap_or_default(),
            image_link: v.image_link.unwrap_or_default(),
            genres: v.genres,
            facebook_link: v.facebook_link.unwrap_or_default(),
            website_link: v.website_link.unwrap_or_default(),
            seeking_talent: v.seeking_talent.then(|| "y".to_string()),
            seeking_description: v.seeking_description.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub website_link: String,
    pub seeking_venue: Option<String>,
    pub seeking_description: String,
}

impl ArtistForm {
    pub fn into_input(self) -> Result<ArtistInput, FormError> {
        Ok(ArtistInput {
            name: required("name", self.name)?,
            city: required("city", self.city)?,
            state: required("state", self.state)?,
            phone: optional(self.phone),
            image_link: optional(self.image_link),
            genres: genre_tags(self.genres),
            facebook_link: optional(self.facebook_link),
            website_link: optional(self.website_link),
            seeking_venue: checked(&self.seeking_venue),
            seeking_description: optional(self.seeking_description),
        })
    }
}

impl From<ArtistInput> for ArtistForm {
    fn from(a: ArtistInput) -> Self {
        Self {
            name: a.name,
            city: a.city,
            state: a.state,
            phone: a.phone.unwrap_or_default(),
            image_link: a.image_link.unwrap_or_default(),
            genres: a.genres,
            facebook_link: a.facebook_link.unwrap_or_default(),
            website_link: a.website_link.unwrap_or_default(),
            seeking_venue: a.seeking_venue.then(|| "y".to_string()),
            seeking_description: a.seeking_description.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

impl ShowForm {
    /// A blank form with the start time preset to `now`.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            start_time: now.format("%Y-%m-%dT%H:%M").to_string(),
            ..Default::default()
        }
    }

    pub fn into_input(self) -> Result<ShowInput, FormError> {
        let artist_id = parse_id("artist_id", self.artist_id)?;
        let venue_id = parse_id("venue_id", self.venue_id)?;
        let raw_time = required("start_time", self.start_time)?;
        let start_time = parse_start_time(&raw_time).ok_or(FormError::Invalid {
            field: "start_time",
            value: raw_time,
        })?;
        Ok(ShowInput {
            artist_id,
            venue_id,
            start_time,
        })
    }
}

fn parse_id(field: &'static str, value: String) -> Result<i32, FormError> {
    let raw = required(field, value)?;
    raw.parse::<i32>()
        .map_err(|_| FormError::Invalid { field, value: raw })
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a submitted start time. Offset-less values are taken as UTC.
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn venue_form() -> VenueForm {
        VenueForm {
            name: "Joe's".into(),
            city: "NY".into(),
            state: "NY".into(),
            address: "1 Bowery".into(),
            genres: vec!["Jazz".into(), "Folk".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_venue_form_minimal_is_valid() {
        let input = venue_form().into_input().unwrap();
        assert_eq!(input.name, "Joe's");
        assert_eq!(input.address.as_deref(), Some("1 Bowery"));
        assert!(input.phone.is_none());
        assert!(!input.seeking_talent);
        assert_eq!(input.genres, vec!["Jazz".to_string(), "Folk".to_string()]);
    }

    #[test]
    fn test_venue_form_missing_name() {
        let mut form = venue_form();
        form.name = "   ".into();
        assert_eq!(form.into_input(), Err(FormError::Missing("name")));
    }

    #[test]
    fn test_venue_form_missing_address() {
        let mut form = venue_form();
        form.address.clear();
        assert_eq!(form.into_input(), Err(FormError::Missing("address")));
    }

    #[test]
    fn test_seeking_flag_follows_key_presence() {
        let mut form = venue_form();
        form.seeking_talent = Some("y".into());
        assert!(form.clone().into_input().unwrap().seeking_talent);
        form.seeking_talent = Some(String::new());
        assert!(form.clone().into_input().unwrap().seeking_talent);
        form.seeking_talent = None;
        assert!(!form.into_input().unwrap().seeking_talent);
    }

    #[test]
    fn test_blank_optionals_become_none() {
        let form = ArtistForm {
            name: "Guns N Petals".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: "  ".into(),
            website_link: "https://gunsnpetalsband.com".into(),
            ..Default::default()
        };
        let input = form.into_input().unwrap();
        assert!(input.phone.is_none());
        assert_eq!(
            input.website_link.as_deref(),
            Some("https://gunsnpetalsband.com")
        );
    }

    #[test]
    fn test_genre_tags_dedup_and_trim() {
        let tags = genre_tags(vec![" Jazz".into(), "Jazz".into(), "".into(), "Soul".into()]);
        assert_eq!(tags, vec!["Jazz".to_string(), "Soul".to_string()]);
    }

    #[test]
    fn test_form_roundtrip_through_input() {
        let mut form = venue_form();
        form.seeking_talent = Some("y".into());
        form.seeking_description = "Local bands".into();
        let back = VenueForm::from(form.clone().into_input().unwrap());
        assert_eq!(back.name, form.name);
        assert_eq!(back.seeking_talent.as_deref(), Some("y"));
        assert_eq!(back.seeking_description, "Local bands");
    }

    #[test]
    fn test_artist_form_from_input_unchecked() {
        let form = ArtistForm::from(ArtistInput {
            name: "A".into(),
            city: "B".into(),
            state: "CA".into(),
            ..Default::default()
        });
        assert!(form.seeking_venue.is_none());
        assert!(form.phone.is_empty());
    }

    #[test]
    fn test_parse_start_time_formats() {
        let expected = Utc.with_ymd_and_hms(2019, 5, 21, 21, 30, 0).unwrap();
        assert_eq!(parse_start_time("2019-05-21 21:30:00"), Some(expected));
        assert_eq!(parse_start_time("2019-05-21 21:30"), Some(expected));
        assert_eq!(parse_start_time("2019-05-21T21:30"), Some(expected));
        assert_eq!(parse_start_time("2019-05-21T21:30:00.000Z"), Some(expected));
        assert_eq!(parse_start_time("2019-05-21T23:30:00+02:00"), Some(expected));
        assert_eq!(parse_start_time("next tuesday"), None);
    }

    #[test]
    fn test_show_form_invalid_id() {
        let form = ShowForm {
            artist_id: "abc".into(),
            venue_id: "1".into(),
            start_time: "2019-05-21 21:30:00".into(),
        };
        assert_eq!(
            form.into_input(),
            Err(FormError::Invalid {
                field: "artist_id",
                value: "abc".into()
            })
        );
    }

    #[test]
    fn test_show_form_valid() {
        let form = ShowForm {
            artist_id: " 4 ".into(),
            venue_id: "1".into(),
            start_time: "2035-04-01T20:00".into(),
        };
        let input = form.into_input().unwrap();
        assert_eq!(input.artist_id, 4);
        assert_eq!(input.venue_id, 1);
        assert_eq!(
            input.start_time,
            Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_show_form_missing_start_time() {
        let form = ShowForm {
            artist_id: "1".into(),
            venue_id: "1".into(),
            start_time: String::new(),
        };
        assert_eq!(form.into_input(), Err(FormError::Missing("start_time")));
    }

    #[test]
    fn test_starting_at_prefills_datetime_local() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 20, 5, 9).unwrap();
        assert_eq!(ShowForm::starting_at(now).start_time, "2024-06-01T20:05");
    }

    #[test]
    fn test_genre_options_marks_selection_and_keeps_unknown() {
        let options = genre_options(&["Jazz".to_string(), "Zydeco".to_string()]);
        assert_eq!(options.len(), GENRES.len() + 1);
        assert!(options.iter().any(|o| o.value == "Jazz" && o.selected));
        assert!(options.iter().any(|o| o.value == "Blues" && !o.selected));
        assert_eq!(options.last().map(|o| o.value.as_str()), Some("Zydeco"));
    }

    #[test]
    fn test_state_options() {
        let options = state_options("CA");
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
        assert_eq!(state_options("").len(), STATES.len());
    }

    #[test]
    fn test_form_error_display() {
        assert_eq!(FormError::Missing("city").to_string(), "city is required");
        let err = FormError::Invalid {
            field: "venue_id",
            value: "x".into(),
        };
        assert_eq!(err.to_string(), "venue_id is not valid: \"x\"");
    }
}
