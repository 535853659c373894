//! One-shot notices carried across a redirect in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::borrow::Cow;

pub const FLASH_COOKIE: &str = "showbill_flash";

/// Longest record name quoted in a notice.
const MAX_NAME_CHARS: usize = 60;

/// Browsers drop cookies past about 4 KB, and percent-encoding can grow one
/// char to twelve bytes.
const MAX_MESSAGE_CHARS: usize = 300;

fn clip(text: &str, max: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max) {
        Some((cut, _)) => Cow::Owned(format!("{}…", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// A record name shortened for use inside a notice.
pub fn quote_name(name: &str) -> Cow<'_, str> {
    clip(name, MAX_NAME_CHARS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "alert-success",
            Self::Error => "alert-danger",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    fn new(level: FlashLevel, message: String) -> Self {
        let message = match clip(&message, MAX_MESSAGE_CHARS) {
            Cow::Borrowed(_) => message,
            Cow::Owned(clipped) => clipped,
        };
        Self { level, message }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Error, message.into())
    }

    /// Plain `level:message`; the jar percent-encodes it on the way out.
    fn encode(&self) -> String {
        format!("{}:{}", self.level.as_str(), self.message)
    }

    fn decode(raw: &str) -> Option<Self> {
        let (level, message) = raw.split_once(':')?;
        Some(Self {
            level: FlashLevel::parse(level)?,
            message: message.to_owned(),
        })
    }
}

/// Queue a notice for the next rendered page, replacing any pending one.
pub fn push(jar: CookieJar, flash: Flash) -> CookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, flash.encode()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Consume the pending notice, if any.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(raw) = jar.get(FLASH_COOKIE).map(|c| c.value().to_owned()) else {
        return (jar, None);
    };
    let flash = Flash::decode(&raw);
    if flash.is_none() {
        tracing::debug!("discarding malformed flash cookie");
    }
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flash)
}
