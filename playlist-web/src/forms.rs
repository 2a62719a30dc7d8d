//! Form definitions and validation
//!
//! Every field deserializes with a default so a missing field becomes a
//! validation error on the re-rendered form rather than a rejected request.
//! Every form carries a hidden `csrf_token` that must match the submitting
//! session.

use std::collections::BTreeMap;

use playlist_common::db::Song;
use serde::Deserialize;

use crate::session::Session;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_CHOICE_MESSAGE: &str = "Not a valid choice.";
pub const CSRF_MISSING_MESSAGE: &str = "The CSRF token is missing.";
pub const CSRF_INVALID_MESSAGE: &str = "The CSRF token is invalid.";

/// Name of the hidden token field
pub const CSRF_FIELD: &str = "csrf_token";

/// Field-level validation errors, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    /// Errors for one field (empty if the field is valid)
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn require(errors: &mut FormErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, REQUIRED_MESSAGE);
    }
}

fn check_csrf(errors: &mut FormErrors, session: &Session, token: &str) {
    if token.trim().is_empty() {
        errors.add(CSRF_FIELD, CSRF_MISSING_MESSAGE);
    } else if !session.verify_csrf(token) {
        errors.add(CSRF_FIELD, CSRF_INVALID_MESSAGE);
    }
}

/// New playlist form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl PlaylistForm {
    pub fn validate(&self, session: &Session) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        check_csrf(&mut errors, session, &self.csrf_token);
        require(&mut errors, "name", &self.name);
        errors.into_result()
    }
}

/// New song form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl SongForm {
    pub fn validate(&self, session: &Session) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        check_csrf(&mut errors, session, &self.csrf_token);
        require(&mut errors, "title", &self.title);
        require(&mut errors, "artist", &self.artist);
        errors.into_result()
    }
}

/// Add-song-to-playlist form; `song` is the selected song id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSongForPlaylistForm {
    #[serde(default)]
    pub song: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl NewSongForPlaylistForm {
    /// Validate the selection against the offered choices, returning the song id
    pub fn validate(&self, session: &Session, choices: &[Song]) -> Result<i64, FormErrors> {
        let mut errors = FormErrors::default();
        check_csrf(&mut errors, session, &self.csrf_token);

        let raw = self.song.trim();
        let selected = if raw.is_empty() {
            errors.add("song", REQUIRED_MESSAGE);
            None
        } else {
            match raw.parse::<i64>() {
                Ok(id) if choices.iter().any(|song| song.id == id) => Some(id),
                _ => {
                    errors.add("song", INVALID_CHOICE_MESSAGE);
                    None
                }
            }
        };

        match selected {
            Some(id) if errors.is_empty() => Ok(id),
            _ => Err(errors),
        }
    }
}
