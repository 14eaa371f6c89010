use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Song-level attribution attached to a stream: title, artist, album and an
/// optional release date carried as an absolute instant with its original
/// UTC offset.
///
/// Extractors populate this incrementally via the setters when a platform
/// exposes only partial metadata, then use [`TrackMetadata::is_empty`] to
/// decide whether there is any music info worth surfacing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackMetadata {
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    release_date: Option<DateTime<FixedOffset>>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

impl TrackMetadata {
    pub fn new(
        title: Option<String>,
        artist: Option<String>,
        album: Option<String>,
        release_date: Option<DateTime<FixedOffset>>,
    ) -> Self {
        Self {
            title,
            artist,
            album,
            release_date,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    pub fn release_date(&self) -> Option<DateTime<FixedOffset>> {
        self.release_date
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_artist(&mut self, artist: impl Into<String>) {
        self.artist = Some(artist.into());
    }

    pub fn set_album(&mut self, album: impl Into<String>) {
        self.album = Some(album.into());
    }

    pub fn set_release_date(&mut self, release_date: DateTime<FixedOffset>) {
        self.release_date = Some(release_date);
    }

    /// True iff every text field is absent or blank and no release date is
    /// set.
    pub fn is_empty(&self) -> bool {
        is_blank(&self.title)
            && is_blank(&self.artist)
            && is_blank(&self.album)
            && self.release_date.is_none()
    }
}

/// Canonical equality: title, artist and album compare by value, and the
/// release dates must be either both absent or both denote the same absolute
/// instant. The carried offset does not participate: `chrono` compares
/// `DateTime` values by instant.
impl PartialEq for TrackMetadata {
    fn eq(&self, other: &Self) -> bool {
        let dates_compatible = match (&self.release_date, &other.release_date) {
            (None, None) => true,
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        self.title == other.title
            && self.artist == other.artist
            && self.album == other.album
            && dates_compatible
    }
}

impl Eq for TrackMetadata {}

impl Hash for TrackMetadata {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
        self.artist.hash(state);
        self.album.hash(state);
        // chrono hashes the instant, not the offset, so this stays consistent
        // with eq; an absent date is its own hashable state.
        self.release_date.hash(state);
    }
}

/// Dump format: one `key:\tvalue` line per non-empty field, in the fixed
/// order title, artist, album, releaseDate; the date renders as `yyyy-MM-dd`
/// in its carried offset.
impl fmt::Display for TrackMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            writeln!(f, "title:\t{}", title)?;
        }
        if let Some(artist) = self.artist.as_deref().filter(|a| !a.is_empty()) {
            writeln!(f, "artist:\t{}", artist)?;
        }
        if let Some(album) = self.album.as_deref().filter(|a| !a.is_empty()) {
            writeln!(f, "album:\t{}", album)?;
        }
        if let Some(date) = &self.release_date {
            writeln!(f, "releaseDate:\t{}", date.format("%Y-%m-%d"))?;
        }
        Ok(())
    }
}
