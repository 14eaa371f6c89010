use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::fixture::FixtureSource;
use crate::session::SessionContext;
use crate::track_metadata::TrackMetadata;

/// Closed classification of the ways an extraction can fail. Every
/// [`ExtractionError`] maps onto exactly one kind, which is what the
/// unavailable-content checks compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    GeographicRestriction,
    ContentNotAvailable,
    InvalidId,
    PaidContent,
    PrivateContent,
    PremiumMusicContent,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::GeographicRestriction,
        ErrorKind::ContentNotAvailable,
        ErrorKind::InvalidId,
        ErrorKind::PaidContent,
        ErrorKind::PrivateContent,
        ErrorKind::PremiumMusicContent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::GeographicRestriction => "geographic_restriction",
            ErrorKind::ContentNotAvailable => "content_not_available",
            ErrorKind::InvalidId => "invalid_id",
            ErrorKind::PaidContent => "paid_content",
            ErrorKind::PrivateContent => "private_content",
            ErrorKind::PremiumMusicContent => "premium_music_content",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a stream could not be extracted. The payload-carrying variants keep
/// whatever detail the platform reported; classification for conformance
/// purposes goes through [`ExtractionError::kind`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExtractionError {
    #[error("content is not available in your region")]
    GeographicRestriction,
    #[error("content not available: {0}")]
    ContentNotAvailable(String),
    #[error("could not parse stream identifier: {0}")]
    InvalidId(String),
    #[error("content requires payment")]
    PaidContent,
    #[error("content is private")]
    PrivateContent,
    #[error("content requires a music premium subscription")]
    PremiumMusicContent,
}

impl ExtractionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::GeographicRestriction => ErrorKind::GeographicRestriction,
            ExtractionError::ContentNotAvailable(_) => ErrorKind::ContentNotAvailable,
            ExtractionError::InvalidId(_) => ErrorKind::InvalidId,
            ExtractionError::PaidContent => ErrorKind::PaidContent,
            ExtractionError::PrivateContent => ErrorKind::PrivateContent,
            ExtractionError::PremiumMusicContent => ErrorKind::PremiumMusicContent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
    Video,
    Audio,
    Live,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privacy {
    Public,
    Unlisted,
    Private,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionKind {
    #[default]
    PlainText,
    Html,
    Markdown,
}

/// Stream description together with its markup flavour, so consumers know
/// whether the content needs rendering before display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub content: String,
    pub kind: DescriptionKind,
}

impl Description {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: DescriptionKind::PlainText,
        }
    }

    pub fn html(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: DescriptionKind::Html,
        }
    }
}

/// A chapter mark inside a stream. `url` jumps straight to `start_time_seconds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSegment {
    pub start_time_seconds: u32,
    pub title: String,
    pub url: String,
    pub preview_url: Option<String>,
}

/// Platform-issued notice shown alongside a stream, e.g. a fact-check banner
/// with links to an authoritative source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaInfo {
    pub title: String,
    pub content: Option<Description>,
    pub urls: Vec<Url>,
    pub url_texts: Vec<String>,
}

/// The contract a stream metadata extractor has to satisfy.
///
/// [`StreamExtractor::fetch_page`] performs the one network round trip (in
/// this harness: a fixture replay) and must be called before any accessor;
/// it is idempotent, so a second call on an already fetched extractor is a
/// no-op. Accessors are plain reads of the fetched state. Counters return
/// `-1` when the platform withholds the figure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StreamExtractor: Send {
    async fn fetch_page(&mut self) -> Result<(), ExtractionError>;

    fn id(&self) -> String;
    fn url(&self) -> String;
    /// The URL the extractor was created with, before canonicalisation.
    fn original_url(&self) -> String;
    fn name(&self) -> String;
    fn stream_type(&self) -> StreamType;
    fn uploader_name(&self) -> String;
    fn uploader_url(&self) -> String;
    fn is_uploader_verified(&self) -> bool;
    fn duration_seconds(&self) -> i64;
    /// Playback offset requested via the URL, 0 when absent.
    fn timestamp_seconds(&self) -> i64;
    fn upload_date(&self) -> Option<DateTime<FixedOffset>>;
    /// The raw date string as the platform served it, e.g. `2018-06-19`.
    fn textual_upload_date(&self) -> Option<String>;
    fn view_count(&self) -> i64;
    fn like_count(&self) -> i64;
    fn dislike_count(&self) -> i64;
    fn description(&self) -> Description;
    fn licence(&self) -> String;
    fn category(&self) -> String;
    fn tags(&self) -> Vec<String>;
    fn stream_segments(&self) -> Vec<StreamSegment>;
    fn track_metadata(&self) -> Vec<TrackMetadata>;
    fn has_subtitles(&self) -> bool;
    fn privacy(&self) -> Privacy;
    fn meta_info(&self) -> Vec<MetaInfo>;
}

/// Builds extractors bound to a session and a fixture directory. The harness
/// owns the factory; implementations decide how a URL maps onto an extractor
/// and may reject it outright, e.g. with [`ExtractionError::InvalidId`].
#[cfg_attr(test, mockall::automock)]
pub trait ExtractorFactory: Send + Sync {
    fn create(
        &self,
        session: &SessionContext,
        fixture: &FixtureSource,
        url: &Url,
    ) -> Result<Box<dyn StreamExtractor>, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_maps_to_its_kind() {
        let cases = [
            (
                ExtractionError::GeographicRestriction,
                ErrorKind::GeographicRestriction,
            ),
            (
                ExtractionError::ContentNotAvailable("gone".to_string()),
                ErrorKind::ContentNotAvailable,
            ),
            (
                ExtractionError::InvalidId("abc".to_string()),
                ErrorKind::InvalidId,
            ),
            (ExtractionError::PaidContent, ErrorKind::PaidContent),
            (ExtractionError::PrivateContent, ErrorKind::PrivateContent),
            (
                ExtractionError::PremiumMusicContent,
                ErrorKind::PremiumMusicContent,
            ),
        ];
        for (error, kind) in cases {
            assert_eq!(error.kind(), kind);
        }
    }

    #[test]
    fn test_all_kinds_are_listed_once() {
        let mut seen = std::collections::HashSet::new();
        for kind in ErrorKind::ALL {
            assert!(seen.insert(kind), "duplicate kind {kind}");
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_error_messages_are_distinct() {
        let messages: std::collections::HashSet<String> = [
            ExtractionError::GeographicRestriction.to_string(),
            ExtractionError::ContentNotAvailable("x".to_string()).to_string(),
            ExtractionError::InvalidId("x".to_string()).to_string(),
            ExtractionError::PaidContent.to_string(),
            ExtractionError::PrivateContent.to_string(),
            ExtractionError::PremiumMusicContent.to_string(),
        ]
        .into_iter()
        .collect();
        assert_eq!(messages.len(), 6);
    }

    #[test]
    fn test_error_detail_survives_in_message() {
        let error = ExtractionError::ContentNotAvailable("this content does not exist".to_string());
        assert_eq!(
            error.to_string(),
            "content not available: this content does not exist"
        );
    }

    #[test]
    fn test_kind_serialises_snake_case() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::PremiumMusicContent).unwrap(),
            "\"premium_music_content\""
        );
    }
}
