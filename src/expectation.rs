use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::extractor::{Privacy, StreamType};
use crate::track_metadata::TrackMetadata;

fn count_unchecked() -> i64 {
    -1
}

/// Everything a conforming extractor must report for one scenario, as plain
/// data. Suites live in JSON; a record only spells out the fields it cares
/// about and inherits the defaults for the rest.
///
/// Defaults are claims, not gaps: a record that leaves `uploader_verified`
/// at `false` asserts the uploader is unverified, and an empty
/// `track_metadata` asserts the stream carries none. Only `Option` fields
/// (`None` skips the check) and the `*_at_least` counters (negative skips)
/// opt out of checking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioExpectation {
    pub scenario: String,
    /// Scenario directory under the fixture store's base dir.
    pub fixture_path: String,
    pub url: Url,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    /// Substring the canonical URL must contain. Segment spot checks derive
    /// their exact jump URL from it, so those scenarios set it to the full
    /// canonical URL.
    #[serde(default)]
    pub url_contains: Option<String>,
    #[serde(default)]
    pub original_url_contains: Option<String>,
    #[serde(default)]
    pub stream_type: Option<StreamType>,
    #[serde(default)]
    pub uploader_name: Option<String>,
    #[serde(default)]
    pub uploader_url: Option<String>,
    #[serde(default)]
    pub uploader_verified: bool,
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    /// Playback offset carried in the URL; 0 claims there is none.
    #[serde(default)]
    pub timestamp_seconds: i64,
    /// Lower bounds for live counters, which only ever grow between fixture
    /// recordings. Negative means the counter is not checked.
    #[serde(default = "count_unchecked")]
    pub view_count_at_least: i64,
    #[serde(default = "count_unchecked")]
    pub like_count_at_least: i64,
    #[serde(default = "count_unchecked")]
    pub dislike_count_at_least: i64,
    #[serde(default)]
    pub upload_date: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub textual_upload_date: Option<String>,
    /// Substrings the description must contain, checked one by one.
    #[serde(default)]
    pub description_contains: Vec<String>,
    #[serde(default)]
    pub licence: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Compared as a set: order is noise, membership is not.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub stream_segment_count: usize,
    /// Indexed spot checks inside the segment list; the segment's jump URL
    /// is derived from `url_contains` and the start time.
    #[serde(default)]
    pub stream_segments: Vec<ExpectedStreamSegment>,
    /// The complete expected track list, in order. Empty claims the stream
    /// has no track metadata.
    #[serde(default)]
    pub track_metadata: Vec<TrackMetadata>,
    #[serde(default)]
    pub has_subtitles: bool,
    #[serde(default)]
    pub privacy: Option<Privacy>,
    /// The complete expected meta-info list, in order. Empty claims none.
    #[serde(default)]
    pub meta_info: Vec<ExpectedMetaInfo>,
}

impl ScenarioExpectation {
    /// Baseline record carrying only the defaults; callers fill in the
    /// fields they assert via struct update syntax.
    pub fn new(scenario: impl Into<String>, fixture_path: impl Into<String>, url: Url) -> Self {
        Self {
            scenario: scenario.into(),
            fixture_path: fixture_path.into(),
            url,
            name: None,
            id: None,
            url_contains: None,
            original_url_contains: None,
            stream_type: None,
            uploader_name: None,
            uploader_url: None,
            uploader_verified: false,
            duration_seconds: None,
            timestamp_seconds: 0,
            view_count_at_least: -1,
            like_count_at_least: -1,
            dislike_count_at_least: -1,
            upload_date: None,
            textual_upload_date: None,
            description_contains: Vec::new(),
            licence: None,
            category: None,
            tags: None,
            stream_segment_count: 0,
            stream_segments: Vec::new(),
            track_metadata: Vec::new(),
            has_subtitles: false,
            privacy: None,
            meta_info: Vec::new(),
        }
    }
}

/// Spot check for a single entry of the segment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedStreamSegment {
    pub index: usize,
    pub start_time_seconds: u32,
    pub title: String,
}

/// Expected platform notice, URLs as strings so records stay hand-writable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedMetaInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub url_texts: Vec<String>,
}

/// Parses a JSON array of scenario records.
pub fn expectations_from_json(raw: &str) -> Result<Vec<ScenarioExpectation>, serde_json::Error> {
    serde_json::from_str(raw)
}
