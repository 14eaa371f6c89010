use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use url::Url;

use crate::extractor::{
    Description, ExtractionError, MetaInfo, Privacy, StreamExtractor, StreamSegment, StreamType,
};
use crate::track_metadata::TrackMetadata;

pub const BASE_URL: &str = "https://www.youtube.com/watch?v=";

pub fn watch_url(id: &str) -> Url {
    Url::parse(&format!("{BASE_URL}{id}")).expect("valid watch url")
}

pub fn date(raw: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(raw).expect("valid rfc3339 date")
}

/// Everything a scripted extractor reports after its fake fetch, one field
/// per accessor of the contract.
#[derive(Debug, Clone)]
pub struct FetchedStream {
    pub id: String,
    pub url: String,
    pub original_url: String,
    pub name: String,
    pub stream_type: StreamType,
    pub uploader_name: String,
    pub uploader_url: String,
    pub uploader_verified: bool,
    pub duration_seconds: i64,
    pub timestamp_seconds: i64,
    pub upload_date: Option<DateTime<FixedOffset>>,
    pub textual_upload_date: Option<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub dislike_count: i64,
    pub description: Description,
    pub licence: String,
    pub category: String,
    pub tags: Vec<String>,
    pub stream_segments: Vec<StreamSegment>,
    pub track_metadata: Vec<TrackMetadata>,
    pub has_subtitles: bool,
    pub privacy: Privacy,
    pub meta_info: Vec<MetaInfo>,
}

/// Neutral baseline for a public video with the given id; tests overwrite
/// the fields a scenario asserts.
pub fn fetched_stream(id: &str) -> FetchedStream {
    let url = format!("{BASE_URL}{id}");
    FetchedStream {
        id: id.to_string(),
        url: url.clone(),
        original_url: url,
        name: String::new(),
        stream_type: StreamType::Video,
        uploader_name: String::new(),
        uploader_url: String::new(),
        uploader_verified: false,
        duration_seconds: 0,
        timestamp_seconds: 0,
        upload_date: None,
        textual_upload_date: None,
        view_count: -1,
        like_count: -1,
        dislike_count: -1,
        description: Description::default(),
        licence: String::new(),
        category: String::new(),
        tags: Vec::new(),
        stream_segments: Vec::new(),
        track_metadata: Vec::new(),
        has_subtitles: false,
        privacy: Privacy::Public,
        meta_info: Vec::new(),
    }
}

/// Extractor that replays a canned outcome: either a [`FetchedStream`] made
/// readable by `fetch_page`, or a scripted rejection. Accessors panic if the
/// page was never fetched, mirroring real extractors that have no state to
/// read before the fetch.
pub struct ScriptedExtractor {
    script: Result<FetchedStream, ExtractionError>,
    fetched: Option<FetchedStream>,
}

impl ScriptedExtractor {
    pub fn with_stream(stream: FetchedStream) -> Self {
        Self {
            script: Ok(stream),
            fetched: None,
        }
    }

    pub fn failing(error: ExtractionError) -> Self {
        Self {
            script: Err(error),
            fetched: None,
        }
    }

    fn stream(&self) -> &FetchedStream {
        self.fetched
            .as_ref()
            .expect("accessor called before fetch_page")
    }
}

#[async_trait]
impl StreamExtractor for ScriptedExtractor {
    async fn fetch_page(&mut self) -> Result<(), ExtractionError> {
        match &self.script {
            Ok(stream) => {
                self.fetched = Some(stream.clone());
                Ok(())
            }
            Err(error) => Err(error.clone()),
        }
    }

    fn id(&self) -> String {
        self.stream().id.clone()
    }

    fn url(&self) -> String {
        self.stream().url.clone()
    }

    fn original_url(&self) -> String {
        self.stream().original_url.clone()
    }

    fn name(&self) -> String {
        self.stream().name.clone()
    }

    fn stream_type(&self) -> StreamType {
        self.stream().stream_type
    }

    fn uploader_name(&self) -> String {
        self.stream().uploader_name.clone()
    }

    fn uploader_url(&self) -> String {
        self.stream().uploader_url.clone()
    }

    fn is_uploader_verified(&self) -> bool {
        self.stream().uploader_verified
    }

    fn duration_seconds(&self) -> i64 {
        self.stream().duration_seconds
    }

    fn timestamp_seconds(&self) -> i64 {
        self.stream().timestamp_seconds
    }

    fn upload_date(&self) -> Option<DateTime<FixedOffset>> {
        self.stream().upload_date
    }

    fn textual_upload_date(&self) -> Option<String> {
        self.stream().textual_upload_date.clone()
    }

    fn view_count(&self) -> i64 {
        self.stream().view_count
    }

    fn like_count(&self) -> i64 {
        self.stream().like_count
    }

    fn dislike_count(&self) -> i64 {
        self.stream().dislike_count
    }

    fn description(&self) -> Description {
        self.stream().description.clone()
    }

    fn licence(&self) -> String {
        self.stream().licence.clone()
    }

    fn category(&self) -> String {
        self.stream().category.clone()
    }

    fn tags(&self) -> Vec<String> {
        self.stream().tags.clone()
    }

    fn stream_segments(&self) -> Vec<StreamSegment> {
        self.stream().stream_segments.clone()
    }

    fn track_metadata(&self) -> Vec<TrackMetadata> {
        self.stream().track_metadata.clone()
    }

    fn has_subtitles(&self) -> bool {
        self.stream().has_subtitles
    }

    fn privacy(&self) -> Privacy {
        self.stream().privacy
    }

    fn meta_info(&self) -> Vec<MetaInfo> {
        self.stream().meta_info.clone()
    }
}
