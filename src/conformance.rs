use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::expectation::{ExpectedMetaInfo, ScenarioExpectation};
use crate::extractor::{ExtractionError, ExtractorFactory, MetaInfo, StreamExtractor, StreamSegment};
use crate::fixture::FixtureStore;
use crate::session::SessionContext;
use crate::track_metadata::TrackMetadata;

/// Result of a single field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    Passed,
    Failed { detail: String },
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionResult {
    pub field: String,
    pub outcome: CheckOutcome,
}

impl AssertionResult {
    fn passed(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            outcome: CheckOutcome::Passed,
        }
    }

    fn failed(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            outcome: CheckOutcome::Failed {
                detail: detail.into(),
            },
        }
    }

    fn skipped(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            outcome: CheckOutcome::Skipped,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Failed { .. })
    }
}

/// Everything the engine found out about one scenario. `fetch_error` is set
/// when the extractor could not even be created or fetched; the field checks
/// never ran in that case.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub fetch_error: Option<ExtractionError>,
    pub assertions: Vec<AssertionResult>,
}

impl ScenarioReport {
    fn fetch_failed(scenario: impl Into<String>, error: ExtractionError) -> Self {
        Self {
            scenario: scenario.into(),
            fetch_error: Some(error),
            assertions: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.fetch_error.is_none() && !self.assertions.iter().any(AssertionResult::is_failure)
    }

    pub fn failures(&self) -> Vec<&AssertionResult> {
        self.assertions
            .iter()
            .filter(|assertion| assertion.is_failure())
            .collect()
    }

    pub fn outcome_of(&self, field: &str) -> Option<&CheckOutcome> {
        self.assertions
            .iter()
            .find(|assertion| assertion.field == field)
            .map(|assertion| &assertion.outcome)
    }
}

/// The reports of a whole suite run, in the order the expectations were
/// given.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub scenarios: Vec<ScenarioReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> bool {
        self.scenarios.iter().all(ScenarioReport::passed)
    }

    pub fn failed_scenarios(&self) -> Vec<&ScenarioReport> {
        self.scenarios
            .iter()
            .filter(|report| !report.passed())
            .collect()
    }
}

/// Checks one scenario end to end: reset the session cache, build an
/// extractor against the scenario's fixture, fetch once, then evaluate every
/// field claim. Each check lands in the report on its own; one mismatch
/// never hides another.
pub async fn run_scenario(
    factory: &dyn ExtractorFactory,
    session: &SessionContext,
    store: &FixtureStore,
    expectation: &ScenarioExpectation,
) -> ScenarioReport {
    log::info!("Running scenario '{}'", expectation.scenario);
    session.reset();

    let fixture = store.scenario(&expectation.fixture_path);
    let mut extractor = match factory.create(session, &fixture, &expectation.url) {
        Ok(extractor) => extractor,
        Err(error) => {
            log::error!(
                "Scenario '{}': could not create extractor: {}",
                expectation.scenario,
                error
            );
            return ScenarioReport::fetch_failed(&expectation.scenario, error);
        }
    };

    if let Err(error) = extractor.fetch_page().await {
        log::error!(
            "Scenario '{}': fetch failed: {}",
            expectation.scenario,
            error
        );
        return ScenarioReport::fetch_failed(&expectation.scenario, error);
    }

    let assertions = run_checks(expectation, extractor.as_ref());
    let failed = assertions.iter().filter(|a| a.is_failure()).count();
    if failed == 0 {
        log::info!(
            "Scenario '{}' passed {} check(s)",
            expectation.scenario,
            assertions.len()
        );
    } else {
        log::warn!(
            "Scenario '{}' failed {} of {} check(s)",
            expectation.scenario,
            failed,
            assertions.len()
        );
    }

    ScenarioReport {
        scenario: expectation.scenario.clone(),
        fetch_error: None,
        assertions,
    }
}

/// Runs every scenario concurrently, each on its own task with its own
/// session cache, and collects the reports in input order. A panicking
/// scenario becomes a failed report instead of taking the suite down.
pub async fn run_suite(
    factory: Arc<dyn ExtractorFactory>,
    store: &FixtureStore,
    expectations: Vec<ScenarioExpectation>,
) -> SuiteReport {
    log::info!("Running suite of {} scenario(s)", expectations.len());

    let mut handles = Vec::with_capacity(expectations.len());
    for expectation in expectations {
        let factory = Arc::clone(&factory);
        let store = store.clone();
        let scenario = expectation.scenario.clone();
        let handle = tokio::spawn(async move {
            let session = SessionContext::new();
            run_scenario(factory.as_ref(), &session, &store, &expectation).await
        });
        handles.push((scenario, handle));
    }

    let mut scenarios = Vec::with_capacity(handles.len());
    for (scenario, handle) in handles {
        match handle.await {
            Ok(report) => scenarios.push(report),
            Err(error) => {
                log::error!("Scenario '{}' aborted: {}", scenario, error);
                scenarios.push(ScenarioReport {
                    scenario,
                    fetch_error: None,
                    assertions: vec![AssertionResult::failed(
                        "scenario",
                        format!("runner aborted: {error}"),
                    )],
                });
            }
        }
    }

    SuiteReport { scenarios }
}

fn run_checks(expectation: &ScenarioExpectation, extractor: &dyn StreamExtractor) -> Vec<AssertionResult> {
    let mut results = Vec::new();

    results.push(check_optional_exact(
        "id",
        expectation.id.as_ref(),
        &extractor.id(),
    ));
    results.push(check_optional_exact(
        "name",
        expectation.name.as_ref(),
        &extractor.name(),
    ));
    results.push(check_optional_contains(
        "url",
        expectation.url_contains.as_deref(),
        &extractor.url(),
    ));
    results.push(check_optional_contains(
        "original_url",
        expectation.original_url_contains.as_deref(),
        &extractor.original_url(),
    ));
    results.push(check_optional_exact(
        "stream_type",
        expectation.stream_type.as_ref(),
        &extractor.stream_type(),
    ));
    results.push(check_optional_exact(
        "uploader_name",
        expectation.uploader_name.as_ref(),
        &extractor.uploader_name(),
    ));
    results.push(check_optional_exact(
        "uploader_url",
        expectation.uploader_url.as_ref(),
        &extractor.uploader_url(),
    ));
    results.push(check_exact(
        "uploader_verified",
        &expectation.uploader_verified,
        &extractor.is_uploader_verified(),
    ));
    results.push(check_optional_exact(
        "duration_seconds",
        expectation.duration_seconds.as_ref(),
        &extractor.duration_seconds(),
    ));
    results.push(check_exact(
        "timestamp_seconds",
        &expectation.timestamp_seconds,
        &extractor.timestamp_seconds(),
    ));
    results.push(check_at_least(
        "view_count",
        expectation.view_count_at_least,
        extractor.view_count(),
    ));
    results.push(check_at_least(
        "like_count",
        expectation.like_count_at_least,
        extractor.like_count(),
    ));
    results.push(check_at_least(
        "dislike_count",
        expectation.dislike_count_at_least,
        extractor.dislike_count(),
    ));
    // Dates compare as instants, so a fixture recorded at +02:00 still
    // matches an expectation written in UTC.
    results.push(check_optional_field(
        "upload_date",
        expectation.upload_date.as_ref(),
        extractor.upload_date().as_ref(),
    ));
    results.push(check_optional_field(
        "textual_upload_date",
        expectation.textual_upload_date.as_ref(),
        extractor.textual_upload_date().as_ref(),
    ));

    let description = extractor.description();
    for (index, needle) in expectation.description_contains.iter().enumerate() {
        results.push(check_contains(
            &format!("description[{index}]"),
            &description.content,
            needle,
        ));
    }

    results.push(check_optional_exact(
        "licence",
        expectation.licence.as_ref(),
        &extractor.licence(),
    ));
    results.push(check_optional_exact(
        "category",
        expectation.category.as_ref(),
        &extractor.category(),
    ));

    let tags = extractor.tags();
    match &expectation.tags {
        None => results.push(AssertionResult::skipped("tags")),
        Some(expected) => results.push(check_tag_set(expected, &tags)),
    }

    check_segments(expectation, &extractor.stream_segments(), &mut results);
    check_track_metadata(
        &expectation.track_metadata,
        &extractor.track_metadata(),
        &mut results,
    );

    results.push(check_exact(
        "has_subtitles",
        &expectation.has_subtitles,
        &extractor.has_subtitles(),
    ));
    results.push(check_optional_exact(
        "privacy",
        expectation.privacy.as_ref(),
        &extractor.privacy(),
    ));

    check_meta_info(&expectation.meta_info, &extractor.meta_info(), &mut results);

    results
}

fn check_exact<T: PartialEq + fmt::Debug>(field: &str, expected: &T, actual: &T) -> AssertionResult {
    if expected == actual {
        AssertionResult::passed(field)
    } else {
        AssertionResult::failed(field, format!("expected {expected:?}, got {actual:?}"))
    }
}

fn check_optional_exact<T: PartialEq + fmt::Debug>(
    field: &str,
    expected: Option<&T>,
    actual: &T,
) -> AssertionResult {
    match expected {
        None => AssertionResult::skipped(field),
        Some(expected) => check_exact(field, expected, actual),
    }
}

fn check_optional_field<T: PartialEq + fmt::Debug>(
    field: &str,
    expected: Option<&T>,
    actual: Option<&T>,
) -> AssertionResult {
    match (expected, actual) {
        (None, _) => AssertionResult::skipped(field),
        (Some(expected), Some(actual)) => check_exact(field, expected, actual),
        (Some(expected), None) => {
            AssertionResult::failed(field, format!("expected {expected:?}, got nothing"))
        }
    }
}

fn check_optional_contains(field: &str, needle: Option<&str>, haystack: &str) -> AssertionResult {
    match needle {
        None => AssertionResult::skipped(field),
        Some(needle) => check_contains(field, haystack, needle),
    }
}

fn check_contains(field: &str, haystack: &str, needle: &str) -> AssertionResult {
    if haystack.contains(needle) {
        return AssertionResult::passed(field);
    }
    let length = haystack.chars().count();
    if length <= 120 {
        AssertionResult::failed(field, format!("{haystack:?} does not contain {needle:?}"))
    } else {
        AssertionResult::failed(field, format!("{needle:?} not found in {length} characters"))
    }
}

fn check_at_least(field: &str, minimum: i64, actual: i64) -> AssertionResult {
    if minimum < 0 {
        AssertionResult::skipped(field)
    } else if actual >= minimum {
        AssertionResult::passed(field)
    } else {
        AssertionResult::failed(field, format!("expected at least {minimum}, got {actual}"))
    }
}

fn check_tag_set(expected: &[String], actual: &[String]) -> AssertionResult {
    let expected_set: BTreeSet<&str> = expected.iter().map(String::as_str).collect();
    let actual_set: BTreeSet<&str> = actual.iter().map(String::as_str).collect();
    if expected_set == actual_set {
        return AssertionResult::passed("tags");
    }
    let missing: Vec<&&str> = expected_set.difference(&actual_set).collect();
    let unexpected: Vec<&&str> = actual_set.difference(&expected_set).collect();
    AssertionResult::failed(
        "tags",
        format!("missing {missing:?}, unexpected {unexpected:?}"),
    )
}

fn check_segments(
    expectation: &ScenarioExpectation,
    actual: &[StreamSegment],
    results: &mut Vec<AssertionResult>,
) {
    results.push(check_exact(
        "stream_segment_count",
        &expectation.stream_segment_count,
        &actual.len(),
    ));

    for expected in &expectation.stream_segments {
        let label = format!("stream_segments[{}]", expected.index);
        let Some(segment) = actual.get(expected.index) else {
            results.push(AssertionResult::failed(
                &label,
                format!("no segment at index {}", expected.index),
            ));
            continue;
        };

        results.push(check_exact(
            &format!("{label}.start_time"),
            &expected.start_time_seconds,
            &segment.start_time_seconds,
        ));
        results.push(check_exact(
            &format!("{label}.title"),
            &expected.title,
            &segment.title,
        ));

        // The jump URL is never written down in the record; it must be
        // exactly the stream URL with the start time appended.
        match expectation.url_contains.as_deref() {
            Some(base) => {
                let jump_url = format!("{base}?t={}", expected.start_time_seconds);
                results.push(check_exact(&format!("{label}.url"), &jump_url, &segment.url));
            }
            None => results.push(AssertionResult::failed(
                format!("{label}.url"),
                "url_contains is required to derive the jump url",
            )),
        }

        if segment.preview_url.is_some() {
            results.push(AssertionResult::passed(format!("{label}.preview_url")));
        } else {
            results.push(AssertionResult::failed(
                format!("{label}.preview_url"),
                "expected a preview url",
            ));
        }
    }
}

fn check_track_metadata(
    expected: &[TrackMetadata],
    actual: &[TrackMetadata],
    results: &mut Vec<AssertionResult>,
) {
    results.push(check_exact("track_metadata.len", &expected.len(), &actual.len()));

    for (index, expected_entry) in expected.iter().enumerate() {
        let label = format!("track_metadata[{index}]");
        match actual.get(index) {
            Some(actual_entry) => results.push(check_exact(&label, expected_entry, actual_entry)),
            None => results.push(AssertionResult::failed(&label, "missing entry")),
        }
    }
}

fn check_meta_info(
    expected: &[ExpectedMetaInfo],
    actual: &[MetaInfo],
    results: &mut Vec<AssertionResult>,
) {
    results.push(check_exact("meta_info.len", &expected.len(), &actual.len()));

    for (index, expected_entry) in expected.iter().enumerate() {
        let label = format!("meta_info[{index}]");
        let Some(actual_entry) = actual.get(index) else {
            results.push(AssertionResult::failed(&label, "missing entry"));
            continue;
        };

        results.push(check_exact(
            &format!("{label}.title"),
            &expected_entry.title,
            &actual_entry.title,
        ));

        let actual_text = actual_entry
            .content
            .as_ref()
            .map(|description| description.content.clone());
        results.push(check_optional_field(
            &format!("{label}.content"),
            expected_entry.content.as_ref(),
            actual_text.as_ref(),
        ));

        let actual_urls: Vec<String> = actual_entry
            .urls
            .iter()
            .map(|url| url.as_str().to_string())
            .collect();
        results.push(check_exact(
            &format!("{label}.urls"),
            &expected_entry.urls,
            &actual_urls,
        ));
        results.push(check_exact(
            &format!("{label}.url_texts"),
            &expected_entry.url_texts,
            &actual_entry.url_texts,
        ));
    }
}
