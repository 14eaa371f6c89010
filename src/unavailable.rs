use serde::{Deserialize, Serialize};
use url::Url;

use crate::extractor::{ErrorKind, ExtractorFactory};
use crate::fixture::{FixtureSource, FixtureStore};
use crate::session::SessionContext;

/// One URL that must be rejected, and the error kind the rejection has to
/// carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorScenario {
    pub url: Url,
    pub expected_kind: ErrorKind,
}

impl ErrorScenario {
    pub fn new(url: Url, expected_kind: ErrorKind) -> Self {
        Self { url, expected_kind }
    }
}

/// A batch of rejection checks replayed against one shared fixture
/// directory, the way unavailable-content recordings are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableSuite {
    pub fixture_path: String,
    pub scenarios: Vec<ErrorScenario>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorVerdict {
    /// Extraction failed with exactly the expected kind.
    Confirmed,
    /// Extraction failed, but the error was classified differently. A paid
    /// stream reported as plain unavailable is a contract violation even
    /// though both are rejections.
    WrongKind {
        expected: ErrorKind,
        actual: ErrorKind,
    },
    /// Extraction succeeded where it must not.
    UnexpectedSuccess,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutcome {
    pub url: Url,
    pub expected_kind: ErrorKind,
    pub verdict: ErrorVerdict,
}

impl ErrorOutcome {
    pub fn confirmed(&self) -> bool {
        self.verdict == ErrorVerdict::Confirmed
    }
}

/// Checks that one URL is rejected with the expected error kind. The
/// rejection may come from the factory or from the fetch; both count.
/// Accessors are never touched, a failed fetch leaves nothing to read.
pub async fn verify_scenario(
    factory: &dyn ExtractorFactory,
    session: &SessionContext,
    fixture: &FixtureSource,
    scenario: &ErrorScenario,
) -> ErrorOutcome {
    let verdict = match factory.create(session, fixture, &scenario.url) {
        Err(error) => classify(scenario.expected_kind, error.kind()),
        Ok(mut extractor) => match extractor.fetch_page().await {
            Err(error) => classify(scenario.expected_kind, error.kind()),
            Ok(()) => ErrorVerdict::UnexpectedSuccess,
        },
    };

    match &verdict {
        ErrorVerdict::Confirmed => {
            log::info!("{}: confirmed {}", scenario.url, scenario.expected_kind);
        }
        ErrorVerdict::WrongKind { expected, actual } => {
            log::warn!("{}: expected {}, got {}", scenario.url, expected, actual);
        }
        ErrorVerdict::UnexpectedSuccess => {
            log::error!(
                "{}: expected {}, but extraction succeeded",
                scenario.url,
                scenario.expected_kind
            );
        }
    }

    ErrorOutcome {
        url: scenario.url.clone(),
        expected_kind: scenario.expected_kind,
        verdict,
    }
}

/// Runs the suite sequentially against its shared fixture, resetting the
/// session cache once up front. Outcomes come back in input order.
pub async fn verify_suite(
    factory: &dyn ExtractorFactory,
    session: &SessionContext,
    store: &FixtureStore,
    suite: &UnavailableSuite,
) -> Vec<ErrorOutcome> {
    log::info!(
        "Verifying {} unavailable-content scenario(s)",
        suite.scenarios.len()
    );
    session.reset();

    let fixture = store.scenario(&suite.fixture_path);
    let mut outcomes = Vec::with_capacity(suite.scenarios.len());
    for scenario in &suite.scenarios {
        outcomes.push(verify_scenario(factory, session, &fixture, scenario).await);
    }
    outcomes
}

fn classify(expected: ErrorKind, actual: ErrorKind) -> ErrorVerdict {
    if expected == actual {
        ErrorVerdict::Confirmed
    } else {
        ErrorVerdict::WrongKind { expected, actual }
    }
}
