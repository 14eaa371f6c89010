pub mod conformance;
pub mod expectation;
pub mod extractor;
pub mod fixture;
pub mod session;
pub mod track_metadata;
pub mod unavailable;

pub use conformance::{run_scenario, run_suite, ScenarioReport, SuiteReport};
pub use expectation::{expectations_from_json, ScenarioExpectation};
pub use extractor::{ErrorKind, ExtractionError, ExtractorFactory, StreamExtractor};
pub use fixture::FixtureStore;
pub use session::SessionContext;
pub use track_metadata::TrackMetadata;
pub use unavailable::{verify_suite, UnavailableSuite};

#[cfg(test)]
pub mod test_utils;
