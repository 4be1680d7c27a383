pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod report;

pub use error::AnalysisError;
pub use pipeline::{analyse_fixture, FixtureAnalyzer};
pub use report::FixtureReport;
