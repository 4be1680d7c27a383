pub mod json_file;
pub mod simulated;
pub mod types;

use anyhow::Result;
use types::FixtureInput;

pub use json_file::JsonFileFeed;
pub use simulated::SimulatedFeed;

/// Source of fixtures to analyse. The core never fetches anything itself;
/// hosts pick a feed and hand the fixtures to the pipeline.
pub trait FixtureFeed: Send {
    fn fetch_fixtures(&mut self) -> Result<Vec<FixtureInput>>;

    /// Short name used in log lines.
    fn name(&self) -> &str;
}
