use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::types::{FixtureBatch, FixtureInput};
use super::FixtureFeed;

/// Reads fixtures from a JSON file. Accepts either `{"fixtures": [...]}` or a
/// bare array of fixture inputs.
pub struct JsonFileFeed {
    path: PathBuf,
}

impl JsonFileFeed {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn parse(content: &str) -> Result<Vec<FixtureInput>> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('[') {
            serde_json::from_str::<Vec<FixtureInput>>(trimmed)
                .with_context(|| "Failed to parse fixture array")
        } else {
            let batch: FixtureBatch = serde_json::from_str(trimmed)
                .with_context(|| "Failed to parse fixtures JSON")?;
            Ok(batch.fixtures)
        }
    }
}

impl FixtureFeed for JsonFileFeed {
    fn fetch_fixtures(&mut self) -> Result<Vec<FixtureInput>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read fixtures file: {}", self.path.display()))?;
        let fixtures = Self::parse(&content)?;
        tracing::debug!(path = %self.path.display(), count = fixtures.len(), "loaded fixtures");
        Ok(fixtures)
    }

    fn name(&self) -> &str {
        "json-file"
    }
}
