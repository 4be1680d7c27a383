use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::engine::kelly::{MAX_STAKE, MODERATE_KELLY};
use crate::engine::odds_book::{UnknownSelectionPolicy, FALLBACK_ODDS};
use crate::engine::strategy::{AnalysisParams, MIN_EV_THRESHOLD, TOP_K};

pub const DEFAULT_LOG_FILTER: &str = "matchday_value=info";

/// Every section is optional; a missing section takes the built-in defaults.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub odds: OddsConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_min_ev_threshold")]
    pub min_ev_threshold: f64,
    #[serde(default = "default_max_stake")]
    pub max_stake: f64,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_min_ev_threshold() -> f64 { MIN_EV_THRESHOLD }
fn default_max_stake() -> f64 { MAX_STAKE }
fn default_top_k() -> usize { TOP_K }

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_ev_threshold: MIN_EV_THRESHOLD,
            max_stake: MAX_STAKE,
            top_k: TOP_K,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OddsConfig {
    #[serde(default)]
    pub unknown_selection: UnknownSelectionPolicy,
    #[serde(default = "default_fallback_odds")]
    pub fallback_odds: f64,
}

fn default_fallback_odds() -> f64 { FALLBACK_ODDS }

impl Default for OddsConfig {
    fn default() -> Self {
        Self {
            unknown_selection: UnknownSelectionPolicy::default(),
            fallback_odds: FALLBACK_ODDS,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BatchConfig {
    /// Worker threads for batch analysis; 0 uses rayon's default.
    #[serde(default)]
    pub workers: usize,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool { true }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pretty: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let a = &self.analysis;
        ensure!(
            a.min_ev_threshold.is_finite(),
            "analysis.min_ev_threshold must be finite (got {})",
            a.min_ev_threshold
        );
        // below the moderate band the stake tiers would overlap
        ensure!(
            a.max_stake >= MODERATE_KELLY && a.max_stake <= 1.0,
            "analysis.max_stake must lie in [{}, 1] (got {})",
            MODERATE_KELLY,
            a.max_stake
        );
        ensure!(a.top_k >= 1, "analysis.top_k must be at least 1");
        ensure!(
            self.odds.fallback_odds.is_finite() && self.odds.fallback_odds > 1.0,
            "odds.fallback_odds must be greater than 1.0 (got {})",
            self.odds.fallback_odds
        );
        Ok(())
    }

    pub fn analysis_params(&self) -> AnalysisParams {
        AnalysisParams {
            min_ev_threshold: self.analysis.min_ev_threshold,
            max_stake: self.analysis.max_stake,
            top_k: self.analysis.top_k,
        }
    }
}
