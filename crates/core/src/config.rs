//! Configuration for the listing front end.
//!
//! This module defines the configuration structures used to drive a sweep over a
//! code image. It provides:
//! 1. **Defaults:** Baseline load address and output choices.
//! 2. **Structures:** Hierarchical config for general, sweep and output settings.
//! 3. **Enums:** Output format selection.
//!
//! Configuration is supplied as JSON; every section and field is optional.

use std::path::Path;

use serde::Deserialize;

use crate::common::ConfigError;

/// Default configuration constants.
mod defaults {
    /// Load address used for raw (non-ELF) images.
    pub const BASE_ADDRESS: u64 = crate::common::constants::DEFAULT_BASE_ADDRESS;

    /// Lifted IL is not printed unless requested.
    pub const SHOW_IL: bool = false;

    /// Control-flow edges are printed by default.
    pub const SHOW_BRANCHES: bool = true;
}

/// Listing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text, one instruction per line.
    #[default]
    Text,
    /// One JSON object per instruction.
    #[serde(alias = "JSON")]
    Json,
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use rvlift_core::config::{Config, OutputFormat};
///
/// let json = r#"{
///     "general": { "base_address": 4096 },
///     "output": { "format": "json", "show_il": true }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.base_address, 0x1000);
/// assert_eq!(config.output.format, OutputFormat::Json);
/// assert!(config.output.show_branches);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Sweep behaviour
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Output selection
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Parses a configuration document.
    ///
    /// # Arguments
    ///
    /// * `json` - JSON text; missing sections and fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// General settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Load address of raw images
    #[serde(default = "GeneralConfig::default_base_address")]
    pub base_address: u64,

    /// Log every lifted instruction at trace level
    #[serde(default)]
    pub trace_instructions: bool,
}

impl GeneralConfig {
    fn default_base_address() -> u64 {
        defaults::BASE_ADDRESS
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            base_address: defaults::BASE_ADDRESS,
            trace_instructions: false,
        }
    }
}

/// Sweep behaviour.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SweepConfig {
    /// Stop after this many bytes of each region (whole region if unset)
    #[serde(default)]
    pub max_len: Option<usize>,

    /// End the sweep at the first undecodable word instead of skipping it
    #[serde(default)]
    pub stop_on_error: bool,
}

/// Output selection.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Listing format
    #[serde(default)]
    pub format: OutputFormat,

    /// Print lifted IL under each instruction
    #[serde(default = "OutputConfig::default_show_il")]
    pub show_il: bool,

    /// Print control-flow edges under each instruction
    #[serde(default = "OutputConfig::default_show_branches")]
    pub show_branches: bool,

    /// Print a summary after the listing
    #[serde(default)]
    pub show_stats: bool,
}

impl OutputConfig {
    fn default_show_il() -> bool {
        defaults::SHOW_IL
    }

    fn default_show_branches() -> bool {
        defaults::SHOW_BRANCHES
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            show_il: defaults::SHOW_IL,
            show_branches: defaults::SHOW_BRANCHES,
            show_stats: false,
        }
    }
}
