//! Configuration loading and typed config structures for Lifegrid.
//!
//! The canonical configuration lives in `lifegrid-config.yaml`. This module
//! defines strongly-typed structs that mirror the YAML structure and a
//! loader that reads and parses the file. Every field has a default, so an
//! empty file is a valid configuration. A field of the wrong type (for
//! example a non-integer rule threshold) fails the whole load rather than
//! falling back to its default.

use std::path::Path;

use lifegrid_types::RuleSet;
use lifegrid_world::Pattern;
use serde::Deserialize;

use crate::step::StepMode;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LifegridConfig {
    /// Board dimensions.
    #[serde(default)]
    pub grid: GridConfig,

    /// Automaton thresholds and fade toggle.
    #[serde(default)]
    pub rules: RuleSet,

    /// Run loop settings.
    #[serde(default)]
    pub run: RunConfig,

    /// Initial board contents.
    #[serde(default)]
    pub seed: SeedConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LifegridConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// Board dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GridConfig {
    /// Number of columns.
    #[serde(default = "default_width")]
    pub width: usize,

    /// Number of rows.
    #[serde(default = "default_height")]
    pub height: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Run loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Delay between steps in milliseconds.
    #[serde(default = "default_step_interval_ms")]
    pub step_interval_ms: u64,

    /// Whether evaluate and commit run on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Steps after which the engine binary stops the run (0 = until Ctrl-C).
    #[serde(default)]
    pub max_steps: u64,

    /// Log counters every N steps (0 = only at the end).
    #[serde(default = "default_report_every")]
    pub report_every: u64,
}

impl RunConfig {
    /// The step mode selected by `parallel`.
    pub const fn step_mode(&self) -> StepMode {
        StepMode::from_parallel(self.parallel)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: default_step_interval_ms(),
            parallel: true,
            max_steps: 0,
            report_every: default_report_every(),
        }
    }
}

/// What to put on the board before the first step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPattern {
    /// Leave every cell dead.
    Empty,
    /// Fill from a seeded RNG at `density`.
    Random,
    /// 2x2 still-life.
    Block,
    /// Period-2 line.
    Blinker,
    /// Period-2 pair of blocks.
    Beacon,
    /// Diagonal spaceship.
    Glider,
    /// Long-lived methuselah.
    RPentomino,
}

impl SeedPattern {
    /// The named shape to stamp, if this is not `empty` or `random`.
    pub const fn pattern(self) -> Option<Pattern> {
        match self {
            Self::Empty | Self::Random => None,
            Self::Block => Some(Pattern::Block),
            Self::Blinker => Some(Pattern::Blinker),
            Self::Beacon => Some(Pattern::Beacon),
            Self::Glider => Some(Pattern::Glider),
            Self::RPentomino => Some(Pattern::RPentomino),
        }
    }
}

/// Initial board contents.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SeedConfig {
    /// Which seed to use.
    #[serde(default = "default_seed_pattern")]
    pub pattern: SeedPattern,

    /// Probability a cell starts alive under `random`.
    #[serde(default = "default_density")]
    pub density: f64,

    /// RNG seed for `random`, for reproducible boards.
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,

    /// Column of a named pattern's top-left corner. Centered when absent.
    #[serde(default)]
    pub offset_x: Option<usize>,

    /// Row of a named pattern's top-left corner. Centered when absent.
    #[serde(default)]
    pub offset_y: Option<usize>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            pattern: default_seed_pattern(),
            density: default_density(),
            rng_seed: default_rng_seed(),
            offset_x: None,
            offset_y: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_width() -> usize {
    52
}

const fn default_height() -> usize {
    52
}

const fn default_step_interval_ms() -> u64 {
    100
}

const fn default_report_every() -> u64 {
    10
}

const fn default_seed_pattern() -> SeedPattern {
    SeedPattern::Random
}

const fn default_density() -> f64 {
    0.3
}

const fn default_rng_seed() -> u64 {
    42
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}
