//! Run configuration, loaded from TOML.
//!
//! ```
//! use seat_shuffle::config::Config;
//!
//! let config = Config::from_toml_str(r##"
//!     [search]
//!     patience = 500
//!     seed = 42
//!
//!     [group_colors]
//!     red = "#ff0000"
//! "##).unwrap();
//!
//! assert_eq!(config.search.patience, 500);
//! assert_eq!(config.markers.pinned_prefix, "#");
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::climb::{Params, DEFAULT_PATIENCE};
use crate::model::entity::{Color, Person};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub search: SearchConfig,
    pub markers: MarkerConfig,
    /// Display color per group id.
    pub group_colors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Consecutive non-improving swaps tolerated before the search stops.
    pub patience: usize,
    /// Hard cap on trial swaps; unbounded when absent.
    pub max_iterations: Option<usize>,
    /// Seed for reproducible runs; drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            patience: DEFAULT_PATIENCE,
            max_iterations: None,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn params(&self) -> Params {
        Params {
            patience: self.patience,
            max_iterations: self.max_iterations,
        }
    }

    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }
}

/// How raw sheet text is classified.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    /// Names starting with this prefix are pinned to a seat.
    pub pinned_prefix: String,
    /// Layout cells containing this text are assignable seats.
    pub assignable: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        MarkerConfig {
            pinned_prefix: "#".to_owned(),
            assignable: "@".to_owned(),
        }
    }
}

impl MarkerConfig {
    pub fn is_pinned(&self, person: &Person) -> bool {
        person.id.starts_with(&self.pinned_prefix)
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.markers.pinned_prefix.is_empty() {
            return Err(ConfigError::Invalid("markers.pinned_prefix must not be empty".into()));
        }
        if self.markers.assignable.is_empty() {
            return Err(ConfigError::Invalid("markers.assignable must not be empty".into()));
        }
        if self.search.max_iterations == Some(0) {
            return Err(ConfigError::Invalid("search.max_iterations must be positive".into()));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.search.seed = Some(seed);
        self
    }

    pub fn color_of(&self, group_id: &str) -> Option<Color> {
        self.group_colors.get(group_id).cloned().map(Color)
    }
}
