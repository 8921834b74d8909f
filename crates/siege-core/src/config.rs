//! Configuration loading and typed config structures for the Siege simulation.
//!
//! The canonical configuration lives in `siege-config.yaml` at the project
//! root. Every section and every field is optional: anything missing falls
//! back to the stock scenario (a 10x10 grid, 5 guards, 10
//! targets, 15 units in store, 5 deployable slots).

use std::path::Path;

use serde::Deserialize;

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

    /// The configuration parsed but describes an impossible world.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `siege-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SiegeConfig {
    /// Grid dimensions, seed, and pacing.
    #[serde(default)]
    pub world: WorldConfig,

    /// Initial populations and target growth.
    #[serde(default)]
    pub population: PopulationConfig,

    /// The Station's unit store and deployment slots.
    #[serde(default)]
    pub station: StationConfig,

    /// Negotiation threshold and sweep behaviour.
    #[serde(default)]
    pub negotiation: NegotiationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SiegeConfig {
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
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML or a
    /// count is negative.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Reject configurations that cannot describe a world.
    ///
    /// Negative counts are already unrepresentable, so this only checks the
    /// grid dimensions and the growth period.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.grid_width == 0 || self.world.grid_height == 0 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "grid dimensions must be positive, got {}x{}",
                    self.world.grid_width, self.world.grid_height
                ),
            });
        }
        if self.population.target_growth_period == 0 {
            return Err(ConfigError::Invalid {
                reason: "population.target_growth_period must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Seed for activation order, placement, and target movement.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Grid width in cells.
    #[serde(default = "default_grid_size")]
    pub grid_width: u32,

    /// Grid height in cells.
    #[serde(default = "default_grid_size")]
    pub grid_height: u32,

    /// Stop after this many rounds even without a verdict. 0 means unbounded.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u64,

    /// Real-time milliseconds to wait between rounds.
    #[serde(default)]
    pub round_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            grid_width: default_grid_size(),
            grid_height: default_grid_size(),
            max_rounds: default_max_rounds(),
            round_interval_ms: 0,
        }
    }
}

/// Population configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Guards present before the first round.
    #[serde(default = "default_initial_guards")]
    pub initial_guards: u32,

    /// Targets present before the first round.
    #[serde(default = "default_initial_targets")]
    pub initial_targets: u32,

    /// Growth stops once this many targets exist.
    #[serde(default = "default_target_cap")]
    pub target_cap: u32,

    /// Rounds the growth counter must reach before it resets and spawns.
    #[serde(default = "default_target_growth_period")]
    pub target_growth_period: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_guards: default_initial_guards(),
            initial_targets: default_initial_targets(),
            target_cap: default_target_cap(),
            target_growth_period: default_target_growth_period(),
        }
    }
}

/// Station configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StationConfig {
    /// Units in the store at construction.
    #[serde(default = "default_initial_units")]
    pub initial_units: u32,

    /// Guards the Station may still deploy.
    #[serde(default = "default_max_deployable")]
    pub max_deployable: u32,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            initial_units: default_initial_units(),
            max_deployable: default_max_deployable(),
        }
    }
}

/// How the per-round resource sweep interacts with negotiated holdings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepPolicy {
    /// Empty store seizes every guard's units, otherwise every guard is
    /// reset to exactly one unit.
    #[default]
    Override,
    /// Only the empty-store seizure applies.
    SeizeOnly,
    /// No sweep; negotiation alone decides holdings.
    Disabled,
}

/// Negotiation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NegotiationConfig {
    /// Guards holding fewer units than this request more.
    #[serde(default = "default_request_threshold")]
    pub request_threshold: u32,

    /// Sweep precedence over negotiated holdings.
    #[serde(default)]
    pub sweep: SweepPolicy,

    /// Remove guards left with zero units at the end of their step.
    #[serde(default)]
    pub retire_unarmed_guards: bool,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            request_threshold: default_request_threshold(),
            sweep: SweepPolicy::default(),
            retire_unarmed_guards: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_seed() -> u64 {
    42
}

const fn default_grid_size() -> u32 {
    10
}

const fn default_max_rounds() -> u64 {
    1000
}

const fn default_initial_guards() -> u32 {
    5
}

const fn default_initial_targets() -> u32 {
    10
}

const fn default_target_cap() -> u32 {
    50
}

const fn default_target_growth_period() -> u32 {
    3
}

const fn default_initial_units() -> u32 {
    15
}

const fn default_max_deployable() -> u32 {
    5
}

const fn default_request_threshold() -> u32 {
    3
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_stock_scenario() {
        let config = SiegeConfig::default();
        assert_eq!(config.world.grid_width, 10);
        assert_eq!(config.world.grid_height, 10);
        assert_eq!(config.population.initial_guards, 5);
        assert_eq!(config.population.initial_targets, 10);
        assert_eq!(config.population.target_cap, 50);
        assert_eq!(config.station.initial_units, 15);
        assert_eq!(config.station.max_deployable, 5);
        assert_eq!(config.negotiation.request_threshold, 3);
        assert_eq!(config.negotiation.sweep, SweepPolicy::Override);
        assert!(!config.negotiation.retire_unarmed_guards);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
world:
  seed: 7
  grid_width: 20
  grid_height: 15
  max_rounds: 200
  round_interval_ms: 50

population:
  initial_guards: 3
  initial_targets: 4
  target_cap: 12
  target_growth_period: 5

station:
  initial_units: 40
  max_deployable: 2

negotiation:
  request_threshold: 4
  sweep: seize_only
  retire_unarmed_guards: true

logging:
  level: debug
";
        let config = SiegeConfig::parse(yaml).unwrap();
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.grid_width, 20);
        assert_eq!(config.world.grid_height, 15);
        assert_eq!(config.world.max_rounds, 200);
        assert_eq!(config.world.round_interval_ms, 50);
        assert_eq!(config.population.initial_guards, 3);
        assert_eq!(config.population.target_growth_period, 5);
        assert_eq!(config.station.initial_units, 40);
        assert_eq!(config.station.max_deployable, 2);
        assert_eq!(config.negotiation.request_threshold, 4);
        assert_eq!(config.negotiation.sweep, SweepPolicy::SeizeOnly);
        assert!(config.negotiation.retire_unarmed_guards);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let config = SiegeConfig::parse("station:\n  initial_units: 0\n").unwrap();
        assert_eq!(config.station.initial_units, 0);
        assert_eq!(config.station.max_deployable, 5);
        assert_eq!(config.world, WorldConfig::default());
    }

    #[test]
    fn negative_count_is_rejected_at_parse() {
        let result = SiegeConfig::parse("population:\n  initial_guards: -1\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn unknown_sweep_policy_is_rejected() {
        let result = SiegeConfig::parse("negotiation:\n  sweep: sometimes\n");
        assert!(result.is_err());
    }

    #[test]
    fn zero_grid_dimension_fails_validation() {
        let mut config = SiegeConfig::default();
        config.world.grid_height = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn zero_growth_period_fails_validation() {
        let mut config = SiegeConfig::default();
        config.population.target_growth_period = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = SiegeConfig::from_file(Path::new("/nonexistent/siege-config.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
