use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::util::constants as setting;

/// Floors and timings shared by the dispatcher and every elevator.
///
/// Every field is optional in the JSON file; missing fields keep their
/// defaults from [`setting`].
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub lowest_floor: i32,
    pub highest_floor: i32,
    pub floor_travel_ms: u64,
    pub door_dwell_ms: u64,
    pub default_elevators: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            lowest_floor: setting::LOWEST_FLOOR,
            highest_floor: setting::HIGHEST_FLOOR,
            floor_travel_ms: setting::FLOOR_TRAVEL_MS,
            door_dwell_ms: setting::DOOR_DWELL_MS,
            default_elevators: setting::DEFAULT_ELEVATORS,
        }
    }
}

impl Config {
    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Config::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Uses the file at `path` when given and readable, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Config {
        match path {
            Some(path) => match Config::load(path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(error = %e, "using default settings");
                    Config::default()
                }
            },
            None => {
                tracing::debug!("no configuration file provided, using default settings");
                Config::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lowest_floor >= self.highest_floor {
            return Err(ConfigError::FloorRange {
                lowest: self.lowest_floor,
                highest: self.highest_floor,
            });
        }
        Ok(())
    }

    pub fn floor_travel_time(&self) -> Duration {
        Duration::from_millis(self.floor_travel_ms)
    }

    pub fn door_dwell_time(&self) -> Duration {
        Duration::from_millis(self.door_dwell_ms)
    }

    /// Same floors, no pauses. Handy when driving elevators from tests.
    pub fn instant(lowest_floor: i32, highest_floor: i32) -> Config {
        Config {
            lowest_floor,
            highest_floor,
            floor_travel_ms: 0,
            door_dwell_ms: 0,
            ..Config::default()
        }
    }
}
