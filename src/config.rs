//! Simulation parameters
//!
//! Edited from a UI panel; bad input never reaches the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Editable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Gravitational constant (scaled for pixel distances)
    #[serde(rename = "G")]
    pub gravitational_constant: f64,
    /// Simulation ticks per second
    pub ticks_per_second: f64,
    /// Average new bodies per second
    pub spawn_rate: f64,
    /// Bodies created on reset
    pub initial_body_count: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gravitational_constant: 6.67408e-2,
            ticks_per_second: 50.0,
            spawn_rate: 0.1,
            initial_body_count: 10,
        }
    }
}

/// Fields exposed to the config panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigField {
    InitialBodyCount,
    GravitationalConstant,
    TicksPerSecond,
    SpawnRate,
}

impl ConfigField {
    pub const ALL: [ConfigField; 4] = [
        ConfigField::InitialBodyCount,
        ConfigField::GravitationalConstant,
        ConfigField::TicksPerSecond,
        ConfigField::SpawnRate,
    ];

    /// Label shown next to the input
    pub fn display_name(&self) -> &'static str {
        match self {
            ConfigField::InitialBodyCount => "Number of initial planets",
            ConfigField::GravitationalConstant => "Gravitational constant",
            ConfigField::TicksPerSecond => "Update frequency",
            ConfigField::SpawnRate => "Avg. new planet frequency",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Config {
    /// Current value of a field
    pub fn get(&self, field: ConfigField) -> f64 {
        match field {
            ConfigField::InitialBodyCount => self.initial_body_count as f64,
            ConfigField::GravitationalConstant => self.gravitational_constant,
            ConfigField::TicksPerSecond => self.ticks_per_second,
            ConfigField::SpawnRate => self.spawn_rate,
        }
    }

    /// Parse and store a raw panel value
    ///
    /// Numbers are clamped (`initialBodyCount` to at least 1, everything
    /// else to at least 0). Non-numeric input, and a tick rate whose
    /// interval is not a representable `Duration` (including zero), are
    /// rejected with the previous value kept.
    pub fn set_field(&mut self, field: ConfigField, raw: &str) -> Result<(), ConfigError> {
        let value: f64 = raw
            .trim()
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| ConfigError::NotANumber {
                field,
                raw: raw.to_string(),
            })?;

        match field {
            ConfigField::InitialBodyCount => {
                self.initial_body_count = value.max(1.0).min(u32::MAX as f64) as u32;
            }
            ConfigField::GravitationalConstant => self.gravitational_constant = value.max(0.0),
            ConfigField::TicksPerSecond => {
                let value = value.max(0.0);
                if interval_for(value).is_none() {
                    return Err(ConfigError::OutOfRange { field, value });
                }
                self.ticks_per_second = value;
            }
            ConfigField::SpawnRate => self.spawn_rate = value.max(0.0),
        }
        Ok(())
    }

    /// UI boundary: apply input, ignoring (and logging) anything invalid
    ///
    /// Returns whether the value changed.
    pub fn apply_input(&mut self, field: ConfigField, raw: &str) -> bool {
        let before = self.get(field);
        match self.set_field(field, raw) {
            Ok(()) => self.get(field) != before,
            Err(e) => {
                log::warn!("Ignoring config input: {e}");
                false
            }
        }
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            (ConfigField::GravitationalConstant, self.gravitational_constant, 0.0, true),
            (ConfigField::TicksPerSecond, self.ticks_per_second, 0.0, false),
            (ConfigField::SpawnRate, self.spawn_rate, 0.0, true),
            (ConfigField::InitialBodyCount, self.initial_body_count as f64, 1.0, true),
        ];
        if interval_for(self.ticks_per_second).is_none() {
            return Err(ConfigError::OutOfRange {
                field: ConfigField::TicksPerSecond,
                value: self.ticks_per_second,
            });
        }
        for (field, value, min, inclusive) in checks {
            let ok = value.is_finite() && if inclusive { value >= min } else { value > min };
            if !ok {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Interval between scheduler ticks
    ///
    /// An unvalidated tick rate with no representable interval never ticks.
    pub fn tick_interval(&self) -> Duration {
        interval_for(self.ticks_per_second).unwrap_or(Duration::MAX)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save as a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}

/// Scheduler interval for a tick rate, if it fits in a `Duration`
fn interval_for(ticks_per_second: f64) -> Option<Duration> {
    if ticks_per_second > 0.0 {
        Duration::try_from_secs_f64(1.0 / ticks_per_second).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_non_numeric_input_keeps_previous_value() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_field(ConfigField::SpawnRate, "lots"),
            Err(ConfigError::NotANumber { .. })
        ));
        assert!(!config.apply_input(ConfigField::GravitationalConstant, "NaN"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_values_are_clamped() {
        let mut config = Config::default();
        config.set_field(ConfigField::InitialBodyCount, "-4").unwrap();
        assert_eq!(config.initial_body_count, 1);
        config.set_field(ConfigField::SpawnRate, "-1").unwrap();
        assert_eq!(config.spawn_rate, 0.0);
        config.set_field(ConfigField::GravitationalConstant, " 0.5 ").unwrap();
        assert_eq!(config.gravitational_constant, 0.5);
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_field(ConfigField::TicksPerSecond, "-3"),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert_eq!(config.ticks_per_second, 50.0);
        assert!(config.apply_input(ConfigField::TicksPerSecond, "25"));
        assert_eq!(config.tick_interval(), Duration::from_millis(40));
    }

    #[test]
    fn test_tiny_tick_rate_rejected() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_field(ConfigField::TicksPerSecond, "1e-30"),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(!config.apply_input(ConfigField::TicksPerSecond, "1e-30"));
        assert_eq!(config.ticks_per_second, 50.0);

        let tiny = Config {
            ticks_per_second: 1e-30,
            ..Config::default()
        };
        assert!(matches!(tiny.validate(), Err(ConfigError::OutOfRange { .. })));
        assert_eq!(tiny.tick_interval(), Duration::MAX);
    }

    #[test]
    fn test_json_uses_camel_case_and_defaults() {
        let config = Config::from_json(r#"{"G": 1.5, "ticksPerSecond": 30}"#).unwrap();
        assert_eq!(config.gravitational_constant, 1.5);
        assert_eq!(config.ticks_per_second, 30.0);
        assert_eq!(config.initial_body_count, 10);

        let json = config.to_json().unwrap();
        assert!(json.contains("\"spawnRate\""));
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_config_rejected() {
        assert!(matches!(
            Config::from_json(r#"{"ticksPerSecond": 0}"#),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(Config::from_json("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir().join(format!("planet-merge-config-{}.json", std::process::id()));
        let config = Config {
            spawn_rate: 2.0,
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
        let _ = std::fs::remove_file(&path);
    }
}
