//! # World Configuration
//!
//! Every timer interval, bound and starting value of the simulation. Values come from a TOML
//! file; missing keys fall back to [`WorldConfig::default`].
//!
//! ```toml
//! request_timeout_ms = 1500
//! flush_interval_ms = 2000
//! data_path = "/var/lib/cityio/world.json"
//! ```

use actor_framework::SpawnOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Bound on every actor-to-actor request.
    pub request_timeout_ms: u64,
    pub inbox_capacity: usize,

    pub flush_interval_ms: u64,
    pub flush_batch_size: usize,

    pub user_backup_interval_ms: u64,
    pub city_growth_interval_ms: u64,
    /// Upper bound of the random delay before a city's first growth tick.
    pub city_tick_jitter_ms: u64,
    pub building_production_interval_ms: u64,
    pub army_step_interval_ms: u64,
    /// A marching army persists itself every this many steps.
    pub army_backup_every: u32,
    pub training_duration_ms: u64,

    pub population_growth_rate: f64,
    pub map_size: i32,
    pub city_size: i32,
    pub placement_attempts: u32,

    pub initial_gold: i64,
    pub initial_food: i64,
    pub initial_capital_population: f64,
    pub initial_town_population: f64,

    /// bcrypt work factor for new password hashes.
    pub password_cost: u32,

    /// World file of the JSON store. Every flush rewrites it whole.
    pub data_path: PathBuf,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 2_000,
            inbox_capacity: 64,
            flush_interval_ms: 2_000,
            flush_batch_size: 5_000,
            user_backup_interval_ms: 10_000,
            city_growth_interval_ms: 10_000,
            city_tick_jitter_ms: 10_000,
            building_production_interval_ms: 3_000,
            army_step_interval_ms: 1_000,
            army_backup_every: 5,
            training_duration_ms: 10_000,
            population_growth_rate: 0.001,
            map_size: 1024,
            city_size: 5,
            placement_attempts: 64,
            initial_gold: 100_000,
            initial_food: 100_000,
            initial_capital_population: 250.0,
            initial_town_population: 100.0,
            password_cost: crate::password::DEFAULT_COST,
            data_path: PathBuf::from("world.json"),
        }
    }
}

impl WorldConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("flush_interval_ms", self.flush_interval_ms),
            ("user_backup_interval_ms", self.user_backup_interval_ms),
            ("city_growth_interval_ms", self.city_growth_interval_ms),
            ("building_production_interval_ms", self.building_production_interval_ms),
            ("army_step_interval_ms", self.army_step_interval_ms),
            ("request_timeout_ms", self.request_timeout_ms),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::Invalid(format!("{name} must be positive")));
        }
        if self.flush_batch_size == 0 || self.inbox_capacity == 0 {
            return Err(ConfigError::Invalid(
                "flush_batch_size and inbox_capacity must be positive".into(),
            ));
        }
        if self.army_backup_every == 0 {
            return Err(ConfigError::Invalid("army_backup_every must be positive".into()));
        }
        if !(crate::password::MIN_COST..=31).contains(&self.password_cost) {
            return Err(ConfigError::Invalid(format!(
                "password_cost {} is outside 4..=31",
                self.password_cost
            )));
        }
        if self.city_size <= 0 || self.map_size < self.city_size {
            return Err(ConfigError::Invalid(format!(
                "city_size {} does not fit a map of {}",
                self.city_size, self.map_size
            )));
        }
        Ok(())
    }

    pub fn spawn_options(&self) -> SpawnOptions {
        SpawnOptions {
            buffer_size: self.inbox_capacity,
            request_timeout: self.request_timeout(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    pub fn user_backup_interval(&self) -> Duration {
        Duration::from_millis(self.user_backup_interval_ms)
    }

    pub fn city_growth_interval(&self) -> Duration {
        Duration::from_millis(self.city_growth_interval_ms)
    }

    pub fn city_tick_jitter(&self) -> Duration {
        Duration::from_millis(self.city_tick_jitter_ms)
    }

    pub fn building_production_interval(&self) -> Duration {
        Duration::from_millis(self.building_production_interval_ms)
    }

    pub fn army_step_interval(&self) -> Duration {
        Duration::from_millis(self.army_step_interval_ms)
    }

    pub fn training_duration(&self) -> Duration {
        Duration::from_millis(self.training_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = WorldConfig::from_toml_str("training_duration_ms = 50\nmap_size = 64\n").unwrap();
        assert_eq!(config.training_duration(), Duration::from_millis(50));
        assert_eq!(config.map_size, 64);
        assert_eq!(config.flush_batch_size, 5_000);
    }

    #[test]
    fn test_zero_period_is_rejected() {
        let err = WorldConfig::from_toml_str("army_step_interval_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("army_step_interval_ms")));
    }

    #[test]
    fn test_password_cost_is_bounded() {
        assert_eq!(WorldConfig::default().password_cost, 12);
        let err = WorldConfig::from_toml_str("password_cost = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("password_cost")));
    }

    #[test]
    fn test_bad_syntax_is_parse_error() {
        assert!(matches!(
            WorldConfig::from_toml_str("map_size = \"big\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.toml");
        std::fs::write(&path, "city_size = 3\n").unwrap();
        assert_eq!(WorldConfig::load(&path).unwrap().city_size, 3);
        assert!(matches!(
            WorldConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
