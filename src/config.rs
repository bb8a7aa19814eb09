/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::time::Duration;
use thiserror::Error;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    pub building: BuildingConfig,
    pub elevator: ElevatorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct BuildingConfig {
    #[serde(rename = "floors")]
    pub n_floors: u8,
    #[serde(rename = "elevators")]
    pub n_elevators: usize,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ElevatorConfig {
    pub tick_ms: u64,
}

impl ElevatorConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Building size and cadence are fixed for the process lifetime, so a
    /// zero anywhere here is rejected up front.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.building.n_floors == 0 {
            return Err(ConfigError::Invalid("building must have at least one floor"));
        }
        if self.building.n_elevators == 0 {
            return Err(ConfigError::Invalid("building must have at least one elevator"));
        }
        if self.elevator.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be greater than zero"));
        }
        Ok(())
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        // Arrange
        let config_str = r#"
            [building]
            floors = 5
            elevators = 2

            [elevator]
            tick_ms = 250
        "#;

        // Act
        let config = parse_config(config_str).unwrap();

        // Assert
        assert_eq!(config.building.n_floors, 5);
        assert_eq!(config.building.n_elevators, 2);
        assert_eq!(config.elevator.tick(), Duration::from_millis(250));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config_rejects_empty_building() {
        let no_floors = "[building]\nfloors = 0\nelevators = 2\n[elevator]\ntick_ms = 10\n";
        let no_elevators = "[building]\nfloors = 4\nelevators = 0\n[elevator]\ntick_ms = 10\n";
        let no_tick = "[building]\nfloors = 4\nelevators = 1\n[elevator]\ntick_ms = 0\n";

        assert!(matches!(parse_config(no_floors), Err(ConfigError::Invalid(_))));
        assert!(matches!(parse_config(no_elevators), Err(ConfigError::Invalid(_))));
        assert!(matches!(parse_config(no_tick), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_config_missing_section() {
        let result = parse_config("[building]\nfloors = 4\nelevators = 1\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("does/not/exist.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
