use std::{fmt::Display, path::Path};

use serde::{Deserialize, Serialize};
use tickwatch::config::StopwatchConfig;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "could not read config file, msg = {e}"),
            ConfigError::Parse(e) => write!(f, "could not parse config file, msg = {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownFrom {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub stopwatch: StopwatchConfig,
    pub run_for_millis: u64,
    pub countdown_from: Option<CountdownFrom>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            stopwatch: StopwatchConfig::default(),
            run_for_millis: 3000,
            countdown_from: None,
        }
    }
}

impl DemoConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json(&json)
    }
}
