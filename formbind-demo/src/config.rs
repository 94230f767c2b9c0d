//! Demo configuration read from the environment.

use std::env;
use std::path::PathBuf;

use simplelog::LevelFilter;

/// Settings for the demo run.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Log level (`FORMBIND_LOG`).
    ///
    /// Default: info
    pub log_level: LevelFilter,

    /// Write logs to this file instead of the terminal (`FORMBIND_LOG_FILE`).
    pub log_file: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

impl DemoConfig {
    /// Load from the environment, reading a `.env` file first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Ok(level) = env::var("FORMBIND_LOG") {
            match level.parse() {
                Ok(level) => config.log_level = level,
                Err(_) => eprintln!("Ignoring invalid FORMBIND_LOG value '{}'", level),
            }
        }
        config.log_file = env::var_os("FORMBIND_LOG_FILE").map(PathBuf::from);
        config
    }
}
