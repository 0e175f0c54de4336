use crate::logging::ConsoleOutput;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration loaded from triage.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriageConfig {
    /// Directory holding form documents
    #[serde(default = "default_forms_dir")]
    pub forms_dir: PathBuf,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// `[logging]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Filter used when RUST_LOG is unset
    #[serde(default = "default_level")]
    pub default_level: String,

    /// Console sink; left unset the command decides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console_output: Option<ConsoleOutput>,

    /// Write triage.log under `log_dir`
    #[serde(default)]
    pub enable_file: bool,

    /// Relative paths resolve against the working directory
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_forms_dir() -> PathBuf {
    PathBuf::from("forms")
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".triage/logs")
}

impl Default for TriageConfig {
    fn default() -> Self {
        TriageConfig {
            forms_dir: default_forms_dir(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            default_level: default_level(),
            console_output: None,
            enable_file: false,
            log_dir: default_log_dir(),
        }
    }
}


pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;
