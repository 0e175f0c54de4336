use crate::core::config::LoggingSettings;
use crate::logging::layers::console::ConsoleOutput;
use std::path::{Path, PathBuf};

/// Logging configuration with the log directory resolved against the
/// working directory.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub default_level: String,
    pub enable_file: bool,
    pub console_output: Option<ConsoleOutput>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let settings = LoggingSettings::default();
        Self {
            log_dir: settings.log_dir,
            default_level: settings.default_level,
            enable_file: settings.enable_file,
            console_output: settings.console_output,
        }
    }
}

impl LoggingConfig {
    pub fn from_settings(settings: &LoggingSettings, workspace_root: &Path) -> Self {
        let log_dir = if settings.log_dir.is_absolute() {
            settings.log_dir.clone()
        } else {
            workspace_root.join(&settings.log_dir)
        };
        Self {
            log_dir,
            default_level: settings.default_level.clone(),
            enable_file: settings.enable_file,
            console_output: settings.console_output,
        }
    }
}
