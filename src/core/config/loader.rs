use super::{ConfigValidator, TriageConfig};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "triage.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve configuration with precedence defaults < file < environment.
    ///
    /// An explicit `config_path` must exist; otherwise `triage.toml` in
    /// `workspace_path` is read when present.
    pub fn load(config_path: Option<&Path>, workspace_path: &Path) -> Result<TriageConfig, AppError> {
        let file_config = match config_path {
            Some(path) => Some(Self::load_from_file(path)?.ok_or_else(|| {
                AppError::new(
                    ErrorCategory::Configuration,
                    format!("config file {} does not exist", path.display()),
                )
            })?),
            None => Self::load_from_file(&workspace_path.join(CONFIG_FILE_NAME))?,
        };

        let mut config = file_config.unwrap_or_default();
        Self::apply_env_overrides(&mut config);
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Load config from workspace root (workspace/triage.toml)
    pub fn load_from_workspace(workspace_path: &Path) -> Result<TriageConfig, AppError> {
        Self::load(None, workspace_path)
    }

    /// Load config from a specific file path.
    /// Returns Ok(None) if the file doesn't exist.
    pub fn load_from_file(path: &Path) -> Result<Option<TriageConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_source(
                ErrorCategory::Io,
                format!("Failed to read config file {}: {}", path.display(), e),
                e,
            )
        })?;

        let config: TriageConfig = toml::from_str(&content).map_err(|e| {
            AppError::with_source(
                ErrorCategory::Configuration,
                format!("Failed to parse config file {}: {}", path.display(), e),
                e,
            )
            .with_context("path", path.display())
        })?;

        Ok(Some(config))
    }

    /// Environment variables take precedence over config file values
    fn apply_env_overrides(config: &mut TriageConfig) {
        if let Some(forms_dir) = non_empty_var("TRIAGE_FORMS_DIR") {
            config.forms_dir = PathBuf::from(forms_dir);
        }

        if let Some(level) = non_empty_var("TRIAGE_LOG_LEVEL") {
            config.logging.default_level = level;
        }
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "TRIAGE_FORMS_DIR - Override the forms directory (default: forms)",
            "TRIAGE_LOG_LEVEL - Override logging.default_level (default: info); RUST_LOG wins over both",
        ]
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
