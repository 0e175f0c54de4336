use super::TriageConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::str::FromStr;
use tracing_subscriber::filter::Directive;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration rules
    pub fn validate(config: &TriageConfig) -> Result<(), AppError> {
        if config.forms_dir.as_os_str().is_empty() {
            return Err(AppError::new(
                ErrorCategory::Configuration,
                "forms_dir cannot be empty",
            ));
        }

        let level = config.logging.default_level.trim();
        if level.is_empty() {
            return Err(AppError::new(
                ErrorCategory::Configuration,
                "logging.default_level cannot be empty",
            ));
        }
        for directive in level.split(',') {
            Directive::from_str(directive.trim()).map_err(|err| {
                AppError::with_source(
                    ErrorCategory::Configuration,
                    format!(
                        "logging.default_level '{}' is not a valid tracing directive",
                        level
                    ),
                    err,
                )
                .with_suggestion("Use a level such as info, debug or triage=trace")
            })?;
        }

        if config.logging.enable_file && config.logging.log_dir.as_os_str().is_empty() {
            return Err(AppError::new(
                ErrorCategory::Configuration,
                "logging.log_dir is required when logging.enable_file is true",
            ));
        }

        Ok(())
    }
}
