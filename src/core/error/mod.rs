use crate::core::types::{ErrorCategory, ErrorSeverity};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct AppError {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub code: String,
    pub message: String,
    pub context: BTreeMap<String, String>,
    pub recovery_suggestions: Vec<String>,
    pub occurred_at: DateTime<Utc>,
    pub source: Option<anyhow::Error>,
}

impl AppError {
    pub fn new<T: Into<String>>(category: ErrorCategory, message: T) -> Self {
        let severity = match category {
            ErrorCategory::FormIntegrity
            | ErrorCategory::StateDecode
            | ErrorCategory::Deserialization
            | ErrorCategory::Io
            | ErrorCategory::Configuration => ErrorSeverity::Fatal,
            ErrorCategory::NoApplicableRule
            | ErrorCategory::ConditionCompilation
            | ErrorCategory::TypeMismatch => ErrorSeverity::Error,
            ErrorCategory::InvalidAnswer | ErrorCategory::NotSupported => {
                ErrorSeverity::Recoverable
            }
            ErrorCategory::ActionExecution => ErrorSeverity::Warning,
        };
        AppError {
            category,
            severity,
            code: category.code().to_string(),
            message: message.into(),
            context: BTreeMap::new(),
            recovery_suggestions: vec![],
            occurred_at: Utc::now(),
            source: None,
        }
    }

    pub fn with_source<T: Into<String>>(
        category: ErrorCategory,
        message: T,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        let mut error = AppError::new(category, message);
        error.source = Some(source.into());
        error
    }

    pub fn with_context<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    pub fn with_suggestion<T: Into<String>>(mut self, suggestion: T) -> Self {
        self.recovery_suggestions.push(suggestion.into());
        self
    }

    pub fn with_code<T: Into<String>>(mut self, code: T) -> Self {
        self.code = code.into();
        self
    }

    pub fn severity(&self) -> ErrorSeverity {
        self.severity
    }

    /// True when the presentation layer should re-prompt rather than abort.
    pub fn is_recoverable(&self) -> bool {
        self.severity == ErrorSeverity::Recoverable
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.category, self.message)?;
        if !self.context.is_empty() {
            write!(f, " (Context: {:?})", self.context)?;
        }
        if let Some(ref source) = self.source {
            write!(f, "\nCaused by: {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        let message = e.to_string();
        AppError::with_source(ErrorCategory::Io, message, e)
            .with_suggestion("Check file permissions and paths")
    }
}

pub trait ErrorReporter {
    fn report_error(&self, error: &AppError);
    fn report_warning(&self, message: &str, context: Option<String>);
}

/// Writes operator-facing diagnostics to stderr.
pub struct DefaultErrorReporter;

impl DefaultErrorReporter {
    pub fn new() -> Self {
        DefaultErrorReporter
    }
}

impl Default for DefaultErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporter for DefaultErrorReporter {
    fn report_error(&self, error: &AppError) {
        eprintln!("[ERROR] {}: {}", error.code, error.message);
        if !error.context.is_empty() {
            eprintln!("  Context: {:?}", error.context);
        }
        for suggestion in &error.recovery_suggestions {
            eprintln!("  Hint: {}", suggestion);
        }
        if let Some(ref source) = error.source {
            eprintln!("  Caused by: {}", source);
        }
    }

    fn report_warning(&self, message: &str, context: Option<String>) {
        eprintln!("[WARNING] {}", message);
        if let Some(ref ctx) = context {
            eprintln!("  Context: {}", ctx);
        }
    }
}
