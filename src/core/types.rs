use serde::{Deserialize, Serialize};

/// Error category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    FormIntegrity,
    InvalidAnswer,
    NotSupported,
    NoApplicableRule,
    ConditionCompilation,
    TypeMismatch,
    ActionExecution,
    StateDecode,
    Deserialization,
    Io,
    Configuration,
}

impl ErrorCategory {
    /// Stable diagnostic code attached to errors of this category.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCategory::FormIntegrity => "TRG-FORM-001",
            ErrorCategory::InvalidAnswer => "TRG-ANS-001",
            ErrorCategory::NotSupported => "TRG-ANS-002",
            ErrorCategory::NoApplicableRule => "TRG-RULE-001",
            ErrorCategory::ConditionCompilation => "TRG-COND-001",
            ErrorCategory::TypeMismatch => "TRG-COND-002",
            ErrorCategory::ActionExecution => "TRG-ACT-001",
            ErrorCategory::StateDecode => "TRG-STATE-001",
            ErrorCategory::Deserialization => "TRG-LOAD-001",
            ErrorCategory::Io => "TRG-IO-001",
            ErrorCategory::Configuration => "TRG-CFG-001",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Error severity enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Aborts session start.
    Fatal,
    /// Fails the current turn; the session stalls at its question.
    Error,
    /// The caller can re-prompt and continue.
    Recoverable,
    /// Logged only; never returned to the caller.
    Warning,
}
