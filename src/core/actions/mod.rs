//! Side-effecting actions attached to rules.
//!
//! Actions are looked up by kind in an [`ActionRegistry`] that is built once
//! and then shared read-only. Dispatch never fails the caller: unknown kinds
//! and failing handlers are reported through [`DispatchOutcome`] and the log.

pub mod log;

pub use log::LogInformationAction;

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::Arc;

/// Kind of the handler registered by [`ActionRegistry::with_defaults`].
pub const LOG_INFORMATION: &str = "LogInformation";

/// Typed form of an authored `"<kind>:<payload>"` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionDescriptor {
    kind: String,
    payload: String,
}

impl ActionDescriptor {
    pub fn new(kind: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: payload.into(),
        }
    }

    /// Split on the first `:`. A descriptor without `:` has an empty payload.
    pub fn parse(raw: &str) -> Result<Self, ActionError> {
        let (kind, payload) = raw.split_once(':').unwrap_or((raw, ""));
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(ActionError::MissingKind(raw.to_string()));
        }
        Ok(Self::new(kind, payload))
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl FromStr for ActionDescriptor {
    type Err = ActionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ActionDescriptor::parse(raw)
    }
}

impl fmt::Display for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.payload)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("action descriptor '{0}' has no action type")]
    MissingKind(String),
    #[error("action {kind} failed: {reason}")]
    Failed { kind: String, reason: anyhow::Error },
    #[error("action {kind} panicked: {message}")]
    Panicked { kind: String, message: String },
}

impl From<ActionError> for AppError {
    fn from(err: ActionError) -> Self {
        let category = match err {
            ActionError::MissingKind(_) => ErrorCategory::FormIntegrity,
            ActionError::Failed { .. } | ActionError::Panicked { .. } => {
                ErrorCategory::ActionExecution
            }
        };
        AppError::new(category, err.to_string())
    }
}

/// Trait implemented by rule action handlers.
pub trait ActionHandler: Send + Sync + 'static {
    /// Action kind used in descriptors.
    fn kind(&self) -> &str;

    /// Run the action with the descriptor payload.
    fn execute(&self, payload: &str) -> anyhow::Result<()>;
}

struct FnAction<F> {
    kind: String,
    run: F,
}

impl<F> ActionHandler for FnAction<F>
where
    F: Fn(&str) -> anyhow::Result<()> + Send + Sync + 'static,
{
    fn kind(&self) -> &str {
        &self.kind
    }

    fn execute(&self, payload: &str) -> anyhow::Result<()> {
        (self.run)(payload)
    }
}

/// What happened when a descriptor was dispatched.
#[derive(Debug)]
pub enum DispatchOutcome {
    Executed,
    NoHandler,
    Failed(ActionError),
}

impl DispatchOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, DispatchOutcome::Executed)
    }
}

/// Builder used to register action handlers before the engine is constructed.
pub struct ActionRegistryBuilder {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl Default for ActionRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRegistryBuilder {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Start from the built-in handlers.
    pub fn with_defaults() -> Self {
        let mut builder = Self::new();
        builder.register(LogInformationAction);
        builder
    }

    /// Register a handler. A later registration for the same kind replaces
    /// the earlier one.
    pub fn register<T: ActionHandler>(&mut self, handler: T) -> &mut Self {
        let kind = handler.kind().to_string();
        if self.handlers.insert(kind.clone(), Arc::new(handler)).is_some() {
            tracing::debug!(kind = %kind, "replacing registered action handler");
        }
        self
    }

    /// Register a closure as the handler for `kind`.
    pub fn register_fn<F>(&mut self, kind: impl Into<String>, run: F) -> &mut Self
    where
        F: Fn(&str) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(FnAction {
            kind: kind.into(),
            run,
        })
    }

    pub fn build(self) -> ActionRegistry {
        ActionRegistry {
            inner: Arc::new(self.handlers),
        }
    }
}

/// Immutable registry consulted while answers are processed.
#[derive(Clone)]
pub struct ActionRegistry {
    inner: Arc<HashMap<String, Arc<dyn ActionHandler>>>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl ActionRegistry {
    /// Registry without any handlers.
    pub fn empty() -> Self {
        ActionRegistryBuilder::new().build()
    }

    /// Registry holding only the built-in handlers.
    pub fn with_defaults() -> Self {
        ActionRegistryBuilder::with_defaults().build()
    }

    pub fn builder() -> ActionRegistryBuilder {
        ActionRegistryBuilder::new()
    }

    pub fn get(&self, kind: &str) -> Option<Arc<dyn ActionHandler>> {
        self.inner.get(kind).cloned()
    }

    /// Registered kinds, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.inner.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Run the handler registered for the descriptor's kind.
    pub fn dispatch(&self, descriptor: &ActionDescriptor) -> DispatchOutcome {
        let Some(handler) = self.inner.get(descriptor.kind()) else {
            tracing::warn!(kind = descriptor.kind(), "no handler registered for action");
            return DispatchOutcome::NoHandler;
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.execute(descriptor.payload())));
        let error = match outcome {
            Ok(Ok(())) => {
                tracing::debug!(kind = descriptor.kind(), "action executed");
                return DispatchOutcome::Executed;
            }
            Ok(Err(reason)) => ActionError::Failed {
                kind: descriptor.kind().to_string(),
                reason,
            },
            Err(panic) => ActionError::Panicked {
                kind: descriptor.kind().to_string(),
                message: panic_message(panic.as_ref()),
            },
        };
        tracing::warn!(
            code = ErrorCategory::ActionExecution.code(),
            kind = descriptor.kind(),
            "{}",
            error
        );
        DispatchOutcome::Failed(error)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
