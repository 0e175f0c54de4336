pub mod actions;
pub mod condition;
pub mod config;
pub mod dot;
pub mod engine;
pub mod error;
pub mod form;
pub mod loader;
pub mod resolver;
pub mod types;

pub use actions::{
    ActionDescriptor, ActionError, ActionHandler, ActionRegistry, ActionRegistryBuilder,
    DispatchOutcome,
};
pub use condition::{AnswerValue, Condition, ConditionError};
pub use config::{ConfigLoader, TriageConfig};
pub use engine::{TriageEngine, TriageSession};
pub use error::{AppError, DefaultErrorReporter, ErrorReporter};
pub use form::{Form, Question, QuestionId, QuestionType, ResultId, Rule, TriageResult};
pub use loader::{FormListing, FormLoader};
pub use types::*;
pub use triage_types::EngineState;
