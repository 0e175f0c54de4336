use crate::cli::Command;

/// Execution contexts that influence how logging is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionContext {
    /// A person is at the terminal answering questions or reading a menu.
    Interactive,
    /// Stdout carries a document (JSON report or DOT graph) for another program.
    MachineOutput,
}

impl ExecutionContext {
    /// Returns `true` when console sinks are off unless explicitly configured.
    pub fn quiet_by_default(self) -> bool {
        matches!(self, ExecutionContext::MachineOutput)
    }
}

/// Derive the active execution context from a parsed CLI command.
pub fn detect_context(command: &Command) -> ExecutionContext {
    match command {
        Command::List(_) | Command::Run(_) => ExecutionContext::Interactive,
        Command::Step(_) | Command::Dot(_) => ExecutionContext::MachineOutput,
    }
}
