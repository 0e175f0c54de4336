use super::{ActionHandler, LOG_INFORMATION};

/// Default handler: writes the payload to the log at INFO level.
pub struct LogInformationAction;

impl ActionHandler for LogInformationAction {
    fn kind(&self) -> &str {
        LOG_INFORMATION
    }

    fn execute(&self, payload: &str) -> anyhow::Result<()> {
        tracing::info!(action = LOG_INFORMATION, "{}", payload);
        Ok(())
    }
}
