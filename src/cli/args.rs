use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Form id or menu number from `triage list`; omit to choose from the menu
    #[arg(value_name = "FORM")]
    pub form_id: Option<String>,

    /// Resume from a saved engine state (JSON)
    #[arg(long, value_name = "JSON")]
    pub state: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StepArgs {
    /// Form id or menu number the session belongs to
    #[arg(value_name = "FORM")]
    pub form_id: String,

    /// Answer to the current question; omit to inspect the session
    #[arg(long, value_name = "TEXT")]
    pub answer: Option<String>,

    /// Engine state returned by the previous step (JSON)
    #[arg(long, value_name = "JSON")]
    pub state: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DotArgs {
    /// Form id or menu number to render
    #[arg(value_name = "FORM")]
    pub form_id: String,
}
