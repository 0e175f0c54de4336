pub mod args;
pub mod commands;
pub mod render;

pub use args::{DotArgs, ListArgs, RunArgs, StepArgs};
use crate::core::config::TriageConfig;
use crate::core::loader::FormLoader;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
TRIAGE COMMANDS:\n{subcommands}\n";

#[derive(Parser, Debug)]
#[command(name = "triage")]
#[command(version = crate::VERSION)]
#[command(about = "Decision-tree triage interviews driven by declarative forms")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: list the available forms, run one interactively, or drive it one step at a time with saved state."
)]
pub struct Args {
    /// Path to config file (default: ./triage.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding form documents (overrides config and TRIAGE_FORMS_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub forms_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "List available forms",
        long_about = "List prints a numbered menu of the forms found in the forms directory.",
        after_help = "Example:\n    triage list --forms-dir ./forms"
    )]
    List(ListArgs),
    #[command(
        about = "Run an interactive triage session",
        long_about = "Run asks each question on the terminal, re-prompts on answers it cannot use, and prints the result text once the session completes. Without a form it prints the menu and reads the form number from stdin. A form can also be named by its menu number.",
        after_help = "Example:\n    triage run\n    triage run Headache\n    triage run 1 --state '{\"questionId\": 3}'"
    )]
    Run(RunArgs),
    #[command(
        about = "Advance a session by one answer",
        long_about = "Step applies a single answer to the session described by --state and prints a JSON report with the state to pass to the next step.",
        after_help = "Example:\n    triage step Headache --answer 2 --state '{\"questionId\": 1}'"
    )]
    Step(StepArgs),
    #[command(
        about = "Render a form as a Graphviz graph",
        long_about = "Dot prints the form's questions and results as nodes and its rules as labelled edges in DOT format.",
        after_help = "Example:\n    triage dot Headache | dot -Tsvg > headache.svg"
    )]
    Dot(DotArgs),
}

/// Apply command-line overrides on top of the loaded configuration.
pub fn apply_overrides(args: &Args, config: &mut TriageConfig) {
    if let Some(forms_dir) = &args.forms_dir {
        config.forms_dir = forms_dir.clone();
    }
}

pub fn run(args: Args, config: &TriageConfig) -> crate::Result<()> {
    let loader = FormLoader::new(&config.forms_dir);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::List(_) => commands::list(&loader, &mut out),
        Command::Run(run_args) => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            commands::run(&run_args, &loader, &mut input, &mut out)
        }
        Command::Step(step_args) => commands::step(&step_args, &loader, &mut out),
        Command::Dot(dot_args) => commands::dot(&dot_args, &loader, &mut out),
    }
}
