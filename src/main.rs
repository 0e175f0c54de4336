use clap::Parser;
use std::env;
use std::process::ExitCode;
use triage::cli::{self, Args};
use triage::core::config::ConfigLoader;
use triage::core::error::{AppError, DefaultErrorReporter, ErrorReporter};
use triage::logging;

fn main() -> ExitCode {
    let args = Args::parse();
    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AppError>() {
                Some(app_error) => DefaultErrorReporter::new().report_error(app_error),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn try_main(args: Args) -> triage::Result<()> {
    let workspace = env::current_dir()?;
    let mut config = ConfigLoader::load(args.config.as_deref(), &workspace)?;
    cli::apply_overrides(&args, &mut config);

    let _guard = logging::init(&args.command, &config.logging)?;
    tracing::debug!(forms_dir = %config.forms_dir.display(), "configuration resolved");

    cli::run(args, &config)
}
