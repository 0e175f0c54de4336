use crate::cli::args::{DotArgs, RunArgs, StepArgs};
use crate::cli::render::{self, StepReport};
use crate::core::actions::ActionRegistry;
use crate::core::dot;
use crate::core::engine::TriageEngine;
use crate::core::form::Form;
use crate::core::loader::FormLoader;
use crate::core::types::ErrorCategory;
use crate::Result;
use anyhow::bail;
use std::io::{BufRead, Write};

pub fn list<W: Write>(loader: &FormLoader, out: &mut W) -> Result<()> {
    let listings = loader.list()?;
    if listings.is_empty() {
        writeln!(out, "No forms found in {}", loader.forms_dir().display())?;
        return Ok(());
    }
    render::write_menu(out, &listings)?;
    Ok(())
}

/// Print the menu and load the form whose number is read from `input`.
///
/// Returns `None` when there is nothing to choose or the selection is not a
/// listed number.
fn choose_form<R: BufRead, W: Write>(
    loader: &FormLoader,
    input: &mut R,
    out: &mut W,
) -> Result<Option<Form>> {
    let listings = loader.list()?;
    if listings.is_empty() {
        writeln!(out, "No forms found in {}", loader.forms_dir().display())?;
        return Ok(None);
    }
    render::write_menu(out, &listings)?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let selected = line
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|number| listings.iter().find(|entry| entry.number == number));
    match selected {
        Some(entry) => Ok(Some(loader.load(&entry.form_id)?)),
        None => {
            writeln!(out, "Invalid selection.")?;
            Ok(None)
        }
    }
}

/// Interactive session: ask, read, apply, repeat until a result is reached or
/// input ends.
pub fn run<R: BufRead, W: Write>(
    args: &RunArgs,
    loader: &FormLoader,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let form = match args.form_id.as_deref() {
        Some(selection) => loader.select(selection)?,
        None => match choose_form(loader, input, out)? {
            Some(form) => form,
            None => return Ok(()),
        },
    };
    let engine = TriageEngine::new(ActionRegistry::with_defaults());
    let mut session = engine.initial_state(&form, args.state.as_deref())?;
    tracing::info!(form_id = form.form_id(), "starting triage session");

    loop {
        if let Some(result) = session.result() {
            writeln!(out, "Result: {}", result.text)?;
            return Ok(());
        }

        render::write_question(out, session.current_question())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            writeln!(
                out,
                "Session paused. Resume with --state '{}'",
                session.engine_state().to_json()
            )?;
            return Ok(());
        }
        let answer = line.trim_end_matches(['\r', '\n']);

        let next = match engine.process_answer(answer, &session, &form) {
            Ok(next) => next,
            Err(err) if err.is_recoverable() => {
                match err.category {
                    ErrorCategory::NotSupported => {
                        writeln!(out, "Cannot answer here: {}", err.message)?
                    }
                    _ => writeln!(out, "Invalid answer: {}", err.message)?,
                }
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        if !next.transitioned() {
            writeln!(out, "No transition for that answer, please answer again.")?;
            continue;
        }
        session = engine.resume(&form, next.engine_state())?;
    }
}

/// One non-interactive turn reported as JSON.
pub fn step<W: Write>(args: &StepArgs, loader: &FormLoader, out: &mut W) -> Result<()> {
    let form = loader.select(&args.form_id)?;
    let engine = TriageEngine::new(ActionRegistry::with_defaults());
    let session = engine.initial_state(&form, args.state.as_deref())?;

    let report = match args.answer.as_deref() {
        Some(_) if session.is_complete() => {
            bail!("session for form '{}' is already complete", form.form_id())
        }
        Some(answer) => {
            let next = engine.process_answer(answer, &session, &form)?;
            StepReport::from_session(&form, &next)
        }
        None => StepReport::from_session(&form, &session),
    };

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn dot<W: Write>(args: &DotArgs, loader: &FormLoader, out: &mut W) -> Result<()> {
    let form = loader.select(&args.form_id)?;
    write!(out, "{}", dot::form_to_dot(&form))?;
    Ok(())
}
