//! Reads form documents from a forms directory.

use crate::core::error::AppError;
use crate::core::form::Form;
use crate::core::types::ErrorCategory;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// A form available in the forms directory, numbered for menu display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormListing {
    pub number: usize,
    pub form_id: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FormLoader {
    forms_dir: PathBuf,
}

impl FormLoader {
    pub fn new(forms_dir: impl Into<PathBuf>) -> Self {
        Self {
            forms_dir: forms_dir.into(),
        }
    }

    pub fn forms_dir(&self) -> &Path {
        &self.forms_dir
    }

    /// Load `<forms_dir>/<form_id>.json`, falling back to `.yaml` then `.yml`.
    pub fn load(&self, form_id: &str) -> Result<Form, AppError> {
        let path = self.locate(form_id)?;
        let form = Self::load_path(&path)?;
        if form.form_id() != form_id {
            tracing::warn!(
                file = %path.display(),
                form_id = form.form_id(),
                "form id inside the document differs from its file name"
            );
        }
        Ok(form)
    }

    /// Load a form named either by id or by its number in [`FormLoader::list`].
    ///
    /// A form whose id is literally the number takes precedence over the menu
    /// entry with that number.
    pub fn select(&self, selection: &str) -> Result<Form, AppError> {
        let trimmed = selection.trim();
        let number = match trimmed.parse::<usize>() {
            Ok(number) if self.locate(trimmed).is_err() => number,
            _ => return self.load(trimmed),
        };

        let listing = self.list()?;
        let entry = listing
            .iter()
            .find(|entry| entry.number == number)
            .ok_or_else(|| {
                AppError::new(
                    ErrorCategory::Io,
                    format!(
                        "no form numbered {} in {}",
                        number,
                        self.forms_dir.display()
                    ),
                )
                .with_context("selection", trimmed)
                .with_suggestion("Use a number or name from `triage list`")
            })?;
        tracing::debug!(number, form_id = %entry.form_id, "menu selection resolved");
        self.load(&entry.form_id)
    }

    /// Load a single form file; the format follows the file extension.
    pub fn load_path(path: &Path) -> Result<Form, AppError> {
        let content = fs::read_to_string(path).map_err(|err| {
            AppError::with_source(
                ErrorCategory::Io,
                format!("failed to read form file {}: {}", path.display(), err),
                err,
            )
            .with_context("path", path.display())
        })?;

        let form = match extension_of(path).as_deref() {
            Some("yaml") | Some("yml") => Form::from_yaml_str(&content),
            _ => Form::from_json_str(&content),
        }
        .map_err(|err| err.with_context("path", path.display()))?;

        tracing::debug!(
            form_id = form.form_id(),
            questions = form.questions().len(),
            results = form.results().len(),
            "loaded form"
        );
        Ok(form)
    }

    /// Form ids found in the forms directory, sorted and numbered from 1.
    ///
    /// When the same id exists in several formats the JSON file is listed.
    pub fn list(&self) -> Result<Vec<FormListing>, AppError> {
        let entries = fs::read_dir(&self.forms_dir).map_err(|err| {
            AppError::with_source(
                ErrorCategory::Io,
                format!(
                    "failed to read forms directory {}: {}",
                    self.forms_dir.display(),
                    err
                ),
                err,
            )
            .with_suggestion("Pass --forms-dir or set TRIAGE_FORMS_DIR")
        })?;

        let mut found: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(rank) = extension_of(&path)
                .and_then(|ext| EXTENSIONS.iter().position(|known| *known == ext))
            else {
                continue;
            };
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            // Hidden files cannot be loaded by id.
            if stem.starts_with('.') {
                continue;
            }
            match found.get(stem) {
                Some((existing, _)) if *existing <= rank => {}
                _ => {
                    found.insert(stem.to_string(), (rank, path.clone()));
                }
            }
        }

        Ok(found
            .into_iter()
            .enumerate()
            .map(|(index, (form_id, (_, path)))| FormListing {
                number: index + 1,
                form_id,
                path,
            })
            .collect())
    }

    fn locate(&self, form_id: &str) -> Result<PathBuf, AppError> {
        let trimmed = form_id.trim();
        if trimmed.is_empty() || trimmed.contains(['/', '\\']) || trimmed.starts_with('.') {
            return Err(AppError::new(
                ErrorCategory::Io,
                format!("'{}' is not a valid form id", form_id),
            )
            .with_suggestion("Use a name from `triage list`"));
        }

        EXTENSIONS
            .iter()
            .map(|ext| self.forms_dir.join(format!("{}.{}", trimmed, ext)))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                AppError::new(
                    ErrorCategory::Io,
                    format!(
                        "form '{}' not found in {}",
                        trimmed,
                        self.forms_dir.display()
                    ),
                )
                .with_context("form_id", trimmed)
                .with_suggestion("Use a name from `triage list`")
            })
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
