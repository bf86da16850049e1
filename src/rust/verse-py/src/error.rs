// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Error handling for the Python bindings.
//! This module translates Rust errors into Python exceptions.

use pyo3::create_exception;
use pyo3::exceptions::PyException;
use pyo3::prelude::*;

create_exception!(_verse, VerseError, PyException);
create_exception!(_verse, VerseValidationError, VerseError);

/// Base error for Python bindings.
///
/// If the root error is a Python exception, e.g. one raised by a user supplied
/// peak B1 callback, it is set as the cause of the raised `VerseError` to keep
/// the full traceback in Python.
///
/// Invalid input is raised as `VerseValidationError`, a subclass of `VerseError`.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
    #[error(transparent)]
    Verse(#[from] verse::Error),
}

impl Error {
    pub fn new(msg: &str) -> Self {
        Error::Anyhow(anyhow::anyhow!(msg.to_string()))
    }

    fn is_validation_error(&self) -> bool {
        match self {
            Error::Verse(e) => e.validation().is_some(),
            Error::Anyhow(e) => e.chain().any(|cause| {
                cause.is::<verse::ValidationError>()
                    || cause
                        .downcast_ref::<verse::Error>()
                        .is_some_and(|e| e.validation().is_some())
            }),
        }
    }
}

impl From<verse::ValidationError> for Error {
    fn from(error: verse::ValidationError) -> Self {
        Error::Verse(error.into())
    }
}

impl From<Error> for PyErr {
    fn from(error: Error) -> Self {
        let err_message = create_python_error_message(&error);
        let py_error = if error.is_validation_error() {
            VerseValidationError::new_err(err_message)
        } else {
            VerseError::new_err(err_message)
        };
        if let Some(cause) = find_python_root_cause(&error) {
            Python::with_gil(|py| {
                py_error.set_cause(py, Some(cause.clone_ref(py)));
                py_error
            })
        } else {
            py_error
        }
    }
}

impl From<PyErr> for Error {
    fn from(error: PyErr) -> Self {
        Error::Anyhow(error.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Collect the source errors and format them into a string.
///
/// The original error message is excluded from the context.
fn create_context_message(error: &anyhow::Error) -> Option<String> {
    let mut causes = error
        .chain()
        .skip(1)
        .map(|cause| format!("{cause}"))
        .collect::<Vec<_>>();
    if causes.is_empty() {
        return None;
    }
    // Innermost cause first
    causes.reverse();
    Some(format!("Caused by:\n  {:}", causes.join("\n  ")))
}

fn get_anyhow_error(error: &Error) -> Option<&anyhow::Error> {
    match error {
        Error::Anyhow(e) => Some(e),
        Error::Verse(verse::Error::Anyhow(e)) => Some(e),
        Error::Verse(verse::Error::Validation(_)) => None,
    }
}

/// Format the error message for Python exceptions.
fn create_python_error_message(error: &Error) -> String {
    if let Some(error_context) = get_anyhow_error(error).and_then(create_context_message) {
        return format!("{error}\n{error_context}");
    }
    format!("{error}")
}

fn find_python_root_cause(error: &Error) -> Option<&PyErr> {
    let err = get_anyhow_error(error)?.root_cause();
    if let Some(py_err) = err.downcast_ref::<PyErr>() {
        return Some(py_err);
    }
    match err.downcast_ref::<verse::Error>() {
        Some(verse::Error::Anyhow(e)) => e.root_cause().downcast_ref::<PyErr>(),
        _ => None,
    }
}
