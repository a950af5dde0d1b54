//! Error taxonomy for the harness.
//!
//! - `Configuration`: bad runner, missing input paths, bad fails file. Aborts the run before anything is spawned.
//! - `NotFound`: an interpreted script could not be located. Fatal for that one invocation.
//! - `ProcessExecution`: a child exited unsuccessfully. Propagated unchanged, never retried.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use wasm_exec_core::ConfigurationError;

#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("{0}")]
    #[diagnostic(code(wasm_exec::configuration))]
    Configuration(String),

    #[error("File \"{filename}\" not found. (cwd=`{}`, PATH=`{search_path}`)", .cwd.display())]
    #[diagnostic(
        code(wasm_exec::not_found),
        help("make the script executable or place it in the working directory or on PATH")
    )]
    NotFound {
        filename: String,
        cwd: PathBuf,
        search_path: String,
    },

    #[error("command `{command}` failed with {}", describe_status(.status))]
    #[diagnostic(code(wasm_exec::process_execution))]
    ProcessExecution {
        command: String,
        /// Exit code, or `None` when the child was killed by a signal.
        status: Option<i32>,
        /// Captured output, when the call was capturing.
        output: String,
    },

    #[error("I/O error: {0}")]
    #[diagnostic(code(wasm_exec::io))]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    pub fn configuration(message: impl Into<String>) -> Self {
        HarnessError::Configuration(message.into())
    }

    /// Output captured before the failure, if any.
    pub fn captured_output(&self) -> Option<&str> {
        match self {
            HarnessError::ProcessExecution { output, .. } if !output.is_empty() => Some(output),
            _ => None,
        }
    }
}

impl From<ConfigurationError> for HarnessError {
    fn from(err: ConfigurationError) -> Self {
        HarnessError::Configuration(err.to_string())
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => "no exit status (terminated by signal)".to_string(),
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
