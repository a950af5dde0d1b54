//! CLI module for the `wasm-exec` harness
//!
//! ```text
//! wasm-exec --runner <PATH> --files <GLOB> --fails <PATH> [--out <DIR>] [--wasmjs <PATH>] [--extra <PATH>]...
//! ```
//!
//! ## Modules
//!
//! - `commands` - Input validation, pattern expansion and orchestration
//! - `expectations` - Expected-failure lists
//! - `test_runner` - Per-file execution and classification
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod expectations;
pub mod test_runner;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::errors::HarnessError;
use crate::version::WASM_EXEC_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a harness error as a diagnostic report.
    pub fn from_harness(err: HarnessError) -> Self {
        Self::failure(format!("{:?}", miette::Report::new(err)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Execute .wast or .wasm files.
#[derive(Parser, Debug)]
#[command(name = "wasm-exec")]
#[command(version = WASM_EXEC_VERSION)]
#[command(about = "Execute .wast or .wasm files", long_about = None)]
pub struct Cli {
    /// Runner path
    #[arg(long, value_name = "PATH")]
    pub runner: PathBuf,

    /// Glob pattern for .wast / .wasm files
    #[arg(long, value_name = "GLOB")]
    pub files: String,

    /// Expected failures
    #[arg(long, value_name = "PATH")]
    pub fails: PathBuf,

    /// Output directory
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// JavaScript support runtime for WebAssembly
    #[arg(long, value_name = "PATH")]
    pub wasmjs: Option<PathBuf>,

    /// Extra files to pass to the runner
    #[arg(long, value_name = "PATH")]
    pub extra: Vec<PathBuf>,

    /// Configuration attribute selecting expected-failure lines (repeatable)
    #[arg(long = "attribute", value_name = "NAME")]
    pub attributes: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn into_options(self) -> commands::ExecuteOptions {
        commands::ExecuteOptions {
            runner: self.runner,
            files: self.files,
            fails: self.fails,
            out: self.out,
            wasmjs: self.wasmjs,
            extra: self.extra,
            attributes: self.attributes.into_iter().collect(),
            verbose: self.verbose,
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match commands::execute_files(&cli.into_options()) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_required() {
        let cli = Cli::try_parse_from([
            "wasm-exec", "--runner", "bin/d8", "--files", "t/*.wasm", "--fails", "fails.txt",
        ])
        .unwrap();
        assert_eq!(cli.runner, PathBuf::from("bin/d8"));
        assert_eq!(cli.files, "t/*.wasm");
        assert!(cli.out.is_none());
        assert!(cli.extra.is_empty());
    }

    #[test]
    fn test_cli_missing_required_flag() {
        assert!(Cli::try_parse_from(["wasm-exec", "--runner", "d8", "--files", "*.wasm"]).is_err());
    }

    #[test]
    fn test_cli_parse_repeated_extra_and_attribute() {
        let cli = Cli::try_parse_from([
            "wasm-exec",
            "--runner",
            "d8",
            "--files",
            "*.wasm",
            "--fails",
            "f.txt",
            "--wasmjs",
            "wasm.js",
            "--extra",
            "a.js",
            "--extra",
            "b.js",
            "--attribute",
            "d8",
            "--out",
            "out",
        ])
        .unwrap();
        let options = cli.into_options();
        assert_eq!(options.extra, [PathBuf::from("a.js"), PathBuf::from("b.js")]);
        assert_eq!(options.wasmjs, Some(PathBuf::from("wasm.js")));
        assert_eq!(options.out, Some(PathBuf::from("out")));
        assert!(options.attributes.contains("d8"));
    }

    #[test]
    fn test_harness_error_rendering_keeps_message() {
        let err = CliError::from_harness(HarnessError::configuration("No files found by x/*.wast"));
        assert!(err.message.contains("No files found by x/*.wast"));
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }
}
