//! `wasm-exec` command implementation.
//!
//! Validates the inputs, expands the file pattern, assembles the [`RunnerConfig`] and hands everything to the
//! test driver. Functions return `CliResult<ExitCode>` / `HarnessResult<_>` instead of calling
//! `process::exit`; only the top-level `run()` exits.

use std::collections::BTreeSet;
use std::env;
use std::io;
use std::path::{Path, PathBuf};

use wasm_exec_core::{RunnerConfig, create_outname, synthesize};

use super::expectations::ExpectedFailures;
use super::test_runner::{self, ConsoleReporter, RunSummary, TestReporter, Tester};
use super::{CliError, CliResult, ExitCode};
use crate::errors::{HarnessError, HarnessResult};
use crate::proc::{LoggingRunner, ProcessRunner, SystemRunner};

/// Everything one `wasm-exec` run needs.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    pub runner: PathBuf,
    /// Glob pattern selecting the input files.
    pub files: String,
    /// Expected failures list.
    pub fails: PathBuf,
    pub out: Option<PathBuf>,
    pub wasmjs: Option<PathBuf>,
    pub extra: Vec<PathBuf>,
    /// Attributes selecting which expected-failure lines apply.
    pub attributes: BTreeSet<String>,
    pub verbose: bool,
}

/// Check the paths named by `options` before anything runs.
pub fn validate(options: &ExecuteOptions) -> HarnessResult<()> {
    if !options.runner.is_file() {
        return Err(HarnessError::configuration(format!(
            "Cannot find runner at {}",
            options.runner.display()
        )));
    }
    if let Some(out) = &options.out {
        if !out.is_dir() {
            return Err(HarnessError::configuration(format!("Cannot find outdir {}", out.display())));
        }
    }
    if let Some(wasmjs) = &options.wasmjs {
        if !wasmjs.is_file() {
            return Err(HarnessError::configuration(format!("Cannot find wasm.js {}", wasmjs.display())));
        }
    }
    Ok(())
}

/// Expand `pattern` to the matching paths, sorted. No match is an error.
pub fn expand_files(pattern: &str) -> HarnessResult<Vec<PathBuf>> {
    let paths = glob::glob(pattern)
        .map_err(|e| HarnessError::configuration(format!("Invalid file pattern {}: {}", pattern, e)))?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => tracing::warn!(path = %e.path().display(), "skipping unreadable path: {}", e.error()),
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(HarnessError::configuration(format!("No files found by {}", pattern)));
    }
    Ok(files)
}

/// Assemble the runner configuration from validated options.
pub fn build_config(options: &ExecuteOptions) -> RunnerConfig {
    let mut config = RunnerConfig::new(&options.runner).with_extra_files(options.extra.iter().cloned());
    if let Some(wasmjs) = &options.wasmjs {
        config = config.with_js_shim(wasmjs);
    }
    if let Some(out) = &options.out {
        config = config.with_output_dir(out);
    }
    config
}

/// Command constructor handed to the test driver.
pub fn runner_command(input: &Path, output: Option<&Path>, config: &RunnerConfig) -> HarnessResult<Vec<String>> {
    Ok(synthesize(config, input, output)?.argv)
}

/// Output-name constructor handed to the test driver.
pub fn runner_outname(output_dir: &Path, input: &Path) -> PathBuf {
    create_outname(output_dir, input)
}

/// Run every matching input through the runner, using the given process runner and reporter.
///
/// Nothing is spawned unless every path checks out, the pattern matches at least one file, the runner is a
/// known flavor and the expected-failure list parses.
#[tracing::instrument(skip_all, fields(runner = %options.runner.display(), files = %options.files))]
pub fn execute_files_with<R, P>(options: &ExecuteOptions, runner: &mut R, reporter: &mut P) -> HarnessResult<RunSummary>
where
    R: ProcessRunner,
    P: TestReporter,
{
    validate(options)?;
    let inputs = expand_files(&options.files)?;

    let config = build_config(options);
    let flavor = config.flavor()?;
    tracing::debug!(%flavor, inputs = inputs.len(), "runner classified");

    let fails = ExpectedFailures::load(&options.fails, &options.attributes)?;
    let cwd = env::current_dir()?;

    let tester = Tester::new(runner_command, runner_outname, options.out.clone(), config);
    test_runner::execute(&tester, &inputs, &fails, runner, reporter, &cwd)
}

/// Run with the real process runner, logging commands to stdout.
pub fn execute_files(options: &ExecuteOptions) -> CliResult<ExitCode> {
    let mut runner = LoggingRunner::new(SystemRunner::merging_stderr(), io::stdout());
    let mut reporter = ConsoleReporter::new(options.verbose);

    let summary = execute_files_with(options, &mut runner, &mut reporter).map_err(CliError::from_harness)?;
    if summary.exit_status() == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
