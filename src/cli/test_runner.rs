//! Test driver: run every input through the runner and classify it against the expected failures.
//!
//! ## TestReporter Trait
//!
//! The driver reports through a `TestReporter` so output format is separate from execution. The console
//! reporter is the default; tests plug in recording reporters.
//!
//! ## Scheduling
//!
//! Inputs run strictly one after another, in the order given. Each child is awaited before the next starts.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::expectations::ExpectedFailures;
use crate::errors::{HarnessError, HarnessResult};
use crate::proc::ProcessRunner;

/// Builds the argv for one input: `(input, output_file, extras) -> argv`.
pub type CommandCtor<E> = fn(&Path, Option<&Path>, &E) -> HarnessResult<Vec<String>>;

/// Names the output file for one input: `(output_dir, input) -> path`.
pub type OutnameCtor = fn(&Path, &Path) -> PathBuf;

// ============================================================================
// Results
// ============================================================================

/// Raw result of running one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    /// Test identifier: the input file's basename.
    pub test: String,
    pub input: PathBuf,
    pub success: bool,
    /// Captured output (standard output and error), or the error message when nothing ran.
    pub output: String,
    pub duration: Duration,
}

/// A result classified against the expected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Pass,
    UnexpectedFail,
    ExpectedFail,
    UnexpectedPass,
}

impl Outcome {
    pub fn classify(success: bool, expected_to_fail: bool) -> Self {
        match (success, expected_to_fail) {
            (true, false) => Outcome::Pass,
            (false, false) => Outcome::UnexpectedFail,
            (false, true) => Outcome::ExpectedFail,
            (true, true) => Outcome::UnexpectedPass,
        }
    }

    /// Whether this outcome matches expectations.
    pub fn is_expected(self) -> bool {
        matches!(self, Outcome::Pass | Outcome::ExpectedFail)
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Pass => "PASSED",
            Outcome::UnexpectedFail => "FAILED",
            Outcome::ExpectedFail => "XFAIL",
            Outcome::UnexpectedPass => "XPASS",
        }
    }
}

/// Aggregate report of a run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub results: Vec<(TestResult, Outcome)>,
    /// Expected failures that matched no input in this run.
    pub stale_expectations: Vec<String>,
    pub duration: Duration,
}

impl RunSummary {
    pub fn count(&self, outcome: Outcome) -> usize {
        self.results.iter().filter(|(_, o)| *o == outcome).count()
    }

    pub fn unexpected(&self) -> impl Iterator<Item = &(TestResult, Outcome)> {
        self.results.iter().filter(|(_, o)| !o.is_expected())
    }

    /// 0 when every result matched expectations, 1 otherwise.
    pub fn exit_status(&self) -> i32 {
        if self.unexpected().next().is_some() { 1 } else { 0 }
    }
}

// ============================================================================
// Test Reporter Trait
// ============================================================================

/// Trait for reporting test execution results.
pub trait TestReporter {
    /// Called once before the first input runs
    fn on_run_start(&mut self, _input_count: usize) {}

    /// Called before an input runs
    fn on_test_start(&mut self, _test: &str) {}

    /// Called when an input has been run and classified
    fn on_test_complete(&mut self, result: &TestResult, outcome: Outcome);

    /// Called when all inputs have completed
    fn on_run_complete(&mut self, summary: &RunSummary);
}

/// Default console reporter (one line per input, then failures and a summary)
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

fn colored(outcome: Outcome) -> String {
    let color = match outcome {
        Outcome::Pass => "\x1b[32m",
        Outcome::ExpectedFail => "\x1b[33m",
        Outcome::UnexpectedFail | Outcome::UnexpectedPass => "\x1b[31m",
    };
    format!("{}{}\x1b[0m", color, outcome.label())
}

impl TestReporter for ConsoleReporter {
    fn on_run_start(&mut self, input_count: usize) {
        println!("\x1b[1m=================== test session starts ===================\x1b[0m");
        println!("collected {} file(s)", input_count);
        println!();
    }

    fn on_test_complete(&mut self, result: &TestResult, outcome: Outcome) {
        if self.verbose {
            println!("{} {} ({:.0}ms)", result.test, colored(outcome), result.duration.as_millis());
        } else {
            println!("{} {}", result.test, colored(outcome));
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        let unexpected: Vec<_> = summary.unexpected().collect();
        if !unexpected.is_empty() {
            println!();
            println!("\x1b[1;31m=================== UNEXPECTED RESULTS ===================\x1b[0m");
            for (result, outcome) in unexpected {
                println!();
                println!("\x1b[1m___________ {} ___________\x1b[0m", result.test);
                match outcome {
                    Outcome::UnexpectedPass => {
                        println!("    \x1b[33mTest passed but was expected to fail\x1b[0m");
                    }
                    _ => {
                        for line in result.output.lines() {
                            println!("    {}", line);
                        }
                    }
                }
                println!();
                println!("    {}", result.input.display());
            }
        }

        if !summary.stale_expectations.is_empty() {
            println!();
            println!(
                "expected failures not run: {}",
                summary.stale_expectations.join(", ")
            );
        }

        println!();
        let summary_color = if summary.exit_status() != 0 { "\x1b[1;31m" } else { "\x1b[1;32m" };
        let mut parts = Vec::new();
        for (outcome, noun) in [
            (Outcome::Pass, "passed"),
            (Outcome::UnexpectedFail, "failed"),
            (Outcome::ExpectedFail, "xfailed"),
            (Outcome::UnexpectedPass, "xpassed"),
        ] {
            let n = summary.count(outcome);
            if n > 0 {
                parts.push(format!("{} {}", n, noun));
            }
        }
        println!(
            "{}=================== {} in {:.2}s ===================\x1b[0m",
            summary_color,
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
    }
}

// ============================================================================
// Tester
// ============================================================================

/// Runs single inputs: names the output file, builds the command, captures the result.
pub struct Tester<E> {
    pub command_ctor: CommandCtor<E>,
    pub outname_ctor: OutnameCtor,
    pub outdir: Option<PathBuf>,
    pub extras: E,
}

impl<E> Tester<E> {
    pub fn new(command_ctor: CommandCtor<E>, outname_ctor: OutnameCtor, outdir: Option<PathBuf>, extras: E) -> Self {
        Self {
            command_ctor,
            outname_ctor,
            outdir,
            extras,
        }
    }

    /// Run one input in `cwd`.
    ///
    /// Failures of the child (non-zero exit, script not found, spawn errors) become a failed [`TestResult`].
    /// A configuration error from the command constructor aborts the run instead.
    pub fn run_one<R: ProcessRunner>(&self, runner: &mut R, input: &Path, cwd: &Path) -> HarnessResult<TestResult> {
        let start = Instant::now();
        let test = test_name(input);
        let outfile = self.outdir.as_deref().map(|dir| (self.outname_ctor)(dir, input));
        let argv = (self.command_ctor)(input, outfile.as_deref(), &self.extras)?;

        let (success, output) = match runner.run_and_capture(&argv, cwd) {
            Ok(output) => (true, output),
            Err(HarnessError::Configuration(message)) => return Err(HarnessError::Configuration(message)),
            Err(err) => {
                let output = err.captured_output().map(str::to_string).unwrap_or_else(|| err.to_string());
                (false, output)
            }
        };

        Ok(TestResult {
            test,
            input: input.to_path_buf(),
            success,
            output,
            duration: start.elapsed(),
        })
    }
}

/// Test identifier for an input: its basename.
pub fn test_name(input: &Path) -> String {
    input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}

/// Run every input in order and classify the results.
#[tracing::instrument(skip_all, fields(inputs = inputs.len(), expected_failures = fails.len()))]
pub fn execute<E, R, P>(
    tester: &Tester<E>,
    inputs: &[PathBuf],
    fails: &ExpectedFailures,
    runner: &mut R,
    reporter: &mut P,
    cwd: &Path,
) -> HarnessResult<RunSummary>
where
    R: ProcessRunner,
    P: TestReporter,
{
    let start = Instant::now();
    let mut summary = RunSummary::default();
    reporter.on_run_start(inputs.len());

    for input in inputs {
        reporter.on_test_start(&test_name(input));
        let result = tester.run_one(runner, input, cwd)?;
        let outcome = Outcome::classify(result.success, fails.contains(&result.test));
        tracing::debug!(test = %result.test, outcome = outcome.label(), "test complete");
        reporter.on_test_complete(&result, outcome);
        summary.results.push((result, outcome));
    }

    summary.stale_expectations = fails
        .names()
        .filter(|name| !summary.results.iter().any(|(r, _)| r.test == *name))
        .map(str::to_string)
        .collect();
    if !summary.stale_expectations.is_empty() {
        tracing::warn!(
            count = summary.stale_expectations.len(),
            "expected failures matched no input in this run"
        );
    }

    summary.duration = start.elapsed();
    reporter.on_run_complete(&summary);
    Ok(summary)
}
