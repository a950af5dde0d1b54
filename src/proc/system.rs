//! `std::process` backed [`ProcessRunner`].

use std::path::Path;
use std::process::{Command, Output, Stdio};

use super::{ProcessRunner, render_command};
use crate::errors::{HarnessError, HarnessResult};

/// Spawns real child processes.
///
/// By default the child's standard error is inherited. With [`SystemRunner::merging_stderr`], captured calls
/// collect standard error too and append it to the returned output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner {
    merge_stderr: bool,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merging_stderr() -> Self {
        Self { merge_stderr: true }
    }

    fn command(argv: &[String], cwd: &Path) -> HarnessResult<Command> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| HarnessError::configuration("cannot run an empty command"))?;
        let mut command = Command::new(program);
        command.args(args).current_dir(cwd);
        Ok(command)
    }

    fn collect(&self, output: &Output) -> String {
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        if self.merge_stderr {
            text.push_str(&String::from_utf8_lossy(&output.stderr));
        }
        text
    }
}

impl ProcessRunner for SystemRunner {
    fn run_and_wait(&mut self, argv: &[String], cwd: &Path) -> HarnessResult<()> {
        let status = Self::command(argv, cwd)?.status()?;
        if status.success() {
            Ok(())
        } else {
            Err(HarnessError::ProcessExecution {
                command: render_command(argv),
                status: status.code(),
                output: String::new(),
            })
        }
    }

    fn run_and_capture(&mut self, argv: &[String], cwd: &Path) -> HarnessResult<String> {
        let mut command = Self::command(argv, cwd)?;
        command.stdin(Stdio::null()).stdout(Stdio::piped());
        command.stderr(if self.merge_stderr { Stdio::piped() } else { Stdio::inherit() });
        let output = command.output()?;
        let text = self.collect(&output);
        if output.status.success() {
            Ok(text)
        } else {
            Err(HarnessError::ProcessExecution {
                command: render_command(argv),
                status: output.status.code(),
                output: text,
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn capture_returns_stdout() {
        let out = SystemRunner::new().run_and_capture(&sh("echo hello"), Path::new(".")).unwrap();
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn capture_merges_stderr_when_asked() {
        let out = SystemRunner::merging_stderr()
            .run_and_capture(&sh("echo out; echo err 1>&2"), Path::new("."))
            .unwrap();
        assert_eq!(out, "out\nerr\n");
    }

    #[test]
    fn non_zero_exit_is_a_process_execution_error() {
        let err = SystemRunner::merging_stderr()
            .run_and_capture(&sh("echo partial; exit 3"), Path::new("."))
            .unwrap_err();
        match err {
            HarnessError::ProcessExecution { status, output, .. } => {
                assert_eq!(status, Some(3));
                assert_eq!(output, "partial\n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wait_runs_in_the_given_directory() {
        let dir = tempfile::tempdir().unwrap();
        SystemRunner::new()
            .run_and_wait(&sh("touch marker"), dir.path())
            .unwrap();
        assert!(dir.path().join("marker").is_file());
    }

    #[test]
    fn empty_command_is_rejected() {
        let err = SystemRunner::new().run_and_wait(&[], Path::new(".")).unwrap_err();
        assert!(matches!(err, HarnessError::Configuration(_)));
    }
}
