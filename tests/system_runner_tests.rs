//! End-to-end run against a real child process: a shell script standing in for `wasm-shell`.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;

use wasm_exec::cli::commands::{ExecuteOptions, execute_files_with};
use wasm_exec::cli::test_runner::{Outcome, RunSummary, TestReporter, TestResult};
use wasm_exec::proc::{LoggingRunner, ScriptResolver, SystemRunner};

const FAKE_SHELL: &str = r#"#!/bin/sh
# usage: wasm-shell --entry=main <input> [-o <out>]
input="$2"
if [ "$3" = "-o" ]; then
  echo "ran $(basename "$input")" > "$4"
fi
case "$(basename "$input")" in
  trap_*) echo "trap: unreachable executed in $(basename "$input")" >&2; exit 1 ;;
esac
echo "ok"
"#;

#[derive(Default)]
struct Recorder {
    outcomes: Vec<(String, Outcome)>,
}

impl TestReporter for Recorder {
    fn on_test_complete(&mut self, result: &TestResult, outcome: Outcome) {
        self.outcomes.push((result.test.clone(), outcome));
    }

    fn on_run_complete(&mut self, _summary: &RunSummary) {}
}

#[test]
fn wasm_shell_script_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let runner = dir.path().join("wasm-shell");
    fs::write(&runner, FAKE_SHELL).unwrap();
    fs::set_permissions(&runner, fs::Permissions::from_mode(0o755)).unwrap();

    let suite = dir.path().join("suite");
    fs::create_dir(&suite).unwrap();
    for name in ["add.wast", "trap_div.wast", "trap_new.wast"] {
        fs::write(suite.join(name), "(module)").unwrap();
    }
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    fs::write(dir.path().join("fails.txt"), "trap_div.wast  # division by zero\n").unwrap();

    let options = ExecuteOptions {
        runner: runner.clone(),
        files: format!("{}/*.wast", suite.display()),
        fails: dir.path().join("fails.txt"),
        out: Some(out.clone()),
        ..ExecuteOptions::default()
    };

    let resolver = ScriptResolver::new("python3").with_search_path("");
    let mut logging = LoggingRunner::with_resolver(SystemRunner::merging_stderr(), Vec::new(), resolver);
    let mut recorder = Recorder::default();
    let summary = execute_files_with(&options, &mut logging, &mut recorder).unwrap();

    assert_eq!(
        recorder.outcomes,
        vec![
            ("add.wast".to_string(), Outcome::Pass),
            ("trap_div.wast".to_string(), Outcome::ExpectedFail),
            ("trap_new.wast".to_string(), Outcome::UnexpectedFail),
        ]
    );
    assert_eq!(summary.exit_status(), 1);

    let trap_new = &summary.results[2].0;
    assert_eq!(trap_new.output, "trap: unreachable executed in trap_new.wast\n");

    assert_eq!(fs::read_to_string(out.join("add.wast.out")).unwrap(), "ran add.wast\n");
    assert_eq!(fs::read_to_string(out.join("trap_div.wast.out")).unwrap(), "ran trap_div.wast\n");

    let (_, log) = logging.into_parts();
    let log = String::from_utf8(log).unwrap();
    assert_eq!(log.lines().count(), 3);
    for line in log.lines() {
        assert!(line.starts_with("run-and-capture(`"), "{line}");
        assert!(line.contains("--entry=main"), "{line}");
        assert!(line.contains(" -o "), "{line}");
    }
}
