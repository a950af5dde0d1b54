//! Snapshot tests for the runner policy table
//!
//! Every flavor is rendered as a one-line command so table changes show up as reviewed snapshot diffs.
//!
//! Run with: `cargo test --test policy_snapshot_tests`
//! Review changes: `cargo insta review`

use std::path::Path;

use wasm_exec::proc::render_command;
use wasm_exec::{RunnerConfig, synthesize};

/// Render the command for `input` with an output file requested.
fn render(config: &RunnerConfig, input: &str) -> String {
    let spec = synthesize(config, input, Some(Path::new("out/case.out"))).expect("synthesize failed");
    render_command(&spec.argv)
}

fn shell_config(runner: &str) -> RunnerConfig {
    RunnerConfig::new(runner)
        .with_js_shim("wasm.js")
        .with_extra_files(["spec harness.js", "env.js"])
}

#[test]
fn test_wasm_shell_policy() {
    insta::assert_snapshot!(render(&RunnerConfig::new("wasm-shell"), "case.wast"), @"wasm-shell --entry=main case.wast -o out/case.out");
}

#[test]
fn test_d8_wasm_policy() {
    insta::assert_snapshot!(render(&shell_config("d8"), "case.wasm"), @r#"d8 --no-wasm-async-compilation wasm.js -- case.wasm "spec harness.js" env.js"#);
}

#[test]
fn test_d8_asm2wasm_policy() {
    insta::assert_snapshot!(render(&RunnerConfig::new("d8.exe"), "case.js"), @"d8.exe --no-wasm-async-compilation case.js");
}

#[test]
fn test_jsc_wasm_policy() {
    insta::assert_snapshot!(render(&shell_config("jsc"), "case.wasm"), @r#"jsc --useWebAssembly=1 wasm.js -- case.wasm "spec harness.js" env.js"#);
}

#[test]
fn test_jsc_asm2wasm_policy() {
    insta::assert_snapshot!(render(&RunnerConfig::new("jsc"), "case.js"), @"jsc --useWebAssembly=1 case.js");
}

#[test]
fn test_wasm_opt_policy() {
    insta::assert_snapshot!(render(&shell_config("wasm.opt.bat"), "case.wasm"), @"wasm.opt.bat case.wasm");
}
