//! Property-based tests for the runner policy
//!
//! These use proptest to check the flavor table over arbitrary runner locations, inputs and side files.

use std::path::{Path, PathBuf};

use proptest::prelude::*;
use wasm_exec_core::{RunnerConfig, RunnerFlavor, normalize_runner_name, synthesize};

fn file_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}\\.(wast|wasm|js)"
}

fn dir() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec("[a-z0-9]{1,6}", 0..4).prop_map(|parts| parts.iter().collect::<PathBuf>())
}

proptest! {
    /// Property: the runner path always leads the argv and the input always appears exactly once
    #[test]
    fn runner_first_input_once(
        runner_dir in dir(),
        runner in prop::sample::select(vec!["wasm-shell", "d8", "jsc", "wasm.opt", "d8.exe", "jsc.bat"]),
        shim in prop::option::of(file_name()),
        extras in prop::collection::vec(file_name(), 0..3),
        input in "[A-Z]{1,6}\\.wast",
    ) {
        let mut config = RunnerConfig::new(runner_dir.join(runner)).with_extra_files(extras);
        if let Some(shim) = shim {
            config = config.with_js_shim(shim);
        }
        let spec = synthesize(&config, &input, None).unwrap();
        prop_assert_eq!(&spec.argv[0], &runner_dir.join(runner).to_string_lossy().into_owned());
        prop_assert_eq!(spec.argv.iter().filter(|a| **a == input).count(), 1);
    }

    /// Property: extra files are appended only for the shim-backed JS shell flavors
    #[test]
    fn extras_only_with_shim(
        runner in prop::sample::select(vec!["wasm-shell", "d8", "jsc", "wasm.opt"]),
        shim in prop::option::of(file_name()),
        extras in prop::collection::vec("[A-Z]{1,4}\\.js", 1..4),
    ) {
        let mut config = RunnerConfig::new(runner).with_extra_files(extras.clone());
        if let Some(shim) = &shim {
            config = config.with_js_shim(shim);
        }
        let flavor = config.flavor().unwrap();
        let spec = synthesize(&config, "input.wasm", None).unwrap();
        let appended = spec.argv.ends_with(&extras);
        prop_assert_eq!(appended, matches!(flavor, RunnerFlavor::D8Wasm | RunnerFlavor::JscWasm));
    }

    /// Property: `-o` appears iff the flavor is wasm-shell and an output file was requested
    #[test]
    fn output_flag_only_for_wasm_shell(
        runner in prop::sample::select(vec!["wasm-shell", "d8", "jsc", "wasm.opt"]),
        with_output in any::<bool>(),
    ) {
        let config = RunnerConfig::new(runner);
        let out = with_output.then(|| Path::new("o/x.out"));
        let spec = synthesize(&config, "x.wast", out).unwrap();
        let has_flag = spec.argv.iter().any(|a| a == "-o");
        prop_assert_eq!(has_flag, with_output && runner == "wasm-shell");
        prop_assert_eq!(spec.output_file.is_some(), has_flag);
    }

    /// Property: normalization removes every platform suffix and nothing else
    #[test]
    fn normalization_strips_platform_suffixes(
        stem in "[a-z][a-z.-]{0,10}",
        suffixes in prop::collection::vec(prop::sample::select(vec![".exe", ".bat"]), 0..3),
    ) {
        prop_assume!(!stem.contains(".exe") && !stem.contains(".bat"));
        let name = format!("{}{}", stem, suffixes.concat());
        let normalized = normalize_runner_name(Path::new(&name)).unwrap();
        prop_assert_eq!(normalized, stem);
    }

    /// Property: names outside the table never classify
    #[test]
    fn unknown_names_are_rejected(name in "[a-z]{1,12}") {
        prop_assume!(!["d8", "jsc"].contains(&name.as_str()));
        prop_assert!(synthesize(&RunnerConfig::new(&name), "x.wasm", None).is_err());
    }
}
