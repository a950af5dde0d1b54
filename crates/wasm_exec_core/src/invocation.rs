//! Build the argument vector for one test input.
//!
//! [`RunnerConfig`] is assembled once per run; [`synthesize`] is then called once per input file and returns a
//! fresh [`InvocationSpec`] that the caller executes and drops.
//!
//! ## Notes
//! - `d8` always receives `--no-wasm-async-compilation`: asynchronous compilation is unreliable under test
//!   harnesses (V8 issue 6263). Keep it even when it looks redundant.
//! - Only `wasm-shell` honors an output file. The other flavors drop a requested output file silently.

use std::path::{Path, PathBuf};

use crate::errors::ConfigurationError;
use crate::flavor::{RunnerFlavor, normalize_runner_name};

/// Per-run runner settings. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// The runner executable.
    pub runner_path: PathBuf,
    /// JavaScript support shim for WebAssembly (`d8` / `jsc` only).
    pub js_shim_path: Option<PathBuf>,
    /// Side files appended after the input for the JS shell `-wasm` flavors.
    pub extra_files: Vec<PathBuf>,
    /// Directory receiving `<name>.out` files.
    pub output_dir: Option<PathBuf>,
}

impl RunnerConfig {
    pub fn new(runner_path: impl Into<PathBuf>) -> Self {
        Self {
            runner_path: runner_path.into(),
            js_shim_path: None,
            extra_files: Vec::new(),
            output_dir: None,
        }
    }

    pub fn with_js_shim(mut self, path: impl Into<PathBuf>) -> Self {
        self.js_shim_path = Some(path.into());
        self
    }

    pub fn with_extra_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.extra_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Resolve the flavor of this runner.
    pub fn flavor(&self) -> Result<RunnerFlavor, ConfigurationError> {
        let runner = self.runner_path.display().to_string();
        let name = normalize_runner_name(&self.runner_path)
            .ok_or_else(|| ConfigurationError::MissingRunnerName(runner.clone()))?;
        RunnerFlavor::classify(&name, self.js_shim_path.is_some()).ok_or_else(|| {
            ConfigurationError::UnknownRunner {
                runner,
                name,
                known: RunnerFlavor::known_runner_names(),
            }
        })
    }

    /// Output file for `input`, when an output directory is configured.
    pub fn outname_for(&self, input: &Path) -> Option<PathBuf> {
        self.output_dir.as_deref().map(|dir| create_outname(dir, input))
    }
}

/// The fully resolved command for one test file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSpec {
    pub argv: Vec<String>,
    /// The output file the runner was asked to write, if its flavor supports one.
    pub output_file: Option<PathBuf>,
}

/// Name of the output file for `input` inside `output_dir`: `<output_dir>/<basename(input)>.out`.
///
/// ## Examples
/// ```rust
/// use std::path::Path;
/// use wasm_exec_core::create_outname;
///
/// let out = create_outname(Path::new("/tmp/out"), Path::new("tests/foo.wast"));
/// assert_eq!(out, Path::new("/tmp/out/foo.wast.out"));
/// ```
pub fn create_outname(output_dir: &Path, input: &Path) -> PathBuf {
    let mut name = input.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".out");
    output_dir.join(name)
}

/// Produce the argument vector that runs `input` on the configured runner.
///
/// ## Parameters
/// - `config`: the per-run runner settings.
/// - `input`: the test file to execute.
/// - `output_file`: where the runner should write its output, if anywhere.
///
/// ## Returns
/// - (`InvocationSpec`): the argv plus the output file actually passed to the runner.
///
/// ## Errors
/// - [`ConfigurationError::UnknownRunner`] when the runner's base name is not in the flavor table.
pub fn synthesize(
    config: &RunnerConfig,
    input: impl AsRef<Path>,
    output_file: Option<&Path>,
) -> Result<InvocationSpec, ConfigurationError> {
    let flavor = config.flavor()?;
    let argv = flavor_argv(flavor, config, input.as_ref(), output_file);
    let output_file = output_file
        .filter(|_| flavor.supports_output_file())
        .map(Path::to_path_buf);
    Ok(InvocationSpec { argv, output_file })
}

/// The policy table: one argv template per flavor.
fn flavor_argv(flavor: RunnerFlavor, config: &RunnerConfig, input: &Path, output_file: Option<&Path>) -> Vec<String> {
    let runner = path_arg(&config.runner_path);
    let input = path_arg(input);
    let shim: Vec<String> = config.js_shim_path.iter().map(|p| path_arg(p)).collect();
    let extras = config.extra_files.iter().map(|p| path_arg(p));

    match flavor {
        RunnerFlavor::WasmShell => {
            let mut argv = vec![runner, "--entry=main".to_string(), input];
            if let Some(out) = output_file {
                argv.push("-o".to_string());
                argv.push(path_arg(out));
            }
            argv
        }
        RunnerFlavor::D8Wasm => {
            let mut argv = vec![runner, "--no-wasm-async-compilation".to_string()];
            argv.extend(shim);
            argv.push("--".to_string());
            argv.push(input);
            argv.extend(extras);
            argv
        }
        RunnerFlavor::D8Asm2Wasm => vec![runner, "--no-wasm-async-compilation".to_string(), input],
        RunnerFlavor::JscWasm => {
            let mut argv = vec![runner, "--useWebAssembly=1".to_string()];
            argv.extend(shim);
            argv.push("--".to_string());
            argv.push(input);
            argv.extend(extras);
            argv
        }
        RunnerFlavor::JscAsm2Wasm => vec![runner, "--useWebAssembly=1".to_string(), input],
        RunnerFlavor::WasmOpt => vec![runner, input],
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
