//! Classify a runner executable into the flavor that decides its command line.
//!
//! A flavor is never stored: it is derived per invocation from the runner's base name and whether a
//! WebAssembly JS shim was supplied.
//!
//! ## Notes
//! - `d8` and `jsc` split into a `-wasm` flavor (shim present) and an `-asm2wasm` flavor (no shim).
//! - Every other runner is keyed by its normalized base name unchanged.
//! - Lookup via [`RunnerFlavor::from_key`] is exact and case-sensitive.
//!
//! ## Examples
//! ```rust
//! use wasm_exec_core::flavor::RunnerFlavor;
//!
//! assert_eq!(RunnerFlavor::classify("d8", true), Some(RunnerFlavor::D8Wasm));
//! assert_eq!(RunnerFlavor::classify("d8", false), Some(RunnerFlavor::D8Asm2Wasm));
//! assert_eq!(RunnerFlavor::classify("unknownrunner", false), None);
//! ```

use std::fmt;
use std::path::Path;

/// Platform executable suffixes removed from runner names before classification.
const PLATFORM_SUFFIXES: &[&str] = &[".exe", ".bat"];

/// Stable identifier for every supported runner flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunnerFlavor {
    /// The reference interpreter shell; the only flavor that honors an output file.
    WasmShell,
    /// V8's `d8` with a JS shim, running WebAssembly natively.
    D8Wasm,
    /// V8's `d8` running asm2wasm output directly.
    D8Asm2Wasm,
    /// JavaScriptCore's `jsc` with a JS shim.
    JscWasm,
    /// JavaScriptCore's `jsc` running asm2wasm output directly.
    JscAsm2Wasm,
    /// The binaryen optimizer driver.
    WasmOpt,
}

impl RunnerFlavor {
    /// All flavors, in table order.
    pub const ALL: [RunnerFlavor; 6] = [
        RunnerFlavor::WasmShell,
        RunnerFlavor::D8Wasm,
        RunnerFlavor::D8Asm2Wasm,
        RunnerFlavor::JscWasm,
        RunnerFlavor::JscAsm2Wasm,
        RunnerFlavor::WasmOpt,
    ];

    /// Canonical table key for this flavor.
    pub fn key(self) -> &'static str {
        match self {
            RunnerFlavor::WasmShell => "wasm-shell",
            RunnerFlavor::D8Wasm => "d8-wasm",
            RunnerFlavor::D8Asm2Wasm => "d8-asm2wasm",
            RunnerFlavor::JscWasm => "jsc-wasm",
            RunnerFlavor::JscAsm2Wasm => "jsc-asm2wasm",
            RunnerFlavor::WasmOpt => "wasm.opt",
        }
    }

    /// Look up a flavor by its canonical key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flavor| flavor.key() == key)
    }

    /// Derive the flavor for a normalized runner name.
    ///
    /// ## Parameters
    /// - `name`: the runner's base name with platform suffixes removed (see [`normalize_runner_name`]).
    /// - `has_js_shim`: whether a WebAssembly JS shim path was supplied.
    ///
    /// ## Returns
    /// - (`Option<RunnerFlavor>`): `None` when the name is not in the table.
    pub fn classify(name: &str, has_js_shim: bool) -> Option<Self> {
        match (name, has_js_shim) {
            ("d8", true) => Some(RunnerFlavor::D8Wasm),
            ("d8", false) => Some(RunnerFlavor::D8Asm2Wasm),
            ("jsc", true) => Some(RunnerFlavor::JscWasm),
            ("jsc", false) => Some(RunnerFlavor::JscAsm2Wasm),
            (other, _) => Self::from_key(other).filter(|flavor| !flavor.is_js_shell()),
        }
    }

    /// Whether this flavor is one of the JS shells split by shim presence.
    pub fn is_js_shell(self) -> bool {
        matches!(
            self,
            RunnerFlavor::D8Wasm | RunnerFlavor::D8Asm2Wasm | RunnerFlavor::JscWasm | RunnerFlavor::JscAsm2Wasm
        )
    }

    /// Whether this flavor accepts a `-o <file>` output redirection.
    pub fn supports_output_file(self) -> bool {
        self == RunnerFlavor::WasmShell
    }

    /// Comma-separated list of accepted runner names, for diagnostics.
    pub fn known_runner_names() -> String {
        let mut names: Vec<&str> = Vec::new();
        for flavor in Self::ALL {
            let name = match flavor {
                RunnerFlavor::D8Wasm | RunnerFlavor::D8Asm2Wasm => "d8",
                RunnerFlavor::JscWasm | RunnerFlavor::JscAsm2Wasm => "jsc",
                other => other.key(),
            };
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names.join(", ")
    }
}

impl fmt::Display for RunnerFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Normalize a runner path to the name used for flavor classification.
///
/// Takes the final path component and removes every occurrence of `.exe` and `.bat`, not just a trailing
/// one. Other suffixes are kept, since `wasm.opt` carries a dot in its canonical name.
///
/// ## Returns
/// - (`Option<String>`): `None` when the path has no final component (e.g. `/` or `..`).
///
/// ## Examples
/// ```rust
/// use wasm_exec_core::normalize_runner_name;
///
/// assert_eq!(normalize_runner_name("C:/v8/d8.exe".as_ref()).as_deref(), Some("d8"));
/// assert_eq!(normalize_runner_name("bin/wasm.opt".as_ref()).as_deref(), Some("wasm.opt"));
/// ```
pub fn normalize_runner_name(runner: &Path) -> Option<String> {
    let mut name = runner.file_name()?.to_string_lossy().into_owned();
    for suffix in PLATFORM_SUFFIXES {
        name = name.replace(suffix, "");
    }
    Some(name)
}
