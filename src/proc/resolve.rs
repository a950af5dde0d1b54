//! Resolve interpreted scripts that cannot be executed directly.
//!
//! A command whose first token ends in the script extension (`.py`) and is not itself executable is rewritten to
//! `[interpreter, <resolved path>, args...]`. The script is searched for in the working directory first, then in
//! every `PATH` entry; the first candidate that exists and is executable wins.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{HarnessError, HarnessResult};

/// Environment variable naming the interpreter used for non-executable scripts.
pub const INTERPRETER_ENV: &str = "WASM_EXEC_INTERPRETER";

const DEFAULT_INTERPRETER: &str = "python3";
const SCRIPT_EXTENSION: &str = ".py";

/// Whether `path` is an existing regular file the current user may execute.
pub fn can_execute(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    metadata.is_file() && has_execute_permission(path)
}

// Ownership and group membership decide which mode bits apply, so ask the kernel.
#[cfg(unix)]
fn has_execute_permission(path: &Path) -> bool {
    rustix::fs::access(path, rustix::fs::Access::EXEC_OK).is_ok()
}

#[cfg(not(unix))]
fn has_execute_permission(_path: &Path) -> bool {
    true
}

/// Rewrites non-executable script invocations into explicit interpreter calls.
#[derive(Debug, Clone)]
pub struct ScriptResolver {
    interpreter: String,
    search_path: OsString,
}

impl ScriptResolver {
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            search_path: OsString::new(),
        }
    }

    /// Interpreter from `WASM_EXEC_INTERPRETER` (default `python3`), search path from `PATH`.
    pub fn from_env() -> Self {
        let interpreter = env::var(INTERPRETER_ENV).unwrap_or_else(|_| DEFAULT_INTERPRETER.to_string());
        Self::new(interpreter).with_search_path(env::var_os("PATH").unwrap_or_default())
    }

    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = search_path.into();
        self
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    /// Rewrite `argv` when its first token is a script that cannot be executed as given.
    ///
    /// Commands that are not scripts, or scripts that are already executable, come back unchanged.
    pub fn fix_interpreted_script(&self, argv: &[String], cwd: &Path) -> HarnessResult<Vec<String>> {
        let Some((script, rest)) = argv.split_first() else {
            return Ok(Vec::new());
        };
        if !script.ends_with(SCRIPT_EXTENSION) || can_execute(Path::new(script)) {
            return Ok(argv.to_vec());
        }

        let resolved = self.which(script, cwd)?;
        tracing::debug!(script = %script, resolved = %resolved.display(), "resolved interpreted script");

        let mut fixed = Vec::with_capacity(argv.len() + 1);
        fixed.push(self.interpreter.clone());
        fixed.push(resolved.to_string_lossy().into_owned());
        fixed.extend(rest.iter().cloned());
        Ok(fixed)
    }

    /// Find `filename` in `cwd`, then in each search path entry.
    pub fn which(&self, filename: &str, cwd: &Path) -> HarnessResult<PathBuf> {
        let candidates = std::iter::once(cwd.to_path_buf()).chain(env::split_paths(&self.search_path));
        for dir in candidates {
            let candidate = dir.join(filename);
            if can_execute(&candidate) {
                return Ok(std::path::absolute(&candidate).unwrap_or(candidate));
            }
        }
        Err(HarnessError::NotFound {
            filename: filename.to_string(),
            cwd: cwd.to_path_buf(),
            search_path: self.search_path.to_string_lossy().into_owned(),
        })
    }
}
