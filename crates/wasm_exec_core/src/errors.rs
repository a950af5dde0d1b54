//! Errors raised while deciding how to invoke a runner.

use thiserror::Error;

/// A runner or its inputs cannot be used as configured.
///
/// Always fatal: it is raised before any subprocess is launched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The runner's normalized base name has no entry in the flavor table.
    #[error("unrecognized runner `{name}` (from `{runner}`); expected one of: {known}")]
    UnknownRunner {
        runner: String,
        name: String,
        known: String,
    },

    /// The runner path has no final component to classify.
    #[error("runner path `{0}` has no file name")]
    MissingRunnerName(String),
}
