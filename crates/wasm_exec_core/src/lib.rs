//! Provide the pure runner policy for the `wasm-exec` harness.
//!
//! Given a runner executable (an interpreter, a JS shell or an optimizer binary) and one test input,
//! this crate decides the exact argument vector needed to run that input. It does not spawn anything.
//!
//! ## Notes
//!
//! - This is a "policy core" crate: **no IO**, no global state, no process handling.
//! - The flavor table lives in [`flavor`]; argv construction lives in [`invocation`].
//! - Process execution and logging live in the `wasm-exec` crate (`wasm_exec::proc`).
//!
//! ## Examples
//! ```rust
//! use wasm_exec_core::{RunnerConfig, synthesize};
//!
//! let config = RunnerConfig::new("/opt/bin/wasm-shell");
//! let spec = synthesize(&config, "foo.wast", None).unwrap();
//! assert_eq!(spec.argv, ["/opt/bin/wasm-shell", "--entry=main", "foo.wast"]);
//! ```

pub mod errors;
pub mod flavor;
pub mod invocation;

pub use errors::ConfigurationError;
pub use flavor::{RunnerFlavor, normalize_runner_name};
pub use invocation::{InvocationSpec, RunnerConfig, create_outname, synthesize};
