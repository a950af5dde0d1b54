#![forbid(unsafe_code)]
//! wasm-exec: run WebAssembly test files against a runner and classify the results.
//!
//! Given a runner (an interpreter such as `wasm-shell`, a JS shell such as `d8` or `jsc`, or the `wasm.opt`
//! optimizer), a glob of input files and a list of expected failures, the harness builds the right command line
//! for each input, runs it, and reports every result against expectations.
//!
//! ## Layout
//!
//! - [`wasm_exec_core`] (re-exported as [`policy`]): the pure runner flavor table and argv synthesis.
//! - [`proc`]: process invocation with script resolution and command logging.
//! - [`cli`]: command line, orchestration, expected failures and the test driver.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod errors;
pub mod proc;
pub mod version;

pub use wasm_exec_core as policy;

pub use errors::{HarnessError, HarnessResult};
pub use wasm_exec_core::{InvocationSpec, RunnerConfig, RunnerFlavor, synthesize};
