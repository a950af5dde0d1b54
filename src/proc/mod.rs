//! Process invocation with command logging.
//!
//! [`ProcessRunner`] is the capability the harness needs from the OS: run a command and wait for it, or run it
//! and capture its standard output. Both fail with [`HarnessError::ProcessExecution`] on a non-zero exit.
//!
//! [`LoggingRunner`] decorates any runner:
//! - interpreted scripts that are not executable are rewritten to an explicit interpreter call (see [`resolve`]);
//! - the final command is written to the log sink and flushed before the child starts;
//! - the log sink is flushed again once the call returns, on success and on failure alike.
//!
//! [`SystemRunner`] is the real implementation on top of `std::process`.

pub mod resolve;
pub mod system;

use std::io::Write;
use std::path::Path;

use crate::errors::HarnessResult;

pub use resolve::{ScriptResolver, can_execute};
pub use system::SystemRunner;

/// Run external commands.
pub trait ProcessRunner {
    /// Run `argv` in `cwd` and wait for it to exit.
    fn run_and_wait(&mut self, argv: &[String], cwd: &Path) -> HarnessResult<()>;

    /// Run `argv` in `cwd` and return its standard output.
    fn run_and_capture(&mut self, argv: &[String], cwd: &Path) -> HarnessResult<String>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &mut R {
    fn run_and_wait(&mut self, argv: &[String], cwd: &Path) -> HarnessResult<()> {
        (**self).run_and_wait(argv, cwd)
    }

    fn run_and_capture(&mut self, argv: &[String], cwd: &Path) -> HarnessResult<String> {
        (**self).run_and_capture(argv, cwd)
    }
}

/// Render a command as one line; tokens containing a space are double-quoted.
pub fn render_command(argv: &[String]) -> String {
    argv.iter()
        .map(|token| {
            if token.contains(' ') {
                format!("\"{token}\"")
            } else {
                token.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Flushes the log sink when dropped, whichever way the guarded call exits.
struct FlushOnDrop<'a, W: Write>(&'a mut W);

impl<W: Write> Drop for FlushOnDrop<'_, W> {
    fn drop(&mut self) {
        let _ = self.0.flush();
    }
}

/// A [`ProcessRunner`] decorator that resolves interpreted scripts and logs every command to `log`.
pub struct LoggingRunner<R, W> {
    inner: R,
    log: W,
    resolver: ScriptResolver,
}

impl<R: ProcessRunner, W: Write> LoggingRunner<R, W> {
    /// Wrap `inner`, resolving scripts against the process environment.
    pub fn new(inner: R, log: W) -> Self {
        Self::with_resolver(inner, log, ScriptResolver::from_env())
    }

    pub fn with_resolver(inner: R, log: W, resolver: ScriptResolver) -> Self {
        Self { inner, log, resolver }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn log(&self) -> &W {
        &self.log
    }

    pub fn into_parts(self) -> (R, W) {
        (self.inner, self.log)
    }

    /// Resolve, log, then run `call` with the flush guard held.
    fn invoke<T>(
        &mut self,
        operation: &str,
        argv: &[String],
        cwd: &Path,
        call: impl FnOnce(&mut R, &[String], &Path) -> HarnessResult<T>,
    ) -> HarnessResult<T> {
        let argv = self.resolver.fix_interpreted_script(argv, cwd)?;
        let rendered = render_command(&argv);
        tracing::debug!(operation, command = %rendered, cwd = %cwd.display(), "invoking");

        let Self { inner, log, .. } = self;
        writeln!(log, "{operation}(`{rendered}`, cwd=`{}`)", cwd.display())?;
        log.flush()?;

        let _flush = FlushOnDrop(log);
        call(inner, &argv, cwd)
    }
}

impl<R: ProcessRunner, W: Write> ProcessRunner for LoggingRunner<R, W> {
    fn run_and_wait(&mut self, argv: &[String], cwd: &Path) -> HarnessResult<()> {
        self.invoke("run-and-wait", argv, cwd, |inner, argv, cwd| inner.run_and_wait(argv, cwd))
    }

    fn run_and_capture(&mut self, argv: &[String], cwd: &Path) -> HarnessResult<String> {
        self.invoke("run-and-capture", argv, cwd, |inner, argv, cwd| inner.run_and_capture(argv, cwd))
    }
}
