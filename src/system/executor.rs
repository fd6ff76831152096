// src/system/executor.rs

use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command '{program}' could not be executed: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// The captured result of a finished external process.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    /// The process exit code, or `None` if it was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// The seam between the registry and the operating system.
///
/// Every external invocation goes through this trait as a plain argument
/// vector; no shell ever re-parses a command line. Tests substitute a
/// scripted implementation so that lifecycle semantics can be exercised
/// without a Python interpreter on the machine.
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args`, blocking until it exits, and captures its
    /// stdout/stderr. A non-zero exit status is *not* an `Err`: callers
    /// interpret the captured status themselves.
    fn run(
        &self,
        program: &Path,
        args: &[String],
        cwd: Option<&Path>,
    ) -> Result<CapturedOutput, ExecutionError>;
}

/// The real `CommandRunner`, backed by `std::process::Command`.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &Path,
        args: &[String],
        cwd: Option<&Path>,
    ) -> Result<CapturedOutput, ExecutionError> {
        let mut command = StdCommand::new(program);
        command.args(args).stdin(Stdio::null());
        if let Some(dir) = cwd {
            command.current_dir(dunce::simplified(dir));
        }

        log::debug!("Executing: {} {}", program.display(), args.join(" "));

        let output = command.output().map_err(|e| ExecutionError::Spawn {
            program: program.display().to_string(),
            source: e,
        })?;

        // External tools occasionally emit non-UTF-8 bytes; a lossy
        // conversion is preferable to failing the whole operation.
        Ok(CapturedOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn spawn_failure_is_reported_not_panicked() {
        let runner = SystemRunner;
        let result = runner.run(
            Path::new("definitely-not-a-real-binary-on-any-machine"),
            &["--version".to_string()],
            None,
        );
        assert!(matches!(result, Err(ExecutionError::Spawn { .. })));
    }
}
