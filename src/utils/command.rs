//! Command execution primitives with consistent error handling.

use std::path::Path;
use std::process::{Command, Output};

use serde::Serialize;

use crate::error::{Error, Result};

/// Captured output from command execution.
/// Reusable primitive for any command that executes external processes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CapturedOutput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl CapturedOutput {
    pub fn new(stdout: String, stderr: String) -> Self {
        Self { stdout, stderr }
    }

    /// Error text for reporting. Prefers stderr, falls back to stdout.
    pub fn error_text(&self) -> &str {
        if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        }
    }
}

/// Outcome of an external command, whether or not it succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutcome {
    pub success: bool,
    pub exit_code: i32,
    #[serde(flatten)]
    pub output: CapturedOutput,
}

fn outcome_from(output: Output) -> CommandOutcome {
    CommandOutcome {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        output: CapturedOutput::new(
            String::from_utf8_lossy(&output.stdout).trim_end().to_string(),
            String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        ),
    }
}

fn spawn_error(program: &str, context: &str, error: std::io::Error) -> Error {
    if error.kind() == std::io::ErrorKind::NotFound {
        Error::tool_missing(
            program,
            format!("not found while running {}", context),
            Some(vec![format!(
                "Install {} or point the \"python\" setting in pyship.json at an existing interpreter",
                program
            )]),
        )
    } else {
        Error::internal_io(
            format!("Failed to run {}: {}", context, error),
            Some(context.to_string()),
        )
    }
}

/// Run a command in a directory, capturing output regardless of exit status.
///
/// A missing program maps to `tool.missing`; other spawn failures are
/// internal IO errors.
pub fn capture_in(dir: &Path, program: &str, args: &[&str], context: &str) -> Result<CommandOutcome> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| spawn_error(program, context, e))?;

    Ok(outcome_from(output))
}

/// Run a shell command string in a directory via `sh -c`.
///
/// Only used for user-configured command overrides, which may rely on
/// shell features (pipes, &&, environment variables).
pub fn capture_shell_in(dir: &Path, command: &str, context: &str) -> Result<CommandOutcome> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(dir)
        .output()
        .map_err(|e| {
            Error::internal_io(
                format!("Failed to run {}: {}", context, e),
                Some(context.to_string()),
            )
        })?;

    Ok(outcome_from(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn tmp() -> PathBuf {
        std::env::temp_dir()
    }

    #[test]
    fn capture_in_runs_and_captures_stdout() {
        let outcome = capture_in(&tmp(), "echo", &["hello"], "echo test").unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.output.stdout, "hello");
    }

    #[test]
    fn capture_in_reports_exit_code() {
        let outcome = capture_in(&tmp(), "false", &[], "false test").unwrap();
        assert!(!outcome.success);
        assert_ne!(outcome.exit_code, 0);
    }

    #[test]
    fn missing_program_maps_to_tool_missing() {
        let err = capture_in(&tmp(), "nonexistent_command_xyz", &[], "test").unwrap_err();
        assert_eq!(err.code.as_str(), "tool.missing");
        assert!(!err.hints.is_empty());
    }

    #[test]
    fn capture_shell_in_supports_pipes() {
        let outcome = capture_shell_in(&tmp(), "echo one && echo two", "shell test").unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.output.stdout, "one\ntwo");
    }

    #[test]
    fn error_text_prefers_stderr() {
        let output = CapturedOutput::new("stdout content".into(), "stderr content".into());
        assert_eq!(output.error_text(), "stderr content");
    }

    #[test]
    fn error_text_falls_back_to_stdout() {
        let output = CapturedOutput::new("stdout content".into(), String::new());
        assert_eq!(output.error_text(), "stdout content");
    }
}
