//! External command helpers
//!
//! Commands run synchronously with stdout and stderr captured.

use std::path::Path;
use std::process::Command;
use thiserror::Error;
use which::which;

/// Errors from running an external command
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("`{0}` was not found on PATH")]
    NotFound(String),

    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}", describe_exit(.code))]
    Failed {
        command: String,
        code: Option<i32>,
        output: String,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "a signal".to_string(),
    }
}

impl ProcessError {
    /// Combined stdout/stderr of a failed command
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Failed { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Output of a successful command
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Check whether an executable is on PATH
pub fn is_installed(program: &str) -> bool {
    which(program).is_ok()
}

/// Run `program args...` in `cwd`, capturing output
pub fn run(program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput, ProcessError> {
    let resolved = which(program).map_err(|_| ProcessError::NotFound(program.to_string()))?;
    let command = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");

    tracing::debug!(command = %command, cwd = %cwd.display(), "running command");

    let output = Command::new(resolved)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|source| ProcessError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        return Err(ProcessError::Failed {
            command,
            code: output.status.code(),
            output: format!("{stdout}{stderr}"),
        });
    }

    Ok(CommandOutput { stdout, stderr })
}
