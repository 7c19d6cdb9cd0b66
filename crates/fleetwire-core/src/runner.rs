// ── External process capability ──
//
// All external commands (ubus, opkg, uci, service scripts, passwd) run
// through the `Runner` trait so the workflow can be exercised without a
// live router. Spawn failures are errors; a spawned command that exits
// non-zero is NOT -- callers decide what a bad exit status means.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::CoreError;

/// Captured result of one external command.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// Exit code; `-1` when the process was killed by a signal.
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// stderr if non-empty, otherwise a generic exit-status description.
    pub fn failure_reason(&self) -> String {
        let err = self.stderr.trim();
        if err.is_empty() {
            format!("exit status {}", self.code)
        } else {
            err.to_owned()
        }
    }
}

/// Capability for running external processes.
pub trait Runner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecOutput, CoreError>;

    /// Run with the given bytes written to the child's stdin (passwd-style
    /// interactive prompts).
    fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> Result<ExecOutput, CoreError>;
}

/// Production runner: spawns real processes, captures output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    fn spawn_failure(program: &str, err: &std::io::Error) -> CoreError {
        CoreError::CommandFailed {
            program: program.to_owned(),
            reason: err.to_string(),
        }
    }

    fn capture(program: &str, output: std::process::Output) -> ExecOutput {
        let out = ExecOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(program, code = out.code, "command finished");
        out
    }
}

impl Runner for ShellRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecOutput, CoreError> {
        debug!(program, ?args, "running command");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| Self::spawn_failure(program, &e))?;
        Ok(Self::capture(program, output))
    }

    fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> Result<ExecOutput, CoreError> {
        debug!(program, ?args, "running command with piped stdin");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Self::spawn_failure(program, &e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .map_err(|e| Self::spawn_failure(program, &e))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Self::spawn_failure(program, &e))?;
        Ok(Self::capture(program, output))
    }
}
