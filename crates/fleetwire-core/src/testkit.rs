// ── Test doubles shared across module tests ──

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::CoreError;
use crate::runner::{ExecOutput, Runner};

pub(crate) fn success(stdout: &str) -> ExecOutput {
    ExecOutput {
        code: 0,
        stdout: stdout.to_owned(),
        stderr: String::new(),
    }
}

pub(crate) fn failure(code: i32, stderr: &str) -> ExecOutput {
    ExecOutput {
        code,
        stdout: String::new(),
        stderr: stderr.to_owned(),
    }
}

/// `Runner` double with canned responses keyed by the full command line.
///
/// Unmatched commands succeed with empty output, so tests only script the
/// commands whose output the code under test actually inspects. Responses
/// for the same command line are consumed in order; the last one sticks.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    responses: Mutex<HashMap<String, Vec<ExecOutput>>>,
    prefix_responses: Mutex<Vec<(String, ExecOutput)>>,
    calls: Mutex<Vec<String>>,
    stdin: Mutex<HashMap<String, String>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, cmdline: &str, output: ExecOutput) {
        self.responses
            .lock()
            .unwrap()
            .entry(cmdline.to_owned())
            .or_default()
            .push(output);
    }

    /// Respond to any command line starting with `prefix` (for commands
    /// whose arguments contain unpredictable paths).
    pub(crate) fn respond_prefix(&self, prefix: &str, output: ExecOutput) {
        self.prefix_responses
            .lock()
            .unwrap()
            .push((prefix.to_owned(), output));
    }

    /// Every command line run, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn ran(&self, cmdline: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c == cmdline)
    }

    /// stdin captured for a command, if it ran with piped input.
    pub(crate) fn stdin_of(&self, cmdline: &str) -> Option<String> {
        self.stdin.lock().unwrap().get(cmdline).cloned()
    }

    fn dispatch(&self, program: &str, args: &[&str]) -> ExecOutput {
        let cmdline = cmdline(program, args);
        self.calls.lock().unwrap().push(cmdline.clone());

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(&cmdline) {
            Some(queue) if queue.len() > 1 => queue.remove(0),
            Some(queue) => queue[0].clone(),
            None => self
                .prefix_responses
                .lock()
                .unwrap()
                .iter()
                .find(|(prefix, _)| cmdline.starts_with(prefix))
                .map_or_else(|| success(""), |(_, out)| out.clone()),
        }
    }
}

fn cmdline(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_owned()
    } else {
        format!("{program} {}", args.join(" "))
    }
}

impl Runner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecOutput, CoreError> {
        Ok(self.dispatch(program, args))
    }

    fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> Result<ExecOutput, CoreError> {
        self.stdin
            .lock()
            .unwrap()
            .insert(cmdline(program, args), input.to_owned());
        Ok(self.dispatch(program, args))
    }
}
