//! Declarative authselect state management.
//!
//! Reads the host's active authselect profile and features, compares them
//! with a requested configuration, and commits the difference only when the
//! two disagree. A check mode predicts the outcome without touching the host.
//!
//! The public API is organised into layers:
//!
//! - **[`state`]**: run and interpret the read-only state query
//! - **[`config`]**: parse and validate the requested configuration
//! - **[`reconcile`]**: read, decide, commit, and verify
//! - **[`report`]**: JSON result records
//! - **[`commands`]**: top-level subcommand orchestration (`apply`, `current`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod reconcile;
pub mod report;
pub mod state;

/// Shared test doubles for unit tests.
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_helpers {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::exec::{ExecResult, Executor};
    use crate::logging::Log;

    /// One invocation seen by [`ScriptedExecutor`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        pub program: String,
        pub args: Vec<String>,
        pub env: Vec<(String, String)>,
    }

    /// Executor that replays queued responses in order and records every call.
    ///
    /// Running out of responses is an error, so a test fails loudly when the
    /// code under test issues more commands than expected.
    #[derive(Debug)]
    pub struct ScriptedExecutor {
        responses: Mutex<VecDeque<Result<ExecResult, String>>>,
        calls: Mutex<Vec<RecordedCall>>,
        which_result: bool,
    }

    impl Default for ScriptedExecutor {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ScriptedExecutor {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
                which_result: true,
            }
        }

        /// Queue a completed process with exit `code`.
        pub fn respond(self, code: i32, stdout: &str, stderr: &str) -> Self {
            self.responses.lock().unwrap().push_back(Ok(ExecResult {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
                success: code == 0,
                code: Some(code),
            }));
            self
        }

        /// Queue a process that could not be spawned.
        pub fn spawn_error(self, msg: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(msg.to_string()));
            self
        }

        /// Value returned by `which()` regardless of program name.
        pub const fn with_which(mut self, found: bool) -> Self {
            self.which_result = found;
            self
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Number of calls whose arguments contain `arg`.
        pub fn calls_with_arg(&self, arg: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.args.iter().any(|a| a == arg))
                .count()
        }
    }

    impl Executor for ScriptedExecutor {
        fn run_unchecked_with_env(
            &self,
            program: &str,
            args: &[&str],
            env: &[(&str, &str)],
        ) -> anyhow::Result<ExecResult> {
            self.calls.lock().unwrap().push(RecordedCall {
                program: program.to_string(),
                args: args.iter().map(|a| (*a).to_string()).collect(),
                env: env
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            });
            match self.responses.lock().unwrap().pop_front() {
                Some(Ok(result)) => Ok(result),
                Some(Err(msg)) => Err(anyhow::anyhow!("{msg}")),
                None => anyhow::bail!("unexpected call: {program} {}", args.join(" ")),
            }
        }

        fn which(&self, _: &str) -> bool {
            self.which_result
        }
    }

    /// [`Log`] implementation that keeps every message in memory.
    #[derive(Debug, Default)]
    pub struct RecordingLog {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingLog {
        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }

        /// Whether any message contains `needle`.
        pub fn contains(&self, needle: &str) -> bool {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .any(|m| m.contains(needle))
        }

        fn push(&self, level: &str, msg: &str) {
            self.messages
                .lock()
                .unwrap()
                .push(format!("{level}: {msg}"));
        }
    }

    impl Log for RecordingLog {
        fn stage(&self, msg: &str) {
            self.push("stage", msg);
        }
        fn info(&self, msg: &str) {
            self.push("info", msg);
        }
        fn debug(&self, msg: &str) {
            self.push("debug", msg);
        }
        fn warn(&self, msg: &str) {
            self.push("warn", msg);
        }
        fn error(&self, msg: &str) {
            self.push("error", msg);
        }
        fn dry_run(&self, msg: &str) {
            self.push("dry_run", msg);
        }
    }
}
