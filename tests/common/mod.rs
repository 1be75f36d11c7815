// Shared helpers for integration tests.
//
// Provides an in-memory stand-in for the authselect binary that keeps the
// selected profile between calls, so tests can drive whole apply/current
// runs and observe what a second run sees.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Mutex;

use authselect_state::cli::{ApplyOpts, DEFAULT_AUTHSELECT, GlobalOpts};
use authselect_state::exec::{ExecResult, Executor};
use authselect_state::logging::Log;
use authselect_state::platform::{Os, Platform};

const UNCONFIGURED: &str = "No existing configuration detected.\n";

#[derive(Debug, Default)]
struct HostState {
    selected: Option<(String, BTreeSet<String>)>,
    commits: usize,
    queries: usize,
}

/// Stateful fake of `authselect current --raw` and `authselect select`.
#[derive(Debug, Default)]
pub struct FakeAuthselect {
    state: Mutex<HostState>,
    /// When set, `select` fails with exit 1 and this stderr.
    pub select_error: Option<String>,
    /// When set, `current` fails with exit 1 and this stderr.
    pub query_error: Option<String>,
    /// When set, the binary is reported missing from the host.
    pub missing: bool,
}

impl FakeAuthselect {
    /// A host with no profile selected.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// A host with `profile` and `features` already selected.
    pub fn configured(profile: &str, features: &[&str]) -> Self {
        let fake = Self::default();
        fake.state.lock().expect("state lock").selected = Some((
            profile.to_string(),
            features.iter().map(|f| (*f).to_string()).collect(),
        ));
        fake
    }

    /// Make every `select` fail.
    pub fn failing_select(mut self, stderr: &str) -> Self {
        self.select_error = Some(stderr.to_string());
        self
    }

    /// Make every `current` fail.
    pub fn failing_query(mut self, stderr: &str) -> Self {
        self.query_error = Some(stderr.to_string());
        self
    }

    /// Report the binary as absent.
    pub fn without_binary(mut self) -> Self {
        self.missing = true;
        self
    }

    /// Number of successful `select` invocations.
    pub fn commits(&self) -> usize {
        self.state.lock().expect("state lock").commits
    }

    /// Number of `current` invocations.
    pub fn queries(&self) -> usize {
        self.state.lock().expect("state lock").queries
    }

    /// Current selection as `(profile, features)`.
    pub fn selected(&self) -> Option<(String, Vec<String>)> {
        self.state
            .lock()
            .expect("state lock")
            .selected
            .as_ref()
            .map(|(p, f)| (p.clone(), f.iter().cloned().collect()))
    }

    fn reply(code: i32, stdout: &str, stderr: &str) -> ExecResult {
        ExecResult {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            success: code == 0,
            code: Some(code),
        }
    }
}

impl Executor for FakeAuthselect {
    fn run_unchecked_with_env(
        &self,
        _program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> anyhow::Result<ExecResult> {
        assert!(
            env.contains(&("LC_ALL", "C")),
            "authselect must run under the C locale"
        );
        let mut state = self.state.lock().expect("state lock");
        match args {
            ["current", "--raw"] => {
                state.queries += 1;
                if let Some(stderr) = &self.query_error {
                    return Ok(Self::reply(1, "", stderr));
                }
                let stdout = state.selected.as_ref().map_or_else(
                    || UNCONFIGURED.to_string(),
                    |(profile, features)| {
                        let mut line = profile.clone();
                        for feature in features {
                            line.push(' ');
                            line.push_str(feature);
                        }
                        line.push('\n');
                        line
                    },
                );
                Ok(Self::reply(2, &stdout, ""))
            }
            ["select", profile, rest @ ..] => {
                if let Some(stderr) = &self.select_error {
                    return Ok(Self::reply(1, "", stderr));
                }
                let features = rest
                    .iter()
                    .filter(|a| !a.starts_with("--"))
                    .map(|a| (*a).to_string())
                    .collect();
                state.selected = Some(((*profile).to_string(), features));
                state.commits += 1;
                Ok(Self::reply(0, "Profile has been selected.\n", ""))
            }
            _ => anyhow::bail!("unexpected authselect arguments: {args:?}"),
        }
    }

    fn which(&self, _program: &str) -> bool {
        !self.missing
    }
}

/// [`Log`] that discards everything.
#[derive(Debug, Default)]
pub struct NullLog;

impl Log for NullLog {
    fn stage(&self, _: &str) {}
    fn info(&self, _: &str) {}
    fn debug(&self, _: &str) {}
    fn warn(&self, _: &str) {}
    fn error(&self, _: &str) {}
    fn dry_run(&self, _: &str) {}
}

pub fn global() -> GlobalOpts {
    GlobalOpts {
        authselect: DEFAULT_AUTHSELECT.to_string(),
    }
}

pub fn fedora() -> Platform {
    Platform::new(Os::Linux, Some("fedora"), &[])
}

/// Apply options for `profile`, with features managed when `features` is set.
pub fn apply_opts(profile: &str, features: Option<&[&str]>) -> ApplyOpts {
    ApplyOpts {
        profile: Some(profile.to_string()),
        features: features.map(|f| f.iter().map(|s| (*s).to_string()).collect()),
        ..ApplyOpts::default()
    }
}
