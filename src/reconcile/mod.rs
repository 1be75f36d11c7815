//! Bring the host's authselect configuration in line with a
//! [`DesiredConfiguration`].
//!
//! The flow is linear: read, decide, then skip, predict (check mode), or
//! commit and verify. At most three external processes run, one after the
//! other, and nothing is retried.
mod drift;
mod error;

pub use drift::{Drift, ProfileChange};
pub use error::ReconcileError;

use crate::config::DesiredConfiguration;
use crate::exec::{Executor, display_command};
use crate::logging::Log;
use crate::state::{LOCALE_ENV, ReadOutcome, StateReader};

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// State before any action.
    pub before: ReadOutcome,
    /// State after the action; equal to `before` when nothing ran.
    pub after: ReadOutcome,
    /// Whether an action ran (or, in check mode, would have run).
    pub changed: bool,
    /// What was requested.
    pub requested: DesiredConfiguration,
    /// What differed between `before` and `requested`.
    pub drift: Drift,
}

/// Build the argument list of the commit command.
///
/// Each feature is its own positional argument after the profile, which is
/// how `authselect select` enables features.
///
/// # Examples
///
/// ```
/// use authselect_state::config::DesiredConfiguration;
/// use authselect_state::reconcile::select_args;
///
/// let desired = DesiredConfiguration::with_features("sssd", ["with-sudo"]);
/// assert_eq!(select_args(&desired, true), ["select", "sssd", "with-sudo", "--force"]);
/// ```
#[must_use]
pub fn select_args(desired: &DesiredConfiguration, force: bool) -> Vec<&str> {
    let mut args = vec!["select", desired.profile.as_str()];
    if let Some(features) = &desired.features {
        args.extend(features.iter().map(String::as_str));
    }
    if force {
        args.push("--force");
    }
    args
}

/// Runs the read/decide/commit/verify flow against one authselect binary.
pub struct Reconciler<'a> {
    executor: &'a dyn Executor,
    program: &'a str,
    log: &'a dyn Log,
    force: bool,
}

impl std::fmt::Debug for Reconciler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("executor", &self.executor)
            .field("program", &self.program)
            .field("force", &self.force)
            .finish_non_exhaustive()
    }
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler that drives `program` through `executor`.
    #[must_use]
    pub const fn new(executor: &'a dyn Executor, program: &'a str, log: &'a dyn Log) -> Self {
        Self {
            executor,
            program,
            log,
            force: false,
        }
    }

    /// Append `--force` to the commit command.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// State reader sharing this reconciler's executor and program.
    #[must_use]
    pub const fn reader(&self) -> StateReader<'a> {
        StateReader::new(self.executor, self.program)
    }

    /// Reconcile the host against `desired`.
    ///
    /// With `dry_run` set, the commit command is never run and `after`
    /// equals `before`; `changed` reports whether a commit would happen.
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::QueryFailed`] if the initial read fails.
    /// - [`ReconcileError::CommitFailed`] if `authselect select` fails.
    /// - [`ReconcileError::VerificationFailed`] if the read after a
    ///   successful commit fails or does not show the requested state.
    pub fn reconcile(
        &self,
        desired: &DesiredConfiguration,
        dry_run: bool,
    ) -> Result<ReconciliationResult, ReconcileError> {
        self.log.stage("Reading current authselect state");
        let before = self.reader().read();
        if let ReadOutcome::QueryFailed {
            exit_code,
            stderr,
            message,
        } = before
        {
            return Err(ReconcileError::QueryFailed {
                exit_code,
                stderr,
                message,
            });
        }
        self.log.info(&format!("current: {before}"));

        let drift = Drift::between(before.record(), desired);
        if drift.is_empty() {
            self.log.info("already in the requested state");
            return Ok(ReconciliationResult {
                after: before.clone(),
                before,
                changed: false,
                requested: desired.clone(),
                drift,
            });
        }
        self.log.info(&format!("drift: {}", drift.summary()));

        let args = select_args(desired, self.force);
        if dry_run {
            self.log.dry_run(&format!(
                "would run: {}",
                display_command(self.program, &args)
            ));
            return Ok(ReconciliationResult {
                after: before.clone(),
                before,
                changed: true,
                requested: desired.clone(),
                drift,
            });
        }

        self.log.stage("Selecting authselect profile");
        self.commit(&args, &before)?;

        self.log.stage("Verifying authselect state");
        let after = self.verify(desired, &before)?;
        self.log.info(&format!("now: {after}"));

        Ok(ReconciliationResult {
            before,
            after,
            changed: true,
            requested: desired.clone(),
            drift,
        })
    }

    fn commit(&self, args: &[&str], before: &ReadOutcome) -> Result<(), ReconcileError> {
        self.log
            .debug(&format!("running {}", display_command(self.program, args)));
        let result = self
            .executor
            .run_unchecked_with_env(self.program, args, LOCALE_ENV)
            .map_err(|e| ReconcileError::CommitFailed {
                exit_code: None,
                stderr: format!("{e:#}"),
                before: before.clone(),
            })?;

        if result.success {
            Ok(())
        } else {
            Err(ReconcileError::CommitFailed {
                exit_code: result.code,
                stderr: result.stderr,
                before: before.clone(),
            })
        }
    }

    fn verify(
        &self,
        desired: &DesiredConfiguration,
        before: &ReadOutcome,
    ) -> Result<ReadOutcome, ReconcileError> {
        let after = self.reader().read();
        match &after {
            ReadOutcome::QueryFailed {
                exit_code,
                stderr,
                message,
            } => Err(ReconcileError::VerificationFailed {
                exit_code: *exit_code,
                stderr: stderr.clone(),
                message: message.clone(),
                before: before.clone(),
            }),
            ReadOutcome::Unconfigured | ReadOutcome::Configured(_)
                if !Drift::between(after.record(), desired).is_empty() =>
            {
                Err(ReconcileError::VerificationFailed {
                    exit_code: Some(crate::state::QUERY_EXIT_CODE),
                    stderr: String::new(),
                    message: format!("state after commit is {after}, not the requested one"),
                    before: before.clone(),
                })
            }
            ReadOutcome::Unconfigured | ReadOutcome::Configured(_) => Ok(after),
        }
    }
}
