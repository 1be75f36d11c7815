//! JSON result records printed on stdout.
//!
//! Success and failure share one shape so callers can always read the
//! `before` snapshot and the request back, even when a run failed.
use serde::Serialize;

use crate::config::DesiredConfiguration;
use crate::reconcile::{Drift, ReconcileError, ReconciliationResult};
use crate::state::ReadOutcome;

/// Result record of `apply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Whether a commit ran (or would run, in check mode).
    pub changed: bool,
    /// Whether the run failed.
    pub failed: bool,
    /// Whether the run was in check mode.
    pub check_mode: bool,
    /// Human-readable outcome.
    pub msg: String,
    /// Profile before the run; `null` when unconfigured or unknown.
    pub original_profile: Option<String>,
    /// Features before the run; `null` when unconfigured or unknown.
    pub original_features: Option<Vec<String>>,
    /// Requested profile; `null` when none was given.
    pub requested_profile: Option<String>,
    /// Requested features; `null` when features are not managed.
    pub requested_features: Option<Vec<String>>,
    /// Profile after the run; `null` when unset or unverifiable.
    pub profile_configured: Option<String>,
    /// Features after the run; `null` when unset or unverifiable.
    pub features_configured: Option<Vec<String>>,
    /// What changed (or would change).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<Drift>,
    /// Exit code of the failing external command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc: Option<i32>,
    /// Standard error of the failing external command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

fn snapshot(outcome: Option<&ReadOutcome>) -> (Option<String>, Option<Vec<String>>) {
    outcome
        .and_then(ReadOutcome::record)
        .map_or((None, None), |record| {
            (
                Some(record.profile.clone()),
                Some(record.features.iter().cloned().collect()),
            )
        })
}

impl ApplyReport {
    /// Record for a completed run.
    #[must_use]
    pub fn success(result: &ReconciliationResult, check_mode: bool) -> Self {
        let (original_profile, original_features) = snapshot(Some(&result.before));
        let (profile_configured, features_configured) = snapshot(Some(&result.after));
        let msg = match (result.changed, check_mode) {
            (false, _) => "already in the requested state".to_string(),
            (true, true) => format!("would change: {}", result.drift.summary()),
            (true, false) => format!("changed: {}", result.drift.summary()),
        };
        Self {
            changed: result.changed,
            failed: false,
            check_mode,
            msg,
            original_profile,
            original_features,
            requested_profile: Some(result.requested.profile.clone()),
            requested_features: result.requested.feature_list(),
            profile_configured,
            features_configured,
            diff: result.changed.then(|| result.drift.clone()),
            rc: None,
            stderr: None,
        }
    }

    /// Record for a failed run.
    ///
    /// `changed` stays `false` even for [`ReconcileError::VerificationFailed`]:
    /// there is no trusted post-commit snapshot, and `msg` says the commit ran.
    #[must_use]
    pub fn failure(requested: &DesiredConfiguration, check_mode: bool, error: &ReconcileError) -> Self {
        let (original_profile, original_features) = snapshot(error.before());
        Self {
            changed: false,
            failed: true,
            check_mode,
            msg: error.to_string(),
            original_profile,
            original_features,
            requested_profile: Some(requested.profile.clone()),
            requested_features: requested.feature_list(),
            profile_configured: None,
            features_configured: None,
            diff: None,
            rc: error.exit_code(),
            stderr: Some(error.stderr().to_string()),
        }
    }

    /// Record for a run stopped before authselect was queried: invalid
    /// parameters or a host that cannot run authselect.
    ///
    /// No external command ran, so there is no snapshot, `rc` or `stderr`.
    #[must_use]
    pub fn rejected(
        requested_profile: Option<String>,
        requested_features: Option<Vec<String>>,
        check_mode: bool,
        msg: String,
    ) -> Self {
        Self {
            changed: false,
            failed: true,
            check_mode,
            msg,
            original_profile: None,
            original_features: None,
            requested_profile,
            requested_features,
            profile_configured: None,
            features_configured: None,
            diff: None,
            rc: None,
            stderr: None,
        }
    }
}

/// Result record of `current`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateReport {
    /// Whether a profile is selected.
    pub configured: bool,
    /// Whether the query failed.
    pub failed: bool,
    /// Selected profile, if any.
    pub profile: Option<String>,
    /// Enabled features, if a profile is selected.
    pub features: Option<Vec<String>>,
    /// Diagnostic for failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Exit code of a failed query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc: Option<i32>,
    /// Standard error of a failed query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl StateReport {
    /// Record for a host that cannot run authselect.
    #[must_use]
    pub const fn rejected(msg: String) -> Self {
        Self {
            configured: false,
            failed: true,
            profile: None,
            features: None,
            msg: Some(msg),
            rc: None,
            stderr: None,
        }
    }
}

impl From<&ReadOutcome> for StateReport {
    fn from(outcome: &ReadOutcome) -> Self {
        let (profile, features) = snapshot(Some(outcome));
        match outcome {
            ReadOutcome::QueryFailed {
                exit_code,
                stderr,
                message,
            } => Self {
                configured: false,
                failed: true,
                profile,
                features,
                msg: Some(message.clone()),
                rc: *exit_code,
                stderr: Some(stderr.clone()),
            },
            ReadOutcome::Unconfigured | ReadOutcome::Configured(_) => Self {
                configured: profile.is_some(),
                failed: false,
                profile,
                features,
                msg: None,
                rc: None,
                stderr: None,
            },
        }
    }
}
