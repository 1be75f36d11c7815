//! Typed failures of a reconciliation run.
use thiserror::Error;

use crate::state::ReadOutcome;

/// Why a reconciliation run did not complete.
///
/// Every variant is fatal and none is retried. Variants raised after the
/// initial read keep that `before` snapshot so the caller can still report it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// The initial state query failed; nothing was changed.
    #[error("failed to read current authselect state: {message}")]
    QueryFailed {
        /// Exit code of the query, if it ran.
        exit_code: Option<i32>,
        /// Raw standard error of the query.
        stderr: String,
        /// Diagnostic from the state reader.
        message: String,
    },

    /// The commit command exited non-zero or could not be started.
    #[error("authselect select failed (exit {code}): {}", .stderr.trim(), code = display_code(*.exit_code))]
    CommitFailed {
        /// Exit code of the commit, `None` if it never ran.
        exit_code: Option<i32>,
        /// Standard error of the commit, verbatim.
        stderr: String,
        /// State observed before the commit was attempted.
        before: ReadOutcome,
    },

    /// The commit reported success but the resulting state could not be confirmed.
    #[error("commit ran but the resulting state could not be verified: {message}")]
    VerificationFailed {
        /// Exit code of the verification query.
        exit_code: Option<i32>,
        /// Standard error of the verification query.
        stderr: String,
        /// What went wrong while verifying.
        message: String,
        /// State observed before the commit.
        before: ReadOutcome,
    },
}

impl ReconcileError {
    /// The snapshot taken before any mutation, when one exists.
    #[must_use]
    pub const fn before(&self) -> Option<&ReadOutcome> {
        match self {
            Self::QueryFailed { .. } => None,
            Self::CommitFailed { before, .. } | Self::VerificationFailed { before, .. } => {
                Some(before)
            }
        }
    }

    /// Exit code of the failing external command.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::QueryFailed { exit_code, .. }
            | Self::CommitFailed { exit_code, .. }
            | Self::VerificationFailed { exit_code, .. } => *exit_code,
        }
    }

    /// Standard error of the failing external command.
    #[must_use]
    pub fn stderr(&self) -> &str {
        match self {
            Self::QueryFailed { stderr, .. }
            | Self::CommitFailed { stderr, .. }
            | Self::VerificationFailed { stderr, .. } => stderr,
        }
    }
}

fn display_code(code: Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}
