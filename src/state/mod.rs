//! Discovery of the active authselect configuration.
//!
//! [`StateReader::read`] runs `authselect current --raw` under a fixed locale
//! and classifies the result into a [`ReadOutcome`]. The reader never retries:
//! a malformed answer or a permission error will not change on a second try.
pub mod parse;

use std::collections::BTreeSet;
use std::fmt;

use crate::exec::{Executor, display_command};

pub use parse::{QUERY_EXIT_CODE, UNCONFIGURED_MESSAGE, classify, parse_record};

/// Arguments of the read-only state query.
pub const QUERY_ARGS: &[&str] = &["current", "--raw"];

/// Environment that pins the tool's messages to untranslated text.
///
/// `LC_ALL` wins over `LANG`, so both are set.
pub const LOCALE_ENV: &[(&str, &str)] = &[("LC_ALL", "C"), ("LANG", "C")];

/// An active profile and the features layered on top of it.
///
/// A record always has a profile; "nothing selected" is
/// [`ReadOutcome::Unconfigured`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationRecord {
    /// Profile name (e.g. `sssd`, `custom/corp`).
    pub profile: String,
    /// Enabled features; empty when the profile runs without extras.
    pub features: BTreeSet<String>,
}

impl fmt::Display for ConfigurationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.profile)?;
        for feature in &self.features {
            write!(f, " {feature}")?;
        }
        Ok(())
    }
}

/// Result of one state query.
///
/// # Examples
///
/// ```
/// use authselect_state::state::{ReadOutcome, classify};
///
/// assert_eq!(
///     classify(Some(2), "No existing configuration detected.\n", ""),
///     ReadOutcome::Unconfigured
/// );
/// assert!(classify(Some(2), "sssd with-sudo\n", "").record().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// No profile is currently selected.
    Unconfigured,
    /// A profile (and its features) was parsed.
    Configured(ConfigurationRecord),
    /// The query failed or produced output that could not be interpreted.
    QueryFailed {
        /// Exit code of the query, `None` if it never ran or was signalled.
        exit_code: Option<i32>,
        /// Raw standard error of the query.
        stderr: String,
        /// Human-readable diagnostic.
        message: String,
    },
}

impl ReadOutcome {
    /// The parsed record, if a profile is configured.
    #[must_use]
    pub const fn record(&self) -> Option<&ConfigurationRecord> {
        match self {
            Self::Configured(record) => Some(record),
            Self::Unconfigured | Self::QueryFailed { .. } => None,
        }
    }

    /// Whether the query itself failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::QueryFailed { .. })
    }
}

impl fmt::Display for ReadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => write!(f, "(unconfigured)"),
            Self::Configured(record) => write!(f, "{record}"),
            Self::QueryFailed { message, .. } => write!(f, "(query failed: {message})"),
        }
    }
}

/// Reads the current configuration through an [`Executor`].
#[derive(Debug, Clone, Copy)]
pub struct StateReader<'a> {
    executor: &'a dyn Executor,
    program: &'a str,
}

impl<'a> StateReader<'a> {
    /// Create a reader that invokes `program` (normally `/usr/bin/authselect`).
    #[must_use]
    pub const fn new(executor: &'a dyn Executor, program: &'a str) -> Self {
        Self { executor, program }
    }

    /// Query and classify the current state.
    ///
    /// Never returns an error: spawn failures become
    /// [`ReadOutcome::QueryFailed`] with no exit code.
    #[must_use]
    pub fn read(&self) -> ReadOutcome {
        tracing::debug!("running {}", display_command(self.program, QUERY_ARGS));
        match self
            .executor
            .run_unchecked_with_env(self.program, QUERY_ARGS, LOCALE_ENV)
        {
            Ok(result) => {
                tracing::debug!(
                    "state query exit={:?} stdout={:?} stderr={:?}",
                    result.code,
                    result.stdout,
                    result.stderr
                );
                classify(result.code, &result.stdout, &result.stderr)
            }
            Err(e) => ReadOutcome::QueryFailed {
                exit_code: None,
                stderr: String::new(),
                message: format!("{e:#}"),
            },
        }
    }
}
