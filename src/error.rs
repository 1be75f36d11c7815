//! Domain-specific error types for parameter handling and host checks.
//!
//! Library modules return these typed errors; command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] with `?`. Reconciliation
//! failures live in [`crate::reconcile::ReconcileError`].
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError    parameter file loading, profile and feature validation
//! PlatformError  unsupported host, missing authselect binary
//! ReconcileError query, commit, and verification failures
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading and validating the requested configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No profile was given on the command line or in the parameter file.
    #[error("a profile is required (use --profile or set `profile` in the parameter file)")]
    MissingProfile,

    /// The profile name is empty or contains characters authselect output
    /// cannot round-trip.
    #[error("invalid profile '{name}': {reason}")]
    InvalidProfile {
        /// Name as given by the caller.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A feature name is empty or malformed.
    #[error("invalid feature '{name}': {reason}")]
    InvalidFeature {
        /// Name as given by the caller.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The parameter file could not be read.
    #[error("IO error reading parameter file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The parameter file is not valid TOML or has unknown keys.
    #[error("invalid parameter file {}: {source}", .path.display())]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Underlying deserialisation error.
        source: toml::de::Error,
    },
}

/// Errors that arise from the host environment.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// authselect only exists on Linux.
    #[error("authselect is not supported on {platform}")]
    Unsupported {
        /// Name of the detected platform.
        platform: String,
    },

    /// The authselect binary could not be found.
    #[error("required tool '{0}' not found")]
    MissingTool(String),
}
