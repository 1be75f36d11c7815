//! Command-line interface definition.
//!
//! `apply` flags form the top parameter layer: a flag that is not given
//! leaves the parameter file's value in place, and each `--no-*` switch
//! turns a file-enabled mode back off.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::RawParams;

/// Default location of the authselect binary on Fedora and RHEL.
pub const DEFAULT_AUTHSELECT: &str = "/usr/bin/authselect";

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "authselect-state",
    about = "Declarative authselect profile and feature management",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Path to the authselect binary
    #[arg(long, value_name = "PATH", global = true, default_value = DEFAULT_AUTHSELECT)]
    pub authselect: String,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconcile the host against the requested profile
    Apply(ApplyOpts),
    /// Print the current configuration as JSON
    Current,
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file of this run.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Apply(_) => "apply",
            Self::Current => "current",
            Self::Completions { .. } => "completions",
            Self::Version => "version",
        }
    }
}

/// Options for the `apply` subcommand.
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug, Clone, Default)]
pub struct ApplyOpts {
    /// Profile to select (e.g. sssd, winbind, custom/corp)
    #[arg(long)]
    pub profile: Option<String>,

    /// Exact feature set to enable; omit to leave features unmanaged,
    /// pass with no value to disable all features
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    pub features: Option<Vec<String>>,

    /// Report what would change without committing
    #[arg(
        short = 'c',
        long = "check",
        visible_alias = "dry-run",
        short_alias = 'd',
        overrides_with = "no_check"
    )]
    pub check: bool,

    /// Commit even if the parameter file enables check mode
    #[arg(long = "no-check", overrides_with = "check")]
    pub no_check: bool,

    /// Pass --force to `authselect select`
    #[arg(long, overrides_with = "no_force")]
    pub force: bool,

    /// Do not pass --force, even if the parameter file sets it
    #[arg(long = "no-force", overrides_with = "force")]
    pub no_force: bool,

    /// TOML parameter file; command-line values (including --no-check and
    /// --no-force) take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ApplyOpts {
    /// Command-line values as a parameter layer.
    ///
    /// Unset flags stay `None` so they do not mask the parameter file.
    #[must_use]
    pub fn to_raw(&self) -> RawParams {
        RawParams {
            profile: self.profile.clone(),
            features: self.features.clone(),
            check_mode: switch(self.check, self.no_check),
            force: switch(self.force, self.no_force),
        }
    }
}

/// Collapse an `--x`/`--no-x` pair into a parameter layer value.
const fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}
