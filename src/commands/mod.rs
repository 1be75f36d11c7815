//! Subcommand entry points and the host checks they share.
pub mod apply;
pub mod current;
pub mod version;

use std::io::Write as _;

use anyhow::{Context as _, Result};
use serde::Serialize;

use crate::cli::GlobalOpts;
use crate::error::PlatformError;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;

/// Host checks shared by every command that talks to authselect.
#[derive(Debug)]
pub struct CommandSetup<'a> {
    /// Path of the authselect binary to drive.
    pub program: &'a str,
}

impl<'a> CommandSetup<'a> {
    /// Check that the host can run authselect at all.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] on non-Linux hosts and
    /// [`PlatformError::MissingTool`] if the authselect binary cannot be found.
    pub fn init(
        global: &'a GlobalOpts,
        platform: &Platform,
        executor: &dyn Executor,
        log: &dyn Log,
    ) -> Result<Self, PlatformError> {
        log.debug(&format!("platform: {}", platform.describe()));
        if !platform.is_linux() {
            return Err(PlatformError::Unsupported {
                platform: platform.describe(),
            });
        }
        if !platform.is_rhel_family() {
            log.warn(&format!(
                "{} is not a Fedora/RHEL family distribution; authselect may behave differently",
                platform.describe()
            ));
        }

        let program = global.authselect.as_str();
        if !executor.which(program) {
            return Err(PlatformError::MissingTool(program.to_string()));
        }
        log.debug(&format!("using {program}"));

        Ok(Self { program })
    }
}

/// Write `record` to stdout as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialisation or the write fails.
pub fn print_json<T: Serialize>(record: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(record).context("failed to serialise result")?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{json}").context("failed to write result")?;
    Ok(())
}
