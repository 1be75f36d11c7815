//! Command: print the active authselect configuration.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Log;
use crate::platform::Platform;
use crate::report::StateReport;
use crate::state::StateReader;

use super::{CommandSetup, print_json};

/// Run the current command and print the state record.
///
/// # Errors
///
/// Returns an error if the record cannot be written, the host cannot run
/// authselect, or the query failed (after the record has been printed).
pub fn run(global: &GlobalOpts, log: &dyn Log) -> Result<()> {
    let report = execute(global, &Platform::detect(), &SystemExecutor, log);
    print_json(&report)?;
    if let Some(msg) = report.msg.as_deref().filter(|_| report.failed) {
        anyhow::bail!("{msg}");
    }
    Ok(())
}

/// Query the host once and build the state record.
///
/// A host that cannot run authselect yields a failed record without `rc`.
#[must_use]
pub fn execute(
    global: &GlobalOpts,
    platform: &Platform,
    executor: &dyn Executor,
    log: &dyn Log,
) -> StateReport {
    let setup = match CommandSetup::init(global, platform, executor, log) {
        Ok(setup) => setup,
        Err(e) => {
            log.error(&e.to_string());
            return StateReport::rejected(e.to_string());
        }
    };

    log.stage("Reading current authselect state");
    let outcome = StateReader::new(executor, setup.program).read();
    if outcome.is_failure() {
        log.error(&outcome.to_string());
    } else {
        log.info(&format!("current: {outcome}"));
    }
    StateReport::from(&outcome)
}
