//! Command: reconcile the host against the requested profile.
use anyhow::Result;

use crate::cli::{ApplyOpts, GlobalOpts};
use crate::config::ApplyParams;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Log;
use crate::platform::Platform;
use crate::reconcile::Reconciler;
use crate::report::ApplyReport;

use super::{CommandSetup, print_json};

/// Run the apply command against the real host and print the result record.
///
/// # Errors
///
/// Returns an error if the record cannot be written or the run failed
/// (after the failure record has been printed).
pub fn run(global: &GlobalOpts, opts: &ApplyOpts, log: &dyn Log) -> Result<()> {
    let report = execute(global, opts, &Platform::detect(), &SystemExecutor, log);
    print_json(&report)?;
    if report.failed {
        anyhow::bail!("{}", report.msg);
    }
    Ok(())
}

/// Resolve parameters, check the host, and reconcile.
///
/// Every failure is folded into the returned record: invalid parameters and
/// host checks yield a record without `rc`/`stderr`, reconciliation errors
/// carry the failing command's exit code and stderr.
#[must_use]
pub fn execute(
    global: &GlobalOpts,
    opts: &ApplyOpts,
    platform: &Platform,
    executor: &dyn Executor,
    log: &dyn Log,
) -> ApplyReport {
    let params = match ApplyParams::resolve(opts.config.as_deref(), opts.to_raw()) {
        Ok(params) => params,
        Err(e) => {
            let msg = format!("invalid parameters: {e}");
            log.error(&msg);
            return ApplyReport::rejected(
                opts.profile.clone(),
                opts.features.clone(),
                opts.check,
                msg,
            );
        }
    };
    let setup = match CommandSetup::init(global, platform, executor, log) {
        Ok(setup) => setup,
        Err(e) => {
            let msg = e.to_string();
            log.error(&msg);
            return ApplyReport::rejected(
                Some(params.desired.profile.clone()),
                params.desired.feature_list(),
                params.check_mode,
                msg,
            );
        }
    };

    log.info(&format!(
        "requested: {}{}",
        params.desired.profile,
        params
            .desired
            .feature_list()
            .map_or_else(|| " (features unmanaged)".to_string(), |f| {
                f.iter().map(|name| format!(" {name}")).collect()
            })
    ));
    if params.check_mode {
        log.info("check mode: nothing will be changed");
    }

    let reconciler = Reconciler::new(executor, setup.program, log).with_force(params.force);
    match reconciler.reconcile(&params.desired, params.check_mode) {
        Ok(result) => ApplyReport::success(&result, params.check_mode),
        Err(e) => {
            log.error(&e.to_string());
            ApplyReport::failure(&params.desired, params.check_mode, &e)
        }
    }
}
