pub mod args;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod formatter;
pub mod logging;

use std::ffi::OsString;

use anyhow::{Context, Result};
use tracing::debug;

use cli::Args;
use config::load_config;
use dispatch::Dispatcher;
use formatter::create_formatter;

/// Process exit status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every invocation passed, or there were no files.
    Success,
    /// At least one invocation failed.
    Failure,
    /// The run could not be carried out (bad config, no process resources).
    Fatal,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::Fatal => 2,
        }
    }
}

impl From<bool> for ExitStatus {
    fn from(all_passed: bool) -> Self {
        if all_passed {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }
}

/// Check every file in `args` and report. `trailing_args` is forwarded to each
/// tool invocation after the file path.
///
/// Returns `Err` only for failures that should map to [`ExitStatus::Fatal`].
pub fn run(args: &Args, trailing_args: &[OsString]) -> Result<ExitStatus> {
    let config = load_config(args)?;
    debug!(?config, trailing = ?trailing_args, "resolved configuration");

    let report = Dispatcher::new(&config)
        .dispatch(&args.files, trailing_args)
        .context("run aborted")?;

    create_formatter(&args.format).print(&report);

    let status = ExitStatus::from(report.all_passed());
    debug!(
        files = report.len(),
        failed = report.failed().count(),
        ?status,
        "done"
    );
    Ok(status)
}
