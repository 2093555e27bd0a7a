//! Fan-out of one tool invocation per file onto a bounded worker pool, and
//! fan-in of the per-file outcomes.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::RunConfig;

/// How often a worker polls a child that has a deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Failures that make the whole run unusable, as opposed to a single file
/// failing its check.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("failed to build worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("cannot launch processes (while checking {})", file.display())]
    Environment {
        file: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Passed,
    /// Non-zero exit. `code` is `None` when the tool was killed by a signal.
    Failed { code: Option<i32> },
    TimedOut { after: Duration },
    /// The tool could not be started for this file (missing binary,
    /// permissions, ...).
    LaunchFailed { reason: String },
}

impl Status {
    pub fn passed(&self) -> bool {
        matches!(self, Status::Passed)
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Status::Passed => Some(0),
            Status::Failed { code } => *code,
            Status::TimedOut { .. } | Status::LaunchFailed { .. } => None,
        }
    }

    /// Short machine-readable name.
    pub fn kind(&self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Failed { .. } => "failed",
            Status::TimedOut { .. } => "timed_out",
            Status::LaunchFailed { .. } => "launch_failed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Passed => write!(f, "passed"),
            Status::Failed { code: Some(code) } => write!(f, "failed (exit {code})"),
            Status::Failed { code: None } => write!(f, "failed (terminated by signal)"),
            Status::TimedOut { after } => write!(f, "timed out after {after:.0?}"),
            Status::LaunchFailed { reason } => write!(f, "could not start: {reason}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub file: PathBuf,
    pub status: Status,
    pub duration: Duration,
}

/// Per-file outcomes, in the same order as the input files.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl DispatchReport {
    /// True iff every invocation passed. Vacuously true for no files.
    pub fn all_passed(&self) -> bool {
        all_passed(self.outcomes.iter().map(|o| o.status.passed()))
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.status.passed())
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Logical AND over per-file outcomes.
pub fn all_passed<I: IntoIterator<Item = bool>>(outcomes: I) -> bool {
    outcomes.into_iter().fold(true, |acc, ok| acc && ok)
}

pub struct Dispatcher<'a> {
    config: &'a RunConfig,
}

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// Run the tool once per file as `<tool> <file> <trailing_args...>`.
    ///
    /// Every invocation runs to completion regardless of how its siblings
    /// fare. Only an environment failure (the host cannot spawn processes at
    /// all) turns into an `Err`, and only after all invocations are done.
    pub fn dispatch(
        &self,
        files: &[PathBuf],
        trailing_args: &[OsString],
    ) -> Result<DispatchReport, DispatchError> {
        if files.is_empty() {
            return Ok(DispatchReport::default());
        }

        let workers = self.config.jobs.clamp(1, files.len());
        debug!(
            files = files.len(),
            workers,
            tool = %self.config.tool.display(),
            "dispatching"
        );
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("paratidy-worker-{i}"))
            .build()?;

        let results: Vec<Result<FileOutcome, DispatchError>> = pool.install(|| {
            files
                .par_iter()
                .map(|file| self.check_file(file, trailing_args))
                .collect()
        });

        let outcomes = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(DispatchReport { outcomes })
    }

    fn check_file(
        &self,
        file: &Path,
        trailing_args: &[OsString],
    ) -> Result<FileOutcome, DispatchError> {
        let start = Instant::now();
        let mut command = Command::new(&self.config.tool);
        command
            .arg(file)
            .args(trailing_args)
            .stdin(Stdio::null())
            .stderr(Stdio::null());
        if self.config.discard_stdout {
            command.stdout(Stdio::null());
        }

        let status = match command.spawn() {
            Ok(child) => self.wait(child, file),
            Err(source) if is_environment_error(&source) => {
                return Err(DispatchError::Environment {
                    file: file.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                warn!(
                    file = %file.display(),
                    "could not start {}: {e}",
                    self.config.tool.display()
                );
                Status::LaunchFailed {
                    reason: e.to_string(),
                }
            }
        };

        let duration = start.elapsed();
        debug!(file = %file.display(), %status, ?duration, "finished");
        Ok(FileOutcome {
            file: file.to_path_buf(),
            status,
            duration,
        })
    }

    fn wait(&self, mut child: Child, file: &Path) -> Status {
        let exit = match self.config.timeout {
            None => child.wait().map(Some),
            Some(limit) => wait_with_deadline(&mut child, limit),
        };
        match exit {
            Ok(Some(exit)) if exit.success() => Status::Passed,
            Ok(Some(exit)) => Status::Failed { code: exit.code() },
            Ok(None) => {
                let after = self.config.timeout.unwrap_or_default();
                warn!(file = %file.display(), "timed out after {after:.0?}, killed");
                Status::TimedOut { after }
            }
            Err(e) => {
                warn!(file = %file.display(), "failed to wait for tool: {e}");
                Status::Failed { code: None }
            }
        }
    }
}

/// Wait for `child` up to `limit`. Returns `Ok(None)` if the deadline passed;
/// the child is killed and reaped in that case. A limit too large to
/// represent as an `Instant` means no deadline.
fn wait_with_deadline(
    child: &mut Child,
    limit: Duration,
) -> io::Result<Option<std::process::ExitStatus>> {
    let Some(deadline) = Instant::now().checked_add(limit) else {
        return child.wait().map(Some);
    };
    loop {
        match child.try_wait() {
            Ok(Some(exit)) => return Ok(Some(exit)),
            Ok(None) => {}
            Err(e) => {
                abandon(child);
                return Err(e);
            }
        }
        if Instant::now() >= deadline {
            abandon(child);
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Kill and reap `child`. Already-exited races are fine: kill fails, wait reaps.
fn abandon(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Spawn errors that mean the host is out of resources rather than that
/// this particular file's invocation is broken.
fn is_environment_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::OutOfMemory | io::ErrorKind::WouldBlock
    )
}
