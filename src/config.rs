//! Run configuration: CLI flags over an optional YAML file over defaults.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Args;

pub const DEFAULT_TOOL: &str = "clang-tidy";

/// Contents of a `--config` file. Every key is optional.
///
/// ```yaml
/// tool: clang-tidy-18
/// jobs: 8
/// timeout: 120
/// discard_stdout: true
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub tool: Option<PathBuf>,
    pub jobs: Option<usize>,
    /// Seconds.
    pub timeout: Option<u64>,
    pub discard_stdout: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub tool: PathBuf,
    /// Worker pool size, always at least 1.
    pub jobs: usize,
    pub timeout: Option<Duration>,
    pub discard_stdout: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tool: PathBuf::from(DEFAULT_TOOL),
            jobs: default_jobs(),
            timeout: None,
            discard_stdout: false,
        }
    }
}

impl RunConfig {
    /// Merge CLI flags with a loaded config file. A jobs or timeout value of
    /// zero means "use the default". Stdout is discarded by default for
    /// structured report formats so the report stays parseable.
    pub fn resolve(args: &Args, file: FileConfig) -> Self {
        let defaults = Self::default();
        let tool = args.tool.clone().or(file.tool).unwrap_or(defaults.tool);
        let jobs = args
            .jobs
            .or(file.jobs)
            .filter(|&n| n > 0)
            .unwrap_or(defaults.jobs);
        let timeout = args
            .timeout
            .or(file.timeout)
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs);
        Self {
            tool,
            jobs,
            timeout,
            discard_stdout: args
                .discard_stdout_flag()
                .or(file.discard_stdout)
                .unwrap_or_else(|| args.format_is_structured()),
        }
    }
}

/// Number of logical CPUs, falling back to 1 when the host cannot say.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

pub fn load_config(args: &Args) -> Result<RunConfig> {
    let file = match args.config.as_deref() {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };
    Ok(RunConfig::resolve(args, file))
}
