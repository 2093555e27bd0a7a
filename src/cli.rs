use std::path::PathBuf;

use clap::Parser;

/// Options are only recognised before the first file. From the first file up
/// to `--` every token is a file, even one starting with `-`. Everything from
/// `--` on goes to the tool.
#[derive(Parser, Debug)]
#[command(
    name = "paratidy",
    version,
    about = "Run a per-file linter over many files in parallel",
    override_usage = "paratidy [OPTIONS] [FILE]... [-- <TOOL_ARGS>...]",
    after_help = "Options must come before the first FILE. Arguments after `--` (including the `--` itself) are passed to every tool invocation."
)]
pub struct Args {
    /// Source files to analyze
    #[arg(value_name = "FILE", allow_hyphen_values = true)]
    pub files: Vec<PathBuf>,

    /// Analysis tool to run once per file [default: clang-tidy]
    #[arg(long, value_name = "PROGRAM")]
    pub tool: Option<PathBuf>,

    /// Number of concurrent invocations (0 = number of logical CPUs)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Kill an invocation and count it as failed after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Per-file report format
    #[arg(short, long, default_value = "quiet", value_parser = ["quiet", "text", "json", "github"])]
    pub format: String,

    /// Discard the tool's standard output as well as its standard error
    /// [default: on for json and github, off otherwise]
    #[arg(long, overrides_with = "no_discard_stdout")]
    pub discard_stdout: bool,

    /// Pass the tool's standard output through
    #[arg(long, overrides_with = "discard_stdout")]
    pub no_discard_stdout: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// `Some` only when one of `--discard-stdout` / `--no-discard-stdout` was
    /// given; the last one wins.
    pub fn discard_stdout_flag(&self) -> Option<bool> {
        if self.discard_stdout {
            Some(true)
        } else if self.no_discard_stdout {
            Some(false)
        } else {
            None
        }
    }

    /// Formats whose stdout must not be mixed with the tool's output.
    pub fn format_is_structured(&self) -> bool {
        matches!(self.format.as_str(), "json" | "github")
    }
}
