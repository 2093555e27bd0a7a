pub mod github;
pub mod json;
pub mod quiet;
pub mod text;

use std::io::Write;

use crate::dispatch::DispatchReport;

/// Renders a finished run. Every line names the file it is about; reports
/// follow input order, never completion order.
pub trait Formatter {
    fn format_to(&self, report: &DispatchReport, out: &mut dyn Write);

    fn print(&self, report: &DispatchReport) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.format_to(report, &mut lock);
    }
}

pub fn create_formatter(format: &str) -> Box<dyn Formatter> {
    match format {
        "text" => Box::new(text::TextFormatter),
        "json" => Box::new(json::JsonFormatter),
        "github" => Box::new(github::GithubFormatter),
        // "quiet" and any unknown value
        _ => Box::new(quiet::QuietFormatter),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;
    use std::time::Duration;

    use crate::dispatch::{DispatchReport, FileOutcome, Status};

    pub fn outcome(file: &str, status: Status) -> FileOutcome {
        FileOutcome {
            file: PathBuf::from(file),
            status,
            duration: Duration::from_millis(12),
        }
    }

    /// One of each status, in a fixed order.
    pub fn mixed_report() -> DispatchReport {
        DispatchReport {
            outcomes: vec![
                outcome("src/ok.cpp", Status::Passed),
                outcome("src/bad.cpp", Status::Failed { code: Some(1) }),
                outcome(
                    "src/slow.cpp",
                    Status::TimedOut {
                        after: Duration::from_secs(30),
                    },
                ),
                outcome(
                    "src/gone.cpp",
                    Status::LaunchFailed {
                        reason: "No such file or directory (os error 2)".to_string(),
                    },
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::mixed_report;
    use super::*;

    const FORMATS: [&str; 4] = ["quiet", "text", "json", "github"];

    #[test]
    fn all_formatters_run_without_panic() {
        for name in FORMATS {
            let f = create_formatter(name);
            let mut buf = Vec::new();
            f.format_to(&DispatchReport::default(), &mut buf);
            f.format_to(&mixed_report(), &mut buf);
        }
    }

    #[test]
    fn unknown_format_falls_back_to_quiet() {
        let f = create_formatter("anything_else");
        let mut buf = Vec::new();
        f.format_to(&mixed_report(), &mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn passing_files_never_reported_as_failures() {
        for name in ["text", "github"] {
            let mut buf = Vec::new();
            create_formatter(name).format_to(&mixed_report(), &mut buf);
            let out = String::from_utf8(buf).unwrap();
            assert!(!out.contains("src/ok.cpp"), "{name} mentioned a passing file: {out}");
        }
    }
}
