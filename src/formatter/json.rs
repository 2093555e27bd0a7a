use std::io::Write;

use serde::Serialize;

use crate::dispatch::DispatchReport;
use crate::formatter::Formatter;

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput {
    metadata: Metadata,
    files: Vec<FileEntry>,
}

#[derive(Serialize)]
struct Metadata {
    files_checked: usize,
    failed_count: usize,
    passed: bool,
}

#[derive(Serialize)]
struct FileEntry {
    path: String,
    status: &'static str,
    exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    duration_ms: u64,
}

impl Formatter for JsonFormatter {
    fn format_to(&self, report: &DispatchReport, out: &mut dyn Write) {
        let output = JsonOutput {
            metadata: Metadata {
                files_checked: report.len(),
                failed_count: report.failed().count(),
                passed: report.all_passed(),
            },
            files: report
                .outcomes
                .iter()
                .map(|o| FileEntry {
                    path: o.file.display().to_string(),
                    status: o.status.kind(),
                    exit_code: o.status.exit_code(),
                    reason: (!o.status.passed()).then(|| o.status.to_string()),
                    duration_ms: u64::try_from(o.duration.as_millis()).unwrap_or(u64::MAX),
                })
                .collect(),
        };
        if let Ok(json) = serde_json::to_string_pretty(&output) {
            let _ = writeln!(out, "{json}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::test_support::mixed_report;

    fn render(report: &DispatchReport) -> serde_json::Value {
        let mut buf = Vec::new();
        JsonFormatter.format_to(report, &mut buf);
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn empty_produces_valid_json() {
        let parsed = render(&DispatchReport::default());
        assert_eq!(parsed["metadata"]["files_checked"], 0);
        assert_eq!(parsed["metadata"]["failed_count"], 0);
        assert_eq!(parsed["metadata"]["passed"], true);
        assert_eq!(parsed["files"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn file_entries_in_input_order() {
        let parsed = render(&mixed_report());
        assert_eq!(parsed["metadata"]["files_checked"], 4);
        assert_eq!(parsed["metadata"]["failed_count"], 3);
        assert_eq!(parsed["metadata"]["passed"], false);

        let files = parsed["files"].as_array().unwrap();
        let paths: Vec<_> = files.iter().map(|f| f["path"].as_str().unwrap()).collect();
        assert_eq!(
            paths,
            ["src/ok.cpp", "src/bad.cpp", "src/slow.cpp", "src/gone.cpp"]
        );
    }

    #[test]
    fn status_fields() {
        let parsed = render(&mixed_report());
        let files = &parsed["files"];

        assert_eq!(files[0]["status"], "passed");
        assert_eq!(files[0]["exit_code"], 0);
        assert!(files[0].get("reason").is_none());
        assert_eq!(files[0]["duration_ms"], 12);

        assert_eq!(files[1]["status"], "failed");
        assert_eq!(files[1]["exit_code"], 1);

        assert_eq!(files[2]["status"], "timed_out");
        assert!(files[2]["exit_code"].is_null());
        assert_eq!(files[2]["reason"], "timed out after 30s");

        assert_eq!(files[3]["status"], "launch_failed");
        assert!(files[3]["reason"].as_str().unwrap().starts_with("could not start"));
    }
}
