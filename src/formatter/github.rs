use std::io::Write;

use crate::dispatch::DispatchReport;
use crate::formatter::Formatter;

/// GitHub Actions workflow commands, one `::error` per failing file.
pub struct GithubFormatter;

impl Formatter for GithubFormatter {
    fn format_to(&self, report: &DispatchReport, out: &mut dyn Write) {
        for o in report.failed() {
            let _ = writeln!(
                out,
                "::error file={}::{}",
                escape_property(&o.file.display().to_string()),
                escape_data(&o.status.to_string()),
            );
        }
    }
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Status;
    use crate::formatter::test_support::{mixed_report, outcome};

    fn render(report: &DispatchReport) -> String {
        let mut buf = Vec::new();
        GithubFormatter.format_to(report, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_produces_no_output() {
        assert_eq!(render(&DispatchReport::default()), "");
    }

    #[test]
    fn one_annotation_per_failure() {
        let out = render(&mixed_report());
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains("::error file=src/bad.cpp::failed (exit 1)\n"));
    }

    #[test]
    fn file_property_is_escaped() {
        let report = DispatchReport {
            outcomes: vec![outcome("C:\\a,b.c", Status::Failed { code: Some(1) })],
        };
        assert_eq!(render(&report), "::error file=C%3A\\a%2Cb.c::failed (exit 1)\n");
    }
}
