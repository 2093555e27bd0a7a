use std::io::Write;

use crate::dispatch::DispatchReport;
use crate::formatter::Formatter;

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_to(&self, report: &DispatchReport, out: &mut dyn Write) {
        let mut failed = 0;
        for o in report.failed() {
            failed += 1;
            let _ = writeln!(out, "{}: {}", o.file.display(), o.status);
        }
        let file_count = report.len();
        let file_word = if file_count == 1 { "file" } else { "files" };
        if failed > 0 {
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "{file_count} {file_word} checked, {failed} failed");
    }
}
