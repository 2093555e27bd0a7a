use std::io::Write;

use crate::dispatch::DispatchReport;
use crate::formatter::Formatter;

/// Prints nothing; the exit status is the whole result.
pub struct QuietFormatter;

impl Formatter for QuietFormatter {
    fn format_to(&self, _report: &DispatchReport, _out: &mut dyn Write) {}
}
