//! Terminal rendering of analysis diagnostics.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use tintc::{Diagnostic, Severity};

/// Renders every diagnostic as an annotated source excerpt.
pub fn render(filename: &str, source: &str, diagnostics: &[Diagnostic], colored: bool) -> String {
    let mut output = Vec::new();
    for diagnostic in diagnostics {
        write_report(filename, source, diagnostic, colored, &mut output);
    }
    String::from_utf8_lossy(&output).into_owned()
}

fn write_report(filename: &str, source: &str, diagnostic: &Diagnostic, colored: bool, output: &mut Vec<u8>) {
    // Reports are positioned in chars, spans are bytes.
    let start = char_offset(source, diagnostic.span.start);
    let end = char_offset(source, diagnostic.span.end).max(start);

    let (kind, color) = match diagnostic.severity {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Warning => (ReportKind::Warning, Color::Yellow),
    };

    let report: Report<'_, (&str, Range<usize>)> = Report::build(kind, filename, start)
        .with_config(Config::default().with_color(colored))
        .with_code(diagnostic.code)
        .with_message(&diagnostic.message)
        .with_label(
            Label::new((filename, start..end))
                .with_message(&diagnostic.message)
                .with_color(color),
        )
        .finish();

    // Writing into a Vec cannot fail.
    let _ = report.write((filename, Source::from(source.to_string())), &mut *output);
}

fn char_offset(source: &str, byte: usize) -> usize {
    source
        .get(..byte)
        .map(|prefix| prefix.chars().count())
        .unwrap_or_else(|| source.chars().count())
}
