//! Error rendering using ariadne
//!
//! Errors that point into the payoff text are rendered as a report with the
//! offending span underlined. Parameter errors have no source location and
//! render as a single line.

use crate::{Diagnostic, Error, Severity};
use ariadne::{Label, Report, ReportKind, Source};
use std::io::Write;

const SOURCE_ID: &str = "<payoff>";

/// Render an error to stderr
///
/// # Example
/// ```no_run
/// use payoff::{price, render_error};
///
/// if let Err(e) = price(100.0, 100.0, 0.03, 0.2, 1.0, "maximum(S_T - K, 0", 1_000) {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    if let Error::Parameter(e) = error {
        return writeln!(writer, "{}: {}", error.kind(), e);
    }
    match (error.source_text(), error.to_diagnostic()) {
        (Some(source), Some(diagnostic)) => {
            render_diagnostic(error, source, &diagnostic, writer, use_color)
        }
        _ => writeln!(writer, "{}: {}", error.kind(), error),
    }
}

fn render_diagnostic(
    error: &Error,
    source: &str,
    diag: &Diagnostic,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
    };

    // Widen a zero-width span to one character unless it sits at the end.
    let span = if diag.span.0.is_empty() && diag.span.0.start < source.len() {
        diag.span.0.start..diag.span.0.start + 1
    } else {
        diag.span.0.clone()
    };

    let mut report = Report::build(kind, (SOURCE_ID, span.clone()))
        .with_message(format!("{}: {}", error.kind(), diag.message))
        .with_config(ariadne::Config::default().with_color(use_color));

    if let Some(code) = &diag.code {
        report = report.with_code(code);
    }

    report = report.with_label(
        Label::new((SOURCE_ID, span))
            .with_message(&diag.message)
            .with_color(ariadne::Color::Red),
    );

    if let Some(help) = &diag.help {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((SOURCE_ID, Source::from(source)), &mut *writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price;

    fn render(payoff: &str) -> String {
        let err = price(100.0, 100.0, 0.03, 0.2, 1.0, payoff, 100).unwrap_err();
        render_error_to_string_no_color(&err)
    }

    #[test]
    fn test_render_syntax_error() {
        let output = render("maximum(S_T - K, 0");
        assert!(output.contains("SyntaxError"));
        assert!(output.contains("maximum(S_T - K, 0"));
    }

    #[test]
    fn test_render_validation_error_with_code() {
        let output = render("S_T[0]");
        assert!(output.contains("ValidationError"));
        assert!(output.contains("V001"));
        assert!(output.lines().count() > 1);
    }

    #[test]
    fn test_render_parameter_error_is_one_line() {
        let err = price(100.0, 100.0, 0.03, -0.2, 1.0, "S_T", 100).unwrap_err();
        let output = render_error_to_string_no_color(&err);
        assert_eq!(output.lines().count(), 1);
        assert!(output.starts_with("ParameterError: "));
    }
}
