//! Span-aware console reporting, generalizing the plain message printer
//! into one that shows the offending source line and a caret underline.

use crate::error::CompileError;
use crate::span::Span;
use crate::stylist::{Diagnostic, DiagnosticKind};
use colored::Colorize;

pub struct Reporter<'a> {
    path: &'a str,
    source: &'a str,
}

impl<'a> Reporter<'a> {
    pub fn new(path: &'a str, source: &'a str) -> Reporter<'a> {
        Reporter { path, source }
    }

    fn line(&self, line_number: usize) -> Option<&'a str> {
        self.source.lines().nth(line_number.saturating_sub(1))
    }

    fn excerpt(&self, span: Span) -> String {
        match self.line(span.line_number) {
            Some(line) => {
                let caret_col = span.char_begin.max(1) - 1;
                let underline = " ".repeat(caret_col) + "^";
                format!("\n  {}\n  {}", line, underline.magenta())
            }
            None => String::new(),
        }
    }

    /// Render a fatal compile error: red "error:" title, a `file:line:col:`
    /// prefix (spec.md §7), the message, and a source excerpt when the
    /// error carries a real span.
    pub fn error(&self, err: &CompileError) {
        let title = "error:".red().bold();
        let span = err.span();
        eprintln!(
            "{}:{}:{}: {} {}{}",
            self.path,
            span.line_number,
            span.char_begin,
            title,
            err,
            self.excerpt(span)
        );
    }

    /// Render one style diagnostic. `good_practice`/`regular` print as
    /// yellow warnings; `non_compliant`/`undefined_behavior` print as red
    /// errors, matching their severity in spec.md §4.3.
    pub fn stylist(&self, diag: &Diagnostic) {
        let title = match diag.kind {
            DiagnosticKind::Regular | DiagnosticKind::GoodPractice => "warning:".yellow().bold(),
            DiagnosticKind::NonCompliant | DiagnosticKind::UndefinedBehavior => "error:".red().bold(),
        };
        eprintln!(
            "{}:{}:{}: {} {}{}",
            self.path,
            diag.location.line_number,
            diag.location.char_begin,
            title,
            diag.message,
            self.excerpt(diag.location)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_points_at_the_right_column() {
        let reporter = Reporter::new("a.lrasm", "a: mov R1,2\n");
        let span = Span::new(9, 10, 10, 1);
        let excerpt = reporter.excerpt(span);
        assert!(excerpt.contains("a: mov R1,2"));
    }

    #[test]
    fn path_is_threaded_into_the_reporter() {
        let reporter = Reporter::new("a.lrasm", "a: mov R1,2\n");
        assert_eq!(reporter.path, "a.lrasm");
    }
}
