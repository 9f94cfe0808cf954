//! Source-level style analyzer. Independent of lexer/parser state: it
//! scans raw source text line by line.

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Regular,
    GoodPractice,
    NonCompliant,
    UndefinedBehavior,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub location: Span,
}

/// Run every style rule over `source`, suppressing all of them on lines (or
/// partial lines) that start inside a `;`-led comment.
pub fn run(source: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if !source.is_empty() && !source.ends_with('\n') {
        diagnostics.push(Diagnostic {
            kind: DiagnosticKind::GoodPractice,
            message: "file does not end in a newline".to_string(),
            location: last_line_span(source),
        });
    }

    for (line_index, raw_line) in source.lines().enumerate() {
        let line_number = line_index + 1;
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        let code = match line.find(';') {
            Some(idx) => &line[..idx],
            None => line,
        };

        check_commas(code, line_number, &mut diagnostics);
        check_jmp_target(code, line_number, &mut diagnostics);
    }

    diagnostics
}

fn check_commas(code: &str, line_number: usize, out: &mut Vec<Diagnostic>) {
    let bytes = code.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b',' {
            continue;
        }
        let rest = code[i + 1..].trim_end();
        if rest.is_empty() {
            out.push(Diagnostic {
                kind: DiagnosticKind::GoodPractice,
                message: "trailing comma before end of line".to_string(),
                location: Span::new(i, i + 1, i + 1, line_number),
            });
            continue;
        }
        if bytes.get(i + 1) == Some(&b' ') || i + 1 >= bytes.len() {
            continue;
        }
        out.push(Diagnostic {
            kind: DiagnosticKind::NonCompliant,
            message: "comma is not followed by a space".to_string(),
            location: Span::new(i, i + 1, i + 1, line_number),
        });
    }
}

fn check_jmp_target(code: &str, line_number: usize, out: &mut Vec<Diagnostic>) {
    let words: Vec<&str> = code.split(|c: char| c == ',' || c.is_whitespace()).filter(|w| !w.is_empty()).collect();
    let Some(pos) = words.iter().position(|w| w.eq_ignore_ascii_case("jmp")) else {
        return;
    };
    let Some(target) = words.get(pos + 1) else {
        return;
    };
    let letters = target.chars().filter(|c| c.is_alphanumeric()).count();
    if letters > 1 {
        out.push(Diagnostic {
            kind: DiagnosticKind::GoodPractice,
            message: format!(
                "procedure \"{}\" has multiple letters; non-folding linkers encode only the first",
                target
            ),
            location: Span::new(0, code.len(), 1, line_number),
        });
    }
}

fn last_line_span(source: &str) -> Span {
    let line_number = source.lines().count().max(1);
    let len = source.lines().last().map(str::len).unwrap_or(0);
    Span::new(0, len, len, line_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_trailing_comma() {
        let diags = run("a: one 1,\n");
        assert!(diags.iter().any(|d| d.kind == DiagnosticKind::GoodPractice && d.message.contains("trailing")));
    }

    #[test]
    fn flags_missing_space_after_comma() {
        let diags = run("a: one 1,2\n");
        assert!(diags.iter().any(|d| d.kind == DiagnosticKind::NonCompliant));
    }

    #[test]
    fn flags_multi_letter_jmp_target() {
        let diags = run("a: jmp loop\n");
        assert!(diags.iter().any(|d| d.message.contains("multiple letters")));
    }

    #[test]
    fn single_letter_jmp_target_is_fine() {
        let diags = run("a: jmp l\n");
        assert!(!diags.iter().any(|d| d.message.contains("multiple letters")));
    }

    #[test]
    fn flags_missing_trailing_newline() {
        let diags = run("a: one 1");
        assert!(diags.iter().any(|d| d.message.contains("does not end")));
    }

    #[test]
    fn comment_suppresses_rules_for_rest_of_line() {
        let diags = run("a: one 1, 2 ;; 1,2 no space either\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn idempotent_on_repeated_runs() {
        let source = "a: one 1,2\njmp loop\n";
        let first: Vec<_> = run(source).into_iter().map(|d| d.message).collect();
        let second: Vec<_> = run(source).into_iter().map(|d| d.message).collect();
        assert_eq!(first, second);
    }
}
