//! Walks the AST post-parse, executing directive `Macro` nodes against the
//! shared compile options. Procedures and asides pass through untouched.

use crate::ast::Node;
use crate::options::CompileOptions;
use crate::span::Span;
use crate::value::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("unknown directive \"{name}\" at line {}", .span.line_number)]
    NonexistentDirective { name: String, span: Span },
    #[error("directive \"{name}\" expected {expected} argument(s), got {got}, at line {}", .span.line_number)]
    InvalidArgumentCount { name: String, expected: usize, got: usize, span: Span },
    #[error("directive \"{name}\" got an argument of the wrong type at line {}", .span.line_number)]
    InvalidArgumentType { name: String, span: Span },
    #[error("{message}")]
    CompileIfMismatch { message: String, span: Span },
}

impl PreprocessError {
    pub fn span(&self) -> Span {
        match self {
            PreprocessError::NonexistentDirective { span, .. }
            | PreprocessError::InvalidArgumentCount { span, .. }
            | PreprocessError::InvalidArgumentType { span, .. }
            | PreprocessError::CompileIfMismatch { span, .. } => *span,
        }
    }
}

fn identifier_text(value: &Value) -> Option<&str> {
    match value {
        Value::Identifier { text, .. } => Some(text),
        _ => None,
    }
}

/// Execute every top-level `Macro` directive against `options`. Returns an
/// error on the first unknown or malformed directive.
pub fn run(root: &Node, options: &mut CompileOptions) -> Result<(), PreprocessError> {
    let Node::Root { children } = root else {
        return Ok(());
    };
    for child in children {
        if let Node::Macro { name, parameters, span } = child {
            dispatch(name, parameters, *span, options)?;
        }
    }
    Ok(())
}

fn dispatch(
    name: &str,
    parameters: &[Value],
    span: Span,
    options: &mut CompileOptions,
) -> Result<(), PreprocessError> {
    match name {
        "compat" => directive_compat(parameters, span, options),
        "endian" => directive_endian(parameters, span, options),
        "compile-if" => directive_compile_if(parameters, span, options),
        other => Err(PreprocessError::NonexistentDirective { name: other.to_string(), span }),
    }
}

fn expect_one_identifier<'a>(
    name: &str,
    parameters: &'a [Value],
    span: Span,
) -> Result<&'a str, PreprocessError> {
    if parameters.len() != 1 {
        return Err(PreprocessError::InvalidArgumentCount {
            name: name.to_string(),
            expected: 1,
            got: parameters.len(),
            span,
        });
    }
    identifier_text(&parameters[0]).ok_or_else(|| PreprocessError::InvalidArgumentType {
        name: name.to_string(),
        span,
    })
}

fn directive_compat(
    parameters: &[Value],
    span: Span,
    options: &mut CompileOptions,
) -> Result<(), PreprocessError> {
    let format = expect_one_identifier("compat", parameters, span)?;
    // CLI --format supersedes the directive (spec.md §9 precedence note).
    if !options.format_set_by_cli {
        options.format = Some(format.to_string());
    }
    Ok(())
}

fn directive_endian(
    parameters: &[Value],
    span: Span,
    options: &mut CompileOptions,
) -> Result<(), PreprocessError> {
    let endian = expect_one_identifier("endian", parameters, span)?;
    options.endian = match endian.to_ascii_lowercase().as_str() {
        "little" => crate::options::Endian::Little,
        "big" => crate::options::Endian::Big,
        _ => return Err(PreprocessError::InvalidArgumentType { name: "endian".to_string(), span }),
    };
    Ok(())
}

fn directive_compile_if(
    parameters: &[Value],
    span: Span,
    options: &mut CompileOptions,
) -> Result<(), PreprocessError> {
    let expected = expect_one_identifier("compile-if", parameters, span)?;
    if let Some(actual) = &options.format {
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(PreprocessError::CompileIfMismatch {
                message: format!(
                    "compile-if requires target \"{}\", but the selected target is \"{}\"",
                    expected, actual
                ),
                span,
            });
        }
    }
    Ok(())
}
