//! Top-level error type composing every pipeline stage's error enum
//! (spec.md §7).

use crate::lexer::LexError;
use crate::linker::LinkError;
use crate::parser::ParseError;
use crate::preprocess::PreprocessError;
use crate::span::Span;
use crate::vendor::CodegenError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("could not read \"{path}\": {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("unknown target format \"{name}\"")]
    UnknownFormat { name: String },

    #[error("style check failed with errors and --strict-stylist is set")]
    StylistAborted,

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Link(#[from] LinkError),
}

impl CompileError {
    /// A best-effort span for reporter placement; stage-less variants
    /// (`Io`, `UnknownFormat`, `StylistAborted`, and `Link`'s `MissingStart`,
    /// which has no source span) fall back to `Span::zero()`.
    pub fn span(&self) -> Span {
        match self {
            CompileError::Lex(e) => e.span(),
            CompileError::Parse(e) => e.span(),
            CompileError::Preprocess(e) => e.span(),
            CompileError::Codegen(e) => e.span(),
            _ => Span::zero(),
        }
    }
}
