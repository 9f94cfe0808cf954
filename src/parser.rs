//! Recursive-descent parser: token stream -> AST.

use crate::ast::Node;
use crate::lexer::{OperatorKind, Token};
use crate::span::Span;
use crate::value::{classify_identifier, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expression is not a subroutine at line {}", .span.line_number)]
    ExpressionIsNotSubroutine { span: Span },
    #[error("empty subroutine \"{name}\" at line {}", .span.line_number)]
    EmptySubroutine { name: String, span: Span },
    #[error("unexpected token at line {}", .span.line_number)]
    UnexpectedToken { span: Span },
    #[error("register is missing its number at line {}", .span.line_number)]
    RegisterMissingNumber { span: Span },
    #[error("range is missing its start value at line {}", .span.line_number)]
    RangeExpectsStart { span: Span },
    #[error("range is missing its end value at line {}", .span.line_number)]
    RangeExpectsEnd { span: Span },
    #[error("range is missing its ':' separator at line {}", .span.line_number)]
    RangeExpectsSeparator { span: Span },
    #[error("range expects a number at line {}", .span.line_number)]
    RangeExpectsNumber { span: Span },
    #[error("range start {start} is after its end {end} at line {}", .span.line_number)]
    RangeStartsAfterEnd { start: i64, end: i64, span: Span },
    #[error("macro was never closed, starting at line {}", .span.line_number)]
    MacroNeverClosed { span: Span },
    #[error("aside is missing its name at line {}", .span.line_number)]
    AsideExpectsName { span: Span },
    #[error("aside name must be an identifier at line {}", .span.line_number)]
    AsideNameMustBeIdentifier { span: Span },
    #[error("invalid token used as a value at line {}", .span.line_number)]
    InvalidTokenValue { span: Span },
    #[error("'@' syntax is reserved and no longer supported, at line {}", .span.line_number)]
    OldProcedureSyntax { span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::ExpressionIsNotSubroutine { span }
            | ParseError::EmptySubroutine { span, .. }
            | ParseError::UnexpectedToken { span }
            | ParseError::RegisterMissingNumber { span }
            | ParseError::RangeExpectsStart { span }
            | ParseError::RangeExpectsEnd { span }
            | ParseError::RangeExpectsSeparator { span }
            | ParseError::RangeExpectsNumber { span }
            | ParseError::RangeStartsAfterEnd { span, .. }
            | ParseError::MacroNeverClosed { span }
            | ParseError::AsideExpectsName { span }
            | ParseError::AsideNameMustBeIdentifier { span }
            | ParseError::InvalidTokenValue { span }
            | ParseError::OldProcedureSyntax { span } => *span,
        }
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Parser {
        Parser { tokens, cursor: 0 }
    }

    pub fn parse(mut self) -> Result<Node, ParseError> {
        let mut children = Vec::new();
        while self.cursor < self.tokens.len() {
            if self.at_newline() {
                self.cursor += 1;
                continue;
            }
            if self.at_operator(OperatorKind::BracketOpen) {
                children.push(self.parse_macro()?);
                continue;
            }
            if self.at_operator(OperatorKind::Colon) {
                children.push(self.parse_aside()?);
                continue;
            }
            if self.at_operator(OperatorKind::AtSymbol) {
                return Err(ParseError::OldProcedureSyntax { span: self.current_span() });
            }
            if let Some(Token::Identifier { text, span }) = self.current().cloned() {
                if self.peek_is_operator(1, OperatorKind::Colon) {
                    self.cursor += 2; // identifier, colon
                    children.push(self.parse_procedure(text, span)?);
                    continue;
                }
                return Err(ParseError::ExpressionIsNotSubroutine { span });
            }
            return Err(ParseError::UnexpectedToken { span: self.current_span() });
        }
        debug_assert!(children.iter().all(Node::is_root_child), "root child of a kind the root loop never pushes");
        log::debug!("parser: produced {} root children", children.len());
        Ok(Node::Root { children })
    }

    fn parse_procedure(&mut self, header: String, header_span: Span) -> Result<Node, ParseError> {
        let mut children = Vec::new();
        while self.cursor < self.tokens.len() {
            if self.at_newline() {
                self.cursor += 1;
                continue;
            }
            if self.at_operator(OperatorKind::Semicolon) {
                self.cursor += 1;
                continue;
            }
            if let Some(Token::Identifier { text, span }) = self.current().cloned() {
                if self.peek_is_operator(1, OperatorKind::Colon) {
                    // A new procedure begins; cursor is untouched so the root loop picks it up.
                    break;
                }
                self.cursor += 1;
                children.push(self.parse_instruction_call(text, span)?);
                continue;
            }
            break;
        }
        if children.is_empty() {
            return Err(ParseError::EmptySubroutine { name: header, span: header_span });
        }
        Ok(Node::Procedure { header, children })
    }

    fn parse_instruction_call(&mut self, name: String, name_span: Span) -> Result<Node, ParseError> {
        let parameters = self.parse_argument_list()?;
        Ok(Node::InstructionCall { name, name_span, parameters })
    }

    /// Comma-separated values, terminated by newline, semicolon, or EOF. A
    /// trailing comma before the terminator is tolerated here (the stylist
    /// flags it separately as a style issue, not a parse error).
    fn parse_argument_list(&mut self) -> Result<Vec<Value>, ParseError> {
        let mut values = Vec::new();
        if self.at_terminator() {
            return Ok(values);
        }
        values.push(self.parse_value()?);
        while self.at_operator(OperatorKind::Comma) {
            self.cursor += 1;
            if self.at_terminator() {
                break; // trailing comma
            }
            values.push(self.parse_value()?);
        }
        Ok(values)
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.current().cloned() {
            Some(Token::Number { value, span }) => {
                self.cursor += 1;
                Ok(Value::Number { value, span })
            }
            Some(Token::Literal { body, span }) => {
                self.cursor += 1;
                Ok(Value::Literal { body, span })
            }
            Some(Token::Identifier { text, span }) => {
                self.cursor += 1;
                classify_identifier(&text, span).ok_or(ParseError::RegisterMissingNumber { span })
            }
            Some(Token::Operator { kind: OperatorKind::CurlyOpen, position }) => {
                self.cursor += 1;
                self.parse_range(position)
            }
            Some(Token::Operator { position, .. }) => Err(ParseError::InvalidTokenValue { span: position }),
            None => Err(ParseError::UnexpectedToken { span: self.eof_span() }),
        }
    }

    fn parse_range(&mut self, open_span: Span) -> Result<Value, ParseError> {
        let start = match self.current().cloned() {
            Some(Token::Number { value, .. }) => {
                self.cursor += 1;
                value
            }
            _ => return Err(ParseError::RangeExpectsStart { span: open_span }),
        };
        if !self.at_operator(OperatorKind::Colon) {
            return Err(ParseError::RangeExpectsSeparator { span: self.current_span() });
        }
        self.cursor += 1;
        let end = match self.current().cloned() {
            Some(Token::Number { value, .. }) => {
                self.cursor += 1;
                value
            }
            _ => return Err(ParseError::RangeExpectsNumber { span: self.current_span() }),
        };
        let close_span = self.current_span();
        if !self.at_operator(OperatorKind::CurlyClose) {
            return Err(ParseError::RangeExpectsEnd { span: close_span });
        }
        self.cursor += 1;
        let span = open_span.merge(&close_span);
        if start > end {
            return Err(ParseError::RangeStartsAfterEnd { start, end, span });
        }
        Ok(Value::Range { start, end, span })
    }

    fn parse_macro(&mut self) -> Result<Node, ParseError> {
        let open_span = self.current_span();
        self.cursor += 1; // consume '['
        let (name, name_span) = match self.current().cloned() {
            Some(Token::Identifier { text, span }) => {
                self.cursor += 1;
                (text, span)
            }
            _ => return Err(ParseError::UnexpectedToken { span: self.current_span() }),
        };
        let mut parameters = Vec::new();
        loop {
            if self.at_operator(OperatorKind::BracketClose) {
                self.cursor += 1;
                break;
            }
            if self.cursor >= self.tokens.len() {
                return Err(ParseError::MacroNeverClosed { span: open_span });
            }
            parameters.push(self.parse_value()?);
            if self.at_operator(OperatorKind::Comma) {
                self.cursor += 1;
            }
        }
        let span = open_span.merge(&name_span);
        Ok(Node::Macro { name, parameters, span })
    }

    fn parse_aside(&mut self) -> Result<Node, ParseError> {
        let colon_span = self.current_span();
        self.cursor += 1; // consume ':'
        let (name, name_span) = match self.current().cloned() {
            Some(Token::Identifier { text, span }) => {
                self.cursor += 1;
                (text, span)
            }
            None | Some(Token::Operator { kind: OperatorKind::Newline, .. }) => {
                return Err(ParseError::AsideExpectsName { span: colon_span });
            }
            Some(_) => return Err(ParseError::AsideNameMustBeIdentifier { span: self.current_span() }),
        };
        let mut parameters = Vec::new();
        while !self.at_newline() && self.cursor < self.tokens.len() {
            if self.at_operator(OperatorKind::Comma) {
                self.cursor += 1;
                continue;
            }
            parameters.push(self.parse_value()?);
        }
        Ok(Node::Aside { name, parameters, span: colon_span.merge(&name_span) })
    }

    fn at_terminator(&self) -> bool {
        self.cursor >= self.tokens.len()
            || self.at_newline()
            || self.at_operator(OperatorKind::Semicolon)
    }

    fn at_newline(&self) -> bool {
        self.at_operator(OperatorKind::Newline)
    }

    fn at_operator(&self, kind: OperatorKind) -> bool {
        matches!(self.current(), Some(Token::Operator { kind: k, .. }) if *k == kind)
    }

    fn peek_is_operator(&self, offset: usize, kind: OperatorKind) -> bool {
        matches!(self.tokens.get(self.cursor + offset), Some(Token::Operator { kind: k, .. }) if *k == kind)
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn current_span(&self) -> Span {
        self.current().map(Token::span).unwrap_or_else(|| self.eof_span())
    }

    fn eof_span(&self) -> Span {
        self.tokens.last().map(Token::span).unwrap_or_else(Span::zero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(src: &str) -> Result<Node, ParseError> {
        let tokens = Lexer::new(src, i64::MAX, false).tokenize().unwrap();
        Parser::new(tokens).parse()
    }

    #[test]
    fn parses_single_instruction_procedure() {
        let ast = parse("_start: echo 'A'").unwrap();
        match ast {
            Node::Root { children } => {
                assert_eq!(children.len(), 1);
                assert!(matches!(&children[0], Node::Procedure { header, .. } if header == "_start"));
            }
            _ => panic!("expected root"),
        }
    }

    #[test]
    fn empty_procedure_is_rejected() {
        let err = parse("_start:\nother: echo 'A'").unwrap_err();
        assert!(matches!(err, ParseError::EmptySubroutine { .. }));
    }

    #[test]
    fn procedure_ends_at_next_label() {
        let ast = parse("a: echo 'A'\nb: echo 'B'").unwrap();
        match ast {
            Node::Root { children } => assert_eq!(children.len(), 2),
            _ => panic!(),
        }
    }

    #[test]
    fn parses_range_value() {
        let ast = parse("a: one {1:3}").unwrap();
        match ast {
            Node::Root { children } => match &children[0] {
                Node::Procedure { children, .. } => match &children[0] {
                    Node::InstructionCall { parameters, .. } => {
                        assert!(matches!(parameters[0], Value::Range { start: 1, end: 3, .. }));
                    }
                    _ => panic!(),
                },
                _ => panic!(),
            },
            _ => panic!(),
        }
    }

    #[test]
    fn range_start_after_end_is_rejected() {
        let err = parse("a: one {3:1}").unwrap_err();
        assert!(matches!(err, ParseError::RangeStartsAfterEnd { start: 3, end: 1, .. }));
    }

    #[test]
    fn trailing_comma_is_tolerated() {
        let ast = parse("a: one 1,\n").unwrap();
        match ast {
            Node::Root { children } => match &children[0] {
                Node::Procedure { children, .. } => match &children[0] {
                    Node::InstructionCall { parameters, .. } => assert_eq!(parameters.len(), 1),
                    _ => panic!(),
                },
                _ => panic!(),
            },
            _ => panic!(),
        }
    }

    #[test]
    fn macro_never_closed_is_an_error() {
        let err = parse("[compat openlud").unwrap_err();
        assert!(matches!(err, ParseError::MacroNeverClosed { .. }));
    }

    #[test]
    fn aside_without_name_is_an_error() {
        let err = parse("a:\n:\n").unwrap_err();
        assert!(matches!(err, ParseError::AsideExpectsName { .. }));
    }

    #[test]
    fn at_symbol_is_reserved() {
        let err = parse("@foo").unwrap_err();
        assert!(matches!(err, ParseError::OldProcedureSyntax { .. }));
    }

    #[test]
    fn bare_identifier_at_root_is_rejected() {
        let err = parse("foo").unwrap_err();
        assert!(matches!(err, ParseError::ExpressionIsNotSubroutine { .. }));
    }
}
