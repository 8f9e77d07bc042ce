//! Error type shared by the lexer, parser and interpreter

use crate::common::Span;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Convert our Span to miette's SourceSpan
impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.start.into(), span.len())
    }
}

/// Error category, one per failure class a caller may want to distinguish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lex,
    Parse,
    Name,
    Type,
    Index,
    Arithmetic,
    RecursionLimit,
    Output,
    Config,
}

#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    // === Lex Errors ===
    #[error("Invalid character `{ch}`")]
    #[diagnostic(code(lex::invalid_char))]
    InvalidCharacter {
        ch: char,
        #[label("not part of the language")]
        span: SourceSpan,
    },

    #[error("Unterminated string literal")]
    #[diagnostic(code(lex::unterminated_string), help("add a closing `\"`"))]
    UnterminatedString {
        #[label("string starts here")]
        span: SourceSpan,
    },

    // === Parse Errors ===
    #[error("Unexpected token: expected {expected}, found {found}")]
    #[diagnostic(code(parse::unexpected_token))]
    UnexpectedToken {
        expected: String,
        found: String,
        #[label("unexpected token here")]
        span: SourceSpan,
    },

    #[error("Integer literal `{text}` does not fit in 64 bits")]
    #[diagnostic(code(parse::integer_out_of_range))]
    IntegerOutOfRange {
        text: String,
        #[label("out of range")]
        span: SourceSpan,
    },

    #[error("Field `{name}` is given twice")]
    #[diagnostic(code(parse::duplicate_field))]
    DuplicateField {
        name: String,
        #[label("second definition")]
        span: SourceSpan,
    },

    // === Name Errors ===
    #[error("Undefined variable `{name}`")]
    #[diagnostic(
        code(eval::undefined_var),
        help("did you mean to declare this variable with `let`?")
    )]
    UndefinedVariable {
        name: String,
        #[label("not found in this scope")]
        span: SourceSpan,
    },

    #[error("Unknown function `{name}`")]
    #[diagnostic(code(eval::unknown_fn), help("the only callable builtin is `print`"))]
    UnknownFunction {
        name: String,
        #[label("not a builtin")]
        span: SourceSpan,
    },

    #[error("Object has no field `{name}`")]
    #[diagnostic(code(eval::no_such_field))]
    NoSuchField {
        name: String,
        #[label("field not present")]
        span: SourceSpan,
    },

    // === Type Errors ===
    #[error("Type mismatch in {context}: expected `{expected}`, found `{found}`")]
    #[diagnostic(code(eval::type_mismatch))]
    TypeMismatch {
        context: &'static str,
        expected: &'static str,
        found: &'static str,
        #[label("this is a `{found}`")]
        span: SourceSpan,
    },

    // === Index Errors ===
    #[error("Index {index} out of bounds for list of length {len}")]
    #[diagnostic(code(eval::index_out_of_bounds))]
    IndexOutOfBounds {
        index: i64,
        len: usize,
        #[label("index evaluated to {index}")]
        span: SourceSpan,
    },

    // === Arithmetic Errors ===
    #[error("Arithmetic overflow")]
    #[diagnostic(code(eval::overflow))]
    ArithmeticOverflow {
        #[label("result does not fit in 64 bits")]
        span: SourceSpan,
    },

    // === Resource Errors ===
    #[error("Nesting depth exceeds the limit of {limit}")]
    #[diagnostic(
        code(eval::recursion_limit),
        help("raise `max_depth` in the configuration or flatten the expression")
    )]
    RecursionLimit {
        limit: usize,
        #[label("nested too deeply")]
        span: SourceSpan,
    },

    #[error("Failed to write program output")]
    #[diagnostic(code(eval::output))]
    Output(#[from] std::io::Error),

    #[error("Invalid configuration")]
    #[diagnostic(code(config::invalid))]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidCharacter { .. } | Error::UnterminatedString { .. } => ErrorKind::Lex,
            Error::UnexpectedToken { .. }
            | Error::IntegerOutOfRange { .. }
            | Error::DuplicateField { .. } => ErrorKind::Parse,
            Error::UndefinedVariable { .. }
            | Error::UnknownFunction { .. }
            | Error::NoSuchField { .. } => ErrorKind::Name,
            Error::TypeMismatch { .. } => ErrorKind::Type,
            Error::IndexOutOfBounds { .. } => ErrorKind::Index,
            Error::ArithmeticOverflow { .. } => ErrorKind::Arithmetic,
            Error::RecursionLimit { .. } => ErrorKind::RecursionLimit,
            Error::Output(_) => ErrorKind::Output,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Primary source location, if the error has one
    pub fn span(&self) -> Option<Span> {
        let span = match self {
            Error::InvalidCharacter { span, .. }
            | Error::UnterminatedString { span }
            | Error::UnexpectedToken { span, .. }
            | Error::IntegerOutOfRange { span, .. }
            | Error::DuplicateField { span, .. }
            | Error::UndefinedVariable { span, .. }
            | Error::UnknownFunction { span, .. }
            | Error::NoSuchField { span, .. }
            | Error::TypeMismatch { span, .. }
            | Error::IndexOutOfBounds { span, .. }
            | Error::ArithmeticOverflow { span }
            | Error::RecursionLimit { span, .. } => span,
            Error::Output(_) | Error::Config(_) => return None,
        };
        Some(Span::new(span.offset(), span.offset() + span.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_span() {
        let err = Error::IndexOutOfBounds {
            index: 7,
            len: 3,
            span: Span::new(10, 14).into(),
        };
        assert_eq!(err.kind(), ErrorKind::Index);
        assert_eq!(err.span(), Some(Span::new(10, 14)));
        assert_eq!(
            err.to_string(),
            "Index 7 out of bounds for list of length 3"
        );
    }

    #[test]
    fn test_output_error_has_no_span() {
        let err = Error::from(std::io::Error::other("closed"));
        assert_eq!(err.kind(), ErrorKind::Output);
        assert!(err.span().is_none());
    }
}
