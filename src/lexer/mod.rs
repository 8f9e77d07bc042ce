//! Lexer for slang source text
//!
//! Whitespace and `#` comments are skipped; the returned stream always ends
//! with a single [`TokenKind::Eof`].

mod tokens;

pub use tokens::{Token, TokenKind};

use crate::common::Span;
use crate::error::{Error, Result};
use logos::Logos;

/// Tokenize `source` eagerly
pub fn lex(source: &str) -> Result<Vec<Token>> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();

    while let Some(kind) = lexer.next() {
        let span = Span::from(lexer.span());
        match kind {
            Ok(TokenKind::UnterminatedString) => {
                return Err(Error::UnterminatedString { span: span.into() });
            }
            Ok(kind) => tokens.push(Token {
                kind,
                span,
                text: lexer.slice().to_string(),
            }),
            Err(()) => {
                let ch = source[span.start..].chars().next().unwrap_or('\u{fffd}');
                return Err(Error::InvalidCharacter {
                    ch,
                    span: Span::new(span.start, span.start + ch.len_utf8()).into(),
                });
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::point(source.len()),
        text: String::new(),
    });
    tracing::trace!(count = tokens.len(), "lexed source");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_comment_runs_to_end_of_line() {
        assert_eq!(
            kinds("1 # two three\n4"),
            vec![TokenKind::IntLit, TokenKind::IntLit, TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_keeps_quotes_in_text() {
        let tokens = lex(r#""a b""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLit);
        assert_eq!(tokens[0].text, "\"a b\"");
        assert_eq!(tokens[0].span, Span::new(0, 5));
    }

    #[test]
    fn test_eof_span_is_at_end() {
        let tokens = lex("ab ").unwrap();
        assert_eq!(tokens.last().unwrap().span, Span::point(3));
    }
}
