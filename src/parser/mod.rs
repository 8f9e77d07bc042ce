//! Parser for slang
//!
//! A recursive descent parser that produces an AST from a token stream. The
//! whole program is parsed as one implicit top-level block.

use crate::ast::*;
use crate::common::Span;
use crate::config::{Config, DEFAULT_MAX_DEPTH};
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};
use crate::stack::ensure_sufficient_stack;

/// Parse a token stream into a program block
pub fn parse(tokens: &[Token]) -> Result<Block> {
    Parser::new(tokens, DEFAULT_MAX_DEPTH).parse_program()
}

/// Parse with the nesting ceiling taken from `config`
pub fn parse_with_config(tokens: &[Token], config: &Config) -> Result<Block> {
    Parser::new(tokens, config.max_depth).parse_program()
}

/// Parser state
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Returned once the stream is exhausted, even if it lacked an `Eof`
    eof: Token,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], max_depth: usize) -> Self {
        let end = tokens.last().map_or(0, |t| t.span.end);
        Self {
            tokens,
            pos: 0,
            eof: Token {
                kind: TokenKind::Eof,
                span: Span::point(end),
                text: String::new(),
            },
            depth: 0,
            max_depth,
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn advance(&mut self) -> &Token {
        let idx = self.pos;
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        self.tokens.get(idx).unwrap_or(&self.eof)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<&Token> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            self.unexpected(expected)
        }
    }

    fn unexpected<T>(&self, expected: &str) -> Result<T> {
        let found = self.current();
        Err(Error::UnexpectedToken {
            expected: expected.to_string(),
            found: found.describe(),
            span: found.span.into(),
        })
    }

    fn span(&self) -> Span {
        self.current().span
    }

    /// Take one nesting level, failing once the ceiling is reached
    fn descend(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::RecursionLimit {
                limit: self.max_depth,
                span: self.span().into(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `f` one nesting level deeper
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.descend()?;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    // ==================== PROGRAM ====================

    fn parse_program(&mut self) -> Result<Block> {
        let (stmts, tail) = self.parse_stmts(TokenKind::Eof)?;
        let end = self.expect(TokenKind::Eof, "end of input")?.span;
        Ok(Block {
            stmts,
            tail,
            span: Span::new(0, end.end),
        })
    }

    // ==================== STATEMENTS ====================

    /// Statements up to (not including) `end`; an unterminated final expression becomes the tail
    fn parse_stmts(&mut self, end: TokenKind) -> Result<(Vec<Stmt>, Option<Box<Expr>>)> {
        let mut stmts = Vec::new();

        loop {
            match self.peek() {
                kind if kind == end => return Ok((stmts, None)),
                TokenKind::Semi => {
                    self.advance();
                }
                TokenKind::Let => stmts.push(self.parse_let_stmt()?),
                _ => {
                    let expr = self.parse_expr()?;
                    if self.at(TokenKind::Semi) {
                        self.advance();
                        stmts.push(Stmt::Expr(expr));
                    } else if self.at(end) {
                        return Ok((stmts, Some(Box::new(expr))));
                    } else if expr.is_block_like() {
                        stmts.push(Stmt::Expr(expr));
                    } else {
                        let expected = match end {
                            TokenKind::Eof => "`;` or end of input".to_string(),
                            kind => format!("`;` or `{}`", kind),
                        };
                        return self.unexpected(&expected);
                    }
                }
            }
        }
    }

    fn parse_let_stmt(&mut self) -> Result<Stmt> {
        let start = self.expect(TokenKind::Let, "`let`")?.span;
        let name = self.parse_ident()?;
        self.expect(TokenKind::Eq, "`=`")?;
        let value = self.parse_expr()?;
        let end = self.expect(TokenKind::Semi, "`;`")?.span;

        Ok(Stmt::Let {
            name,
            value,
            span: start.to(end),
        })
    }

    fn parse_block(&mut self) -> Result<Block> {
        let start = self.expect(TokenKind::LBrace, "`{`")?.span;
        let (stmts, tail) = self.parse_stmts(TokenKind::RBrace)?;
        let end = self.expect(TokenKind::RBrace, "`}`")?.span;

        Ok(Block {
            stmts,
            tail,
            span: start.to(end),
        })
    }

    // ==================== EXPRESSIONS ====================

    fn parse_expr(&mut self) -> Result<Expr> {
        self.nested(|p| p.parse_comparison())
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        self.parse_binary_chain(Self::parse_additive, |kind| match kind {
            TokenKind::EqEq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::Ne),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::Le => Some(BinaryOp::Le),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::Ge => Some(BinaryOp::Ge),
            _ => None,
        })
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        self.parse_binary_chain(Self::parse_multiplicative, |kind| match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        self.parse_binary_chain(Self::parse_unary, |kind| match kind {
            TokenKind::Star => Some(BinaryOp::Mul),
            _ => None,
        })
    }

    /// Left-associative chain of `operand`s joined by the operators `op_for` accepts.
    /// Every operator wraps the tree one level deeper and counts toward the ceiling.
    fn parse_binary_chain(
        &mut self,
        operand: fn(&mut Self) -> Result<Expr>,
        op_for: fn(TokenKind) -> Option<BinaryOp>,
    ) -> Result<Expr> {
        let outer = self.depth;
        let result = self.binary_chain(operand, op_for);
        self.depth = outer;
        result
    }

    fn binary_chain(
        &mut self,
        operand: fn(&mut Self) -> Result<Expr>,
        op_for: fn(TokenKind) -> Option<BinaryOp>,
    ) -> Result<Expr> {
        let mut lhs = operand(self)?;

        while let Some(op) = op_for(self.peek()) {
            self.descend()?;
            self.advance();
            let rhs = operand(self)?;
            let span = lhs.span.to(rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.peek() {
            TokenKind::Minus if !self.at_negative_literal() => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let start = self.advance().span;
        let expr = self.nested(|p| p.parse_unary())?;
        let span = start.to(expr.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                expr: Box::new(expr),
            },
            span,
        ))
    }

    /// `-` directly followed by an integer literal, with no whitespace between
    fn at_negative_literal(&self) -> bool {
        let minus = self.current();
        minus.kind == TokenKind::Minus
            && self
                .tokens
                .get(self.pos + 1)
                .is_some_and(|next| next.kind == TokenKind::IntLit && next.span.start == minus.span.end)
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let outer = self.depth;
        let result = self.postfix_chain();
        self.depth = outer;
        result
    }

    /// Index and field suffixes; like binary operators, each one counts toward the ceiling
    fn postfix_chain(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek() {
                TokenKind::LBracket => {
                    self.descend()?;
                    self.advance();
                    let index = self.parse_expr()?;
                    let end = self.expect(TokenKind::RBracket, "`]`")?.span;
                    let span = expr.span.to(end);
                    expr = Expr::new(
                        ExprKind::Index {
                            target: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.descend()?;
                    self.advance();
                    let tok = self.expect(TokenKind::Ident, "field name")?;
                    let (name, end) = (tok.text.clone(), tok.span);
                    let span = expr.span.to(end);
                    expr = Expr::new(
                        ExprKind::Field {
                            target: Box::new(expr),
                            name,
                        },
                        span,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.peek() {
            TokenKind::IntLit => {
                let tok = self.advance();
                let span = tok.span;
                let value = parse_int(&tok.text, span)?;
                Ok(Expr::new(ExprKind::Number(value), span))
            }
            TokenKind::Minus if self.at_negative_literal() => {
                let start = self.advance().span;
                let tok = self.advance();
                let span = start.to(tok.span);
                let value = parse_int(&format!("-{}", tok.text), span)?;
                Ok(Expr::new(ExprKind::Number(value), span))
            }
            TokenKind::StringLit => {
                let tok = self.advance();
                // Remove quotes
                let value = tok.text[1..tok.text.len() - 1].to_string();
                Ok(Expr::new(ExprKind::String(value), tok.span))
            }
            TokenKind::True | TokenKind::False => {
                let tok = self.advance();
                let value = tok.kind == TokenKind::True;
                Ok(Expr::new(ExprKind::Bool(value), tok.span))
            }
            TokenKind::Ident => {
                let tok = self.advance();
                let (name, start) = (tok.text.clone(), tok.span);

                if self.at(TokenKind::LParen) {
                    self.advance();
                    let (args, end) = self.parse_comma_list(TokenKind::RParen)?;
                    return Ok(Expr::new(ExprKind::Call { name, args }, start.to(end)));
                }

                Ok(Expr::new(ExprKind::Ident(name), start))
            }

            // List literal
            TokenKind::LBracket => {
                let start = self.advance().span;
                let (elements, end) = self.parse_comma_list(TokenKind::RBracket)?;
                Ok(Expr::new(ExprKind::List(elements), start.to(end)))
            }

            TokenKind::LBrace if self.at_object_literal() => self.parse_object(),

            // Block expression
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                let span = block.span;
                Ok(Expr::new(ExprKind::Block(block), span))
            }

            TokenKind::If => self.parse_if(),

            // Grouped expression
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(expr)
            }

            _ => self.unexpected("expression"),
        }
    }

    /// `{` followed by `name :` starts an object literal rather than a block
    fn at_object_literal(&self) -> bool {
        let kind_at = |offset: usize| self.tokens.get(self.pos + offset).map(|t| t.kind);
        kind_at(0) == Some(TokenKind::LBrace)
            && kind_at(1) == Some(TokenKind::Ident)
            && kind_at(2) == Some(TokenKind::Colon)
    }

    fn parse_object(&mut self) -> Result<Expr> {
        let start = self.expect(TokenKind::LBrace, "`{`")?.span;
        let mut fields: Vec<(String, Expr)> = Vec::new();

        loop {
            let name_span = self.span();
            let name = self.parse_ident()?;
            if fields.iter().any(|(existing, _)| *existing == name) {
                return Err(Error::DuplicateField {
                    name,
                    span: name_span.into(),
                });
            }
            self.expect(TokenKind::Colon, "`:`")?;
            let value = self.parse_expr()?;
            fields.push((name, value));

            if !self.at(TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        let end = self.expect(TokenKind::RBrace, "`,` or `}`")?.span;

        Ok(Expr::new(ExprKind::Object(fields), start.to(end)))
    }

    fn parse_if(&mut self) -> Result<Expr> {
        let start = self.expect(TokenKind::If, "`if`")?.span;
        let cond = self.parse_expr()?;
        let then_branch = self.parse_block()?;
        let mut end = then_branch.span;

        let else_branch = if self.at(TokenKind::Else) {
            self.advance();
            let branch = if self.at(TokenKind::If) {
                self.nested(|p| p.parse_if())?
            } else {
                let block = self.parse_block()?;
                let span = block.span;
                Expr::new(ExprKind::Block(block), span)
            };
            end = branch.span;
            Some(Box::new(branch))
        } else {
            None
        };

        Ok(Expr::new(
            ExprKind::If {
                cond: Box::new(cond),
                then_branch,
                else_branch,
            },
            start.to(end),
        ))
    }

    /// Comma separated expressions up to and including `close`; returns the span of `close`
    fn parse_comma_list(&mut self, close: TokenKind) -> Result<(Vec<Expr>, Span)> {
        let mut items = Vec::new();

        if !self.at(close) {
            loop {
                items.push(self.parse_expr()?);
                if !self.at(TokenKind::Comma) {
                    break;
                }
                // A comma must be followed by another element
                self.advance();
            }
        }
        let end = self.expect(close, &format!("`,` or `{}`", close))?.span;

        Ok((items, end))
    }

    // ==================== HELPERS ====================

    fn parse_ident(&mut self) -> Result<String> {
        if self.at(TokenKind::Ident) {
            Ok(self.advance().text.clone())
        } else {
            self.unexpected("identifier")
        }
    }
}

fn parse_int(text: &str, span: Span) -> Result<i64> {
    text.parse().map_err(|_| Error::IntegerOutOfRange {
        text: text.to_string(),
        span: span.into(),
    })
}
