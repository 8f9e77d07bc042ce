//! Tree-walking interpreter for the AST

use std::io::Write;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::ast::*;
use crate::common::Span;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::stack::ensure_sufficient_stack;

use super::builtins::Builtin;
use super::env::Environment;
use super::value::Value;

/// Tree-walking interpreter
pub struct Interpreter<W: Write> {
    /// Variable environment, rebuilt for every run
    env: Environment,
    /// Sink for `print`
    out: W,
    depth: usize,
    max_depth: usize,
}

impl<W: Write> Interpreter<W> {
    /// Create a new interpreter writing to `out`
    pub fn new(out: W) -> Self {
        Self::with_config(out, &Config::default())
    }

    pub fn with_config(out: W, config: &Config) -> Self {
        Interpreter {
            env: Environment::new(),
            out,
            depth: 0,
            max_depth: config.max_depth,
        }
    }

    /// Give back the sink, e.g. to inspect a buffer after a run
    pub fn into_output(self) -> W {
        self.out
    }

    /// Program-level binding left by the last run
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.env.get(name)
    }

    /// Run a program in a fresh program scope and return the value of its trailing expression
    pub fn run(&mut self, program: &Block) -> Result<Value> {
        self.env = Environment::new();
        self.depth = 0;
        debug!(stmts = program.stmts.len(), "running program");

        let result = self.exec_body(program);
        // Lines printed before a failure stay written
        let flushed = self.out.flush();
        let value = result?;
        flushed?;
        Ok(value)
    }

    /// Statements then tail of `block`, in the current scope
    fn exec_body(&mut self, block: &Block) -> Result<Value> {
        for stmt in &block.stmts {
            self.exec_stmt(stmt)?;
        }
        match &block.tail {
            Some(expr) => self.eval_expr(expr),
            None => Ok(Value::Unit),
        }
    }

    /// Evaluate a block in its own child scope
    fn eval_block(&mut self, block: &Block) -> Result<Value> {
        self.env.push_scope();
        let result = self.exec_body(block);
        self.env.pop_scope();
        result
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        trace!(span = ?stmt.span(), "exec");
        match stmt {
            Stmt::Let { name, value, .. } => {
                let val = self.eval_expr(value)?;
                self.env.define(name.clone(), val);
            }
            Stmt::Expr(expr) => {
                self.eval_expr(expr)?;
            }
        }
        Ok(())
    }

    /// Evaluate an expression one nesting level deeper
    fn eval_expr(&mut self, expr: &Expr) -> Result<Value> {
        if self.depth >= self.max_depth {
            return Err(Error::RecursionLimit {
                limit: self.max_depth,
                span: expr.span.into(),
            });
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.eval_kind(expr));
        self.depth -= 1;
        result
    }

    fn eval_kind(&mut self, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::String(s) => Ok(Value::String(s.clone())),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),

            ExprKind::List(elements) => {
                let items = elements
                    .iter()
                    .map(|e| self.eval_expr(e))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::list(items))
            }

            ExprKind::Block(block) => self.eval_block(block),

            ExprKind::Ident(name) => {
                self.env
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::UndefinedVariable {
                        name: name.clone(),
                        span: expr.span.into(),
                    })
            }

            ExprKind::Binary { op, lhs, rhs } => {
                let l = self.eval_expr(lhs)?;
                let r = self.eval_expr(rhs)?;
                match op {
                    BinaryOp::Eq => return Ok(Value::Bool(l == r)),
                    BinaryOp::Ne => return Ok(Value::Bool(l != r)),
                    _ => {}
                }

                let context = operand_context(*op);
                let a = expect_number(&l, context, lhs.span)?;
                let b = expect_number(&r, context, rhs.span)?;
                apply_numeric(*op, a, b).ok_or(Error::ArithmeticOverflow {
                    span: expr.span.into(),
                })
            }

            ExprKind::Unary { op, expr: inner } => {
                let val = self.eval_expr(inner)?;
                match op {
                    UnaryOp::Neg => expect_number(&val, "operand of unary `-`", inner.span)?
                        .checked_neg()
                        .map(Value::Number)
                        .ok_or(Error::ArithmeticOverflow {
                            span: expr.span.into(),
                        }),
                    UnaryOp::Plus => {
                        expect_number(&val, "operand of unary `+`", inner.span).map(Value::Number)
                    }
                    UnaryOp::Not => {
                        expect_bool(&val, "operand of `!`", inner.span).map(|b| Value::Bool(!b))
                    }
                }
            }

            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let taken = expect_bool(&self.eval_expr(cond)?, "`if` condition", cond.span)?;
                if taken {
                    self.eval_block(then_branch)
                } else if let Some(branch) = else_branch {
                    self.eval_expr(branch)
                } else {
                    Ok(Value::Unit)
                }
            }

            ExprKind::Object(fields) => {
                let mut values = IndexMap::with_capacity(fields.len());
                for (name, value) in fields {
                    let value = self.eval_expr(value)?;
                    values.insert(name.clone(), value);
                }
                Ok(Value::object(values))
            }

            ExprKind::Field { target, name } => {
                let object = self.eval_expr(target)?;
                let fields = object.as_object().ok_or_else(|| Error::TypeMismatch {
                    context: "field access",
                    expected: "object",
                    found: object.type_name(),
                    span: target.span.into(),
                })?;
                fields.get(name).cloned().ok_or_else(|| Error::NoSuchField {
                    name: name.clone(),
                    span: expr.span.into(),
                })
            }

            ExprKind::Index { target, index } => self.eval_index(target, index),

            ExprKind::Call { name, args } => {
                let builtin = Builtin::lookup(name).ok_or_else(|| Error::UnknownFunction {
                    name: name.clone(),
                    span: expr.span.into(),
                })?;
                let values = args
                    .iter()
                    .map(|a| self.eval_expr(a))
                    .collect::<Result<Vec<_>>>()?;
                builtin.call(&values, &mut self.out)
            }
        }
    }

    fn eval_index(&mut self, target: &Expr, index: &Expr) -> Result<Value> {
        let list = self.eval_expr(target)?;
        let items = list.as_list().ok_or_else(|| Error::TypeMismatch {
            context: "index target",
            expected: "list",
            found: list.type_name(),
            span: target.span.into(),
        })?;

        let i = expect_number(&self.eval_expr(index)?, "index", index.span)?;
        usize::try_from(i)
            .ok()
            .and_then(|i| items.get(i))
            .cloned()
            .ok_or(Error::IndexOutOfBounds {
                index: i,
                len: items.len(),
                span: index.span.into(),
            })
    }
}

fn operand_context(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "operand of `+`",
        BinaryOp::Sub => "operand of `-`",
        BinaryOp::Mul => "operand of `*`",
        BinaryOp::Eq => "operand of `==`",
        BinaryOp::Ne => "operand of `!=`",
        BinaryOp::Lt => "operand of `<`",
        BinaryOp::Le => "operand of `<=`",
        BinaryOp::Gt => "operand of `>`",
        BinaryOp::Ge => "operand of `>=`",
    }
}

/// `None` when the result overflows `i64`
fn apply_numeric(op: BinaryOp, a: i64, b: i64) -> Option<Value> {
    match op {
        BinaryOp::Add => a.checked_add(b).map(Value::Number),
        BinaryOp::Sub => a.checked_sub(b).map(Value::Number),
        BinaryOp::Mul => a.checked_mul(b).map(Value::Number),
        BinaryOp::Eq => Some(Value::Bool(a == b)),
        BinaryOp::Ne => Some(Value::Bool(a != b)),
        BinaryOp::Lt => Some(Value::Bool(a < b)),
        BinaryOp::Le => Some(Value::Bool(a <= b)),
        BinaryOp::Gt => Some(Value::Bool(a > b)),
        BinaryOp::Ge => Some(Value::Bool(a >= b)),
    }
}

fn expect_bool(value: &Value, context: &'static str, span: Span) -> Result<bool> {
    value.as_bool().ok_or_else(|| Error::TypeMismatch {
        context,
        expected: "bool",
        found: value.type_name(),
        span: span.into(),
    })
}

fn expect_number(value: &Value, context: &'static str, span: Span) -> Result<i64> {
    value.as_number().ok_or_else(|| Error::TypeMismatch {
        context,
        expected: "number",
        found: value.type_name(),
        span: span.into(),
    })
}
