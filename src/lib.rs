//! slang language core
//!
//! A small expression-oriented scripting language: integer, string and
//! boolean literals, nested lists, objects, block and `if` expressions with
//! `let` bindings, indexing, field access, and a `print` builtin.
//!
//! # Architecture
//!
//! ```text
//! Source → Lexer → Parser → AST → Interpreter → output sink
//! ```
//!
//! # Example
//!
//! ```text
//! let list = [5, 3, 2, "hello", "world"];
//! print(list);                 # [5, 3, 2, "hello", "world"]
//! print(list[3], list[4]);     # hello world
//! let el = list[{ let i = 4; i }];
//! let point = { x: 1, y: 2 };
//! print(if point.x < point.y { "up" } else { "down" });   # up
//! ```

use std::io::Write;

pub mod ast;
pub mod common;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
mod stack;

pub use ast::Block;
pub use config::Config;
pub use diagnostics::SourceFile;
pub use error::{Error, ErrorKind, Result};
pub use interp::{Interpreter, Value};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse source code to AST
pub fn parse(source: &str) -> Result<Block> {
    parse_with_config(source, &Config::default())
}

pub fn parse_with_config(source: &str, config: &Config) -> Result<Block> {
    let tokens = lexer::lex(source)?;
    parser::parse_with_config(&tokens, config)
}

/// Run a program, writing `print` output to `out`
pub fn run<W: Write>(source: &str, out: &mut W) -> Result<()> {
    run_with_config(source, out, &Config::default())
}

pub fn run_with_config<W: Write>(source: &str, out: &mut W, config: &Config) -> Result<()> {
    interpret_with_config(source, out, config).map(|_| ())
}

/// Run a program and return the value of its trailing expression
pub fn interpret<W: Write>(source: &str, out: &mut W) -> Result<Value> {
    interpret_with_config(source, out, &Config::default())
}

pub fn interpret_with_config<W: Write>(
    source: &str,
    out: &mut W,
    config: &Config,
) -> Result<Value> {
    let program = parse_with_config(source, config)?;
    let mut interpreter = Interpreter::with_config(out, config);
    interpreter.run(&program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_interpret_returns_trailing_value() {
        let mut out: Vec<u8> = Vec::new();
        let value = interpret("let a = 2; a + 40", &mut out).unwrap();
        assert_eq!(value, Value::Number(42));
        assert!(out.is_empty());
    }

    #[test]
    fn test_runs_do_not_share_bindings() {
        let mut out: Vec<u8> = Vec::new();
        run("let a = 1;", &mut out).unwrap();
        let err = run("print(a);", &mut out).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Name);
    }
}
