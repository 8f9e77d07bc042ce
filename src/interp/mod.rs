//! Tree-walking interpreter for the AST
//!
//! Executes the parsed program directly against a chain of lexical scopes.

pub mod builtins;
pub mod env;
pub mod eval;
pub mod value;

pub use builtins::Builtin;
pub use env::Environment;
pub use eval::Interpreter;
pub use value::Value;
