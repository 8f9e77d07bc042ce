//! Builtin functions callable by name

use std::io::Write;

use crate::error::Result;

use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Print,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "print" => Some(Builtin::Print),
            _ => None,
        }
    }

    pub fn call(self, args: &[Value], out: &mut impl Write) -> Result<Value> {
        match self {
            Builtin::Print => print(args, out),
        }
    }
}

/// Writes the `Display` form of each argument, space separated, as one line
fn print(args: &[Value], out: &mut impl Write) -> Result<Value> {
    let line = args
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    tracing::trace!(%line, "print");
    writeln!(out, "{}", line)?;
    Ok(Value::Unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_joins_with_single_space() {
        let mut out: Vec<u8> = Vec::new();
        let args = [Value::from("hello"), Value::Number(2), Value::list(vec![Value::from("x")])];
        let result = Builtin::Print.call(&args, &mut out).unwrap();
        assert!(result.is_unit());
        assert_eq!(String::from_utf8(out).unwrap(), "hello 2 [\"x\"]\n");
    }

    #[test]
    fn test_print_without_args_writes_empty_line() {
        let mut out: Vec<u8> = Vec::new();
        Builtin::Print.call(&[], &mut out).unwrap();
        assert_eq!(out, b"\n");
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Builtin::lookup("print"), Some(Builtin::Print));
        assert_eq!(Builtin::lookup("len"), None);
    }
}
