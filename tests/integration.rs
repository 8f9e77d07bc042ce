//! Integration tests for the full pipeline

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use slang::diagnostics::{SourceFile, render};
use slang::{ErrorKind, Value};

const LISTS: &str = include_str!("programs/lists.sl");

fn output(source: &str) -> String {
    let mut out: Vec<u8> = Vec::new();
    slang::run(source, &mut out).expect("program failed");
    String::from_utf8(out).expect("print output is UTF-8")
}

#[test]
fn test_lists_program() {
    let expected = concat!(
        "[5, 3, 2, \"hello\", \"world\"]\n",
        "[1, 2, 7, 8, [-3, [5, 3, 2, \"hello\", \"world\"]], 5]\n",
        "hello world\n",
        "2 world\n",
    );
    assert_eq!(output(LISTS), expected);
}

#[test]
fn test_print_list() {
    let out = output(r#"let list = [5, 3, 2, "hello", "world"]; print(list);"#);
    assert_eq!(out, "[5, 3, 2, \"hello\", \"world\"]\n");
}

#[test]
fn test_print_list_of_mixed_expressions() {
    let source = r#"
let list = [5, 3, 2, "hello", "world"];
let list2 = [1, 2, 3 + 4, (5 + 3), [-3, list], { let y = 5; y }];
print(list2);
"#;
    assert_eq!(
        output(source),
        "[1, 2, 7, 8, [-3, [5, 3, 2, \"hello\", \"world\"]], 5]\n"
    );
}

#[test]
fn test_print_indexed_strings_unquoted() {
    let source = r#"let list = [5, 3, 2, "hello", "world"]; print(list[3], list[4]);"#;
    assert_eq!(output(source), "hello world\n");
}

#[test]
fn test_index_by_group_and_block() {
    let source = r#"
let list = [5, 3, 2, "hello", "world"];
let el2 = list[(3 - 1)];
let el3 = list[{ let i = 4; i }];
print(el2, el3);
"#;
    assert_eq!(output(source), "2 world\n");
}

#[test]
fn test_lists_program_bindings() {
    let program = slang::parse(LISTS).unwrap();
    let mut interpreter = slang::Interpreter::new(Vec::<u8>::new());
    interpreter.run(&program).unwrap();
    assert_eq!(interpreter.global("el3"), Some(&Value::from("world")));
    assert_eq!(interpreter.global("el2"), Some(&Value::Number(2)));
}

#[test]
fn test_rendered_diagnostic_points_at_source() {
    let source = "let l = [1];\nprint(l[3]);";
    let err = slang::run(source, &mut Vec::<u8>::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Index);
    assert_eq!(err.span().unwrap().line_col(source), (2, 9));

    let text = render(err, &SourceFile::new("demo.sl", source));
    assert!(text.contains("Index 3 out of bounds"), "{text}");
    assert!(text.contains("index evaluated to 3"), "{text}");
}

#[test]
fn test_lex_error_through_run() {
    let err = slang::run("print(1 % 2);", &mut Vec::<u8>::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lex);
}

#[test]
fn test_parse_error_runs_nothing() {
    let mut out: Vec<u8> = Vec::new();
    let err = slang::run("print(1); print(2", &mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(out.is_empty());
}

#[test]
fn test_long_chains_report_limit_instead_of_crashing() {
    for source in [
        format!("1{}", " + 1".repeat(500_000)),
        format!("[1]{}", "[0]".repeat(500_000)),
    ] {
        let err = slang::run(&source, &mut std::io::sink()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RecursionLimit);
    }
}

#[test]
fn test_objects_and_conditionals_program() {
    let source = r#"
let people = [{ name: "ada", age: 36 }, { name: "alan", age: 41 }];
let first = people[0];
let second = people[1];
let older = if first.age > second.age { first } else { second };
print(older.name, older.age * 2);
print(first == { age: 36, name: "ada" }, first != second);
if older.age >= 40 {
    print("over forty");
} else {
    print("under forty");
}
print(people);
"#;
    let expected = concat!(
        "alan 82\n",
        "true true\n",
        "over forty\n",
        "[{name: \"ada\", age: 36}, {name: \"alan\", age: 41}]\n",
    );
    assert_eq!(output(source), expected);
}

proptest! {
    #[test]
    fn prop_addition_matches_i64(a in -1_000_000_000_000i64..1_000_000_000_000, b in -1_000_000_000_000i64..1_000_000_000_000) {
        let source = format!("{} + {}", a, b);
        let value = slang::interpret(&source, &mut std::io::sink()).unwrap();
        prop_assert_eq!(value, Value::Number(a + b));
    }

    #[test]
    fn prop_parentheses_do_not_change_value(a in -1000i64..1000, b in -1000i64..1000, c in -1000i64..1000) {
        let plain = slang::interpret(&format!("{} - {} + {}", a, b, c), &mut std::io::sink()).unwrap();
        let grouped = slang::interpret(&format!("({} - {}) + {}", a, b, c), &mut std::io::sink()).unwrap();
        prop_assert_eq!(plain, grouped);
        let single = slang::interpret(&format!("({} + {})", a, b), &mut std::io::sink()).unwrap();
        prop_assert_eq!(single, Value::Number(a + b));
    }

    #[test]
    fn prop_comparisons_match_i64(a in any::<i64>(), b in any::<i64>()) {
        let source = format!("[{a} < {b}, {a} <= {b}, {a} > {b}, {a} >= {b}, {a} == {b}, {a} != {b}]");
        let value = slang::interpret(&source, &mut std::io::sink()).unwrap();
        let expected = Value::list(vec![
            Value::Bool(a < b),
            Value::Bool(a <= b),
            Value::Bool(a > b),
            Value::Bool(a >= b),
            Value::Bool(a == b),
            Value::Bool(a != b),
        ]);
        prop_assert_eq!(value, expected);
    }

    #[test]
    fn prop_index_in_bounds(len in 1usize..20, seed in 0usize..1000) {
        let i = seed % len;
        let items: Vec<String> = (0..len).map(|n| n.to_string()).collect();
        let source = format!("[{}][{}]", items.join(", "), i);
        let value = slang::interpret(&source, &mut std::io::sink()).unwrap();
        prop_assert_eq!(value, Value::Number(i as i64));
    }

    #[test]
    fn prop_index_past_end_fails(len in 0usize..20, extra in 0usize..5) {
        let items: Vec<String> = (0..len).map(|n| n.to_string()).collect();
        let source = format!("[{}][{}]", items.join(", "), len + extra);
        let err = slang::interpret(&source, &mut std::io::sink()).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Index);
    }
}
