//! End-to-end execution tests: compile a source string and run it on a
//! fresh VM.

use dang::{Error, ErrorKind, Value, evaluate};
use pretty_assertions::assert_eq;

fn run(source: &str) -> Value {
    evaluate(source).unwrap()
}

fn run_err(source: &str) -> Error {
    evaluate(source).unwrap_err()
}

#[test]
fn basic_program_can_be_run() {
    assert_eq!(run("return 123;"), Value::Int(123));
}

#[test]
fn math_can_be_done() {
    assert_eq!(run("return 9 + (16 - 6) / 2 * 9;"), Value::Int(54));
}

#[test]
fn order_of_noncommutative_operators_is_correct() {
    assert_eq!(run("return 10 - 5;"), Value::Int(5));
    assert_eq!(run("return 10 / 5;"), Value::Int(2));
}

#[test]
fn adding_an_integer_and_a_double_produces_a_double() {
    assert_eq!(run("return 5 * 1.5;"), Value::Double(7.5));
}

#[test]
fn string_concatenation_works() {
    assert_eq!(run("let name = \"world\"; return \"Hello, \" + name;"), Value::Str("Hello, world".into()));
}

#[test]
fn booleans_work() {
    assert_eq!(run("return true;"), Value::Bool(true));
    assert_eq!(run("return false;"), Value::Bool(false));
}

#[test]
fn null_works() {
    assert_eq!(run("return null;"), Value::Null);
    assert_eq!(run("return null;"), Value::default());
}

#[test]
fn program_without_a_return_yields_null() {
    assert_eq!(run("let x = 5;"), Value::Null);
}

#[test]
fn can_read_and_write_variables_in_outer_scopes() {
    assert_eq!(run("let x = 5; { x = x * x; } return x;"), Value::Int(25));
}

#[test]
fn can_shadow_variables_in_outer_scopes() {
    assert_eq!(run("let x = 5; { let x = 2; x = 9; } return x;"), Value::Int(5));
}

#[test]
fn deeply_nested_scopes_resolve_to_the_nearest_definition() {
    let source = "let x = 1; { let x = 2; { let x = 3; x = 30; } x = x * 10; } return x;";
    assert_eq!(run(source), Value::Int(1));
}

#[test]
fn if_statement_evaluating_to_true() {
    assert_eq!(run("let x = 5; if x { x = x * 5; } return x;"), Value::Int(25));
}

#[test]
fn if_statement_evaluating_to_false() {
    assert_eq!(run("let x = 5; if x - 5 { x = x * 5; } return x;"), Value::Int(5));
}

#[test]
fn complex_if_else_if_chains_evaluate_correctly() {
    // the first truthy condition among C1, C2, true selects the arm
    let program = |c1: i64, c2: i64| {
        format!("let x = 0; if {c1} {{ x = 1; }} else if {c2} {{ x = 2; }} else {{ x = 3; }} return x;")
    };

    assert_eq!(run(&program(1, 1)), Value::Int(1));
    assert_eq!(run(&program(0, 1)), Value::Int(2));
    assert_eq!(run(&program(0, 0)), Value::Int(3));
}

#[test]
fn truthiness_drives_conditions() {
    assert_eq!(run("let x = 0; if \"s\" { x = 1; } return x;"), Value::Int(1));
    assert_eq!(run("let x = 0; if \"\" { x = 1; } return x;"), Value::Int(0));
    assert_eq!(run("let x = 0; if 0.5 { x = 1; } return x;"), Value::Int(1));
    assert_eq!(run("let x = 0; if 0.0 { x = 1; } return x;"), Value::Int(0));
    assert_eq!(run("let x = 0; if true { x = 1; } return x;"), Value::Int(1));
    assert_eq!(run("let x = 0; if false { x = 1; } return x;"), Value::Int(0));
    assert_eq!(run("let x = 0; if null { x = 1; } return x;"), Value::Int(0));
}

#[test]
fn functions_can_be_defined_and_called() {
    assert_eq!(run("fn add(a, b) { return a + b; } return add(20, 22);"), Value::Int(42));
}

#[test]
fn zero_argument_function_call() {
    assert_eq!(run("fn five() { return 5; } return five();"), Value::Int(5));
}

#[test]
fn function_without_a_return_yields_null() {
    assert_eq!(run("fn noop() { } return noop();"), Value::Null);
}

#[test]
fn function_arguments_are_local_to_the_call() {
    let source = "let x = 1; fn shadow(x) { return x * 10; } return shadow(5) + x;";
    assert_eq!(run(source), Value::Int(51));
}

#[test]
fn function_locals_can_shadow_parameters() {
    let source = "fn f(a) { let a = 7; return a; } return f(1);";
    assert_eq!(run(source), Value::Int(7));
}

#[test]
fn functions_can_call_other_functions() {
    let source = "fn double(n) { return n * 2; } fn quad(n) { return double(double(n)); } return quad(4);";
    assert_eq!(run(source), Value::Int(16));
}

#[test]
fn call_results_compose_in_expressions() {
    let source = "fn inc(n) { return n + 1; } return inc(1) + inc(2) * inc(3);";
    assert_eq!(run(source), Value::Int(14));
}

#[test]
fn recursion_works() {
    let source = "fn fib(n) {
        if n - 1 { } else { return 1; }
        if n { } else { return 0; }
        return fib(n - 1) + fib(n - 2);
    }
    return fib(10);";
    assert_eq!(run(source), Value::Int(55));
}

#[test]
fn functions_are_first_class_values() {
    let source = "fn f() { return 1; } return f;";
    let Value::Function(function) = run(source) else {
        panic!("expected a function value");
    };
    assert_eq!(&*function.name, "f");
    assert_eq!(function.arity, 0);
}

#[test]
fn comments_are_ignored() {
    let source = "// leading comment\nlet x = 1; /* inline */ return x; // trailing";
    assert_eq!(run(source), Value::Int(1));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn undefined_variable_is_a_name_error() {
    let err = run_err("return missing;");
    assert_eq!(err.kind(), ErrorKind::Name);
    assert_eq!(err.to_string(), "name error: undefined variable: missing");
}

#[test]
fn assigning_an_undefined_variable_is_a_name_error() {
    assert_eq!(run_err("missing = 1;").kind(), ErrorKind::Name);
}

#[test]
fn redefining_a_global_is_a_name_error() {
    assert_eq!(run_err("let x = 1; let x = 2;").kind(), ErrorKind::Name);
}

#[test]
fn redefining_a_local_in_the_same_scope_is_a_resolve_error() {
    assert_eq!(run_err("{ let x = 1; let x = 2; }").kind(), ErrorKind::Resolve);
}

#[test]
fn invalid_operands_are_a_type_error() {
    let err = run_err("return \"a\" - 1;");
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(err.to_string(), "type error: invalid operands to -: string and int");
}

#[test]
fn integer_division_by_zero_is_fatal() {
    assert_eq!(run_err("return 1 / 0;").kind(), ErrorKind::ZeroDivision);
}

#[test]
fn calling_a_non_function_is_a_type_error() {
    let err = run_err("let x = 5; return x();");
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(err.to_string(), "type error: value of type int is not callable");
}

#[test]
fn arity_mismatch_is_a_type_error() {
    let err = run_err("fn f(a, b) { return a + b; } return f(1);");
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(err.to_string(), "type error: function f takes 2 arguments but 1 were given");
}

#[test]
fn runaway_recursion_overflows_the_value_stack() {
    let err = run_err("fn f() { return f(); } return f();");
    assert_eq!(err.kind(), ErrorKind::StackOverflow);
}
