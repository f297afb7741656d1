// End-to-end behaviour: source in, printed output and diagnostics out.

use plox::ast::Program;
use plox::error::PloxError;
use plox::interpreter::Interpreter;
use plox::parser::Parser;
use plox::runner::{self, RunOptions};
use plox::scanner::Scanner;
use plox::session::Session;
use pretty_assertions::assert_eq;

fn session() -> Session<Vec<u8>> {
    Session::with_output(Vec::new())
}

/// Runs `source` as one batch and returns (printed lines, diagnostics).
fn run(source: &str) -> (Vec<String>, Vec<String>) {
    let mut session = session();
    let errors = session.run(source);
    (lines(&session.printed()), errors.iter().map(|e| e.to_string()).collect())
}

fn lines(printed: &str) -> Vec<String> {
    printed.lines().map(str::to_string).collect()
}

fn output(source: &str) -> Vec<String> {
    let (printed, errors) = run(source);
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    printed
}

#[test]
fn arithmetic_prints_trimmed_numbers() {
    assert_eq!(output("print 1 + 2;"), vec!["3"]);
    assert_eq!(output("print 6 / 2;"), vec!["3"]);
    assert_eq!(output("print 1 / 3;"), vec!["0.33"]);
    assert_eq!(output("print 2.5 * 2 - 0.25;"), vec!["4.75"]);
    assert_eq!(output("print -(3);"), vec!["-3"]);
    assert_eq!(output("print (1 + 2) * 3 - 4 / 2;"), vec!["7"]);
}

#[test]
fn printing_every_value_kind() {
    assert_eq!(
        output("print nil; print true; print false; print \"text\"; print \"\";"),
        vec!["nil", "true", "false", "text", ""]
    );
}

#[test]
fn string_concatenation() {
    assert_eq!(output("var a = \"foo\"; print a + \"bar\";"), vec!["foobar"]);
}

#[test]
fn block_shadowing_restores_outer_binding() {
    assert_eq!(
        output("var a = 1; { var a = 2; print a; } print a;"),
        vec!["2", "1"]
    );
}

#[test]
fn assignment_reaches_enclosing_scope() {
    assert_eq!(output("var a = 1; { a = 2; } print a;"), vec!["2"]);
    assert_eq!(output("var a = 1; { { { a = a + 1; } } } print a;"), vec!["2"]);
}

#[test]
fn assignment_is_an_expression() {
    assert_eq!(output("var a; var b; a = b = 3; print a; print b;"), vec!["3", "3"]);
    assert_eq!(output("var a = 1; print a = 5;"), vec!["5"]);
}

#[test]
fn uninitialized_variable_is_nil() {
    assert_eq!(output("var a; print a;"), vec!["nil"]);
}

#[test]
fn redeclaring_a_global_replaces_it() {
    assert_eq!(output("var a = 1; var a = \"two\"; print a;"), vec!["two"]);
}

#[test]
fn logical_operators_short_circuit() {
    let (printed, errors) = run("print false and (1/0); print true or (1/0);");
    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(printed, vec!["false", "true"]);

    // The right side never runs, so the assignment never happens.
    assert_eq!(
        output("var a = 1; false and (a = 2); true or (a = 3); print a;"),
        vec!["1"]
    );
}

#[test]
fn logical_operators_return_operands() {
    assert_eq!(
        output("print nil or \"yes\"; print 1 and 2; print nil and 1; print \"hi\" or 2;"),
        vec!["yes", "2", "nil", "hi"]
    );
}

#[test]
fn truthiness_rules() {
    assert_eq!(
        output("if (0) print \"zero\"; if (\"\") print \"empty\"; if (nil) print \"nil\"; else print \"falsy\";"),
        vec!["zero", "empty", "falsy"]
    );
    assert_eq!(output("print !nil; print !0; print !!\"\";"), vec!["true", "false", "true"]);
}

#[test]
fn equality_has_no_coercion() {
    assert_eq!(
        output("print nil == nil; print nil == false; print 1 == 1; print \"1\" == 1; print \"a\" != \"b\";"),
        vec!["true", "false", "true", "false", "true"]
    );
}

#[test]
fn comparisons() {
    assert_eq!(
        output("print 1 < 2; print 2 <= 2; print 3 > 4; print 4 >= 5;"),
        vec!["true", "true", "false", "false"]
    );
}

#[test]
fn for_loop_counts() {
    assert_eq!(
        output("for (var i = 0; i < 3; i = i + 1) print i;"),
        vec!["0", "1", "2"]
    );
}

#[test]
fn for_loop_variable_is_scoped_to_loop() {
    let (printed, errors) = run("for (var i = 0; i < 1; i = i + 1) {} print i;");
    assert!(printed.is_empty());
    assert_eq!(errors, vec!["Undefined variable 'i'.\n[line 1]"]);
}

#[test]
fn while_loop_and_else_branch() {
    assert_eq!(
        output("var n = 0; while (n < 3) { if (n == 1) print \"one\"; else print n; n = n + 1; }"),
        vec!["0", "one", "2"]
    );
}

#[test]
fn type_error_reports_operator_line() {
    let (printed, errors) = run("print 1;\n\"abc\" - 1;\nprint 2;");
    assert_eq!(printed, vec!["1"]);
    assert_eq!(errors, vec!["Operands must be numbers.\n[line 2]"]);
}

#[test]
fn runtime_type_errors() {
    let cases = [
        ("-\"a\";", "Operand must be a number."),
        ("1 + \"a\";", "Operands must be two numbers or strings."),
        ("nil + nil;", "Operands must be two numbers or strings."),
        ("true * 2;", "Operands must be numbers."),
        ("\"a\" < \"b\";", "Operands must be numbers."),
        ("1 / 0;", "Division by zero."),
        ("print x;", "Undefined variable 'x'."),
        ("x = 1;", "Undefined variable 'x'."),
    ];

    for (source, message) in cases {
        let mut session = session();
        let errors = session.run(source);
        assert_eq!(errors.len(), 1, "{}", source);
        assert_eq!(errors[0].message(), message, "{}", source);
        assert!(session.had_runtime_error(), "{}", source);
        assert!(!session.had_error(), "{}", source);
    }
}

#[test]
fn runtime_error_inside_block_restores_scope() {
    let mut session = session();
    assert!(!session.run("var a = \"outer\"; { var a = \"inner\"; a - 1; }").is_empty());
    session.reset_errors();

    assert!(session.run("print a;").is_empty());
    assert_eq!(session.printed(), "outer\n");
}

#[test]
fn bindings_survive_a_failed_batch() {
    let mut session = session();

    let errors = session.run("print missing;");
    assert_eq!(errors[0].to_string(), "Undefined variable 'missing'.\n[line 1]");
    assert!(session.had_runtime_error());
    session.reset_errors();
    assert!(!session.had_runtime_error());

    assert!(session.run("var missing = 1; var kept = 2;").is_empty());
    assert!(!session.run("kept = kept + 1; nope = 1;").is_empty());
    session.reset_errors();

    assert!(session.run("print missing; print kept;").is_empty());
    assert_eq!(session.printed(), "1\n3\n");
}

#[test]
fn compile_errors_block_the_whole_batch() {
    let mut session = session();
    let errors = session.run("print 1;\nprint 2\nprint 3;\nvar x = 4\nprint 5;");

    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert_eq!(
        messages,
        vec![
            "[line 3] Error at 'print': Expect ';' after value.",
            "[line 5] Error at 'print': Expect ';' after variable declaration.",
        ]
    );
    assert!(session.had_error());
    assert!(!session.had_runtime_error());
    assert_eq!(session.printed(), "");
}

#[test]
fn scan_and_parse_errors_are_reported_together() {
    let (printed, errors) = run("print 1 @;\nprint (;");
    assert!(printed.is_empty());
    assert_eq!(
        errors,
        vec![
            "[line 1] Error: Invalid character '@'.",
            "[line 2] Error at ';': Expect expression.",
        ]
    );
}

#[test]
fn unterminated_string_is_a_compile_error() {
    let (printed, errors) = run("print \"never closed;\n\n");
    assert!(printed.is_empty());
    // The string swallowed the rest of the input, so the print has no operand.
    assert_eq!(
        errors,
        vec![
            "[line 1] Error: Unterminated string.",
            "[line 2] Error at end: Expect expression.",
        ]
    );
}

#[test]
fn multiline_source_reports_real_lines() {
    let (printed, errors) = run("var a = 1;\n\n// comment\nprint a;\nprint a + nil;");
    assert_eq!(printed, vec!["1"]);
    assert_eq!(errors, vec!["Operands must be two numbers or strings.\n[line 5]"]);
}

#[test]
fn reserved_expression_forms_fail_at_runtime() {
    let paren = plox::Token::new(plox::TokenType::RightParen, ")".to_string(), 4, plox::Span::single(0));
    let program = Program {
        statements: vec![plox::Stmt::Expression {
            expr: plox::Expr::Call {
                callee: Box::new(plox::Expr::Literal {
                    value: plox::Value::Nil,
                }),
                paren,
                arguments: Vec::new(),
            },
        }],
    };

    let mut interpreter = Interpreter::with_output(Vec::new());
    let error = interpreter.interpret(&program).unwrap_err();
    assert_eq!(error.to_string(), "Can only call functions and classes.\n[line 4]");
    assert!(interpreter.into_output().is_empty());
}

#[test]
fn interpreter_persists_between_programs() {
    let parse = |source: &str| -> Result<Program, Vec<PloxError>> {
        let tokens = Scanner::new(source).scan_tokens().into_result()?;
        Parser::new(tokens).parse()
    };

    let mut interpreter = Interpreter::with_output(Vec::new());
    interpreter.interpret(&parse("var a = 40;").unwrap()).unwrap();
    interpreter.interpret(&parse("print a + 2;").unwrap()).unwrap();
    assert_eq!(String::from_utf8(interpreter.into_output()).unwrap(), "42\n");
}

#[test]
fn runner_exit_codes() {
    let options = RunOptions::default();
    assert_eq!(runner::run("var a = 1;", None, &options), runner::EXIT_OK);
    assert_eq!(runner::run("var a = ;", None, &options), runner::EXIT_COMPILE_ERROR);
    assert_eq!(runner::run("a;", None, &options), runner::EXIT_RUNTIME_ERROR);
}

#[test]
fn per_line_mode_keeps_going_after_errors() {
    let options = RunOptions {
        per_line: true,
        ..RunOptions::default()
    };
    // Line 2 fails to parse, line 3 fails at runtime; both are remembered.
    assert_eq!(
        runner::run("var a = 1;\nvar b = ;\na + nil;\n", None, &options),
        runner::EXIT_COMPILE_ERROR
    );
    assert_eq!(
        runner::run("var a = 1;\na + nil;\nvar c = a;\n", None, &options),
        runner::EXIT_RUNTIME_ERROR
    );
}

#[test]
fn deep_nesting_fails_the_batch_but_keeps_the_session() {
    let mut session = session();
    assert!(session.run("var kept = 1;").is_empty());

    let deep = format!("print {}kept{};", "(".repeat(5_000), ")".repeat(5_000));
    let errors = session.run(&deep);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "Too much nesting.");
    assert!(session.had_error());
    session.reset_errors();

    let shallow = format!("print {}kept + 1{};", "(".repeat(150), ")".repeat(150));
    assert!(session.run(&shallow).is_empty());
    assert_eq!(session.printed(), "2\n");
}
