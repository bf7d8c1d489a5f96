#![cfg(test)]

use crate::codegen::{compile, Chunk, CompileError, OpCode};
use crate::runtime::{ObjHeap, Value};

fn compile_ok(source: &str) -> (Chunk, ObjHeap) {
    let mut heap = ObjHeap::new();
    let chunk = compile(source, &mut heap).expect("compile failed");
    (chunk, heap)
}

fn compile_err(source: &str) -> Vec<CompileError> {
    let mut heap = ObjHeap::new();
    compile(source, &mut heap).expect_err("compile succeeded unexpectedly")
}

fn op(opcode: OpCode) -> u8 {
    opcode.into()
}

#[test]
fn empty_source_compiles_to_return() {
    let (chunk, _heap) = compile_ok("");
    assert_eq!(chunk.as_slice(), &[op(OpCode::Return)][..]);
    assert_eq!(chunk.line(0), 1);
}

#[test]
fn expression_statement_pops_its_value() {
    let (chunk, _heap) = compile_ok("1 + 2;");

    let expected = [
        op(OpCode::Constant), 0,
        op(OpCode::Constant), 1,
        op(OpCode::Add),
        op(OpCode::Pop),
        op(OpCode::Return),
    ];
    assert_eq!(chunk.as_slice(), &expected[..]);

    assert!(chunk.constant(0).equal(&Value::Number(1.0)));
    assert!(chunk.constant(1).equal(&Value::Number(2.0)));
}

#[test]
fn print_statement() {
    let (chunk, _heap) = compile_ok("print 42;");

    let expected = [
        op(OpCode::Constant), 0,
        op(OpCode::Print),
        op(OpCode::Return),
    ];
    assert_eq!(chunk.as_slice(), &expected[..]);
}

#[test]
fn factor_binds_tighter_than_term() {
    let (chunk, _heap) = compile_ok("1 + 2 * 3;");

    let expected = [
        op(OpCode::Constant), 0,
        op(OpCode::Constant), 1,
        op(OpCode::Constant), 2,
        op(OpCode::Multiply),
        op(OpCode::Add),
        op(OpCode::Pop),
        op(OpCode::Return),
    ];
    assert_eq!(chunk.as_slice(), &expected[..]);
}

#[test]
fn subtraction_is_left_associative() {
    let (chunk, _heap) = compile_ok("1 - 2 - 3;");

    let expected = [
        op(OpCode::Constant), 0,
        op(OpCode::Constant), 1,
        op(OpCode::Subtract),
        op(OpCode::Constant), 2,
        op(OpCode::Subtract),
        op(OpCode::Pop),
        op(OpCode::Return),
    ];
    assert_eq!(chunk.as_slice(), &expected[..]);
}

#[test]
fn grouping_resets_precedence() {
    let (chunk, _heap) = compile_ok("(1 + 2) * 3;");

    let expected = [
        op(OpCode::Constant), 0,
        op(OpCode::Constant), 1,
        op(OpCode::Add),
        op(OpCode::Constant), 2,
        op(OpCode::Multiply),
        op(OpCode::Pop),
        op(OpCode::Return),
    ];
    assert_eq!(chunk.as_slice(), &expected[..]);
}

#[test]
fn composed_comparison_operators() {
    // no dedicated opcodes for != <= >=, they compose with NOT
    let (chunk, _heap) = compile_ok("1 <= 2;");
    let expected = [
        op(OpCode::Constant), 0,
        op(OpCode::Constant), 1,
        op(OpCode::Greater),
        op(OpCode::Not),
        op(OpCode::Pop),
        op(OpCode::Return),
    ];
    assert_eq!(chunk.as_slice(), &expected[..]);

    let (chunk, _heap) = compile_ok("1 != 2;");
    let expected = [
        op(OpCode::Constant), 0,
        op(OpCode::Constant), 1,
        op(OpCode::Equal),
        op(OpCode::Not),
        op(OpCode::Pop),
        op(OpCode::Return),
    ];
    assert_eq!(chunk.as_slice(), &expected[..]);
}

#[test]
fn unary_and_literals() {
    let (chunk, _heap) = compile_ok("!(true == nil) == !false;");

    let expected = [
        op(OpCode::True),
        op(OpCode::Nil),
        op(OpCode::Equal),
        op(OpCode::Not),
        op(OpCode::False),
        op(OpCode::Not),
        op(OpCode::Equal),
        op(OpCode::Pop),
        op(OpCode::Return),
    ];
    assert_eq!(chunk.as_slice(), &expected[..]);
}

#[test]
fn negate_emits_after_operand() {
    let (chunk, _heap) = compile_ok("-5;");

    let expected = [
        op(OpCode::Constant), 0,
        op(OpCode::Negate),
        op(OpCode::Pop),
        op(OpCode::Return),
    ];
    assert_eq!(chunk.as_slice(), &expected[..]);
}

#[test]
fn string_constants_are_unquoted_and_interned() {
    let (chunk, _heap) = compile_ok("\"hi\" == \"hi\";");

    let lhs = chunk.constant(0);
    let rhs = chunk.constant(1);

    let string = lhs.as_string().expect("not a string constant");
    assert_eq!(string.as_str(), "hi");

    // same contents, same object
    assert!(lhs.equal(&rhs));
}

#[test]
fn var_declaration_with_initializer() {
    let (chunk, _heap) = compile_ok("var answer = 42;");

    let expected = [
        op(OpCode::Constant), 1,
        op(OpCode::DefineGlobal), 0,
        op(OpCode::Return),
    ];
    assert_eq!(chunk.as_slice(), &expected[..]);

    let name = chunk.constant(0);
    let name = name.as_string().expect("name constant");
    assert_eq!(name.as_str(), "answer");
    assert!(chunk.constant(1).equal(&Value::Number(42.0)));
}

#[test]
fn var_declaration_defaults_to_nil() {
    let (chunk, _heap) = compile_ok("var x;");

    let expected = [
        op(OpCode::Nil),
        op(OpCode::DefineGlobal), 0,
        op(OpCode::Return),
    ];
    assert_eq!(chunk.as_slice(), &expected[..]);
}

#[test]
fn line_table_tracks_statements() {
    let (chunk, _heap) = compile_ok("1;\n2;");

    assert_eq!(chunk.line(0), 1);
    assert_eq!(chunk.line(3), 2);
    for offset in 0..chunk.len() {
        assert!(chunk.line(offset) >= 1);
    }
}

#[test]
fn missing_operand_reports_at_the_semicolon() {
    let errors = compile_err("print 1 +;");

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "[line 1] Error at ';': Expect expression.",
    );
}

#[test]
fn unclosed_grouping_reports_at_end() {
    let errors = compile_err("(1 + 2;");

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "[line 1] Error at ';': Expect ')' after expression.",
    );
}

#[test]
fn scanner_errors_surface_as_compile_errors() {
    let errors = compile_err("print @;");
    assert_eq!(
        errors[0].to_string(),
        "[line 1] Error: Unexpected character.",
    );

    let errors = compile_err("print \"runs off;");
    assert_eq!(
        errors[0].to_string(),
        "[line 1] Error: Unterminated string.",
    );
}

#[test]
fn synchronize_reports_one_error_per_statement() {
    let errors = compile_err("print 1 +;\nprint 2 +;");

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].line(), 1);
    assert_eq!(errors[1].line(), 2);
}

#[test]
fn constant_pool_limit() {
    // 256 constants fit in the single-byte operand
    let full: String = (0..256).map(|n| format!("{};", n)).collect();
    let (chunk, _heap) = compile_ok(&full);
    assert_eq!(chunk.constants().len(), 256);

    // the 257th does not
    let overflowing: String = (0..257).map(|n| format!("{};", n)).collect();
    let errors = compile_err(&overflowing);
    assert!(errors
        .iter()
        .any(|error| error.message() == "Too many constants in one chunk."));
}
