//! Parser Tests - Expressions
//!
//! Successful parses across the full precedence chain: literals, variables,
//! operators, calls, indexing, slicing, and transpose, plus the shape of the
//! desugared tree.

use bml::semantic::{BlockContext, FunctionTable, VarScope, VariableMap};
use bml::syntax::{BaseKind, Expr, TypeDescriptor};
use bml::{Parse, parse_expression, parse_term};
use rstest::rstest;

fn variables() -> VariableMap {
    let mut map = VariableMap::new();
    map.declare("n", BaseKind::Int, 0, VarScope::Data);
    map.declare("idx", BaseKind::Int, 1, VarScope::Data);
    map.declare("x", BaseKind::Real, 0, VarScope::Data);
    map.declare("xs", BaseKind::Real, 1, VarScope::Data);
    map.declare("grid", BaseKind::Real, 2, VarScope::Data);
    map.declare("sigma", BaseKind::Real, 0, VarScope::Parameters);
    map.declare("v", BaseKind::Vector, 0, VarScope::Parameters);
    map.declare("rv", BaseKind::RowVector, 0, VarScope::Parameters);
    map.declare("m", BaseKind::Matrix, 0, VarScope::Parameters);
    map.declare("ms", BaseKind::Matrix, 1, VarScope::Parameters);
    map
}

fn functions() -> FunctionTable {
    let real = TypeDescriptor::real(false);
    let mut table = FunctionTable::new();
    table.define("exp", vec![real], real);
    table.define("fmax", vec![real, real], real);
    table.define(
        "sum",
        vec![TypeDescriptor::new(BaseKind::Vector, 0, false)],
        real,
    );
    table
}

fn parse(input: &str) -> Parse {
    parse_expression(input, &variables(), &functions(), BlockContext::Model)
}

/// Helper to check if input parses without any diagnostic
fn parses_cleanly(input: &str) -> bool {
    parse(input).ok()
}

fn result_ty(input: &str) -> TypeDescriptor {
    let parsed = parse(input);
    assert!(
        parsed.ok(),
        "parse of {input:?} failed: {:?}",
        parsed.errors
    );
    parsed.expr.as_ref().map(Expr::ty).unwrap()
}

// ============================================================================
// Well-formed expressions
// ============================================================================

#[rstest]
// Literals
#[case("42")]
#[case("1.5")]
#[case("1.5e3")]
#[case("1e-24")]
#[case(".5")]
#[case("2.")]
// Arithmetic and precedence
#[case("1 + 2 * 3")]
#[case("x * sigma")]
#[case("n % 2")]
#[case("(x + sigma) / 2")]
#[case("x ^ 2")]
#[case("2 ^ x ^ n")]
#[case("x * -sigma")]
#[case("- x ^ 2")]
#[case("+ x")]
// Matrix algebra
#[case("m * v")]
#[case("rv * v")]
#[case("v * rv")]
#[case("m \\ v")]
#[case("m .* m")]
#[case("v ./ v")]
#[case("v '")]
#[case("m ' * v")]
// Logical and comparison chain
#[case("x < sigma")]
#[case("!(x < sigma) || n == 2")]
#[case("n >= 1 && n <= 10")]
#[case("x != sigma")]
// Indexing, slicing, transpose interleaved
#[case("xs[n]")]
#[case("m[1]")]
#[case("m[1, 2]")]
#[case("ms[1][2]")]
#[case("xs[1:n]")]
#[case("xs[:n]")]
#[case("xs[2:]")]
#[case("xs[:]")]
#[case("xs[idx]")]
#[case("m[idx, 1]")]
#[case("m[1]' ")]
#[case("grid[1][2]")]
// Calls
#[case("exp(x)")]
#[case("fmax(x, sigma)")]
#[case("sum(v)")]
#[case("exp(exp(x))")]
// Comments are trivia
#[case("x + /* inline */ sigma")]
#[case("x // trailing")]
#[case("x # legacy trailing")]
fn test_parses_cleanly(#[case] input: &str) {
    let parsed = parse(input);
    assert!(parsed.ok(), "Failed to parse {input:?}: {:?}", parsed.errors);
}

// ============================================================================
// Result types
// ============================================================================

#[rstest]
#[case("42", BaseKind::Int, 0)]
#[case("1.5", BaseKind::Real, 0)]
#[case("1 + 2", BaseKind::Int, 0)]
#[case("1 / 2", BaseKind::Int, 0)]
#[case("x + n", BaseKind::Real, 0)]
#[case("n % 2", BaseKind::Int, 0)]
#[case("2 ^ 2", BaseKind::Real, 0)]
#[case("m * v", BaseKind::Vector, 0)]
#[case("rv * v", BaseKind::Real, 0)]
#[case("v * rv", BaseKind::Matrix, 0)]
#[case("m \\ v", BaseKind::Vector, 0)]
#[case("x * m", BaseKind::Matrix, 0)]
#[case("v '", BaseKind::RowVector, 0)]
#[case("rv '", BaseKind::Vector, 0)]
#[case("x < sigma", BaseKind::Int, 0)]
#[case("!n", BaseKind::Int, 0)]
#[case("-v", BaseKind::Vector, 0)]
#[case("xs[1]", BaseKind::Real, 0)]
#[case("m[1]", BaseKind::RowVector, 0)]
#[case("m[1, 2]", BaseKind::Real, 0)]
#[case("ms[1]", BaseKind::Matrix, 0)]
#[case("ms[1][2]", BaseKind::RowVector, 0)]
#[case("grid[1]", BaseKind::Real, 1)]
#[case("xs[1:2]", BaseKind::Real, 1)]
#[case("xs[idx]", BaseKind::Real, 1)]
#[case("m[idx, 1]", BaseKind::Vector, 0)]
#[case("m[1, idx]", BaseKind::RowVector, 0)]
fn test_result_type(#[case] input: &str, #[case] base: BaseKind, #[case] dims: usize) {
    let ty = result_ty(input);
    assert_eq!((ty.base, ty.dims), (base, dims), "wrong type for {input:?}");
}

// ============================================================================
// Data-only provenance
// ============================================================================

#[rstest]
#[case("1 + 2", true)]
#[case("x + n", true)]
#[case("x + sigma", false)]
#[case("xs[n]", true)]
#[case("xs[1:n]", true)]
#[case("exp(x)", true)]
#[case("exp(sigma)", false)]
#[case("v '", false)]
fn test_data_only(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(result_ty(input).data_only, expected, "for {input:?}");
}

// ============================================================================
// Tree shape of desugared operators
// ============================================================================

#[test]
fn test_unary_binds_tighter_than_multiplication() {
    let parsed = parse("x * -sigma");
    let Some(Expr::Call { name, args, .. }) = parsed.expr else {
        panic!("expected a call node");
    };
    assert_eq!(name, "multiply");
    assert!(matches!(&args[1], Expr::Call { name, .. } if name == "minus"));
}

#[test]
fn test_exponentiation_binds_tighter_than_unary_minus() {
    let parsed = parse("-x ^ 2");
    let Some(Expr::Call { name, args, .. }) = parsed.expr else {
        panic!("expected a call node");
    };
    assert_eq!(name, "minus");
    assert!(matches!(&args[0], Expr::Call { name, .. } if name == "pow"));
}

#[test]
fn test_exponentiation_is_right_associative() {
    let parsed = parse("2 ^ x ^ n");
    let Some(Expr::Call { name, args, .. }) = parsed.expr else {
        panic!("expected a call node");
    };
    assert_eq!(name, "pow");
    assert!(matches!(&args[0], Expr::IntLiteral { value: 2, .. }));
    assert!(matches!(&args[1], Expr::Call { name, .. } if name == "pow"));
}

#[test]
fn test_multiplication_is_left_associative() {
    let parsed = parse("x * sigma / 2");
    let Some(Expr::Call { name, args, .. }) = parsed.expr else {
        panic!("expected a call node");
    };
    assert_eq!(name, "divide");
    assert!(matches!(&args[0], Expr::Call { name, .. } if name == "multiply"));
}

#[test]
fn test_plus_is_the_identity() {
    let parsed = parse("+ x");
    assert!(matches!(parsed.expr, Some(Expr::Variable { .. })));
}

#[test]
fn test_comparison_desugars_to_canonical_name() {
    let parsed = parse("x <= sigma");
    let Some(Expr::Call { name, .. }) = parsed.expr else {
        panic!("expected a call node");
    };
    assert_eq!(name, "logical_lte");
}

#[test]
fn test_dimension_groups_collect_into_one_index_node() {
    let parsed = parse("ms[1][2]");
    let Some(Expr::Index { groups, .. }) = parsed.expr else {
        panic!("expected an index node");
    };
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].len(), 1);
}

#[test]
fn test_range_bracket_becomes_a_slice_node() {
    let parsed = parse("xs[1:n]");
    assert!(matches!(parsed.expr, Some(Expr::Slice { .. })));
}

// ============================================================================
// Term entry point
// ============================================================================

#[test]
fn test_term_entry_stops_before_additive_operators() {
    let parsed = parse_term("x * 2", &variables(), &functions(), BlockContext::Model);
    assert!(parsed.ok());

    // The enclosing additive rule owns `+`; at this entry it is leftover.
    let parsed = parse_term("x + 2", &variables(), &functions(), BlockContext::Model);
    assert!(parsed.expr.is_none());
    assert!(!parsed.errors.is_empty());
}

#[test]
fn test_trailing_input_is_rejected() {
    assert!(!parses_cleanly("1 2"));
    assert!(!parses_cleanly("1x"));
    assert!(!parses_cleanly("x sigma"));
}
