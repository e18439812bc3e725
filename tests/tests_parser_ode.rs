//! Parser Tests - ODE integrator forms
//!
//! `integrate_ode` and `integrate_ode_cvode` are keyword-dispatched,
//! fixed-arity, and fully committed after the keyword. These tests cover the
//! happy path, argument typing, data-only provenance, and the wording of the
//! committed-structure diagnostics.

use bml::semantic::{BlockContext, FunctionTable, VarScope, VariableMap};
use bml::syntax::{BaseKind, Expr, TypeDescriptor};
use bml::{ErrorCode, Parse, parse_expression};
use rstest::rstest;

fn variables() -> VariableMap {
    let mut map = VariableMap::new();
    map.declare("t0", BaseKind::Real, 0, VarScope::Data);
    map.declare("ts", BaseKind::Real, 1, VarScope::Data);
    map.declare("x_r", BaseKind::Real, 1, VarScope::Data);
    map.declare("x_i", BaseKind::Int, 1, VarScope::Data);
    map.declare("y0", BaseKind::Real, 1, VarScope::Parameters);
    map.declare("theta", BaseKind::Real, 1, VarScope::Parameters);
    map.declare("sigma", BaseKind::Real, 0, VarScope::Parameters);
    map.declare("bad_ts", BaseKind::Real, 1, VarScope::Parameters);
    map
}

fn functions() -> FunctionTable {
    let real = TypeDescriptor::real(false);
    let real_arr = TypeDescriptor::new(BaseKind::Real, 1, false);
    let int_arr = TypeDescriptor::new(BaseKind::Int, 1, false);

    let mut table = FunctionTable::new();
    // A well-formed system function.
    table.define(
        "sho",
        vec![real, real_arr, real_arr, real_arr, int_arr],
        real_arr,
    );
    // Right arguments, wrong result type.
    table.define("sho_scalar", vec![real, real_arr, real_arr, real_arr, int_arr], real);
    table
}

fn parse(input: &str) -> Parse {
    parse_expression(input, &variables(), &functions(), BlockContext::Model)
}

fn has_code(parsed: &Parse, code: ErrorCode) -> bool {
    parsed.errors.iter().any(|d| d.code == code)
}

fn message_of(parsed: &Parse, code: ErrorCode) -> &str {
    parsed
        .errors
        .iter()
        .find(|d| d.code == code)
        .map(|d| d.message.as_str())
        .unwrap_or_else(|| panic!("no {code} in {:?}", parsed.errors))
}

// ============================================================================
// Happy paths
// ============================================================================

#[test]
fn test_integrate_ode_result_is_2d_real() {
    let parsed = parse("integrate_ode(sho, y0, t0, ts, theta, x_r, x_i)");
    assert!(parsed.ok(), "{:?}", parsed.errors);
    let expr = parsed.expr.unwrap();
    let ty = expr.ty();
    assert_eq!((ty.base, ty.dims), (BaseKind::Real, 2));
    // The solution depends on parameters even when every input is data.
    assert!(!ty.data_only);
    assert!(matches!(expr, Expr::IntegrateOde { system, .. } if system == "sho"));
}

#[test]
fn test_integrate_ode_cvode_accepts_literal_controls() {
    let parsed = parse(
        "integrate_ode_cvode(sho, y0, t0, ts, theta, x_r, x_i, 1e-10, 1e-10, 1000)",
    );
    assert!(parsed.ok(), "{:?}", parsed.errors);
    let ty = parsed.expr.as_ref().map(Expr::ty).unwrap();
    assert_eq!((ty.base, ty.dims), (BaseKind::Real, 2));
}

#[test]
fn test_integrator_composes_as_an_operand() {
    let parsed = parse("integrate_ode(sho, y0, t0, ts, theta, x_r, x_i)[1]");
    assert!(parsed.ok(), "{:?}", parsed.errors);
    let ty = parsed.expr.as_ref().map(Expr::ty).unwrap();
    assert_eq!((ty.base, ty.dims), (BaseKind::Real, 1));
}

// ============================================================================
// System function validation
// ============================================================================

#[rstest]
#[case("integrate_ode(undefined_sys, y0, t0, ts, theta, x_r, x_i)")]
#[case("integrate_ode(sho_scalar, y0, t0, ts, theta, x_r, x_i)")]
fn test_bad_system_function(#[case] input: &str) {
    let parsed = parse(input);
    assert!(parsed.expr.is_none());
    let message = message_of(&parsed, ErrorCode::E0303);
    assert!(
        message.contains("(real, real[], real[], real[], int[]) -> real[]"),
        "{message}"
    );
}

// ============================================================================
// Argument typing and provenance
// ============================================================================

#[rstest]
#[case("integrate_ode(sho, sigma, t0, ts, theta, x_r, x_i)", "y0")]
#[case("integrate_ode(sho, y0, ts, ts, theta, x_r, x_i)", "t0")]
#[case("integrate_ode(sho, y0, t0, t0, theta, x_r, x_i)", "ts")]
#[case("integrate_ode(sho, y0, t0, ts, sigma, x_r, x_i)", "theta")]
#[case("integrate_ode(sho, y0, t0, ts, theta, x_r, x_r)", "x_int")]
fn test_argument_type_failure_names_the_argument(#[case] input: &str, #[case] name: &str) {
    let parsed = parse(input);
    assert!(parsed.expr.is_none());
    let message = message_of(&parsed, ErrorCode::E0405);
    assert!(message.contains(&format!("`{name}`")), "{message}");
}

#[rstest]
#[case("integrate_ode(sho, y0, sigma, ts, theta, x_r, x_i)", "t0")]
#[case("integrate_ode(sho, y0, t0, bad_ts, theta, x_r, x_i)", "ts")]
#[case("integrate_ode(sho, y0, t0, ts, theta, bad_ts, x_i)", "x")]
#[case(
    "integrate_ode_cvode(sho, y0, t0, ts, theta, x_r, x_i, 1e-10, 1e-10, sigma)",
    "max_num_steps"
)]
#[case(
    "integrate_ode_cvode(sho, y0, t0, ts, theta, x_r, x_i, sigma, 1e-10, 1000)",
    "rel_tol"
)]
fn test_provenance_failure_names_the_argument(#[case] input: &str, #[case] name: &str) {
    let parsed = parse(input);
    assert!(parsed.expr.is_none());
    let message = message_of(&parsed, ErrorCode::E0601);
    assert!(message.contains(&format!("`{name}`")), "{message}");
}

/// `y0` and `theta` may depend on parameters; only the four data arguments
/// and the controls are provenance-checked.
#[test]
fn test_parameter_y0_and_theta_are_allowed() {
    let parsed = parse("integrate_ode(sho, y0, t0, ts, theta, x_r, x_i)");
    assert!(!has_code(&parsed, ErrorCode::E0601), "{:?}", parsed.errors);
}

// ============================================================================
// Committed structure
// ============================================================================

#[rstest]
// A missing comma is a structural failure naming the next slot, never an
// unknown-variable report.
#[case("integrate_ode(sho, y0 t0, ts, theta, x_r, x_i)", ErrorCode::E0204, "t0")]
#[case("integrate_ode(sho)", ErrorCode::E0204, "y0")]
#[case(
    "integrate_ode_cvode(sho, y0, t0, ts, theta, x_r, x_i)",
    ErrorCode::E0204,
    "rel_tol"
)]
#[case("integrate_ode(sho, y0, t0, ts, theta, x_r, x_i", ErrorCode::E0202, "")]
#[case("integrate_ode sho", ErrorCode::E0201, "")]
fn test_committed_structure(#[case] input: &str, #[case] code: ErrorCode, #[case] names: &str) {
    let parsed = parse(input);
    assert!(parsed.expr.is_none());
    let message = message_of(&parsed, code);
    if !names.is_empty() {
        assert!(message.contains(&format!("`{names}`")), "{message}");
    }
    assert!(
        !has_code(&parsed, ErrorCode::E0501),
        "committed failures must not degrade into name errors: {:?}",
        parsed.errors
    );
}

#[test]
fn test_extra_argument_is_rejected() {
    let parsed = parse("integrate_ode(sho, y0, t0, ts, theta, x_r, x_i, 1)");
    assert!(parsed.expr.is_none());
    assert!(has_code(&parsed, ErrorCode::E0202), "{:?}", parsed.errors);
}

#[test]
fn test_multiple_failures_all_reported() {
    // Wrong t0 type and parameter-driven ts at once.
    let parsed = parse("integrate_ode(sho, y0, ts, bad_ts, theta, x_r, x_i)");
    assert!(parsed.expr.is_none());
    assert!(has_code(&parsed, ErrorCode::E0405));
    assert!(has_code(&parsed, ErrorCode::E0601));
}
