//! Semantic validation of the ODE integrator call forms.
//!
//! Both forms share six leading arguments; the extended form adds three
//! solver controls. Every failure names the argument it concerns. Arguments
//! whose type is already illegal are skipped, their error was reported where
//! it happened.

use crate::parser::errors::ErrorCode;
use crate::semantic::signatures::SignatureResolver;
use crate::syntax::ty::{BaseKind, TypeDescriptor};
use crate::syntax::{Expr, OdeArgs, OdeControl};

/// The signature every system function must resolve against:
/// `(real, real[], real[], real[], int[]) -> real[]`.
fn system_params() -> [TypeDescriptor; 5] {
    [
        TypeDescriptor::real(false),
        TypeDescriptor::new(BaseKind::Real, 1, false),
        TypeDescriptor::new(BaseKind::Real, 1, false),
        TypeDescriptor::new(BaseKind::Real, 1, false),
        TypeDescriptor::new(BaseKind::Int, 1, false),
    ]
}

/// Validate one integrator call. Returns every failure found; an empty
/// vector means the call is well formed.
pub fn validate(
    form: &str,
    system: &str,
    args: &OdeArgs,
    control: Option<&OdeControl>,
    functions: &dyn SignatureResolver,
) -> Vec<(ErrorCode, String)> {
    let mut failures = Vec::new();

    match functions.resolve(system, &system_params()) {
        Ok(result) if result.base == BaseKind::Real && result.dims == 1 => {}
        _ => failures.push((
            ErrorCode::E0303,
            format!(
                "system function `{system}` passed to `{form}` must have the \
                 signature (real, real[], real[], real[], int[]) -> real[]"
            ),
        )),
    }

    check_real_array(&mut failures, form, "y0", &args.y0);
    check_scalar(&mut failures, form, "t0", &args.t0);
    check_real_array(&mut failures, form, "ts", &args.ts);
    check_real_array(&mut failures, form, "theta", &args.theta);
    check_real_array(&mut failures, form, "x", &args.x);
    check_int_array(&mut failures, form, "x_int", &args.x_int);

    check_data_only(&mut failures, form, "t0", &args.t0);
    check_data_only(&mut failures, form, "ts", &args.ts);
    check_data_only(&mut failures, form, "x", &args.x);
    check_data_only(&mut failures, form, "x_int", &args.x_int);

    if let Some(control) = control {
        check_scalar(&mut failures, form, "rel_tol", &control.rel_tol);
        check_scalar(&mut failures, form, "abs_tol", &control.abs_tol);
        check_scalar(&mut failures, form, "max_num_steps", &control.max_num_steps);
        check_data_only(&mut failures, form, "rel_tol", &control.rel_tol);
        check_data_only(&mut failures, form, "abs_tol", &control.abs_tol);
        check_data_only(&mut failures, form, "max_num_steps", &control.max_num_steps);
    }

    failures
}

fn check_real_array(out: &mut Vec<(ErrorCode, String)>, form: &str, name: &str, arg: &Expr) {
    let ty = arg.ty();
    if ty.is_illegal() {
        return;
    }
    let ok = ty.dims == 1 && matches!(ty.base, BaseKind::Real | BaseKind::Int);
    if !ok {
        out.push((
            ErrorCode::E0405,
            format!("`{name}` in call to `{form}` must have type real[]; found {ty}"),
        ));
    }
}

fn check_int_array(out: &mut Vec<(ErrorCode, String)>, form: &str, name: &str, arg: &Expr) {
    let ty = arg.ty();
    if ty.is_illegal() {
        return;
    }
    if !ty.is_int_array() {
        out.push((
            ErrorCode::E0405,
            format!("`{name}` in call to `{form}` must have type int[]; found {ty}"),
        ));
    }
}

fn check_scalar(out: &mut Vec<(ErrorCode, String)>, form: &str, name: &str, arg: &Expr) {
    let ty = arg.ty();
    if ty.is_illegal() {
        return;
    }
    if !ty.is_primitive() {
        out.push((
            ErrorCode::E0405,
            format!("`{name}` in call to `{form}` must have type int or real; found {ty}"),
        ));
    }
}

fn check_data_only(out: &mut Vec<(ErrorCode, String)>, form: &str, name: &str, arg: &Expr) {
    let ty = arg.ty();
    if ty.is_illegal() {
        return;
    }
    if !ty.data_only {
        out.push((
            ErrorCode::E0601,
            format!(
                "`{name}` in call to `{form}` must be data-only; it cannot \
                 depend on model parameters"
            ),
        ));
    }
}
