//! Primary expressions: literals, variables, function calls, parenthesized
//! sub-expressions, and the two privileged ODE integrator call forms.
//!
//! The alternatives are ordered; everything before the parenthesized case is
//! decided by one or two tokens of lookahead, so backtracking out of a factor
//! only ever happens before any input is consumed.

use smol_str::SmolStr;

use super::required;
use crate::parser::errors::ErrorCode;
use crate::parser::lexer::TokenKind;
use crate::parser::parser::{Abort, ParseResult, Parser};
use crate::semantic::ode;
use crate::semantic::signatures::check_call_context;
use crate::syntax::ty::{BaseKind, TypeDescriptor};
use crate::syntax::{Expr, OdeArgs, OdeControl};

pub(crate) fn factor(p: &mut Parser<'_>) -> ParseResult<Expr> {
    match p.current_kind() {
        Some(kind @ (TokenKind::IntegrateOdeKw | TokenKind::IntegrateOdeCvodeKw)) => {
            integrate_ode(p, kind)
        }
        Some(TokenKind::Ident) if p.nth_kind(1) == Some(TokenKind::LParen) => call(p),
        Some(TokenKind::Ident) => variable(p),
        Some(TokenKind::IntLiteral) => int_literal(p),
        Some(TokenKind::RealLiteral) => real_literal(p),
        Some(TokenKind::LParen) => {
            p.bump();
            let expr = required(
                p,
                super::expression,
                "expected an expression after `(`".into(),
            )?;
            p.expect(
                TokenKind::RParen,
                ErrorCode::E0202,
                "expected `)` to close the parenthesized expression",
            )?;
            Ok(expr)
        }
        Some(TokenKind::Error) => {
            let offset = p.current_offset();
            let text = p.current_text();
            Err(p.fatal(
                offset,
                ErrorCode::E0101,
                format!("invalid character `{text}`"),
            ))
        }
        _ => Err(Abort::Backtrack),
    }
}

fn variable(p: &mut Parser<'_>) -> ParseResult<Expr> {
    let offset = p.current_offset();
    let name = p.current_text();
    match p.symbols.lookup(name) {
        Some(entry) => {
            let ty = entry.descriptor();
            let name = SmolStr::new(name);
            p.bump();
            Ok(Expr::Variable { name, ty })
        }
        None => Err(p.fatal(
            offset,
            ErrorCode::E0501,
            format!("variable `{name}` does not exist"),
        )),
    }
}

fn int_literal(p: &mut Parser<'_>) -> ParseResult<Expr> {
    let offset = p.current_offset();
    let text = p.current_text();
    match text.parse::<i64>() {
        Ok(value) => {
            p.bump();
            Ok(Expr::IntLiteral {
                value,
                ty: TypeDescriptor::int(true),
            })
        }
        Err(_) => Err(p.fatal(
            offset,
            ErrorCode::E0102,
            format!("integer literal `{text}` is out of range"),
        )),
    }
}

fn real_literal(p: &mut Parser<'_>) -> ParseResult<Expr> {
    let offset = p.current_offset();
    let text = p.current_text();
    match text.parse::<f64>() {
        Ok(value) => {
            p.bump();
            Ok(Expr::RealLiteral {
                value,
                ty: TypeDescriptor::real(true),
            })
        }
        Err(_) => Err(p.fatal(
            offset,
            ErrorCode::E0102,
            format!("invalid numeric literal `{text}`"),
        )),
    }
}

/// `name(arg, ...)`. Once the opening parenthesis is seen the call is
/// committed; argument types feed signature resolution unless one of them is
/// already illegal, in which case resolution is skipped and the call is
/// marked illegal without a second report.
fn call(p: &mut Parser<'_>) -> ParseResult<Expr> {
    let offset = p.current_offset();
    let name = SmolStr::new(p.current_text());
    p.bump();
    p.bump();

    let mut args = Vec::new();
    if !p.at(TokenKind::RParen) {
        loop {
            let arg = match super::expression(p) {
                Ok(arg) => arg,
                Err(Abort::Backtrack) => {
                    let at = p.current_offset();
                    return Err(p.fatal(
                        at,
                        ErrorCode::E0302,
                        format!("malformed argument in call to `{name}`"),
                    ));
                }
                Err(fatal) => return Err(fatal),
            };
            args.push(arg);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
    }
    p.expect(
        TokenKind::RParen,
        ErrorCode::E0202,
        format!("expected `)` to close the call to `{name}`"),
    )?;

    if let Err(e) = check_call_context(&name, p.context) {
        return Err(p.fatal(offset, ErrorCode::E0304, e.to_string()));
    }

    let data_only = args.iter().all(Expr::is_data_only);
    let ty = if args.iter().any(|a| a.ty().is_illegal()) {
        TypeDescriptor::illegal(data_only)
    } else {
        let arg_types: Vec<_> = args.iter().map(Expr::ty).collect();
        match p.functions.resolve(&name, &arg_types) {
            Ok(result) => TypeDescriptor::new(result.base, result.dims, data_only),
            Err(e) => return Err(p.fatal(offset, ErrorCode::E0301, e.to_string())),
        }
    };
    Ok(Expr::Call { name, args, ty })
}

/// The fixed-arity integrator forms. Everything after the keyword is
/// committed: the argument list has a known shape and each slot is named in
/// its diagnostics.
fn integrate_ode(p: &mut Parser<'_>, keyword: TokenKind) -> ParseResult<Expr> {
    let form = if keyword == TokenKind::IntegrateOdeCvodeKw {
        "integrate_ode_cvode"
    } else {
        "integrate_ode"
    };
    let offset = p.current_offset();
    p.bump();
    p.expect(
        TokenKind::LParen,
        ErrorCode::E0201,
        format!("expected `(` after `{form}`"),
    )?;

    if !p.at(TokenKind::Ident) {
        let at = p.current_offset();
        return Err(p.fatal(
            at,
            ErrorCode::E0303,
            format!("expected the name of the system function in `{form}`"),
        ));
    }
    let system = SmolStr::new(p.current_text());
    p.bump();

    let args = OdeArgs {
        y0: Box::new(ode_arg(p, form, "y0")?),
        t0: Box::new(ode_arg(p, form, "t0")?),
        ts: Box::new(ode_arg(p, form, "ts")?),
        theta: Box::new(ode_arg(p, form, "theta")?),
        x: Box::new(ode_arg(p, form, "x")?),
        x_int: Box::new(ode_arg(p, form, "x_int")?),
    };
    let control = if keyword == TokenKind::IntegrateOdeCvodeKw {
        Some(OdeControl {
            rel_tol: Box::new(ode_arg(p, form, "rel_tol")?),
            abs_tol: Box::new(ode_arg(p, form, "abs_tol")?),
            max_num_steps: Box::new(ode_arg(p, form, "max_num_steps")?),
        })
    } else {
        None
    };
    p.expect(
        TokenKind::RParen,
        ErrorCode::E0202,
        format!("expected `)` to close the call to `{form}`"),
    )?;

    let failures = ode::validate(form, &system, &args, control.as_ref(), p.functions);
    if !failures.is_empty() {
        for (code, message) in failures {
            p.report(offset, code, message);
        }
        return Err(Abort::Fatal);
    }

    // Result: one row of solutions per requested time, never data-only.
    let ty = TypeDescriptor::new(BaseKind::Real, 2, false);
    Ok(match control {
        Some(control) => Expr::IntegrateOdeCvode {
            system,
            args,
            control,
            ty,
        },
        None => Expr::IntegrateOde { system, args, ty },
    })
}

fn ode_arg(p: &mut Parser<'_>, form: &str, name: &str) -> ParseResult<Expr> {
    p.expect(
        TokenKind::Comma,
        ErrorCode::E0204,
        format!("expected `,` before `{name}` in call to `{form}`"),
    )?;
    required(
        p,
        super::expression,
        format!("expected an expression for `{name}` in call to `{form}`"),
    )
}
