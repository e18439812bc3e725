//! Term-level grammar: the multiplicative chain, unary prefixes, and
//! right-associative exponentiation.
//!
//! `a * -b` parses as `a * (-b)` because each multiplicative operand is a
//! full unary expression; `-a^b` parses as `-(a^b)` because the unary rule
//! sits above exponentiation in the chain.

use smol_str::SmolStr;
use text_size::TextSize;

use super::indexing;
use super::required;
use crate::parser::errors::ErrorCode;
use crate::parser::lexer::TokenKind;
use crate::parser::parser::{Abort, ParseResult, Parser};
use crate::syntax::ty::{self, ArithOp, BaseKind, TypeDescriptor, UnaryOp};
use crate::syntax::Expr;

/// Multiplicative chain, left-associative: `* / % \ .* ./`.
///
/// `*`, `/`, `.*`, `./` report type mismatches and mark the node illegal so
/// parsing can continue; `%` and `\` abort the alternative outright.
pub(crate) fn term(p: &mut Parser<'_>) -> ParseResult<Expr> {
    let mut lhs = unary(p)?;
    loop {
        let op = match p.current_kind() {
            Some(TokenKind::Star) => ArithOp::Mul,
            Some(TokenKind::Slash) => ArithOp::Div,
            Some(TokenKind::Percent) => ArithOp::Mod,
            Some(TokenKind::Backslash) => ArithOp::LeftDiv,
            Some(TokenKind::DotStar) => ArithOp::EltMul,
            Some(TokenKind::DotSlash) => ArithOp::EltDiv,
            _ => break,
        };
        let offset = p.current_offset();
        p.bump();
        let rhs = required(
            p,
            unary,
            format!("expected an expression after `{}`", op.symbol()),
        )?;
        lhs = multiplicative_node(p, op, offset, lhs, rhs)?;
    }
    Ok(lhs)
}

fn multiplicative_node(
    p: &mut Parser<'_>,
    op: ArithOp,
    offset: TextSize,
    lhs: Expr,
    rhs: Expr,
) -> ParseResult<Expr> {
    let ty = match ty::combine_arithmetic(op, &lhs.ty(), &rhs.ty()) {
        Ok(ty) => ty,
        Err(e) => match op {
            // Integer-only modulus and the linear-solve operand ordering are
            // final: a mismatch fails the alternative.
            ArithOp::Mod | ArithOp::LeftDiv => {
                return Err(p.fatal(offset, ErrorCode::E0401, e.to_string()));
            }
            _ => {
                p.report(offset, ErrorCode::E0401, e.to_string());
                TypeDescriptor::new(
                    BaseKind::Illegal,
                    0,
                    lhs.ty().data_only && rhs.ty().data_only,
                )
            }
        },
    };
    Ok(Expr::Call {
        name: SmolStr::new_static(op.canonical_name()),
        args: vec![lhs, rhs],
        ty,
    })
}

/// Unary prefixes. `+` is the identity and builds no node; `-` fails the
/// alternative on a bad operand kind; `!` reports and marks illegal.
fn unary(p: &mut Parser<'_>) -> ParseResult<Expr> {
    match p.current_kind() {
        Some(TokenKind::Minus) => prefix(p, UnaryOp::Minus),
        Some(TokenKind::Bang) => prefix(p, UnaryOp::LogicalNot),
        Some(TokenKind::Plus) => {
            let mark = p.mark();
            p.bump();
            match unary(p) {
                Err(Abort::Backtrack) => {
                    p.reset(mark);
                    Err(Abort::Backtrack)
                }
                other => other,
            }
        }
        _ => exponentiated(p),
    }
}

fn prefix(p: &mut Parser<'_>, op: UnaryOp) -> ParseResult<Expr> {
    let mark = p.mark();
    let offset = p.current_offset();
    p.bump();
    let operand = match unary(p) {
        Ok(e) => e,
        Err(Abort::Backtrack) => {
            p.reset(mark);
            return Err(Abort::Backtrack);
        }
        Err(fatal) => return Err(fatal),
    };
    let ty = match ty::combine_unary(op, &operand.ty()) {
        Ok(ty) => ty,
        Err(e) => match op {
            UnaryOp::Minus => return Err(p.fatal(offset, ErrorCode::E0401, e.to_string())),
            UnaryOp::LogicalNot => {
                p.report(offset, ErrorCode::E0401, e.to_string());
                TypeDescriptor::new(BaseKind::Illegal, 0, operand.ty().data_only)
            }
        },
    };
    Ok(Expr::Call {
        name: SmolStr::new_static(op.canonical_name()),
        args: vec![operand],
        ty,
    })
}

/// Right-associative `^`: the right operand is a full unary expression, so
/// `a^b^c` groups as `a^(b^c)`. Once `^` is seen the operand and the operand
/// kinds are committed.
fn exponentiated(p: &mut Parser<'_>) -> ParseResult<Expr> {
    let base = indexing::postfix(p)?;
    if !p.at(TokenKind::Caret) {
        return Ok(base);
    }
    let offset = p.current_offset();
    p.bump();
    let rhs = required(p, unary, "expected an expression after `^`".into())?;
    match ty::combine_arithmetic(ArithOp::Pow, &base.ty(), &rhs.ty()) {
        Ok(ty) => Ok(Expr::Call {
            name: SmolStr::new_static(ArithOp::Pow.canonical_name()),
            args: vec![base, rhs],
            ty,
        }),
        Err(e) => Err(p.fatal(offset, ErrorCode::E0401, e.to_string())),
    }
}
