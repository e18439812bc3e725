//! Expression grammar for BML
//!
//! The precedence chain, loosest to tightest:
//!
//! ```text
//! expression → or → and → equality → relational → additive
//!     → term (* / % \ .* ./) → unary (- ! +) → exponentiation (^)
//!     → postfix (indexing, slicing, transpose) → factor
//! ```
//!
//! Every rule returns a typed node or an abort: `Backtrack` lets the caller
//! try the next ordered alternative, `Fatal` means a commit point was passed
//! and the diagnostic already sits in the sink. Operators desugar to call
//! nodes with canonical function names; their types come from the operator's
//! own combination rule, never from signature lookup.

mod factor;
mod indexing;
mod term;

use smol_str::SmolStr;

use super::errors::ErrorCode;
use super::lexer::TokenKind;
use super::parser::{Abort, ParseResult, Parser};
use crate::syntax::ty::{self, ArithOp, BaseKind, LogicalOp, TypeDescriptor};
use crate::syntax::Expr;

pub(crate) use term::term;

/// Full expression entry point; also what parenthesized sub-expressions and
/// argument lists recurse into.
pub(crate) fn expression(p: &mut Parser<'_>) -> ParseResult<Expr> {
    or_expression(p)
}

/// Parse the operand that must follow a binary operator; a non-match there
/// is a hard error, not a backtrack opportunity.
fn required(
    p: &mut Parser<'_>,
    rule: fn(&mut Parser<'_>) -> ParseResult<Expr>,
    message: String,
) -> ParseResult<Expr> {
    match rule(p) {
        Err(Abort::Backtrack) => {
            let offset = p.current_offset();
            Err(p.fatal(offset, ErrorCode::E0205, message))
        }
        other => other,
    }
}

/// Build the desugared node for a logical/comparison operator. A type
/// mismatch is reported and the node marked illegal; parsing continues.
fn logical_node(
    p: &mut Parser<'_>,
    op: LogicalOp,
    offset: text_size::TextSize,
    lhs: Expr,
    rhs: Expr,
) -> Expr {
    let ty = match ty::combine_logical(op, &lhs.ty(), &rhs.ty()) {
        Ok(ty) => ty,
        Err(e) => {
            p.report(offset, ErrorCode::E0401, e.to_string());
            TypeDescriptor::new(
                BaseKind::Illegal,
                0,
                lhs.ty().data_only && rhs.ty().data_only,
            )
        }
    };
    Expr::Call {
        name: SmolStr::new_static(op.canonical_name()),
        args: vec![lhs, rhs],
        ty,
    }
}

/// Build the desugared node for `+`/`-`. Same report-and-continue policy as
/// the logical operators.
fn additive_node(
    p: &mut Parser<'_>,
    op: ArithOp,
    offset: text_size::TextSize,
    lhs: Expr,
    rhs: Expr,
) -> Expr {
    let ty = match ty::combine_arithmetic(op, &lhs.ty(), &rhs.ty()) {
        Ok(ty) => ty,
        Err(e) => {
            p.report(offset, ErrorCode::E0401, e.to_string());
            TypeDescriptor::new(
                BaseKind::Illegal,
                0,
                lhs.ty().data_only && rhs.ty().data_only,
            )
        }
    };
    Expr::Call {
        name: SmolStr::new_static(op.canonical_name()),
        args: vec![lhs, rhs],
        ty,
    }
}

fn or_expression(p: &mut Parser<'_>) -> ParseResult<Expr> {
    let mut lhs = and_expression(p)?;
    while p.at(TokenKind::PipePipe) {
        let offset = p.current_offset();
        p.bump();
        let rhs = required(p, and_expression, "expected an expression after `||`".into())?;
        lhs = logical_node(p, LogicalOp::Or, offset, lhs, rhs);
    }
    Ok(lhs)
}

fn and_expression(p: &mut Parser<'_>) -> ParseResult<Expr> {
    let mut lhs = equality_expression(p)?;
    while p.at(TokenKind::AmpAmp) {
        let offset = p.current_offset();
        p.bump();
        let rhs = required(
            p,
            equality_expression,
            "expected an expression after `&&`".into(),
        )?;
        lhs = logical_node(p, LogicalOp::And, offset, lhs, rhs);
    }
    Ok(lhs)
}

fn equality_expression(p: &mut Parser<'_>) -> ParseResult<Expr> {
    let mut lhs = relational_expression(p)?;
    loop {
        let op = match p.current_kind() {
            Some(TokenKind::EqEq) => LogicalOp::Eq,
            Some(TokenKind::BangEq) => LogicalOp::Neq,
            _ => break,
        };
        let offset = p.current_offset();
        p.bump();
        let rhs = required(
            p,
            relational_expression,
            format!("expected an expression after `{}`", op.symbol()),
        )?;
        lhs = logical_node(p, op, offset, lhs, rhs);
    }
    Ok(lhs)
}

fn relational_expression(p: &mut Parser<'_>) -> ParseResult<Expr> {
    let mut lhs = additive_expression(p)?;
    loop {
        let op = match p.current_kind() {
            Some(TokenKind::Lt) => LogicalOp::Lt,
            Some(TokenKind::LtEq) => LogicalOp::Lte,
            Some(TokenKind::Gt) => LogicalOp::Gt,
            Some(TokenKind::GtEq) => LogicalOp::Gte,
            _ => break,
        };
        let offset = p.current_offset();
        p.bump();
        let rhs = required(
            p,
            additive_expression,
            format!("expected an expression after `{}`", op.symbol()),
        )?;
        lhs = logical_node(p, op, offset, lhs, rhs);
    }
    Ok(lhs)
}

fn additive_expression(p: &mut Parser<'_>) -> ParseResult<Expr> {
    let mut lhs = term(p)?;
    loop {
        let op = match p.current_kind() {
            Some(TokenKind::Plus) => ArithOp::Add,
            Some(TokenKind::Minus) => ArithOp::Sub,
            _ => break,
        };
        let offset = p.current_offset();
        p.bump();
        let rhs = required(
            p,
            term,
            format!("expected an expression after `{}`", op.symbol()),
        )?;
        lhs = additive_node(p, op, offset, lhs, rhs);
    }
    Ok(lhs)
}
