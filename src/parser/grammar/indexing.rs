//! Postfix suffixes: bracketed indexing, slice-index lists, and transpose.
//!
//! A bracket suffix is an ordered choice. The first alternative is one or
//! more dimension groups (`x[i, j][k]`), every index a scalar int; it is
//! collected greedily and fails softly, so `x[1:3]` or `x[ids]` falls back to
//! the second alternative, a committed slice-index list.

use text_size::TextSize;

use super::factor;
use super::required;
use crate::parser::errors::ErrorCode;
use crate::parser::lexer::TokenKind;
use crate::parser::parser::{Abort, ParseResult, Parser};
use crate::syntax::ty::{self, TypeError};
use crate::syntax::{Expr, SliceIndex};

pub(crate) fn postfix(p: &mut Parser<'_>) -> ParseResult<Expr> {
    let mut base = factor::factor(p)?;
    loop {
        match p.current_kind() {
            Some(TokenKind::LBracket) => base = bracket_suffix(p, base)?,
            Some(TokenKind::Apostrophe) => {
                let offset = p.current_offset();
                p.bump();
                let ty = match ty::transposed(&base.ty()) {
                    Ok(ty) => ty,
                    Err(e) => return Err(p.fatal(offset, ErrorCode::E0404, e.to_string())),
                };
                base = Expr::Transpose {
                    base: Box::new(base),
                    ty,
                };
            }
            _ => break,
        }
    }
    Ok(base)
}

fn bracket_suffix(p: &mut Parser<'_>, base: Expr) -> ParseResult<Expr> {
    let offset = p.current_offset();

    // Greedy dimension-group collection. A group that turns out not to be
    // all-int (or that hits range syntax) rewinds to its `[`; the leftover
    // bracket is then either the slice alternative below or, after at least
    // one group, a fresh suffix on the indexed result.
    let mut groups = Vec::new();
    while p.at(TokenKind::LBracket) {
        let mark = p.mark();
        match dim_group(p) {
            Ok(group) => groups.push(group),
            Err(Abort::Backtrack) => {
                p.reset(mark);
                break;
            }
            Err(fatal) => return Err(fatal),
        }
    }
    if !groups.is_empty() {
        let supplied = groups.iter().map(Vec::len).sum();
        let data_only = base.is_data_only() && groups.iter().flatten().all(Expr::is_data_only);
        let ty = match ty::indexed(&base.ty(), supplied, data_only) {
            Ok(ty) => ty,
            Err(e) => return Err(p.fatal(offset, ErrorCode::E0403, e.to_string())),
        };
        return Ok(Expr::Index {
            base: Box::new(base),
            groups,
            ty,
        });
    }

    slice_suffix(p, base)
}

/// One `[i, j, ...]` group of scalar-int indexes. Any deviation is a soft
/// failure; the caller rewinds and retries the bracket as a slice list.
fn dim_group(p: &mut Parser<'_>) -> ParseResult<Vec<Expr>> {
    p.bump();
    let mut dims = Vec::new();
    loop {
        let expr = super::expression(p)?;
        if !(expr.ty().is_int() || expr.ty().is_illegal()) {
            return Err(Abort::Backtrack);
        }
        dims.push(expr);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    if !p.eat(TokenKind::RBracket) {
        return Err(Abort::Backtrack);
    }
    Ok(dims)
}

/// Committed slice-index list: `x[1:3, ids, 2]`.
fn slice_suffix(p: &mut Parser<'_>, base: Expr) -> ParseResult<Expr> {
    let offset = p.current_offset();
    p.bump();
    let mut indexes = Vec::new();
    loop {
        indexes.push(slice_index(p)?);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    p.expect(
        TokenKind::RBracket,
        ErrorCode::E0203,
        "expected `]` to close the index list",
    )?;

    let shapes: Vec<_> = indexes.iter().map(SliceIndex::shape).collect();
    let data_only = base.is_data_only() && indexes.iter().all(SliceIndex::is_data_only);
    let ty = match ty::sliced(&base.ty(), &shapes, data_only) {
        Ok(ty) => ty,
        Err(e) => return Err(p.fatal(offset, ErrorCode::E0403, e.to_string())),
    };
    Ok(Expr::Slice {
        base: Box::new(base),
        indexes,
        ty,
    })
}

/// One index inside a slice list, classified by shape: an int consumes the
/// dimension, a range or an int array preserves it.
fn slice_index(p: &mut Parser<'_>) -> ParseResult<SliceIndex> {
    if p.eat(TokenKind::Colon) {
        let upper = optional_bound(p)?;
        return Ok(SliceIndex::Range { lower: None, upper });
    }

    let offset = p.current_offset();
    let expr = required(
        p,
        super::expression,
        "expected an index expression".into(),
    )?;
    if p.eat(TokenKind::Colon) {
        check_bound(p, offset, &expr)?;
        let upper = optional_bound(p)?;
        return Ok(SliceIndex::Range {
            lower: Some(expr),
            upper,
        });
    }

    let ty = expr.ty();
    if ty.is_int() || ty.is_illegal() {
        Ok(SliceIndex::Single(expr))
    } else if ty.is_int_array() {
        Ok(SliceIndex::Multi(expr))
    } else {
        Err(p.fatal(
            offset,
            ErrorCode::E0402,
            TypeError::NonIntegerIndex { ty }.to_string(),
        ))
    }
}

/// A range bound, absent when the range is open at that end (`x[a:]`,
/// `x[:b]`, `x[:]`).
fn optional_bound(p: &mut Parser<'_>) -> ParseResult<Option<Expr>> {
    if p.at(TokenKind::RBracket) || p.at(TokenKind::Comma) {
        return Ok(None);
    }
    let offset = p.current_offset();
    let expr = required(p, super::expression, "expected a range bound".into())?;
    check_bound(p, offset, &expr)?;
    Ok(Some(expr))
}

fn check_bound(p: &mut Parser<'_>, offset: TextSize, expr: &Expr) -> ParseResult<()> {
    let ty = expr.ty();
    if ty.is_int() || ty.is_illegal() {
        Ok(())
    } else {
        Err(p.fatal(
            offset,
            ErrorCode::E0402,
            TypeError::NonIntegerIndex { ty }.to_string(),
        ))
    }
}
