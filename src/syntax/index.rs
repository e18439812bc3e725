//! Slice-index descriptors.
//!
//! Each descriptor classifies one dimension's index expression and has a
//! fixed effect on result dimensionality (see [`crate::syntax::ty::sliced`]).

use super::expr::Expr;
use super::ty::IndexShape;

/// One dimension's index inside a slice-index list.
#[derive(Debug, Clone, PartialEq)]
pub enum SliceIndex {
    /// `x[i]` with `i` of type int: consumes the dimension.
    Single(Expr),
    /// `x[a:b]`, open on either end (`x[:b]`, `x[a:]`, `x[:]`): preserves it.
    Range {
        lower: Option<Expr>,
        upper: Option<Expr>,
    },
    /// `x[ids]` with `ids` of type int[]: preserves the dimension.
    Multi(Expr),
}

impl SliceIndex {
    /// The descriptor's dimensionality-effect class.
    pub fn shape(&self) -> IndexShape {
        match self {
            SliceIndex::Single(_) => IndexShape::Single,
            SliceIndex::Range { .. } => IndexShape::Range,
            SliceIndex::Multi(_) => IndexShape::Multi,
        }
    }

    /// True iff every contained index expression is data-only; open range
    /// ends contribute nothing.
    pub fn is_data_only(&self) -> bool {
        match self {
            SliceIndex::Single(e) | SliceIndex::Multi(e) => e.is_data_only(),
            SliceIndex::Range { lower, upper } => {
                lower.as_ref().is_none_or(Expr::is_data_only)
                    && upper.as_ref().is_none_or(Expr::is_data_only)
            }
        }
    }
}
