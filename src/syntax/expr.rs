//! Typed expression tree.
//!
//! Expressions form a closed variant set; every consumer matches
//! exhaustively, so adding a built-in call form is a compile-checked change.
//! Operator applications desugar to [`Expr::Call`] nodes with the language's
//! canonical function names (`multiply`, `minus`, ...), with the result type
//! computed by the operator's own combination rule rather than signature
//! lookup.
//!
//! Nodes are immutable once constructed and own their sub-expressions.

use smol_str::SmolStr;

use super::index::SliceIndex;
use super::ty::TypeDescriptor;

/// A fully typed expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLiteral {
        value: i64,
        ty: TypeDescriptor,
    },
    RealLiteral {
        value: f64,
        ty: TypeDescriptor,
    },
    Variable {
        name: SmolStr,
        ty: TypeDescriptor,
    },
    /// User function call or desugared operator application.
    Call {
        name: SmolStr,
        args: Vec<Expr>,
        ty: TypeDescriptor,
    },
    /// One postfix occurrence of one or more bracketed dimension lists,
    /// e.g. `x[i, j][k]` applied in a single suffix step.
    Index {
        base: Box<Expr>,
        groups: Vec<Vec<Expr>>,
        ty: TypeDescriptor,
    },
    /// One postfix slice-index list, e.g. `x[1:3, ids, 2]`.
    Slice {
        base: Box<Expr>,
        indexes: Vec<SliceIndex>,
        ty: TypeDescriptor,
    },
    /// Postfix `'`.
    Transpose {
        base: Box<Expr>,
        ty: TypeDescriptor,
    },
    /// `integrate_ode(system, y0, t0, ts, theta, x, x_int)`.
    IntegrateOde {
        system: SmolStr,
        args: OdeArgs,
        ty: TypeDescriptor,
    },
    /// `integrate_ode_cvode(..., rel_tol, abs_tol, max_num_steps)`.
    IntegrateOdeCvode {
        system: SmolStr,
        args: OdeArgs,
        control: OdeControl,
        ty: TypeDescriptor,
    },
}

/// The six expression arguments shared by both ODE integrator forms.
#[derive(Debug, Clone, PartialEq)]
pub struct OdeArgs {
    pub y0: Box<Expr>,
    pub t0: Box<Expr>,
    pub ts: Box<Expr>,
    pub theta: Box<Expr>,
    pub x: Box<Expr>,
    pub x_int: Box<Expr>,
}

/// Tolerance and step-bound arguments of the extended integrator form.
#[derive(Debug, Clone, PartialEq)]
pub struct OdeControl {
    pub rel_tol: Box<Expr>,
    pub abs_tol: Box<Expr>,
    pub max_num_steps: Box<Expr>,
}

impl Expr {
    /// The node's type descriptor, attached when the node was built.
    pub fn ty(&self) -> TypeDescriptor {
        match self {
            Expr::IntLiteral { ty, .. }
            | Expr::RealLiteral { ty, .. }
            | Expr::Variable { ty, .. }
            | Expr::Call { ty, .. }
            | Expr::Index { ty, .. }
            | Expr::Slice { ty, .. }
            | Expr::Transpose { ty, .. }
            | Expr::IntegrateOde { ty, .. }
            | Expr::IntegrateOdeCvode { ty, .. } => *ty,
        }
    }

    /// True iff the value can only depend on input data.
    pub fn is_data_only(&self) -> bool {
        self.ty().data_only
    }
}
