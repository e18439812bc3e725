//! Syntax layer: the typed expression tree and the type descriptors the
//! parser attaches to every node as it is built.

pub mod expr;
pub mod index;
pub mod ty;

pub use expr::{Expr, OdeArgs, OdeControl};
pub use index::SliceIndex;
pub use ty::{ArithOp, BaseKind, IndexShape, LogicalOp, TypeDescriptor, TypeError, UnaryOp};
