//! # bml-core
//!
//! Core library for the BML probabilistic modeling language: lexer,
//! expression grammar, and inline type checking.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! semantic  → Symbol table, signature resolution, ODE call validation
//!   ↓
//! parser    → Logos lexer, recursive-descent grammar, diagnostics
//!   ↓
//! syntax    → Typed expression tree, type descriptors, index descriptors
//! ```
//!
//! Parsing and type checking are fused: every grammar rule attaches a type
//! descriptor to the node it builds, so a successful parse is already fully
//! typed and a failed type rule surfaces as a parse diagnostic at the
//! operator or argument that caused it.

// ============================================================================
// MODULES (dependency order: syntax → parser → semantic)
// ============================================================================

/// Typed expression tree, type descriptors, index descriptors
pub mod syntax;

/// Parser: Logos lexer, recursive-descent grammar, diagnostics
pub mod parser;

/// Semantic collaborators: symbol table, signatures, ODE validation
pub mod semantic;

// Re-export the parse entry points
pub use parser::{Parse, parse_expression, parse_term};

// Re-export the types those entry points traffic in
pub use parser::{Diagnostic, ErrorCode};
pub use semantic::{
    BlockContext, FunctionTable, SignatureResolver, VarScope, VariableMap,
};
pub use syntax::{
    BaseKind, Expr, OdeArgs, OdeControl, SliceIndex, TypeDescriptor,
};
