//! Semantic collaborators of the expression grammar: symbol lookup,
//! function-signature resolution, block-context gating, and ODE call
//! validation.

pub mod ode;
pub mod signatures;
pub mod symbol_table;

pub use signatures::{
    CallContextError, FunctionTable, Signature, SignatureError, SignatureResolver,
    check_call_context,
};
pub use symbol_table::{BlockContext, VarEntry, VarScope, VariableMap};
