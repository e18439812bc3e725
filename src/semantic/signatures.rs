//! Function-signature resolution.
//!
//! The grammar resolves calls through the [`SignatureResolver`] trait; the
//! table-backed [`FunctionTable`] is the standard implementation and the one
//! the test suites use. Matching promotes a scalar or array int argument to
//! real at equal dimensionality, nothing else.

use std::fmt::Write as _;

use indexmap::IndexMap;
use smol_str::SmolStr;
use thiserror::Error;

use crate::semantic::symbol_table::BlockContext;
use crate::syntax::ty::{BaseKind, TypeDescriptor};

/// A call failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("function `{name}` does not exist")]
    UnknownFunction { name: String },
    #[error("no signature of `{name}` matches argument types ({args})")]
    NoMatchingSignature { name: String, args: String },
}

/// A suffixed function family was called outside the blocks that allow it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallContextError {
    #[error(
        "`{name}` draws random numbers and may only be called in the \
         transformed data and generated quantities blocks"
    )]
    RngNotAllowed { name: String },
    #[error(
        "`{name}` modifies the log-probability accumulator and may only be \
         called in the transformed parameters and model blocks"
    )]
    LpNotAllowed { name: String },
}

/// Check the `*_rng` / `*_lp` block gating for a call by name.
pub fn check_call_context(name: &str, context: BlockContext) -> Result<(), CallContextError> {
    if name.ends_with("_rng") && !context.allows_rng() {
        return Err(CallContextError::RngNotAllowed { name: name.into() });
    }
    if name.ends_with("_lp") && !context.allows_lp() {
        return Err(CallContextError::LpNotAllowed { name: name.into() });
    }
    Ok(())
}

/// Maps `(name, argument types)` to a result type.
pub trait SignatureResolver {
    fn resolve(
        &self,
        name: &str,
        args: &[TypeDescriptor],
    ) -> Result<TypeDescriptor, SignatureError>;
}

/// One overload: parameter shapes and the result shape. Provenance plays no
/// part in matching.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub params: Vec<TypeDescriptor>,
    pub result: TypeDescriptor,
}

impl Signature {
    fn matches(&self, args: &[TypeDescriptor]) -> bool {
        self.params.len() == args.len()
            && self
                .params
                .iter()
                .zip(args)
                .all(|(param, arg)| accepts(param, arg))
    }
}

fn accepts(param: &TypeDescriptor, arg: &TypeDescriptor) -> bool {
    param.dims == arg.dims
        && (arg.base == param.base
            || (arg.base == BaseKind::Int && param.base == BaseKind::Real))
}

/// Overload table. Insertion order is preserved, so resolution and the
/// wording of mismatch diagnostics are deterministic.
#[derive(Debug, Default)]
pub struct FunctionTable {
    overloads: IndexMap<SmolStr, Vec<Signature>>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(
        &mut self,
        name: impl Into<SmolStr>,
        params: Vec<TypeDescriptor>,
        result: TypeDescriptor,
    ) {
        self.overloads
            .entry(name.into())
            .or_default()
            .push(Signature { params, result });
    }
}

impl SignatureResolver for FunctionTable {
    fn resolve(
        &self,
        name: &str,
        args: &[TypeDescriptor],
    ) -> Result<TypeDescriptor, SignatureError> {
        let overloads = self
            .overloads
            .get(name)
            .ok_or_else(|| SignatureError::UnknownFunction { name: name.into() })?;
        overloads
            .iter()
            .find(|sig| sig.matches(args))
            .map(|sig| sig.result)
            .ok_or_else(|| SignatureError::NoMatchingSignature {
                name: name.into(),
                args: format_args_list(args),
            })
    }
}

fn format_args_list(args: &[TypeDescriptor]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{arg}");
    }
    out
}
