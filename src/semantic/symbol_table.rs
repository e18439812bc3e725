//! Declared-variable lookup and block contexts.
//!
//! The expression grammar only reads the symbol table; declarations come from
//! the enclosing program grammar. A variable's scope seeds the data-only
//! provenance flag: values declared in the data blocks can never depend on a
//! model parameter, everything else can.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::syntax::ty::{BaseKind, TypeDescriptor};

/// Declaration scope of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarScope {
    Data,
    TransformedData,
    Parameters,
    TransformedParameters,
    Model,
    GeneratedQuantities,
    Local,
}

impl VarScope {
    /// Values from the data blocks are fixed once the data is read.
    pub fn is_data(self) -> bool {
        matches!(self, VarScope::Data | VarScope::TransformedData)
    }
}

/// Block a piece of source is being parsed inside. Gates the suffixed
/// function-name families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockContext {
    Data,
    TransformedData,
    Parameters,
    TransformedParameters,
    Model,
    GeneratedQuantities,
}

impl BlockContext {
    /// `*_rng` functions re-randomize on every evaluation, so they are only
    /// callable where the value is not part of the density.
    pub fn allows_rng(self) -> bool {
        matches!(
            self,
            BlockContext::TransformedData | BlockContext::GeneratedQuantities
        )
    }

    /// `*_lp` functions touch the log-probability accumulator, which only
    /// exists while the density is being built.
    pub fn allows_lp(self) -> bool {
        matches!(self, BlockContext::TransformedParameters | BlockContext::Model)
    }
}

/// One declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarEntry {
    pub base: BaseKind,
    pub dims: usize,
    pub scope: VarScope,
}

impl VarEntry {
    /// The type descriptor a use of this variable carries.
    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::new(self.base, self.dims, self.scope.is_data())
    }
}

/// Identifier → declaration map.
#[derive(Debug, Default)]
pub struct VariableMap {
    entries: FxHashMap<SmolStr, VarEntry>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(
        &mut self,
        name: impl Into<SmolStr>,
        base: BaseKind,
        dims: usize,
        scope: VarScope,
    ) {
        self.entries.insert(name.into(), VarEntry { base, dims, scope });
    }

    pub fn lookup(&self, name: &str) -> Option<&VarEntry> {
        self.entries.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_seeds_data_only() {
        let mut map = VariableMap::new();
        map.declare("n", BaseKind::Int, 0, VarScope::Data);
        map.declare("sigma", BaseKind::Real, 0, VarScope::Parameters);

        assert!(map.lookup("n").unwrap().descriptor().data_only);
        assert!(!map.lookup("sigma").unwrap().descriptor().data_only);
        assert!(map.lookup("missing").is_none());
    }

    #[test]
    fn test_block_gating() {
        assert!(BlockContext::GeneratedQuantities.allows_rng());
        assert!(BlockContext::TransformedData.allows_rng());
        assert!(!BlockContext::Model.allows_rng());

        assert!(BlockContext::Model.allows_lp());
        assert!(BlockContext::TransformedParameters.allows_lp());
        assert!(!BlockContext::GeneratedQuantities.allows_lp());
    }
}
