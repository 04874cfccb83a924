//! Scoped local symbols of one lowering unit
//!
//! Value parameters (receivers included) and variables are not registered in
//! the process-wide table: they are visible only while their scope is open.

use crate::{SymbolId, SymbolKind, SymbolTable};
use log::trace;
use rustc_hash::FxHashMap;
use rv_descriptors::DescriptorId;

#[derive(Debug, Default)]
struct LocalScope {
    value_parameters: FxHashMap<DescriptorId, SymbolId>,
    variables: FxHashMap<DescriptorId, SymbolId>,
}

/// Stack of local scopes
#[derive(Debug)]
pub struct LocalSymbols {
    scopes: Vec<LocalScope>,
}

impl LocalSymbols {
    /// Create a stack holding one root scope
    pub fn new() -> Self {
        Self {
            scopes: vec![LocalScope::default()],
        }
    }

    /// Open a nested scope
    pub fn enter_scope(&mut self) {
        self.scopes.push(LocalScope::default());
    }

    /// Close the innermost scope; the root scope is never closed
    pub fn leave_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Number of open scopes, the root included
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn innermost(&mut self) -> &mut LocalScope {
        if self.scopes.is_empty() {
            self.scopes.push(LocalScope::default());
        }
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Mint a value parameter symbol for `descriptor` in the innermost scope
    ///
    /// A later declaration of the same descriptor shadows the earlier one.
    pub fn declare_value_parameter(
        &mut self,
        symbols: &SymbolTable,
        descriptor: DescriptorId,
    ) -> SymbolId {
        let symbol = symbols.fresh_for(SymbolKind::ValueParameter, descriptor);
        self.introduce_value_parameter(descriptor, symbol);
        symbol
    }

    /// Make an existing value parameter symbol visible in the innermost scope
    pub fn introduce_value_parameter(&mut self, descriptor: DescriptorId, symbol: SymbolId) {
        trace!("value parameter {descriptor:?} -> {symbol:?}");
        self.innermost().value_parameters.insert(descriptor, symbol);
    }

    /// Innermost value parameter symbol for `descriptor`
    pub fn value_parameter(&self, descriptor: DescriptorId) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.value_parameters.get(&descriptor).copied())
    }

    /// Mint a variable symbol for `descriptor` in the innermost scope
    pub fn declare_variable(&mut self, symbols: &SymbolTable, descriptor: DescriptorId) -> SymbolId {
        let symbol = symbols.fresh_for(SymbolKind::Variable, descriptor);
        self.innermost().variables.insert(descriptor, symbol);
        symbol
    }

    /// Innermost variable symbol for `descriptor`
    pub fn variable(&self, descriptor: DescriptorId) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.variables.get(&descriptor).copied())
    }
}

impl Default for LocalSymbols {
    fn default() -> Self {
        Self::new()
    }
}
