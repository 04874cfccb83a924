//! Process-wide symbol table
//!
//! Several lowering units may run at once, so the table is shared by
//! reference and synchronizes internally. Each symbol is bound to exactly one
//! IR node; binding happens when a unit is published.

use crate::{NodeRef, SymbolData, SymbolError, SymbolId, SymbolKind, UnitId};
use dashmap::DashMap;
use log::trace;
use parking_lot::Mutex;
use rv_descriptors::DescriptorId;
use std::sync::atomic::{AtomicU32, Ordering};

/// A script lowered earlier in the same session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRecord {
    /// Script descriptor
    pub descriptor: DescriptorId,
    /// Script symbol
    pub symbol: SymbolId,
    /// Descriptor of the script's `this` receiver parameter
    pub this_receiver_descriptor: DescriptorId,
    /// Symbol of the lowered `this` receiver parameter
    pub this_receiver: SymbolId,
}

/// Descriptor → symbol registry shared by all lowering units
#[derive(Debug, Default)]
pub struct SymbolTable {
    next_symbol: AtomicU32,
    next_unit: AtomicU32,
    by_descriptor: DashMap<(SymbolKind, DescriptorId), SymbolId>,
    symbols: DashMap<SymbolId, SymbolData>,
    scripts: Mutex<Vec<ScriptRecord>>,
}

impl SymbolTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&self, kind: SymbolKind, descriptor: Option<DescriptorId>) -> SymbolId {
        let symbol = SymbolId(self.next_symbol.fetch_add(1, Ordering::Relaxed));
        self.symbols.insert(
            symbol,
            SymbolData {
                kind,
                descriptor,
                owner: None,
            },
        );
        symbol
    }

    /// Symbol for `descriptor`, created unbound on first use
    ///
    /// Used both by declarations and by references to declarations that may
    /// not have been lowered yet.
    pub fn reference(&self, kind: SymbolKind, descriptor: DescriptorId) -> SymbolId {
        *self
            .by_descriptor
            .entry((kind, descriptor))
            .or_insert_with(|| self.mint(kind, Some(descriptor)))
    }

    /// Symbol for a declaration about to be created
    ///
    /// # Errors
    ///
    /// [`SymbolError::AlreadyBound`] if a published node already declares it.
    pub fn declare(&self, kind: SymbolKind, descriptor: DescriptorId) -> Result<SymbolId, SymbolError> {
        let symbol = self.reference(kind, descriptor);
        match self.owner(symbol) {
            Some(owner) => Err(SymbolError::AlreadyBound {
                symbol,
                kind,
                owner,
            }),
            None => Ok(symbol),
        }
    }

    /// Symbol with no descriptor behind it
    pub fn fresh(&self, kind: SymbolKind) -> SymbolId {
        self.mint(kind, None)
    }

    /// Unregistered symbol remembering the descriptor it stands for
    ///
    /// Local declarations use this: they are looked up through scopes, not
    /// through the table.
    pub fn fresh_for(&self, kind: SymbolKind, descriptor: DescriptorId) -> SymbolId {
        self.mint(kind, Some(descriptor))
    }

    /// Symbol registered for `descriptor`
    ///
    /// # Errors
    ///
    /// [`SymbolError::Unregistered`] if nothing declared or referenced it.
    pub fn lookup(&self, kind: SymbolKind, descriptor: DescriptorId) -> Result<SymbolId, SymbolError> {
        self.by_descriptor
            .get(&(kind, descriptor))
            .map(|entry| *entry)
            .ok_or(SymbolError::Unregistered { kind, descriptor })
    }

    /// Bind `symbol` to the node declaring it
    ///
    /// # Errors
    ///
    /// Fails if the symbol is unknown or already bound.
    pub fn bind(&self, symbol: SymbolId, node: NodeRef) -> Result<(), SymbolError> {
        let mut data = self
            .symbols
            .get_mut(&symbol)
            .ok_or(SymbolError::Unknown(symbol))?;
        if let Some(owner) = data.owner {
            return Err(SymbolError::AlreadyBound {
                symbol,
                kind: data.kind,
                owner,
            });
        }
        data.owner = Some(node);
        trace!("bound {symbol:?} to {node:?}");
        Ok(())
    }

    /// Bind every pair, or none of them
    ///
    /// # Errors
    ///
    /// The first failing bind; bindings made by this call are undone.
    pub fn bind_all(&self, bindings: &[(SymbolId, NodeRef)]) -> Result<(), SymbolError> {
        for (position, (symbol, node)) in bindings.iter().enumerate() {
            if let Err(error) = self.bind(*symbol, *node) {
                for (bound, _) in &bindings[..position] {
                    self.unbind(*bound);
                }
                return Err(error);
            }
        }
        Ok(())
    }

    fn unbind(&self, symbol: SymbolId) {
        if let Some(mut data) = self.symbols.get_mut(&symbol) {
            data.owner = None;
        }
    }

    /// Node `symbol` is bound to
    pub fn owner(&self, symbol: SymbolId) -> Option<NodeRef> {
        self.symbols.get(&symbol).and_then(|data| data.owner)
    }

    /// Whether `symbol` owns a declaration
    pub fn is_bound(&self, symbol: SymbolId) -> bool {
        self.owner(symbol).is_some()
    }

    /// Everything known about `symbol`
    pub fn data(&self, symbol: SymbolId) -> Option<SymbolData> {
        self.symbols.get(&symbol).map(|data| *data)
    }

    /// Kind of `symbol`
    pub fn kind(&self, symbol: SymbolId) -> Option<SymbolKind> {
        self.symbols.get(&symbol).map(|data| data.kind)
    }

    /// Number of minted symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether there is nothing in it
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Identity for a new lowering unit
    pub fn new_unit(&self) -> UnitId {
        UnitId(self.next_unit.fetch_add(1, Ordering::Relaxed))
    }

    /// Remember a published script, for later scripts of the session
    pub fn register_script(&self, record: ScriptRecord) {
        self.scripts.lock().push(record);
    }

    /// Scripts published so far, oldest first
    pub fn scripts(&self) -> Vec<ScriptRecord> {
        self.scripts.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeclKind, IrBuilder, IrType, IrVariable, Origin};
    use rv_descriptors::{Descriptor, DescriptorKind, DescriptorStore, Ty, VariableDescriptor};
    use rv_intern::Interner;
    use rv_span::{FileId, Span};

    fn variables(count: usize) -> (DescriptorStore, Vec<DescriptorId>) {
        let interner = Interner::new();
        let mut store = DescriptorStore::new();
        let ids = (0..count)
            .map(|index| {
                store.alloc(Descriptor::new(
                    interner.intern(&format!("v{index}")),
                    DescriptorKind::Variable(VariableDescriptor {
                        ty: Ty::Dynamic,
                        is_var: false,
                    }),
                ))
            })
            .collect();
        (store, ids)
    }

    fn node(unit: UnitId) -> NodeRef {
        let interner = Interner::new();
        let mut builder = IrBuilder::new(unit, FileId(0));
        let decl = builder.alloc_decl(
            SymbolId(u32::MAX),
            Origin::TemporaryVariable,
            Span::default(),
            DeclKind::Variable(IrVariable {
                name: interner.intern("tmp"),
                ty: IrType::Dynamic,
                is_var: false,
                initializer: None,
            }),
        );
        NodeRef { unit, decl }
    }

    #[test]
    fn test_reference_is_idempotent() {
        let (_store, ids) = variables(1);
        let table = SymbolTable::new();
        let first = table.reference(SymbolKind::Property, ids[0]);
        let second = table.reference(SymbolKind::Property, ids[0]);
        let field = table.reference(SymbolKind::Field, ids[0]);
        assert_eq!(first, second);
        assert_ne!(first, field);
        assert_eq!(table.lookup(SymbolKind::Property, ids[0]), Ok(first));
    }

    #[test]
    fn test_lookup_unregistered() {
        let (_store, ids) = variables(1);
        let table = SymbolTable::new();
        assert_eq!(
            table.lookup(SymbolKind::Class, ids[0]),
            Err(SymbolError::Unregistered {
                kind: SymbolKind::Class,
                descriptor: ids[0],
            })
        );
    }

    #[test]
    fn test_bind_once() {
        let (_store, ids) = variables(1);
        let table = SymbolTable::new();
        let unit = table.new_unit();
        let symbol = table.declare(SymbolKind::Property, ids[0]).unwrap();
        table.bind(symbol, node(unit)).unwrap();

        assert!(table.is_bound(symbol));
        assert!(matches!(
            table.bind(symbol, node(unit)),
            Err(SymbolError::AlreadyBound { .. })
        ));
        assert!(matches!(
            table.declare(SymbolKind::Property, ids[0]),
            Err(SymbolError::AlreadyBound { .. })
        ));
    }

    #[test]
    fn test_bind_all_rolls_back() {
        let (_store, ids) = variables(2);
        let table = SymbolTable::new();
        let unit = table.new_unit();
        let first = table.reference(SymbolKind::Property, ids[0]);
        let second = table.reference(SymbolKind::Property, ids[1]);

        let result = table.bind_all(&[(first, node(unit)), (second, node(unit)), (first, node(unit))]);
        assert!(matches!(result, Err(SymbolError::AlreadyBound { .. })));
        assert!(!table.is_bound(first));
        assert!(!table.is_bound(second));
    }

    #[test]
    fn test_fresh_symbols_are_distinct() {
        let (_store, ids) = variables(1);
        let table = SymbolTable::new();
        let first = table.fresh(SymbolKind::Function);
        let second = table.fresh(SymbolKind::Function);
        let local = table.fresh_for(SymbolKind::ValueParameter, ids[0]);
        assert_ne!(first, second);
        assert_eq!(table.data(local).map(|data| data.descriptor), Some(Some(ids[0])));
        assert!(table.lookup(SymbolKind::ValueParameter, ids[0]).is_err());
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_concurrent_disjoint_references() {
        let (_store, ids) = variables(64);
        let table = SymbolTable::new();
        std::thread::scope(|scope| {
            for chunk in ids.chunks(16) {
                let table = &table;
                scope.spawn(move || {
                    for id in chunk {
                        table.reference(SymbolKind::Property, *id);
                    }
                });
            }
        });

        assert_eq!(table.len(), 64);
        for id in &ids {
            assert!(table.lookup(SymbolKind::Property, *id).is_ok());
        }
    }
}
