//! Scope of members reachable through a delegate
//!
//! `class C(d: I) : I by d` gets a copy of every member of `I` that forwards
//! to `d`. This scope produces those copies on demand: each lookup of a
//! named function or ordinary property yields a new member with a fresh
//! symbol, open modality and a placeholder owner, pointing back at the
//! original through `overridden_symbol`. Everything else is answered by the
//! use-site scope unchanged.

use crate::{
    FunctionKind, FunctionMember, MemberOwner, MemberScope, ProcessorAction, PropertyKind,
    PropertyMember,
};
use indexmap::IndexSet;
use log::trace;
use rv_descriptors::Modality;
use rv_intern::Name;
use rv_ir::{Origin, SymbolKind, SymbolTable};
use std::sync::Arc;

/// Use-site scope seen through a delegate
pub struct DelegatedMemberScope<'a> {
    use_site: &'a dyn MemberScope,
    symbols: &'a SymbolTable,
    owner: MemberOwner,
}

impl<'a> DelegatedMemberScope<'a> {
    /// Wrap `use_site`; synthesized symbols are minted in `symbols`
    pub fn new(use_site: &'a dyn MemberScope, symbols: &'a SymbolTable) -> Self {
        Self {
            use_site,
            symbols,
            owner: MemberOwner::Synthetic(symbols.fresh(SymbolKind::Class)),
        }
    }

    /// Placeholder owner of every synthesized member
    pub fn owner(&self) -> MemberOwner {
        self.owner
    }

    fn delegate_function(&self, original: &FunctionMember) -> FunctionMember {
        FunctionMember {
            symbol: self.symbols.fresh(SymbolKind::Function),
            kind: original.kind,
            name: original.name,
            owner: self.owner,
            origin: Origin::Delegated,
            visibility: original.visibility,
            modality: Modality::Open,
            return_type: original.return_type.clone(),
            receiver_type: original.receiver_type.clone(),
            type_parameters: original.type_parameters.clone(),
            value_parameters: original.value_parameters.clone(),
            annotations: original.annotations.clone(),
            overridden_symbol: Some(original.symbol),
        }
    }

    fn delegate_property(&self, original: &PropertyMember) -> PropertyMember {
        PropertyMember {
            symbol: self.symbols.fresh(SymbolKind::Property),
            kind: original.kind,
            name: original.name,
            owner: self.owner,
            origin: Origin::Delegated,
            visibility: original.visibility,
            modality: Modality::Open,
            is_var: original.is_var,
            return_type: original.return_type.clone(),
            receiver_type: original.receiver_type.clone(),
            type_parameters: original.type_parameters.clone(),
            annotations: original.annotations.clone(),
            overridden_symbol: Some(original.symbol),
        }
    }
}

impl MemberScope for DelegatedMemberScope<'_> {
    fn process_functions_by_name(&self, name: Name, processor: &mut dyn FnMut(&Arc<FunctionMember>)) {
        self.use_site.process_functions_by_name(name, &mut |function| {
            if function.kind != FunctionKind::Named {
                processor(function);
                return;
            }
            let delegated = Arc::new(self.delegate_function(function));
            trace!("delegated {:?} as {:?}", function.symbol, delegated.symbol);
            processor(&delegated);
        });
    }

    fn process_properties_by_name(&self, name: Name, processor: &mut dyn FnMut(&Arc<PropertyMember>)) {
        self.use_site.process_properties_by_name(name, &mut |property| {
            if property.kind != PropertyKind::Property {
                processor(property);
                return;
            }
            let delegated = Arc::new(self.delegate_property(property));
            trace!("delegated {:?} as {:?}", property.symbol, delegated.symbol);
            processor(&delegated);
        });
    }

    fn process_overridden_functions_with_base_scope(
        &self,
        function: &FunctionMember,
        processor: &mut dyn FnMut(&Arc<FunctionMember>, &dyn MemberScope) -> ProcessorAction,
    ) -> ProcessorAction {
        self.use_site
            .process_overridden_functions_with_base_scope(function, processor)
    }

    fn process_overridden_properties_with_base_scope(
        &self,
        property: &PropertyMember,
        processor: &mut dyn FnMut(&Arc<PropertyMember>, &dyn MemberScope) -> ProcessorAction,
    ) -> ProcessorAction {
        self.use_site
            .process_overridden_properties_with_base_scope(property, processor)
    }

    fn callable_names(&self) -> IndexSet<Name> {
        self.use_site.callable_names()
    }

    fn classifier_names(&self) -> IndexSet<Name> {
        self.use_site.classifier_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClassMemberScope;
    use rv_descriptors::Visibility;
    use rv_intern::Interner;
    use rv_ir::IrType;

    fn function(symbols: &SymbolTable, name: Name, kind: FunctionKind) -> FunctionMember {
        FunctionMember {
            symbol: symbols.fresh(SymbolKind::Function),
            kind,
            name,
            owner: MemberOwner::Class(symbols.fresh(SymbolKind::Class)),
            origin: Origin::Defined,
            visibility: Visibility::Internal,
            modality: Modality::Abstract,
            return_type: IrType::Dynamic,
            receiver_type: None,
            type_parameters: Vec::new(),
            value_parameters: Vec::new(),
            annotations: Vec::new(),
            overridden_symbol: None,
        }
    }

    #[test]
    fn test_named_function_is_copied() {
        let interner = Interner::new();
        let symbols = SymbolTable::new();
        let name = interner.intern("f");
        let mut use_site = ClassMemberScope::new();
        let original = use_site.add_function(function(&symbols, name, FunctionKind::Named));

        let scope = DelegatedMemberScope::new(&use_site, &symbols);
        let mut seen = Vec::new();
        scope.process_functions_by_name(name, &mut |member| seen.push(Arc::clone(member)));

        assert_eq!(seen.len(), 1);
        let copy = &seen[0];
        assert_ne!(copy.symbol, original.symbol);
        assert_eq!(copy.overridden_symbol, Some(original.symbol));
        assert_eq!(copy.modality, Modality::Open);
        assert_eq!(copy.visibility, Visibility::Internal);
        assert_eq!(copy.origin, Origin::Delegated);
        assert_eq!(copy.owner, scope.owner());
        assert!(copy.has_signature_of(&original));
    }

    #[test]
    fn test_constructor_passes_through() {
        let interner = Interner::new();
        let symbols = SymbolTable::new();
        let name = interner.intern("<init>");
        let mut use_site = ClassMemberScope::new();
        let original = use_site.add_function(function(&symbols, name, FunctionKind::Constructor));

        let scope = DelegatedMemberScope::new(&use_site, &symbols);
        let mut seen = Vec::new();
        scope.process_functions_by_name(name, &mut |member| seen.push(Arc::clone(member)));

        assert_eq!(seen.len(), 1);
        assert!(Arc::ptr_eq(&seen[0], &original));
    }
}
