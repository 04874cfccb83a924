//! Members seen through a delegate

use rv_descriptors::{Modality, Visibility};
use rv_driver::LoweringSession;
use rv_intern::{Interner, Name};
use rv_ir::{IrType, Origin, SymbolKind, SymbolTable};
use rv_ir_lower::LoweringOptions;
use rv_scope::{
    ClassMemberScope, DelegatedMemberScope, FunctionKind, FunctionMember, MemberOwner,
    MemberScope, ProcessorAction, PropertyKind, PropertyMember, ValueParameterMember,
};
use std::sync::Arc;

struct Interface {
    interner: Interner,
    symbols: SymbolTable,
    owner: MemberOwner,
}

impl Interface {
    fn new() -> Self {
        let symbols = SymbolTable::new();
        let owner = MemberOwner::Class(symbols.fresh(SymbolKind::Class));
        Self {
            interner: Interner::new(),
            symbols,
            owner,
        }
    }

    fn function(&self, name: &str, visibility: Visibility) -> FunctionMember {
        FunctionMember {
            symbol: self.symbols.fresh(SymbolKind::Function),
            kind: FunctionKind::Named,
            name: self.interner.intern(name),
            owner: self.owner,
            origin: Origin::Defined,
            visibility,
            modality: Modality::Abstract,
            return_type: IrType::Unit,
            receiver_type: None,
            type_parameters: Vec::new(),
            value_parameters: vec![ValueParameterMember {
                name: self.interner.intern("value"),
                ty: IrType::Dynamic,
                vararg_element: None,
                has_default_value: false,
            }],
            annotations: Vec::new(),
            overridden_symbol: None,
        }
    }

    fn property(&self, name: &str, kind: PropertyKind, is_var: bool) -> PropertyMember {
        PropertyMember {
            symbol: self.symbols.fresh(SymbolKind::Property),
            kind,
            name: self.interner.intern(name),
            owner: self.owner,
            origin: Origin::Defined,
            visibility: Visibility::Public,
            modality: Modality::Abstract,
            is_var,
            return_type: IrType::Dynamic,
            receiver_type: None,
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            overridden_symbol: None,
        }
    }
}

fn functions(scope: &dyn MemberScope, name: Name) -> Vec<Arc<FunctionMember>> {
    let mut found = Vec::new();
    scope.process_functions_by_name(name, &mut |function| found.push(Arc::clone(function)));
    found
}

fn properties(scope: &dyn MemberScope, name: Name) -> Vec<Arc<PropertyMember>> {
    let mut found = Vec::new();
    scope.process_properties_by_name(name, &mut |property| found.push(Arc::clone(property)));
    found
}

#[test]
fn test_each_query_mints_fresh_copies() {
    let interface = Interface::new();
    let mut use_site = ClassMemberScope::new();
    let original = use_site.add_function(interface.function("send", Visibility::Protected));
    let scope = DelegatedMemberScope::new(&use_site, &interface.symbols);

    let [first] = functions(&scope, original.name).try_into().unwrap();
    let [second] = functions(&scope, original.name).try_into().unwrap();

    assert_ne!(first.symbol, second.symbol);
    assert_ne!(first.symbol, original.symbol);
    for copy in [&first, &second] {
        assert_eq!(copy.overridden_symbol, Some(original.symbol));
        assert_eq!(copy.owner, scope.owner());
        assert_eq!(copy.modality, Modality::Open);
        assert_eq!(copy.visibility, Visibility::Protected);
        assert_eq!(copy.origin, Origin::Delegated);
        assert_eq!(copy.value_parameters, original.value_parameters);
        assert_eq!(interface.symbols.kind(copy.symbol), Some(SymbolKind::Function));
        assert!(!interface.symbols.is_bound(copy.symbol));
    }
}

#[test]
fn test_owner_is_synthetic_and_unbound() {
    let interface = Interface::new();
    let use_site = ClassMemberScope::new();
    let scope = DelegatedMemberScope::new(&use_site, &interface.symbols);

    let MemberOwner::Synthetic(owner) = scope.owner() else {
        panic!("expected a synthetic owner, got {:?}", scope.owner());
    };
    assert_ne!(scope.owner(), interface.owner);
    assert!(!interface.symbols.is_bound(owner));
    assert_eq!(interface.symbols.kind(owner), Some(SymbolKind::Class));
}

#[test]
fn test_property_keeps_mutability() {
    let interface = Interface::new();
    let mut use_site = ClassMemberScope::new();
    let original = use_site.add_property(interface.property("count", PropertyKind::Property, true));
    let scope = DelegatedMemberScope::new(&use_site, &interface.symbols);

    let [copy] = properties(&scope, original.name).try_into().unwrap();
    assert_ne!(copy.symbol, original.symbol);
    assert!(copy.is_var);
    assert_eq!(copy.overridden_symbol, Some(original.symbol));
    assert_eq!(copy.modality, Modality::Open);
    assert_eq!(copy.origin, Origin::Delegated);
    assert!(copy.has_signature_of(&original));
}

#[test]
fn test_fields_pass_through() {
    let interface = Interface::new();
    let mut use_site = ClassMemberScope::new();
    let original = use_site.add_property(interface.property("raw", PropertyKind::Field, false));
    let scope = DelegatedMemberScope::new(&use_site, &interface.symbols);

    let [seen] = properties(&scope, original.name).try_into().unwrap();
    assert!(Arc::ptr_eq(&seen, &original));
}

#[test]
fn test_accessors_pass_through() {
    let interface = Interface::new();
    let mut use_site = ClassMemberScope::new();
    let mut accessor = interface.function("<get-count>", Visibility::Public);
    accessor.kind = FunctionKind::Accessor;
    let original = use_site.add_function(accessor);
    let scope = DelegatedMemberScope::new(&use_site, &interface.symbols);

    let [seen] = functions(&scope, original.name).try_into().unwrap();
    assert!(Arc::ptr_eq(&seen, &original));
}

#[test]
fn test_unknown_name_yields_nothing() {
    let interface = Interface::new();
    let mut use_site = ClassMemberScope::new();
    use_site.add_function(interface.function("send", Visibility::Public));
    let scope = DelegatedMemberScope::new(&use_site, &interface.symbols);

    let missing = interface.interner.intern("receive");
    assert!(functions(&scope, missing).is_empty());
    assert!(properties(&scope, missing).is_empty());
}

#[test]
fn test_overridden_queries_use_the_use_site() {
    let interface = Interface::new();
    let base: Arc<dyn MemberScope + Send + Sync> = Arc::new(ClassMemberScope::new());
    let mut use_site = ClassMemberScope::new();
    let function = use_site.add_function(interface.function("send", Visibility::Public));
    let first = Arc::new(interface.function("send", Visibility::Public));
    let second = Arc::new(interface.function("send", Visibility::Public));
    use_site.add_overridden_function(function.symbol, Arc::clone(&first), Arc::clone(&base));
    use_site.add_overridden_function(function.symbol, Arc::clone(&second), Arc::clone(&base));
    let property = use_site.add_property(interface.property("count", PropertyKind::Property, false));
    let overridden = Arc::new(interface.property("count", PropertyKind::Property, false));
    use_site.add_overridden_property(property.symbol, Arc::clone(&overridden), base);
    let scope = DelegatedMemberScope::new(&use_site, &interface.symbols);

    let mut seen = Vec::new();
    let action = scope.process_overridden_functions_with_base_scope(&function, &mut |member, _| {
        seen.push(member.symbol);
        ProcessorAction::Next
    });
    assert_eq!(action, ProcessorAction::Next);
    assert_eq!(seen, vec![first.symbol, second.symbol]);

    seen.clear();
    let action = scope.process_overridden_functions_with_base_scope(&function, &mut |member, _| {
        seen.push(member.symbol);
        ProcessorAction::Stop
    });
    assert_eq!(action, ProcessorAction::Stop);
    assert_eq!(seen, vec![first.symbol]);

    let mut properties_seen = Vec::new();
    scope.process_overridden_properties_with_base_scope(&property, &mut |member, _| {
        properties_seen.push(member.symbol);
        ProcessorAction::Next
    });
    assert_eq!(properties_seen, vec![overridden.symbol]);
}

#[test]
fn test_names_come_from_the_use_site() {
    let interface = Interface::new();
    let mut use_site = ClassMemberScope::new();
    use_site.add_function(interface.function("send", Visibility::Public));
    use_site.add_property(interface.property("count", PropertyKind::Property, false));
    use_site.add_classifier(interface.interner.intern("Nested"));
    let scope = DelegatedMemberScope::new(&use_site, &interface.symbols);

    assert_eq!(scope.callable_names(), use_site.callable_names());
    assert_eq!(scope.classifier_names(), use_site.classifier_names());
    assert_eq!(scope.callable_names().len(), 2);
}

#[test]
fn test_session_mints_in_its_table() {
    let interface = Interface::new();
    let session = LoweringSession::new(interface.interner.clone(), LoweringOptions::default());
    let mut use_site = ClassMemberScope::new();
    let original = use_site.add_function(interface.function("send", Visibility::Public));

    let scope = session.delegated_scope(&use_site);
    let [copy] = functions(&scope, original.name).try_into().unwrap();
    assert_eq!(session.symbols().kind(copy.symbol), Some(SymbolKind::Function));
}
