//! The member scope interface and its table-backed implementation

use crate::{FunctionMember, PropertyMember};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use rv_intern::Name;
use rv_ir::SymbolId;
use std::sync::Arc;

/// Whether a processor wants more results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorAction {
    /// Keep going
    Next,
    /// Stop the traversal
    Stop,
}

/// Member lookup on a type
pub trait MemberScope {
    /// Call `processor` for every function named `name`
    fn process_functions_by_name(&self, name: Name, processor: &mut dyn FnMut(&Arc<FunctionMember>));

    /// Call `processor` for every property named `name`
    fn process_properties_by_name(&self, name: Name, processor: &mut dyn FnMut(&Arc<PropertyMember>));

    /// Call `processor` for each function `function` directly overrides,
    /// together with the scope it was found in
    fn process_overridden_functions_with_base_scope(
        &self,
        function: &FunctionMember,
        processor: &mut dyn FnMut(&Arc<FunctionMember>, &dyn MemberScope) -> ProcessorAction,
    ) -> ProcessorAction;

    /// Property counterpart of
    /// [`process_overridden_functions_with_base_scope`](Self::process_overridden_functions_with_base_scope)
    fn process_overridden_properties_with_base_scope(
        &self,
        property: &PropertyMember,
        processor: &mut dyn FnMut(&Arc<PropertyMember>, &dyn MemberScope) -> ProcessorAction,
    ) -> ProcessorAction;

    /// Names of all functions and properties
    fn callable_names(&self) -> IndexSet<Name>;

    /// Names of nested classifiers
    fn classifier_names(&self) -> IndexSet<Name>;
}

type Overridden<T> = Vec<(Arc<T>, Arc<dyn MemberScope + Send + Sync>)>;

/// Members of one class, as registered
#[derive(Default)]
pub struct ClassMemberScope {
    functions: IndexMap<Name, Vec<Arc<FunctionMember>>>,
    properties: IndexMap<Name, Vec<Arc<PropertyMember>>>,
    classifiers: IndexSet<Name>,
    overridden_functions: FxHashMap<SymbolId, Overridden<FunctionMember>>,
    overridden_properties: FxHashMap<SymbolId, Overridden<PropertyMember>>,
}

impl ClassMemberScope {
    /// Empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function` under its name
    pub fn add_function(&mut self, function: FunctionMember) -> Arc<FunctionMember> {
        let function = Arc::new(function);
        self.functions
            .entry(function.name)
            .or_default()
            .push(Arc::clone(&function));
        function
    }

    /// Register `property` under its name
    pub fn add_property(&mut self, property: PropertyMember) -> Arc<PropertyMember> {
        let property = Arc::new(property);
        self.properties
            .entry(property.name)
            .or_default()
            .push(Arc::clone(&property));
        property
    }

    /// Register a nested classifier name
    pub fn add_classifier(&mut self, name: Name) {
        self.classifiers.insert(name);
    }

    /// Record that `function` overrides `overridden`, found in `base`
    pub fn add_overridden_function(
        &mut self,
        function: SymbolId,
        overridden: Arc<FunctionMember>,
        base: Arc<dyn MemberScope + Send + Sync>,
    ) {
        self.overridden_functions
            .entry(function)
            .or_default()
            .push((overridden, base));
    }

    /// Record that `property` overrides `overridden`, found in `base`
    pub fn add_overridden_property(
        &mut self,
        property: SymbolId,
        overridden: Arc<PropertyMember>,
        base: Arc<dyn MemberScope + Send + Sync>,
    ) {
        self.overridden_properties
            .entry(property)
            .or_default()
            .push((overridden, base));
    }
}

impl MemberScope for ClassMemberScope {
    fn process_functions_by_name(&self, name: Name, processor: &mut dyn FnMut(&Arc<FunctionMember>)) {
        for function in self.functions.get(&name).into_iter().flatten() {
            processor(function);
        }
    }

    fn process_properties_by_name(&self, name: Name, processor: &mut dyn FnMut(&Arc<PropertyMember>)) {
        for property in self.properties.get(&name).into_iter().flatten() {
            processor(property);
        }
    }

    fn process_overridden_functions_with_base_scope(
        &self,
        function: &FunctionMember,
        processor: &mut dyn FnMut(&Arc<FunctionMember>, &dyn MemberScope) -> ProcessorAction,
    ) -> ProcessorAction {
        for (overridden, base) in self
            .overridden_functions
            .get(&function.symbol)
            .into_iter()
            .flatten()
        {
            if processor(overridden, base.as_ref()) == ProcessorAction::Stop {
                return ProcessorAction::Stop;
            }
        }
        ProcessorAction::Next
    }

    fn process_overridden_properties_with_base_scope(
        &self,
        property: &PropertyMember,
        processor: &mut dyn FnMut(&Arc<PropertyMember>, &dyn MemberScope) -> ProcessorAction,
    ) -> ProcessorAction {
        for (overridden, base) in self
            .overridden_properties
            .get(&property.symbol)
            .into_iter()
            .flatten()
        {
            if processor(overridden, base.as_ref()) == ProcessorAction::Stop {
                return ProcessorAction::Stop;
            }
        }
        ProcessorAction::Next
    }

    fn callable_names(&self) -> IndexSet<Name> {
        self.functions
            .keys()
            .chain(self.properties.keys())
            .copied()
            .collect()
    }

    fn classifier_names(&self) -> IndexSet<Name> {
        self.classifiers.clone()
    }
}
