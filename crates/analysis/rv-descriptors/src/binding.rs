//! Read-only resolution interface
//!
//! Lowering queries everything the resolution phase computed through
//! [`BindingContext`], keyed by syntax node identity. A miss means the two
//! phases disagree, which lowering treats as an internal fault.

use crate::{Descriptor, DescriptorId, DescriptorStore, ResolvedCall, Ty};
use rustc_hash::FxHashMap;
use rv_syntax::SyntaxNodeId;

/// Results of resolution, queried by syntax node
pub trait BindingContext {
    /// All descriptors of the compilation
    fn descriptors(&self) -> &DescriptorStore;

    /// Descriptor declared by a declaration node
    fn declaration_descriptor(&self, node: SyntaxNodeId) -> Option<DescriptorId>;

    /// Resolved call of a call expression
    fn resolved_call(&self, node: SyntaxNodeId) -> Option<&ResolvedCall>;

    /// Resolved `componentN` call of a destructuring entry
    fn component_call(&self, entry: SyntaxNodeId) -> Option<&ResolvedCall>;

    /// Variable introduced by a destructuring entry
    fn variable(&self, entry: SyntaxNodeId) -> Option<DescriptorId>;

    /// Inferred type of an expression
    fn expression_type(&self, node: SyntaxNodeId) -> Option<&Ty>;

    /// Descriptor by id
    fn descriptor(&self, id: DescriptorId) -> &Descriptor {
        self.descriptors().get(id)
    }
}

/// In-memory binding tables filled by the resolution phase
#[derive(Debug, Default, Clone)]
pub struct Bindings {
    descriptors: DescriptorStore,
    declarations: FxHashMap<SyntaxNodeId, DescriptorId>,
    calls: FxHashMap<SyntaxNodeId, ResolvedCall>,
    component_calls: FxHashMap<SyntaxNodeId, ResolvedCall>,
    variables: FxHashMap<SyntaxNodeId, DescriptorId>,
    expression_types: FxHashMap<SyntaxNodeId, Ty>,
}

impl Bindings {
    /// Bindings over an existing descriptor store
    pub fn new(descriptors: DescriptorStore) -> Self {
        Self {
            descriptors,
            ..Self::default()
        }
    }

    /// Store for allocating new descriptors
    pub fn descriptors_mut(&mut self) -> &mut DescriptorStore {
        &mut self.descriptors
    }

    /// Record the descriptor declared by `node`
    pub fn record_declaration(&mut self, node: SyntaxNodeId, descriptor: DescriptorId) {
        self.declarations.insert(node, descriptor);
    }

    /// Record the resolved call of expression `node`
    pub fn record_call(&mut self, node: SyntaxNodeId, call: ResolvedCall) {
        self.calls.insert(node, call);
    }

    /// Record the `componentN` call of destructuring `entry`
    pub fn record_component_call(&mut self, entry: SyntaxNodeId, call: ResolvedCall) {
        self.component_calls.insert(entry, call);
    }

    /// Record the variable bound by destructuring `entry`
    pub fn record_variable(&mut self, entry: SyntaxNodeId, variable: DescriptorId) {
        self.variables.insert(entry, variable);
    }

    /// Record the type of expression `node`
    pub fn record_expression_type(&mut self, node: SyntaxNodeId, ty: Ty) {
        self.expression_types.insert(node, ty);
    }
}

impl BindingContext for Bindings {
    fn descriptors(&self) -> &DescriptorStore {
        &self.descriptors
    }

    fn declaration_descriptor(&self, node: SyntaxNodeId) -> Option<DescriptorId> {
        self.declarations.get(&node).copied()
    }

    fn resolved_call(&self, node: SyntaxNodeId) -> Option<&ResolvedCall> {
        self.calls.get(&node)
    }

    fn component_call(&self, entry: SyntaxNodeId) -> Option<&ResolvedCall> {
        self.component_calls.get(&entry)
    }

    fn variable(&self, entry: SyntaxNodeId) -> Option<DescriptorId> {
        self.variables.get(&entry).copied()
    }

    fn expression_type(&self, node: SyntaxNodeId) -> Option<&Ty> {
        self.expression_types.get(&node)
    }
}
