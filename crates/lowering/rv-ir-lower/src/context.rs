//! State shared by everything that lowers one unit

use crate::{LoweringError, LoweringOptions, LoweringResult};
use rv_descriptors::{BindingContext, Capability, Descriptor, DescriptorId, Ty};
use rv_intern::{Interner, Name};
use rv_ir::{IrType, LocalSymbols, SymbolTable, TypeTranslator};
use rv_syntax::{SyntaxNodeId, SyntaxTree};

/// Context for lowering one syntax tree
///
/// Everything except the local scopes is read-only and may be shared with
/// other units lowering at the same time.
pub struct LoweringContext<'a> {
    /// Resolution results for the tree
    pub bindings: &'a dyn BindingContext,
    /// The tree being lowered
    pub tree: &'a SyntaxTree,
    /// Process-wide symbol table
    pub symbols: &'a SymbolTable,
    /// Semantic → IR type translation
    pub types: &'a dyn TypeTranslator,
    /// Interner shared with the session
    pub interner: &'a Interner,
    /// Options of the session
    pub options: &'a LoweringOptions,
    /// Value parameters and variables currently in scope
    pub locals: LocalSymbols,
    next_temporary: u32,
}

impl<'a> LoweringContext<'a> {
    /// Context for one script
    pub fn new(
        bindings: &'a dyn BindingContext,
        tree: &'a SyntaxTree,
        symbols: &'a SymbolTable,
        types: &'a dyn TypeTranslator,
        interner: &'a Interner,
        options: &'a LoweringOptions,
    ) -> Self {
        Self {
            bindings,
            tree,
            symbols,
            types,
            interner,
            options,
            locals: LocalSymbols::new(),
            next_temporary: 0,
        }
    }

    /// Descriptor behind `id`, borrowed from the semantic model rather than
    /// from the context
    pub fn descriptor(&self, id: DescriptorId) -> &'a Descriptor {
        let bindings: &'a dyn BindingContext = self.bindings;
        bindings.descriptor(id)
    }

    /// Descriptor resolution recorded for a declaration node
    ///
    /// # Errors
    ///
    /// [`LoweringError::UnresolvedDeclaration`] if there is none.
    pub fn declaration_descriptor(&self, node: SyntaxNodeId) -> LoweringResult<DescriptorId> {
        self.bindings
            .declaration_descriptor(node)
            .ok_or(LoweringError::UnresolvedDeclaration {
                node,
                kind: self.tree.kind(node),
            })
    }

    /// Project a semantic type into the IR
    pub fn translate(&self, ty: &Ty) -> IrType {
        self.types
            .translate(ty, self.bindings.descriptors(), self.symbols)
    }

    /// Translated type of a descriptor that must have one
    ///
    /// # Errors
    ///
    /// [`LoweringError::MissingCapability`] for untyped descriptors.
    pub fn type_of(&self, descriptor: DescriptorId) -> LoweringResult<IrType> {
        let ty = self
            .descriptor(descriptor)
            .ty()
            .ok_or(LoweringError::MissingCapability {
                descriptor,
                capability: Capability::Type,
            })?;
        Ok(self.translate(ty))
    }

    /// Name for the next compiler temporary, `tmp<n>_<suffix>`
    pub fn temporary_name(&mut self, suffix: &str) -> Name {
        let index = self.next_temporary;
        self.next_temporary += 1;
        self.interner.intern(&format!("tmp{index}_{suffix}"))
    }
}
