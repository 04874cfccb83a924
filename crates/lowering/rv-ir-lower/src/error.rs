//! Lowering errors
//!
//! Every variant is an internal compiler error: the front end promised a
//! fully resolved, well-formed script and did not deliver.

use rv_descriptors::{Capability, DescriptorId};
use rv_ir::{BuildError, SymbolError, SymbolId};
use rv_syntax::{SyntaxKind, SyntaxNodeId};
use thiserror::Error;

/// Result alias for lowering
pub type LoweringResult<T> = Result<T, LoweringError>;

/// Internal compiler error raised while lowering a script
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoweringError {
    /// Resolution recorded no descriptor for a declaration node
    #[error("no descriptor recorded for {kind} node {node:?}")]
    UnresolvedDeclaration {
        /// The node
        node: SyntaxNodeId,
        /// Its syntax kind
        kind: SyntaxKind,
    },

    /// A descriptor has the wrong variant
    #[error("descriptor {descriptor:?} is a {found}, expected a {expected}")]
    UnexpectedDescriptor {
        /// The descriptor
        descriptor: DescriptorId,
        /// Expected variant
        expected: &'static str,
        /// Actual variant
        found: &'static str,
    },

    /// A descriptor lacks a capability lowering needs
    #[error("descriptor {descriptor:?} has no {capability}")]
    MissingCapability {
        /// The descriptor
        descriptor: DescriptorId,
        /// Missing capability
        capability: Capability,
    },

    /// A script does not have exactly one supertype
    #[error("script {script:?} must have exactly one supertype, found {found}")]
    SupertypeCount {
        /// Script descriptor
        script: DescriptorId,
        /// Number of supertypes
        found: usize,
    },

    /// A script initializer has no expression
    #[error("script initializer {node:?} has no body")]
    MissingInitializerBody {
        /// Initializer node
        node: SyntaxNodeId,
    },

    /// A destructuring declaration has no initializer expression
    #[error("destructuring declaration {node:?} has no initializer")]
    MissingDestructuringInitializer {
        /// Declaration node
        node: SyntaxNodeId,
    },

    /// Resolution recorded no variable for a destructuring entry
    #[error("no variable recorded for destructuring entry {entry:?}")]
    MissingEntryVariable {
        /// Entry node
        entry: SyntaxNodeId,
    },

    /// Resolution recorded no `componentN` call for a used entry
    #[error("no componentN call resolved for destructuring entry {entry:?}")]
    MissingComponentCall {
        /// Entry node
        entry: SyntaxNodeId,
    },

    /// A synthesized property came out without a field
    #[error("property {property:?} has no backing field")]
    MissingBackingField {
        /// Property symbol
        property: SymbolId,
    },

    /// An implicit receiver has no value parameter in scope
    #[error("no value parameter in scope for receiver {receiver:?}")]
    UnresolvedReceiver {
        /// Receiver parameter descriptor
        receiver: DescriptorId,
    },

    /// A call still carries a resolution-only receiver
    #[error("call to {callee:?} still has a transient receiver")]
    TransientReceiver {
        /// Callee descriptor
        callee: DescriptorId,
    },

    /// Member lowering does not handle this declaration kind
    #[error("{kind} declarations are not supported in scripts ({node:?})")]
    UnsupportedDeclaration {
        /// The node
        node: SyntaxNodeId,
        /// Its syntax kind
        kind: SyntaxKind,
    },

    /// Member lowering produced nothing for a declaration
    #[error("lowering {kind} node {node:?} produced no declaration")]
    NoDeclarationProduced {
        /// The node
        node: SyntaxNodeId,
        /// Its syntax kind
        kind: SyntaxKind,
    },

    /// Symbol table failure
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    /// Publishing the unit failed
    #[error(transparent)]
    Build(#[from] BuildError),
}
