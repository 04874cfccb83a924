//! Symbols: stable handles IR nodes reference each other by

use crate::DeclId;
use rv_descriptors::DescriptorId;
use std::fmt;
use thiserror::Error;

/// Handle of a declaration, bound to at most one IR node
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct SymbolId(pub u32);

/// Identity of one published lowering unit
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct UnitId(pub u32);

/// Location of a published IR node
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct NodeRef {
    /// Unit owning the node
    pub unit: UnitId,
    /// Declaration within the unit
    pub decl: DeclId,
}

/// Kind of declaration a symbol stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Script compilation unit
    Script,
    /// Class-like declaration
    Class,
    /// Property
    Property,
    /// Function or accessor
    Function,
    /// Backing field
    Field,
    /// Value parameter, including receivers
    ValueParameter,
    /// Local or temporary variable
    Variable,
    /// Type parameter
    TypeParameter,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Script => "script",
            Self::Class => "class",
            Self::Property => "property",
            Self::Function => "function",
            Self::Field => "field",
            Self::ValueParameter => "value parameter",
            Self::Variable => "variable",
            Self::TypeParameter => "type parameter",
        };
        formatter.write_str(text)
    }
}

/// What the table knows about a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolData {
    /// Declaration kind
    pub kind: SymbolKind,
    /// Descriptor the symbol was minted for (None for synthetic symbols)
    pub descriptor: Option<DescriptorId>,
    /// Node the symbol is bound to
    pub owner: Option<NodeRef>,
}

/// Symbol table misuse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// A symbol was bound a second time
    #[error("{kind} symbol {symbol:?} is already bound to {owner:?}")]
    AlreadyBound {
        /// The symbol
        symbol: SymbolId,
        /// Its kind
        kind: SymbolKind,
        /// Node it is bound to
        owner: NodeRef,
    },

    /// Lookup of a descriptor that was never registered
    #[error("no {kind} symbol registered for descriptor {descriptor:?}")]
    Unregistered {
        /// Expected kind
        kind: SymbolKind,
        /// The descriptor
        descriptor: DescriptorId,
    },

    /// A symbol id this table never minted
    #[error("unknown symbol {0:?}")]
    Unknown(SymbolId),
}
