//! IR types and translation from semantic types

use crate::{SymbolId, SymbolKind, SymbolTable};
use rv_descriptors::{DescriptorStore, Ty};

/// Type of an IR value
///
/// Classifiers are referenced by symbol, so a type can name a class that has
/// not been lowered yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrType {
    /// Class or script type
    Simple {
        /// Classifier symbol
        classifier: SymbolId,
        /// Type arguments
        arguments: Vec<IrType>,
        /// Nullable marker
        nullable: bool,
    },
    /// Type parameter reference
    TypeParameter {
        /// Type parameter symbol
        symbol: SymbolId,
        /// Nullable marker
        nullable: bool,
    },
    /// Type of statements that produce no value
    Unit,
    /// Dynamic type
    Dynamic,
    /// Type that failed to resolve
    Error,
}

impl IrType {
    /// Non-nullable type without arguments
    pub fn simple(classifier: SymbolId) -> Self {
        Self::Simple {
            classifier,
            arguments: Vec::new(),
            nullable: false,
        }
    }

    /// Classifier symbol of a simple type
    pub fn classifier(&self) -> Option<SymbolId> {
        match self {
            Self::Simple { classifier, .. } => Some(*classifier),
            _ => None,
        }
    }

    /// Whether the type admits `null`
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Simple { nullable, .. } | Self::TypeParameter { nullable, .. } => *nullable,
            Self::Dynamic => true,
            Self::Unit | Self::Error => false,
        }
    }
}

/// Translation of semantic types into IR types
pub trait TypeTranslator {
    /// Translate `ty`, referencing classifiers through `symbols`
    fn translate(&self, ty: &Ty, descriptors: &DescriptorStore, symbols: &SymbolTable) -> IrType;
}

/// Structural translation: classifiers and type parameters become symbol
/// references, everything else maps one to one
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTypeTranslator;

impl TypeTranslator for DefaultTypeTranslator {
    fn translate(&self, ty: &Ty, descriptors: &DescriptorStore, symbols: &SymbolTable) -> IrType {
        match ty {
            Ty::Class {
                classifier,
                arguments,
                nullable,
            } => {
                let kind = if descriptors[*classifier].as_script().is_some() {
                    SymbolKind::Script
                } else {
                    SymbolKind::Class
                };
                IrType::Simple {
                    classifier: symbols.reference(kind, *classifier),
                    arguments: arguments
                        .iter()
                        .map(|argument| self.translate(argument, descriptors, symbols))
                        .collect(),
                    nullable: *nullable,
                }
            }
            Ty::TypeParameter {
                descriptor,
                nullable,
            } => IrType::TypeParameter {
                symbol: symbols.reference(SymbolKind::TypeParameter, *descriptor),
                nullable: *nullable,
            },
            Ty::Dynamic => IrType::Dynamic,
            Ty::Error => IrType::Error,
        }
    }
}
