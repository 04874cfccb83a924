//! Resolved semantic types

use crate::DescriptorId;

/// A fully resolved type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    /// Class, interface, object or script type
    Class {
        /// Classifier descriptor
        classifier: DescriptorId,
        /// Type arguments in declaration order
        arguments: Vec<Ty>,
        /// Whether the type is marked nullable
        nullable: bool,
    },
    /// Reference to a type parameter
    TypeParameter {
        /// Type parameter descriptor
        descriptor: DescriptorId,
        /// Whether the type is marked nullable
        nullable: bool,
    },
    /// Dynamic type
    Dynamic,
    /// Type that failed to resolve
    Error,
}

impl Ty {
    /// Non-nullable class type without arguments
    pub fn class(classifier: DescriptorId) -> Self {
        Self::Class {
            classifier,
            arguments: Vec::new(),
            nullable: false,
        }
    }

    /// Non-nullable generic class type
    pub fn generic(classifier: DescriptorId, arguments: Vec<Self>) -> Self {
        Self::Class {
            classifier,
            arguments,
            nullable: false,
        }
    }

    /// Nullable copy of this type
    #[must_use]
    pub fn nullable(self) -> Self {
        match self {
            Self::Class {
                classifier,
                arguments,
                ..
            } => Self::Class {
                classifier,
                arguments,
                nullable: true,
            },
            Self::TypeParameter { descriptor, .. } => Self::TypeParameter {
                descriptor,
                nullable: true,
            },
            other => other,
        }
    }

    /// Whether the type admits `null`
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Class { nullable, .. } | Self::TypeParameter { nullable, .. } => *nullable,
            Self::Dynamic => true,
            Self::Error => false,
        }
    }

    /// Classifier of a class type
    pub fn classifier(&self) -> Option<DescriptorId> {
        match self {
            Self::Class { classifier, .. } => Some(*classifier),
            _ => None,
        }
    }
}

/// Declaration-site variance of a type parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    /// No variance annotation
    Invariant,
    /// `in`
    In,
    /// `out`
    Out,
}
