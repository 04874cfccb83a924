//! Members as seen through a scope

use rv_descriptors::{Annotation, Modality, Variance, Visibility};
use rv_intern::Name;
use rv_ir::{IrType, Origin, SymbolId};

/// Who declares a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberOwner {
    /// A real class
    Class(SymbolId),
    /// Placeholder owner of synthesized members; never bound to a class
    Synthetic(SymbolId),
}

/// What kind of function a member is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// Ordinary named function
    Named,
    /// Constructor
    Constructor,
    /// Accessor generated for a property
    Accessor,
}

/// What kind of property a member is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Ordinary property
    Property,
    /// Bare field with no accessors
    Field,
}

/// Value parameter of a function member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueParameterMember {
    /// Declared name
    pub name: Name,
    /// Declared type
    pub ty: IrType,
    /// Element type of a `vararg` parameter
    pub vararg_element: Option<IrType>,
    /// Whether the parameter has a default value
    pub has_default_value: bool,
}

/// Type parameter of a member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParameterMember {
    /// Type parameter symbol
    pub symbol: SymbolId,
    /// Declared name
    pub name: Name,
    /// Declaration-site variance
    pub variance: Variance,
    /// Upper bounds, in order
    pub upper_bounds: Vec<IrType>,
    /// `reified` type parameter
    pub reified: bool,
}

/// A function member
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionMember {
    /// Symbol of the member
    pub symbol: SymbolId,
    /// Member kind
    pub kind: FunctionKind,
    /// Declared name
    pub name: Name,
    /// Declaring class
    pub owner: MemberOwner,
    /// Why the member exists
    pub origin: Origin,
    /// Declared visibility
    pub visibility: Visibility,
    /// Declared modality
    pub modality: Modality,
    /// Declared return type
    pub return_type: IrType,
    /// Extension receiver type
    pub receiver_type: Option<IrType>,
    /// Type parameters, in order
    pub type_parameters: Vec<TypeParameterMember>,
    /// Value parameters, in order
    pub value_parameters: Vec<ValueParameterMember>,
    /// Annotations, in source order
    pub annotations: Vec<Annotation>,
    /// Member this one overrides or forwards to
    pub overridden_symbol: Option<SymbolId>,
}

/// A property member
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMember {
    /// Symbol of the member
    pub symbol: SymbolId,
    /// Member kind
    pub kind: PropertyKind,
    /// Declared name
    pub name: Name,
    /// Declaring class
    pub owner: MemberOwner,
    /// Why the member exists
    pub origin: Origin,
    /// Declared visibility
    pub visibility: Visibility,
    /// Declared modality
    pub modality: Modality,
    /// `var` rather than `val`
    pub is_var: bool,
    /// Property type
    pub return_type: IrType,
    /// Extension receiver type
    pub receiver_type: Option<IrType>,
    /// Type parameters, in order
    pub type_parameters: Vec<TypeParameterMember>,
    /// Annotations, in source order
    pub annotations: Vec<Annotation>,
    /// Member this one overrides or forwards to
    pub overridden_symbol: Option<SymbolId>,
}

impl FunctionMember {
    /// Same name, receiver, parameters and return type
    pub fn has_signature_of(&self, other: &Self) -> bool {
        self.name == other.name
            && self.receiver_type == other.receiver_type
            && self.return_type == other.return_type
            && self.value_parameters == other.value_parameters
            && self.type_parameters == other.type_parameters
    }
}

impl PropertyMember {
    /// Same name, receiver, mutability and type
    pub fn has_signature_of(&self, other: &Self) -> bool {
        self.name == other.name
            && self.receiver_type == other.receiver_type
            && self.return_type == other.return_type
            && self.is_var == other.is_var
            && self.type_parameters == other.type_parameters
    }
}
