//! Declaration descriptors
//!
//! A descriptor is one variant of [`DescriptorKind`] plus the data every
//! declaration shares. Code that needs "anything with a type" asks for the
//! capability ([`Descriptor::ty`], [`Descriptor::visibility`], ...) instead of
//! matching on the concrete variant.

use crate::Ty;
use crate::ty::Variance;
use la_arena::{Arena, Idx};
use rv_intern::Name;
use rv_span::Span;
use std::fmt;
use std::ops::Index;

/// Identity of a descriptor
pub type DescriptorId = Idx<Descriptor>;

/// Visibility modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `internal`
    Internal,
    /// `private`
    Private,
    /// Local declaration, visible only in its block
    Local,
}

/// Inheritance modality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    /// Cannot be overridden
    Final,
    /// Closed hierarchy
    Sealed,
    /// Can be overridden
    Open,
    /// Must be overridden
    Abstract,
}

/// Kind of a class-like declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// Ordinary class
    Class,
    /// Interface
    Interface,
    /// Singleton object
    Object,
    /// Enum class
    Enum,
}

/// Compile-time constant used in annotation arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstValue {
    /// Boolean literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// String literal
    String(String),
    /// `null`
    Null,
}

/// A resolved annotation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    /// Annotation class
    pub class: DescriptorId,
    /// Named arguments
    pub arguments: Vec<(Name, ConstValue)>,
}

/// Capabilities a descriptor may offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Has a (return) type
    Type,
    /// Has a visibility
    Visibility,
    /// Has a modality
    Modality,
    /// Has a `this` receiver parameter
    Receiver,
    /// Has declared supertypes
    Supertypes,
    /// Has value parameters
    ValueParameters,
}

impl fmt::Display for Capability {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Type => "type",
            Self::Visibility => "visibility",
            Self::Modality => "modality",
            Self::Receiver => "receiver",
            Self::Supertypes => "supertypes",
            Self::ValueParameters => "value parameters",
        };
        formatter.write_str(text)
    }
}

/// A declaration descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// Declared name
    pub name: Name,
    /// Containing declaration (None for top-level)
    pub container: Option<DescriptorId>,
    /// Declaration source location, if any
    pub span: Option<Span>,
    /// Resolved annotations
    pub annotations: Vec<Annotation>,
    /// Variant-specific data
    pub kind: DescriptorKind,
}

/// Descriptor variants
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorKind {
    /// Class, interface or object
    Class(ClassDescriptor),
    /// Script compilation unit
    Script(ScriptDescriptor),
    /// Member or top-level property
    Property(PropertyDescriptor),
    /// Member or top-level function
    Function(FunctionDescriptor),
    /// Value parameter of a function or constructor
    ValueParameter(ValueParameterDescriptor),
    /// `this` receiver of a class or script
    ReceiverParameter(ReceiverParameterDescriptor),
    /// Type parameter
    TypeParameter(TypeParameterDescriptor),
    /// Local variable, including destructuring entries
    Variable(VariableDescriptor),
}

/// Class-like declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    /// Class kind
    pub kind: ClassKind,
    /// Visibility
    pub visibility: Visibility,
    /// Modality
    pub modality: Modality,
    /// Declared supertypes
    pub supertypes: Vec<Ty>,
    /// The class's `this` receiver parameter
    pub this_receiver: DescriptorId,
    /// Type parameters
    pub type_parameters: Vec<DescriptorId>,
}

/// Script compilation unit
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptDescriptor {
    /// Declared supertypes; a well-formed script has exactly one
    pub supertypes: Vec<Ty>,
    /// The script's `this` receiver parameter
    pub this_receiver: DescriptorId,
    /// Class descriptors of the enclosing implicit receivers
    pub implicit_receivers: Vec<DescriptorId>,
    /// Value parameters of the script's primary constructor
    pub constructor_parameters: Vec<DescriptorId>,
    /// Properties injected by the host environment
    pub provided_properties: Vec<DescriptorId>,
    /// Property receiving the value of the last expression
    pub result_value: Option<DescriptorId>,
}

/// Property declaration
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    /// Property type
    pub ty: Ty,
    /// Visibility
    pub visibility: Visibility,
    /// Modality
    pub modality: Modality,
    /// `var` rather than `val`
    pub is_var: bool,
    /// Extension receiver type
    pub extension_receiver: Option<Ty>,
    /// Type parameters
    pub type_parameters: Vec<DescriptorId>,
}

/// Function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDescriptor {
    /// Return type
    pub return_type: Ty,
    /// Visibility
    pub visibility: Visibility,
    /// Modality
    pub modality: Modality,
    /// Extension receiver type
    pub extension_receiver: Option<Ty>,
    /// Value parameters in declaration order
    pub value_parameters: Vec<DescriptorId>,
    /// Type parameters
    pub type_parameters: Vec<DescriptorId>,
    /// Declared with `operator`
    pub is_operator: bool,
}

/// Value parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ValueParameterDescriptor {
    /// Parameter type
    pub ty: Ty,
    /// Position in the owner's parameter list
    pub index: u32,
    /// Element type of a `vararg` parameter
    pub vararg_element: Option<Ty>,
    /// Whether a default value is declared
    pub declares_default_value: bool,
}

/// `this` receiver parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverParameterDescriptor {
    /// Receiver type
    pub ty: Ty,
}

/// Type parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameterDescriptor {
    /// Position in the owner's type parameter list
    pub index: u32,
    /// Declaration-site variance
    pub variance: Variance,
    /// Upper bounds
    pub upper_bounds: Vec<Ty>,
    /// `reified` modifier
    pub reified: bool,
}

/// Local variable
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDescriptor {
    /// Variable type
    pub ty: Ty,
    /// `var` rather than `val`
    pub is_var: bool,
}

impl Descriptor {
    /// Create a descriptor with no container, span or annotations
    pub fn new(name: Name, kind: DescriptorKind) -> Self {
        Self {
            name,
            container: None,
            span: None,
            annotations: Vec::new(),
            kind,
        }
    }

    /// Set the containing declaration
    #[must_use]
    pub fn with_container(mut self, container: DescriptorId) -> Self {
        self.container = Some(container);
        self
    }

    /// Set the source location
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Add annotations
    #[must_use]
    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    /// Type of the declaration; the return type for functions
    pub fn ty(&self) -> Option<&Ty> {
        match &self.kind {
            DescriptorKind::Property(property) => Some(&property.ty),
            DescriptorKind::Function(function) => Some(&function.return_type),
            DescriptorKind::ValueParameter(parameter) => Some(&parameter.ty),
            DescriptorKind::ReceiverParameter(receiver) => Some(&receiver.ty),
            DescriptorKind::Variable(variable) => Some(&variable.ty),
            DescriptorKind::Class(_)
            | DescriptorKind::Script(_)
            | DescriptorKind::TypeParameter(_) => None,
        }
    }

    /// Declared visibility, if the descriptor has one
    pub fn visibility(&self) -> Option<Visibility> {
        match &self.kind {
            DescriptorKind::Class(class) => Some(class.visibility),
            DescriptorKind::Property(property) => Some(property.visibility),
            DescriptorKind::Function(function) => Some(function.visibility),
            DescriptorKind::Variable(_) | DescriptorKind::ValueParameter(_) => {
                Some(Visibility::Local)
            }
            DescriptorKind::Script(_) => Some(Visibility::Public),
            DescriptorKind::ReceiverParameter(_) | DescriptorKind::TypeParameter(_) => None,
        }
    }

    /// Declared modality, if the descriptor has one
    pub fn modality(&self) -> Option<Modality> {
        match &self.kind {
            DescriptorKind::Class(class) => Some(class.modality),
            DescriptorKind::Property(property) => Some(property.modality),
            DescriptorKind::Function(function) => Some(function.modality),
            DescriptorKind::Script(_) => Some(Modality::Final),
            _ => None,
        }
    }

    /// The `this` receiver parameter of a class or script
    pub fn this_receiver(&self) -> Option<DescriptorId> {
        match &self.kind {
            DescriptorKind::Class(class) => Some(class.this_receiver),
            DescriptorKind::Script(script) => Some(script.this_receiver),
            _ => None,
        }
    }

    /// Supertypes of a class or script
    pub fn supertypes(&self) -> Option<&[Ty]> {
        match &self.kind {
            DescriptorKind::Class(class) => Some(&class.supertypes),
            DescriptorKind::Script(script) => Some(&script.supertypes),
            _ => None,
        }
    }

    /// Extension receiver type of a callable
    pub fn extension_receiver(&self) -> Option<&Ty> {
        match &self.kind {
            DescriptorKind::Property(property) => property.extension_receiver.as_ref(),
            DescriptorKind::Function(function) => function.extension_receiver.as_ref(),
            _ => None,
        }
    }

    /// Value parameters of a function
    pub fn value_parameters(&self) -> Option<&[DescriptorId]> {
        match &self.kind {
            DescriptorKind::Function(function) => Some(&function.value_parameters),
            DescriptorKind::Script(script) => Some(&script.constructor_parameters),
            _ => None,
        }
    }

    /// Type parameters; empty for non-generic descriptors
    pub fn type_parameters(&self) -> &[DescriptorId] {
        match &self.kind {
            DescriptorKind::Class(class) => &class.type_parameters,
            DescriptorKind::Property(property) => &property.type_parameters,
            DescriptorKind::Function(function) => &function.type_parameters,
            _ => &[],
        }
    }

    /// Whether a property or variable is mutable
    pub fn is_var(&self) -> bool {
        match &self.kind {
            DescriptorKind::Property(property) => property.is_var,
            DescriptorKind::Variable(variable) => variable.is_var,
            _ => false,
        }
    }

    /// Script data, if this is a script
    pub fn as_script(&self) -> Option<&ScriptDescriptor> {
        match &self.kind {
            DescriptorKind::Script(script) => Some(script),
            _ => None,
        }
    }

    /// Class data, if this is a class
    pub fn as_class(&self) -> Option<&ClassDescriptor> {
        match &self.kind {
            DescriptorKind::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Value parameter data, if this is a value parameter
    pub fn as_value_parameter(&self) -> Option<&ValueParameterDescriptor> {
        match &self.kind {
            DescriptorKind::ValueParameter(parameter) => Some(parameter),
            _ => None,
        }
    }

    /// Type parameter data, if this is a type parameter
    pub fn as_type_parameter(&self) -> Option<&TypeParameterDescriptor> {
        match &self.kind {
            DescriptorKind::TypeParameter(parameter) => Some(parameter),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            DescriptorKind::Class(_) => "class",
            DescriptorKind::Script(_) => "script",
            DescriptorKind::Property(_) => "property",
            DescriptorKind::Function(_) => "function",
            DescriptorKind::ValueParameter(_) => "value parameter",
            DescriptorKind::ReceiverParameter(_) => "receiver parameter",
            DescriptorKind::TypeParameter(_) => "type parameter",
            DescriptorKind::Variable(_) => "variable",
        }
    }
}

/// Storage for all descriptors of a compilation
#[derive(Debug, Default, Clone)]
pub struct DescriptorStore {
    descriptors: Arena<Descriptor>,
}

impl DescriptorStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor
    pub fn alloc(&mut self, descriptor: Descriptor) -> DescriptorId {
        self.descriptors.alloc(descriptor)
    }

    /// Descriptor `id`
    pub fn get(&self, id: DescriptorId) -> &Descriptor {
        &self.descriptors[id]
    }

    /// Mutable access, for the resolution phase wiring up back-references
    pub fn get_mut(&mut self, id: DescriptorId) -> &mut Descriptor {
        &mut self.descriptors[id]
    }

    /// Number of descriptors
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether there is nothing in it
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Index<DescriptorId> for DescriptorStore {
    type Output = Descriptor;

    fn index(&self, id: DescriptorId) -> &Self::Output {
        &self.descriptors[id]
    }
}
