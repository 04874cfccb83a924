//! IR declarations

use crate::{ExprId, IrType, Origin, SymbolId};
use la_arena::Idx;
use rv_descriptors::{Modality, Visibility};
use rv_intern::Name;
use rv_span::{FileId, Span};

/// Identity of a declaration within its unit
pub type DeclId = Idx<IrDeclaration>;

/// Where a declaration lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// Top level of a file
    File(FileId),
    /// Nested in another declaration of the same unit
    Declaration(DeclId),
}

/// Statement of a script body or block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrStatement {
    /// Declaration, in declaration order
    Declaration(DeclId),
    /// Expression evaluated for its effect
    Expression(ExprId),
}

/// An IR declaration
///
/// The symbol and parent are fixed when the declaration is allocated.
#[derive(Debug, Clone, PartialEq)]
pub struct IrDeclaration {
    symbol: SymbolId,
    parent: Parent,
    /// Why the declaration exists
    pub origin: Origin,
    /// Source range, [`Span::UNDEFINED`] for declarations with none
    pub span: Span,
    /// Kind-specific data
    pub kind: DeclKind,
}

/// Kind-specific declaration data
#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    /// Script
    Script(IrScript),
    /// Class
    Class(IrClass),
    /// Property
    Property(IrProperty),
    /// Function or accessor
    Function(IrFunction),
    /// Backing field
    Field(IrField),
    /// Value parameter or receiver
    ValueParameter(IrValueParameter),
    /// Local or temporary variable
    Variable(IrVariable),
}

/// Script: a class-like unit whose body runs top to bottom
#[derive(Debug, Clone, PartialEq)]
pub struct IrScript {
    /// Declared name
    pub name: Name,
    /// Supertype of the script class
    pub base_class: Option<IrType>,
    /// `this` receiver parameter
    pub this_receiver: Option<DeclId>,
    /// Receivers of the enclosing implicit contexts
    pub implicit_receivers: Vec<DeclId>,
    /// Constructor-style inputs
    pub explicit_call_parameters: Vec<DeclId>,
    /// Properties injected by the host
    pub provided_properties: Vec<SymbolId>,
    /// Property holding the value of the last expression
    pub result_property: Option<SymbolId>,
    /// Scripts lowered earlier in the same session whose receivers are visible
    pub earlier_scripts: Vec<SymbolId>,
    /// Body in source order
    pub statements: Vec<IrStatement>,
}

impl IrScript {
    /// Empty script shell
    pub fn new(name: Name) -> Self {
        Self {
            name,
            base_class: None,
            this_receiver: None,
            implicit_receivers: Vec::new(),
            explicit_call_parameters: Vec::new(),
            provided_properties: Vec::new(),
            result_property: None,
            earlier_scripts: Vec::new(),
            statements: Vec::new(),
        }
    }
}

/// A class declared inside a script
#[derive(Debug, Clone, PartialEq)]
pub struct IrClass {
    /// Declared name
    pub name: Name,
    /// Declared visibility
    pub visibility: Visibility,
    /// Declared modality
    pub modality: Modality,
    /// Member declarations
    pub declarations: Vec<DeclId>,
}

/// A property with its backing field and accessors
#[derive(Debug, Clone, PartialEq)]
pub struct IrProperty {
    /// Declared name
    pub name: Name,
    /// Declared visibility
    pub visibility: Visibility,
    /// Declared modality
    pub modality: Modality,
    /// `var` rather than `val`
    pub is_var: bool,
    /// Field holding the value
    pub backing_field: Option<DeclId>,
    /// `<get-name>` accessor
    pub getter: Option<DeclId>,
    /// `<set-name>` accessor, `var` only
    pub setter: Option<DeclId>,
}

/// Storage of a property
#[derive(Debug, Clone, PartialEq)]
pub struct IrField {
    /// Declared name
    pub name: Name,
    /// Field type
    pub ty: IrType,
    /// Declared visibility
    pub visibility: Visibility,
    /// Assigned once
    pub is_final: bool,
    /// Initial value
    pub initializer: Option<ExprId>,
    /// Property this field backs
    pub property: Option<SymbolId>,
}

/// A function or property accessor
#[derive(Debug, Clone, PartialEq)]
pub struct IrFunction {
    /// Declared name
    pub name: Name,
    /// Declared visibility
    pub visibility: Visibility,
    /// Declared modality
    pub modality: Modality,
    /// Declared return type
    pub return_type: IrType,
    /// Receiver parameter of a member function
    pub dispatch_receiver: Option<DeclId>,
    /// Receiver parameter of an extension
    pub extension_receiver: Option<DeclId>,
    /// Value parameter declarations, in order
    pub value_parameters: Vec<DeclId>,
    /// Type parameter symbols, in order
    pub type_parameters: Vec<SymbolId>,
    /// Body, absent for abstract functions
    pub body: Option<ExprId>,
    /// Property this function is an accessor of
    pub property: Option<SymbolId>,
}

/// A value parameter, including receivers
#[derive(Debug, Clone, PartialEq)]
pub struct IrValueParameter {
    /// Declared name
    pub name: Name,
    /// Parameter type
    pub ty: IrType,
    /// Position in the owner's parameter list; None for receivers
    pub index: Option<u32>,
    /// Element type of a `vararg` parameter
    pub vararg_element: Option<IrType>,
    /// Default value expression
    pub default_value: Option<ExprId>,
}

/// A local variable or compiler temporary
#[derive(Debug, Clone, PartialEq)]
pub struct IrVariable {
    /// Declared name
    pub name: Name,
    /// Variable type
    pub ty: IrType,
    /// `var` rather than `val`
    pub is_var: bool,
    /// Initial value
    pub initializer: Option<ExprId>,
}

impl IrDeclaration {
    pub(crate) fn new(symbol: SymbolId, parent: Parent, origin: Origin, span: Span, kind: DeclKind) -> Self {
        Self {
            symbol,
            parent,
            origin,
            span,
            kind,
        }
    }

    /// Symbol bound to this declaration
    pub fn symbol(&self) -> SymbolId {
        self.symbol
    }

    /// Owner, fixed at allocation
    pub fn parent(&self) -> Parent {
        self.parent
    }

    /// Declared name
    pub fn name(&self) -> Name {
        match &self.kind {
            DeclKind::Script(script) => script.name,
            DeclKind::Class(class) => class.name,
            DeclKind::Property(property) => property.name,
            DeclKind::Function(function) => function.name,
            DeclKind::Field(field) => field.name,
            DeclKind::ValueParameter(parameter) => parameter.name,
            DeclKind::Variable(variable) => variable.name,
        }
    }

    /// Type of the value the declaration introduces
    pub fn ty(&self) -> Option<&IrType> {
        match &self.kind {
            DeclKind::Field(field) => Some(&field.ty),
            DeclKind::ValueParameter(parameter) => Some(&parameter.ty),
            DeclKind::Variable(variable) => Some(&variable.ty),
            DeclKind::Function(function) => Some(&function.return_type),
            DeclKind::Script(_) | DeclKind::Class(_) | DeclKind::Property(_) => None,
        }
    }

    /// Script data, if this is a script
    pub fn as_script(&self) -> Option<&IrScript> {
        match &self.kind {
            DeclKind::Script(script) => Some(script),
            _ => None,
        }
    }

    /// Script data, mutably
    pub fn as_script_mut(&mut self) -> Option<&mut IrScript> {
        match &mut self.kind {
            DeclKind::Script(script) => Some(script),
            _ => None,
        }
    }

    /// Property data, if this is a property
    pub fn as_property(&self) -> Option<&IrProperty> {
        match &self.kind {
            DeclKind::Property(property) => Some(property),
            _ => None,
        }
    }

    /// Property data, mutably
    pub fn as_property_mut(&mut self) -> Option<&mut IrProperty> {
        match &mut self.kind {
            DeclKind::Property(property) => Some(property),
            _ => None,
        }
    }

    /// Function data, if this is a function
    pub fn as_function(&self) -> Option<&IrFunction> {
        match &self.kind {
            DeclKind::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Function data, mutably
    pub fn as_function_mut(&mut self) -> Option<&mut IrFunction> {
        match &mut self.kind {
            DeclKind::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Field data, if this is a field
    pub fn as_field(&self) -> Option<&IrField> {
        match &self.kind {
            DeclKind::Field(field) => Some(field),
            _ => None,
        }
    }

    /// Value parameter data, if this is a value parameter
    pub fn as_value_parameter(&self) -> Option<&IrValueParameter> {
        match &self.kind {
            DeclKind::ValueParameter(parameter) => Some(parameter),
            _ => None,
        }
    }

    /// Variable data, if this is a variable
    pub fn as_variable(&self) -> Option<&IrVariable> {
        match &self.kind {
            DeclKind::Variable(variable) => Some(variable),
            _ => None,
        }
    }
}
