//! Why a declaration was created

use std::fmt;

/// Origin tag of an IR declaration
///
/// Diagnostics and later passes use it to tell source declarations from
/// synthesized ones. It has no runtime effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Written in source
    Defined,
    /// `this` receiver of a class, script or accessor
    InstanceReceiver,
    /// Receiver of an enclosing implicit context of a script
    ScriptImplicitReceiver,
    /// Constructor-style input of a script
    ScriptCallParameter,
    /// Binding injected into a script by its host
    ScriptProvidedProperty,
    /// Property holding the value of a script's last expression
    ScriptResultProperty,
    /// Getter or setter generated for a property
    DefaultPropertyAccessor,
    /// Field storing a property's value
    PropertyBackingField,
    /// Temporary introduced by lowering
    TemporaryVariable,
    /// Member forwarding to a delegate
    Delegated,
}

impl Origin {
    /// Whether the declaration has no counterpart in source
    pub fn is_synthetic(self) -> bool {
        !matches!(self, Self::Defined)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Defined => "DEFINED",
            Self::InstanceReceiver => "INSTANCE_RECEIVER",
            Self::ScriptImplicitReceiver => "SCRIPT_IMPLICIT_RECEIVER",
            Self::ScriptCallParameter => "SCRIPT_CALL_PARAMETER",
            Self::ScriptProvidedProperty => "SCRIPT_PROVIDED_PROPERTY",
            Self::ScriptResultProperty => "SCRIPT_RESULT_PROPERTY",
            Self::DefaultPropertyAccessor => "DEFAULT_PROPERTY_ACCESSOR",
            Self::PropertyBackingField => "PROPERTY_BACKING_FIELD",
            Self::TemporaryVariable => "IR_TEMPORARY_VARIABLE",
            Self::Delegated => "DELEGATED_MEMBER",
        };
        formatter.write_str(text)
    }
}
