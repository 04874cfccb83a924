//! Semantic model produced by resolution and type inference
//!
//! Lowering only reads this model. It is built before lowering starts and
//! outlives it:
//! - [`Descriptor`]: semantic identity of a declaration, as a tagged variant
//!   with capability queries instead of a class hierarchy
//! - [`Ty`]: resolved semantic types
//! - [`ResolvedCall`]: call resolution results
//! - [`BindingContext`]: lookups keyed by syntax node identity

mod binding;
mod call;
mod descriptor;
mod ty;

pub use binding::{BindingContext, Bindings};
pub use call::{ExplicitReceiverKind, ReceiverValue, ResolvedCall};
pub use descriptor::{
    Annotation, Capability, ClassDescriptor, ClassKind, ConstValue, Descriptor, DescriptorId,
    DescriptorKind, DescriptorStore, FunctionDescriptor, Modality, PropertyDescriptor,
    ReceiverParameterDescriptor, ScriptDescriptor, TypeParameterDescriptor,
    ValueParameterDescriptor, VariableDescriptor, Visibility,
};
pub use ty::{Ty, Variance};
