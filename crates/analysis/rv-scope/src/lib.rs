//! Member scopes
//!
//! A member scope answers "which functions/properties named `n` does this
//! type have". [`ClassMemberScope`] is the plain table-backed scope;
//! [`DelegatedMemberScope`] views another scope through a delegate, handing
//! out fresh forwarding copies of its members.

mod delegated;
mod member;
mod scope;

pub use delegated::DelegatedMemberScope;
pub use member::{
    FunctionKind, FunctionMember, MemberOwner, PropertyKind, PropertyMember, TypeParameterMember,
    ValueParameterMember,
};
pub use scope::{ClassMemberScope, MemberScope, ProcessorAction};
