//! Call resolution results

use crate::{DescriptorId, Ty};
use rv_syntax::SyntaxNodeId;

/// Value a call is made on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverValue {
    /// Value of an explicit receiver expression (`x.f()`)
    Expression(SyntaxNodeId),
    /// Implicit `this` of an enclosing class or script (receiver parameter descriptor)
    Implicit(DescriptorId),
    /// Receiver that exists only during resolution, e.g. the destructured value
    /// of a `componentN` call; lowering must substitute a real value for it
    Transient,
}

/// Which receiver slot was written explicitly in source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExplicitReceiverKind {
    /// `f()`
    NoExplicitReceiver,
    /// `x.f()` where `f` is a member of `x`
    DispatchReceiver,
    /// `x.f()` where `f` is an extension on `x`
    ExtensionReceiver,
    /// `with(d) { x.f() }` where `f` is a member extension
    BothReceivers,
}

/// A resolved call
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCall {
    /// Called function
    pub callee: DescriptorId,
    /// Dispatch receiver, if the callee is a member
    pub dispatch_receiver: Option<ReceiverValue>,
    /// Extension receiver, if the callee is an extension
    pub extension_receiver: Option<ReceiverValue>,
    /// Which receiver was explicit in source
    pub explicit_receiver_kind: ExplicitReceiverKind,
    /// Argument expressions in parameter order
    pub value_arguments: Vec<SyntaxNodeId>,
    /// Inferred type arguments
    pub type_arguments: Vec<Ty>,
    /// Type of the call expression
    pub result_type: Ty,
}

impl ResolvedCall {
    /// Receiver written in source, if any
    pub fn explicit_receiver(&self) -> Option<ReceiverValue> {
        match self.explicit_receiver_kind {
            ExplicitReceiverKind::NoExplicitReceiver => None,
            ExplicitReceiverKind::DispatchReceiver => self.dispatch_receiver,
            ExplicitReceiverKind::ExtensionReceiver | ExplicitReceiverKind::BothReceivers => {
                self.extension_receiver
            }
        }
    }
}
