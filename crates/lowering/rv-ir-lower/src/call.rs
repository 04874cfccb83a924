//! Calls with receivers decided ahead of lowering

use crate::{LoweringContext, LoweringError, LoweringResult, StatementLowering};
use log::trace;
use rv_descriptors::{DescriptorId, ExplicitReceiverKind, ReceiverValue, ResolvedCall, Ty};
use rv_ir::{ExprId, IrBuilder, IrExprKind, IrType, StatementOrigin, SymbolId, SymbolKind};
use rv_span::Span;
use rv_syntax::SyntaxNodeId;

/// Receiver value of a pregenerated call
#[derive(Debug, Clone, PartialEq)]
pub enum CallReceiver {
    /// Lower this expression
    Expression(SyntaxNodeId),
    /// Read the in-scope value parameter of this receiver descriptor
    Implicit(DescriptorId),
    /// Read an already lowered value
    Value {
        /// Value parameter or variable
        symbol: SymbolId,
        /// Its type
        ty: IrType,
    },
    /// Placeholder from resolution; must be replaced before lowering
    Transient,
}

impl From<ReceiverValue> for CallReceiver {
    fn from(value: ReceiverValue) -> Self {
        match value {
            ReceiverValue::Expression(node) => Self::Expression(node),
            ReceiverValue::Implicit(receiver) => Self::Implicit(receiver),
            ReceiverValue::Transient => Self::Transient,
        }
    }
}

/// A resolved call whose receivers may be replaced before it is lowered
#[derive(Debug, Clone, PartialEq)]
pub struct PregeneratedCall {
    /// Called function
    pub callee: DescriptorId,
    /// Receiver of a member call
    pub dispatch_receiver: Option<CallReceiver>,
    /// Receiver of an extension call
    pub extension_receiver: Option<CallReceiver>,
    /// Which receiver the explicit receiver expression fills
    pub explicit_receiver_kind: ExplicitReceiverKind,
    /// Value argument expressions, in order
    pub arguments: Vec<SyntaxNodeId>,
    /// Type arguments, in order
    pub type_arguments: Vec<Ty>,
    /// Type of the call
    pub result_type: Ty,
    /// Source construct of the call
    pub origin: Option<StatementOrigin>,
}

impl PregeneratedCall {
    /// Call as resolved by the front end
    pub fn from_resolved(call: &ResolvedCall) -> Self {
        Self {
            callee: call.callee,
            dispatch_receiver: call.dispatch_receiver.map(CallReceiver::from),
            extension_receiver: call.extension_receiver.map(CallReceiver::from),
            explicit_receiver_kind: call.explicit_receiver_kind,
            arguments: call.value_arguments.clone(),
            type_arguments: call.type_arguments.clone(),
            result_type: call.result_type.clone(),
            origin: None,
        }
    }

    /// Replace the receiver that was explicit in source
    ///
    /// Calls without an explicit receiver are left untouched.
    pub fn set_explicit_receiver(&mut self, receiver: CallReceiver) {
        match self.explicit_receiver_kind {
            ExplicitReceiverKind::DispatchReceiver => self.dispatch_receiver = Some(receiver),
            ExplicitReceiverKind::ExtensionReceiver | ExplicitReceiverKind::BothReceivers => {
                self.extension_receiver = Some(receiver);
            }
            ExplicitReceiverKind::NoExplicitReceiver => {}
        }
    }
}

fn lower_receiver<S: StatementLowering + ?Sized>(
    statements: &mut S,
    cx: &mut LoweringContext<'_>,
    builder: &mut IrBuilder,
    callee: DescriptorId,
    receiver: &CallReceiver,
    span: Span,
) -> LoweringResult<ExprId> {
    match receiver {
        CallReceiver::Expression(node) => statements.lower_expression(cx, builder, *node),
        CallReceiver::Implicit(descriptor) => {
            let symbol = cx
                .locals
                .value_parameter(*descriptor)
                .ok_or(LoweringError::UnresolvedReceiver {
                    receiver: *descriptor,
                })?;
            let ty = cx.type_of(*descriptor)?;
            Ok(builder.alloc_expr(IrExprKind::GetValue { symbol }, ty, span))
        }
        CallReceiver::Value { symbol, ty } => Ok(builder.alloc_expr(
            IrExprKind::GetValue { symbol: *symbol },
            ty.clone(),
            span,
        )),
        CallReceiver::Transient => Err(LoweringError::TransientReceiver { callee }),
    }
}

/// Lower `call`: receivers first, then arguments in order
///
/// # Errors
///
/// A transient receiver, an implicit receiver not in scope, or any error of
/// the statement lowering.
pub fn generate_call<S: StatementLowering + ?Sized>(
    statements: &mut S,
    cx: &mut LoweringContext<'_>,
    builder: &mut IrBuilder,
    call: &PregeneratedCall,
    span: Span,
) -> LoweringResult<ExprId> {
    let callee = cx.symbols.reference(SymbolKind::Function, call.callee);
    let dispatch_receiver = call
        .dispatch_receiver
        .as_ref()
        .map(|receiver| lower_receiver(statements, cx, builder, call.callee, receiver, span))
        .transpose()?;
    let extension_receiver = call
        .extension_receiver
        .as_ref()
        .map(|receiver| lower_receiver(statements, cx, builder, call.callee, receiver, span))
        .transpose()?;
    let arguments = call
        .arguments
        .iter()
        .map(|argument| statements.lower_expression(cx, builder, *argument))
        .collect::<LoweringResult<Vec<_>>>()?;
    let type_arguments = call
        .type_arguments
        .iter()
        .map(|argument| cx.translate(argument))
        .collect();
    let ty = cx.translate(&call.result_type);
    trace!("call {callee:?} with {} arguments", arguments.len());

    Ok(builder.alloc_expr(
        IrExprKind::Call {
            callee,
            dispatch_receiver,
            extension_receiver,
            arguments,
            type_arguments,
            origin: call.origin,
        },
        ty,
        span,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv_descriptors::{Descriptor, DescriptorKind, DescriptorStore, VariableDescriptor};
    use rv_intern::Interner;

    fn resolved(kind: ExplicitReceiverKind) -> ResolvedCall {
        let interner = Interner::new();
        let mut store = DescriptorStore::new();
        let callee = store.alloc(Descriptor::new(
            interner.component(1),
            DescriptorKind::Variable(VariableDescriptor {
                ty: Ty::Dynamic,
                is_var: false,
            }),
        ));
        ResolvedCall {
            callee,
            dispatch_receiver: Some(ReceiverValue::Transient),
            extension_receiver: None,
            explicit_receiver_kind: kind,
            value_arguments: Vec::new(),
            type_arguments: Vec::new(),
            result_type: Ty::Dynamic,
        }
    }

    #[test]
    fn test_explicit_dispatch_receiver_replaced() {
        let mut call = PregeneratedCall::from_resolved(&resolved(ExplicitReceiverKind::DispatchReceiver));
        let value = CallReceiver::Value {
            symbol: SymbolId(3),
            ty: IrType::Dynamic,
        };
        call.set_explicit_receiver(value.clone());
        assert_eq!(call.dispatch_receiver, Some(value));
        assert_eq!(call.extension_receiver, None);
    }

    #[test]
    fn test_no_explicit_receiver_untouched() {
        let mut call =
            PregeneratedCall::from_resolved(&resolved(ExplicitReceiverKind::NoExplicitReceiver));
        call.set_explicit_receiver(CallReceiver::Value {
            symbol: SymbolId(3),
            ty: IrType::Dynamic,
        });
        assert_eq!(call.dispatch_receiver, Some(CallReceiver::Transient));
    }
}
