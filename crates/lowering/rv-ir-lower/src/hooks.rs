//! Lowering supplied by the caller

use crate::{generate_call, LoweringContext, LoweringResult, PregeneratedCall};
use rv_ir::{DeclId, ExprId, IrBuilder};
use rv_span::Span;
use rv_syntax::SyntaxNodeId;

/// Expression and statement lowering
pub trait StatementLowering {
    /// Lower one expression into `builder`
    ///
    /// # Errors
    ///
    /// Implementation-defined; propagated unchanged.
    fn lower_expression(
        &mut self,
        cx: &mut LoweringContext<'_>,
        builder: &mut IrBuilder,
        expression: SyntaxNodeId,
    ) -> LoweringResult<ExprId>;

    /// Lower a call whose receivers were already decided
    ///
    /// # Errors
    ///
    /// See [`generate_call`].
    fn lower_call(
        &mut self,
        cx: &mut LoweringContext<'_>,
        builder: &mut IrBuilder,
        call: &PregeneratedCall,
        span: Span,
    ) -> LoweringResult<ExprId> {
        generate_call(self, cx, builder, call, span)
    }
}

/// Lowering of ordinary declarations (functions, properties, classes)
pub trait MemberLowering {
    /// Lower `declaration` under the builder's current owner
    ///
    /// `Ok(None)` means nothing was produced, which the script lowering
    /// treats as an internal error.
    ///
    /// # Errors
    ///
    /// Implementation-defined; propagated unchanged.
    fn lower_member(
        &mut self,
        cx: &mut LoweringContext<'_>,
        builder: &mut IrBuilder,
        declaration: SyntaxNodeId,
    ) -> LoweringResult<Option<DeclId>>;
}
