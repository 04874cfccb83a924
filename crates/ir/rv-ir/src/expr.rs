//! IR expressions

use crate::{IrStatement, IrType, SymbolId};
use la_arena::Idx;
use rv_span::Span;

/// Identity of an expression within its unit
pub type ExprId = Idx<IrExpr>;

/// An IR expression
#[derive(Debug, Clone, PartialEq)]
pub struct IrExpr {
    /// Member kind
    pub kind: IrExprKind,
    /// Type of the produced value
    pub ty: IrType,
    /// Source range, [`Span::UNDEFINED`] for synthesized expressions
    pub span: Span,
}

/// Source construct an expression was lowered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementOrigin {
    /// Assignments of a destructuring declaration
    DestructuringDeclaration,
    /// `componentN()` call of the n-th destructuring entry, 1-based
    ComponentN(u32),
}

/// Constant value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrConst {
    /// `Unit`
    Unit,
    /// `null`
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// String
    String(String),
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq)]
pub enum IrExprKind {
    /// Constant
    Const(IrConst),
    /// Read of a value parameter or variable
    GetValue {
        /// Parameter or variable symbol
        symbol: SymbolId,
    },
    /// Field read
    GetField {
        /// Field symbol
        field: SymbolId,
        /// Object holding the field, `None` for static fields
        receiver: Option<ExprId>,
    },
    /// Field write
    SetField {
        /// Field symbol
        field: SymbolId,
        /// Object holding the field, `None` for static fields
        receiver: Option<ExprId>,
        /// Stored value
        value: ExprId,
    },
    /// Function call
    Call {
        /// Function symbol
        callee: SymbolId,
        /// Receiver of a member call
        dispatch_receiver: Option<ExprId>,
        /// Receiver of an extension call
        extension_receiver: Option<ExprId>,
        /// Value arguments, in order
        arguments: Vec<ExprId>,
        /// Type arguments, in order
        type_arguments: Vec<IrType>,
        /// Source construct of the call
        origin: Option<StatementOrigin>,
    },
    /// Return from the function `target`
    Return {
        /// Function returned from
        target: SymbolId,
        /// Returned value
        value: ExprId,
    },
    /// Statement sequence
    Block {
        /// Statements, in order
        statements: Vec<IrStatement>,
        /// Source construct of the block
        origin: Option<StatementOrigin>,
    },
}
