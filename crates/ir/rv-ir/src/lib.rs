//! Declaration-level intermediate representation
//!
//! The IR makes everything explicit that the syntax tree leaves implicit:
//! receivers are value parameters, properties own backing fields and
//! accessors, and every declaration records why it exists ([`Origin`]).
//!
//! - [`SymbolTable`]: process-wide descriptor → symbol registry, bind-once
//! - [`LocalSymbols`]: scoped value parameters and variables of one unit
//! - [`IrBuilder`]: build-with-scope construction, published as an [`IrUnit`]
//! - [`TypeTranslator`]: semantic types → [`IrType`]

mod builder;
mod decl;
mod expr;
mod local;
mod origin;
mod symbol;
mod symbol_table;
mod types;

pub use builder::{BuildError, IrBuilder, IrUnit};
pub use decl::{
    DeclId, DeclKind, IrClass, IrDeclaration, IrField, IrFunction, IrProperty, IrScript,
    IrStatement, IrValueParameter, IrVariable, Parent,
};
pub use expr::{ExprId, IrConst, IrExpr, IrExprKind, StatementOrigin};
pub use local::LocalSymbols;
pub use origin::Origin;
pub use symbol::{NodeRef, SymbolData, SymbolError, SymbolId, SymbolKind, UnitId};
pub use symbol_table::{ScriptRecord, SymbolTable};
pub use types::{DefaultTypeTranslator, IrType, TypeTranslator};
