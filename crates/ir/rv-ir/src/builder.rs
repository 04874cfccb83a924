//! Building and publishing IR units
//!
//! A unit is built privately and becomes visible to the rest of the
//! compilation only through [`IrBuilder::publish`], which binds all of its
//! symbols at once. Parents are assigned at allocation from the innermost
//! owner opened with [`IrBuilder::with_owner`].

use crate::{
    DeclId, DeclKind, ExprId, IrDeclaration, IrExpr, IrExprKind, IrScript, IrType, NodeRef,
    Origin, Parent, SymbolError, SymbolId, SymbolTable, UnitId,
};
use la_arena::Arena;
use log::debug;
use rv_span::{FileId, Span};
use std::ops::Index;
use thiserror::Error;

/// Publishing failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The builder never allocated a root declaration
    #[error("unit {0:?} has no root declaration")]
    MissingRoot(UnitId),

    /// Binding the unit's symbols failed
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// Unit under construction
#[derive(Debug)]
pub struct IrBuilder {
    unit: UnitId,
    file: FileId,
    decls: Arena<IrDeclaration>,
    exprs: Arena<IrExpr>,
    root: Option<DeclId>,
    owners: Vec<DeclId>,
    declared: Vec<(SymbolId, DeclId)>,
}

impl IrBuilder {
    /// Empty builder for `unit` in `file`
    pub fn new(unit: UnitId, file: FileId) -> Self {
        Self {
            unit,
            file,
            decls: Arena::new(),
            exprs: Arena::new(),
            root: None,
            owners: Vec::new(),
            declared: Vec::new(),
        }
    }

    /// Unit being built
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    /// Allocate the unit's root declaration, parented to the file
    pub fn alloc_root(&mut self, symbol: SymbolId, origin: Origin, span: Span, kind: DeclKind) -> DeclId {
        let root = self.alloc_decl_in(Parent::File(self.file), symbol, origin, span, kind);
        self.root = Some(root);
        root
    }

    /// Allocate a declaration under the innermost open owner
    pub fn alloc_decl(&mut self, symbol: SymbolId, origin: Origin, span: Span, kind: DeclKind) -> DeclId {
        let parent = self
            .owners
            .last()
            .map_or(Parent::File(self.file), |owner| Parent::Declaration(*owner));
        self.alloc_decl_in(parent, symbol, origin, span, kind)
    }

    /// Allocate a declaration under an explicit parent
    pub fn alloc_decl_in(
        &mut self,
        parent: Parent,
        symbol: SymbolId,
        origin: Origin,
        span: Span,
        kind: DeclKind,
    ) -> DeclId {
        let decl = self
            .decls
            .alloc(IrDeclaration::new(symbol, parent, origin, span, kind));
        self.declared.push((symbol, decl));
        decl
    }

    /// Run `build` with `owner` as the parent of new declarations
    pub fn with_owner<T>(&mut self, owner: DeclId, build: impl FnOnce(&mut Self) -> T) -> T {
        self.owners.push(owner);
        let result = build(self);
        self.owners.pop();
        result
    }

    /// Innermost open owner
    pub fn current_owner(&self) -> Option<DeclId> {
        self.owners.last().copied()
    }

    /// Allocate an expression; expressions have no parent
    pub fn alloc_expr(&mut self, kind: IrExprKind, ty: IrType, span: Span) -> ExprId {
        self.exprs.alloc(IrExpr { kind, ty, span })
    }

    /// Declaration `decl`
    pub fn decl(&self, decl: DeclId) -> &IrDeclaration {
        &self.decls[decl]
    }

    /// Declaration `decl`, mutably
    pub fn decl_mut(&mut self, decl: DeclId) -> &mut IrDeclaration {
        &mut self.decls[decl]
    }

    /// Expression `expr`
    pub fn expr(&self, expr: ExprId) -> &IrExpr {
        &self.exprs[expr]
    }

    /// Script data of `decl`, if it is a script
    pub fn script_mut(&mut self, decl: DeclId) -> Option<&mut IrScript> {
        self.decls[decl].as_script_mut()
    }

    /// Bind every declared symbol and freeze the unit
    ///
    /// # Errors
    ///
    /// Fails without binding anything if there is no root or a symbol is
    /// already bound elsewhere (or twice in this unit).
    pub fn publish(self, symbols: &SymbolTable) -> Result<IrUnit, BuildError> {
        let root = self.root.ok_or(BuildError::MissingRoot(self.unit))?;
        let bindings: Vec<_> = self
            .declared
            .iter()
            .map(|(symbol, decl)| {
                (
                    *symbol,
                    NodeRef {
                        unit: self.unit,
                        decl: *decl,
                    },
                )
            })
            .collect();
        symbols.bind_all(&bindings)?;
        debug!(
            "published {:?}: {} declarations, {} expressions",
            self.unit,
            self.decls.len(),
            self.exprs.len()
        );
        Ok(IrUnit {
            id: self.unit,
            file: self.file,
            decls: self.decls,
            exprs: self.exprs,
            root,
        })
    }
}

/// A published unit
#[derive(Debug, Clone)]
pub struct IrUnit {
    id: UnitId,
    file: FileId,
    decls: Arena<IrDeclaration>,
    exprs: Arena<IrExpr>,
    root: DeclId,
}

impl IrUnit {
    /// Identity of the unit
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// Source file of the unit
    pub fn file(&self) -> FileId {
        self.file
    }

    /// Root declaration
    pub fn root(&self) -> DeclId {
        self.root
    }

    /// Declaration `decl`
    pub fn decl(&self, decl: DeclId) -> &IrDeclaration {
        &self.decls[decl]
    }

    /// Expression `expr`
    pub fn expr(&self, expr: ExprId) -> &IrExpr {
        &self.exprs[expr]
    }

    /// Root script data, if the root is a script
    pub fn script(&self) -> Option<&IrScript> {
        self.decls[self.root].as_script()
    }

    /// All declarations in allocation order
    pub fn decls(&self) -> impl Iterator<Item = (DeclId, &IrDeclaration)> + '_ {
        self.decls.iter()
    }

    /// Declarations whose parent is `decl`
    pub fn children(&self, decl: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        self.decls
            .iter()
            .filter(move |(_, child)| child.parent() == Parent::Declaration(decl))
            .map(|(id, _)| id)
    }

    /// Declaration bound to `symbol` in this unit
    pub fn find(&self, symbol: SymbolId) -> Option<DeclId> {
        self.decls
            .iter()
            .find(|(_, decl)| decl.symbol() == symbol)
            .map(|(id, _)| id)
    }

    /// Number of declarations
    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    /// Number of expressions
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }
}

impl Index<DeclId> for IrUnit {
    type Output = IrDeclaration;

    fn index(&self, decl: DeclId) -> &Self::Output {
        &self.decls[decl]
    }
}

impl Index<ExprId> for IrUnit {
    type Output = IrExpr;

    fn index(&self, expr: ExprId) -> &Self::Output {
        &self.exprs[expr]
    }
}
