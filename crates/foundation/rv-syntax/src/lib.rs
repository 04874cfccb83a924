//! Syntax tree for script compilation units
//!
//! The tree is produced by the parser and only read afterwards. Nodes live in
//! an arena and are identified by [`SyntaxNodeId`], which is also the key the
//! resolution phase uses to record descriptors, resolved calls and types.

use la_arena::{Arena, Idx};
use rv_intern::Name;
use rv_span::{FileId, FileSpan, Span};
use std::fmt;

/// Identity of a syntax node
pub type SyntaxNodeId = Idx<SyntaxNode>;

/// A syntax tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// The kind of this node
    pub kind: SyntaxKind,
    /// Source location
    pub span: Span,
    /// Declared or referenced name, if the node has one
    pub name: Option<Name>,
    /// Parent node (None for the root)
    pub parent: Option<SyntaxNodeId>,
    /// Child nodes in source order
    pub children: Vec<SyntaxNodeId>,
}

/// Node kinds of a script file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    /// Root of a script file
    Script,
    /// Top-level statement of a script (`println(x)`)
    ScriptInitializer,
    /// `val (a, b) = init`
    DestructuringDeclaration,
    /// One entry of a destructuring declaration
    DestructuringEntry,
    /// Property declaration
    Property,
    /// Function declaration
    Function,
    /// Class, interface or object declaration
    Class,
    /// Type alias
    TypeAlias,
    /// Any expression the statement lowering handles on its own
    Expression,
    /// Call expression
    Call,
    /// Name reference expression
    Reference,
    /// Literal constant
    Literal,
}

impl SyntaxKind {
    /// Whether nodes of this kind are expressions
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            Self::Expression | Self::Call | Self::Reference | Self::Literal
        )
    }

    /// Whether nodes of this kind are member declarations
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            Self::DestructuringDeclaration
                | Self::Property
                | Self::Function
                | Self::Class
                | Self::TypeAlias
                | Self::ScriptInitializer
        )
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Script => "script",
            Self::ScriptInitializer => "script_initializer",
            Self::DestructuringDeclaration => "destructuring_declaration",
            Self::DestructuringEntry => "destructuring_entry",
            Self::Property => "property",
            Self::Function => "function",
            Self::Class => "class",
            Self::TypeAlias => "type_alias",
            Self::Expression => "expression",
            Self::Call => "call",
            Self::Reference => "reference",
            Self::Literal => "literal",
        };
        formatter.write_str(text)
    }
}

/// Syntax tree of one file
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    file: FileId,
    nodes: Arena<SyntaxNode>,
    root: Option<SyntaxNodeId>,
}

impl SyntaxTree {
    /// Create an empty tree for `file`
    pub fn new(file: FileId) -> Self {
        Self {
            file,
            nodes: Arena::new(),
            root: None,
        }
    }

    /// File the tree was parsed from
    pub fn file(&self) -> FileId {
        self.file
    }

    /// Root node, if one was allocated
    pub fn root(&self) -> Option<SyntaxNodeId> {
        self.root
    }

    /// Allocate the root node
    pub fn alloc_root(&mut self, kind: SyntaxKind, span: Span) -> SyntaxNodeId {
        let id = self.nodes.alloc(SyntaxNode {
            kind,
            span,
            name: None,
            parent: None,
            children: Vec::new(),
        });
        self.root = Some(id);
        id
    }

    /// Allocate a node and append it to `parent`'s children
    pub fn alloc_child(
        &mut self,
        parent: SyntaxNodeId,
        kind: SyntaxKind,
        span: Span,
        name: Option<Name>,
    ) -> SyntaxNodeId {
        let id = self.nodes.alloc(SyntaxNode {
            kind,
            span,
            name,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Node `id`
    pub fn node(&self, id: SyntaxNodeId) -> &SyntaxNode {
        &self.nodes[id]
    }

    /// Kind of node `id`
    pub fn kind(&self, id: SyntaxNodeId) -> SyntaxKind {
        self.nodes[id].kind
    }

    /// Source span of node `id`
    pub fn span(&self, id: SyntaxNodeId) -> Span {
        self.nodes[id].span
    }

    /// Span of node `id` together with the tree's file
    pub fn file_span(&self, id: SyntaxNodeId) -> FileSpan {
        FileSpan::new(self.file, self.nodes[id].span)
    }

    /// Children of node `id`, in source order
    pub fn children(&self, id: SyntaxNodeId) -> &[SyntaxNodeId] {
        &self.nodes[id].children
    }

    /// Top-level declarations of a script, in source order
    pub fn declarations(&self, script: SyntaxNodeId) -> impl Iterator<Item = SyntaxNodeId> + '_ {
        self.children(script)
            .iter()
            .copied()
            .filter(|child| self.kind(*child).is_declaration())
    }

    /// Body expression of a script initializer
    pub fn initializer_body(&self, initializer: SyntaxNodeId) -> Option<SyntaxNodeId> {
        self.first_expression(initializer)
    }

    /// Entries of a destructuring declaration, in declared order
    pub fn destructuring_entries(
        &self,
        declaration: SyntaxNodeId,
    ) -> impl Iterator<Item = SyntaxNodeId> + '_ {
        self.children(declaration)
            .iter()
            .copied()
            .filter(|child| self.kind(*child) == SyntaxKind::DestructuringEntry)
    }

    /// Initializer expression of a destructuring declaration
    pub fn destructuring_initializer(&self, declaration: SyntaxNodeId) -> Option<SyntaxNodeId> {
        self.first_expression(declaration)
    }

    fn first_expression(&self, node: SyntaxNodeId) -> Option<SyntaxNodeId> {
        self.children(node)
            .iter()
            .copied()
            .find(|child| self.kind(*child).is_expression())
    }

    /// Number of allocated nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv_intern::Interner;

    #[test]
    fn test_destructuring_accessors() {
        let interner = Interner::new();
        let mut tree = SyntaxTree::new(FileId(0));
        let script = tree.alloc_root(SyntaxKind::Script, Span::new(0, 30));
        let decl = tree.alloc_child(
            script,
            SyntaxKind::DestructuringDeclaration,
            Span::new(0, 20),
            None,
        );
        let first = tree.alloc_child(
            decl,
            SyntaxKind::DestructuringEntry,
            Span::new(5, 6),
            Some(interner.intern("a")),
        );
        let second = tree.alloc_child(
            decl,
            SyntaxKind::DestructuringEntry,
            Span::new(8, 9),
            Some(interner.intern("b")),
        );
        let init = tree.alloc_child(decl, SyntaxKind::Call, Span::new(13, 19), None);

        let entries: Vec<_> = tree.destructuring_entries(decl).collect();
        assert_eq!(entries, vec![first, second]);
        assert_eq!(tree.destructuring_initializer(decl), Some(init));
        assert_eq!(tree.declarations(script).collect::<Vec<_>>(), vec![decl]);
        assert_eq!(tree.node(init).parent, Some(decl));
    }

    #[test]
    fn test_initializer_without_body() {
        let mut tree = SyntaxTree::new(FileId(0));
        let script = tree.alloc_root(SyntaxKind::Script, Span::new(0, 5));
        let init = tree.alloc_child(script, SyntaxKind::ScriptInitializer, Span::new(0, 5), None);
        assert_eq!(tree.initializer_body(init), None);
    }
}
