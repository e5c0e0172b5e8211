use std::sync::Arc;

// Re-export Position and Span from the tokenizer so the rest of the
// codebase uses a single span type.
pub use crate::parser::tokenizer::{Position, Span};

/// Syntax tree for one declaration source file
#[derive(Debug, Clone)]
pub struct SourceTree {
    pub decls: Vec<DeclNode>,
    pub source: Arc<str>,
}

impl SourceTree {
    pub fn new(decls: Vec<DeclNode>, source: Arc<str>) -> Self {
        Self { decls, source }
    }
}

/// Top-level declaration
#[derive(Debug, Clone)]
pub enum DeclNode {
    Interface(InterfaceNode),
    TypeAlias(TypeAliasNode),
    Enum(EnumNode),
}

/// `interface Name extends A, B { ... }`
#[derive(Debug, Clone)]
pub struct InterfaceNode {
    pub name: String,
    pub extends: Vec<String>,
    pub members: Vec<MemberNode>,
    /// Raw leading comment tokens (delimiters still attached)
    pub comments: Vec<String>,
    pub span: Span,
}

/// `type Name = <type expression>`
#[derive(Debug, Clone)]
pub struct TypeAliasNode {
    pub name: String,
    pub ty: TypeNode,
    pub comments: Vec<String>,
    pub span: Span,
}

/// `enum Name { A = "a", B }`
#[derive(Debug, Clone)]
pub struct EnumNode {
    pub name: String,
    pub members: Vec<EnumMemberNode>,
    pub comments: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct EnumMemberNode {
    /// Member identifier, quotes already stripped for quoted names
    pub name: String,
    /// String literal initializer value, when present
    pub value: Option<String>,
    pub span: Span,
}

/// One property signature of an interface or object literal type
#[derive(Debug, Clone)]
pub struct MemberNode {
    /// Member name, quotes already stripped for quoted names
    pub name: String,
    pub optional: bool,
    pub ty: TypeNode,
    pub comments: Vec<String>,
    pub span: Span,
}

/// A type expression, with its verbatim source text
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub kind: TypeKind,
    /// Trimmed source slice covering the expression
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    /// Top-level union of two or more alternatives: `A | B`
    Union(Vec<TypeNode>),
    /// Bracket-array syntax: `T[]`
    Array(Box<TypeNode>),
    /// Inline object literal shape: `{ a: string }`
    Object(Vec<MemberNode>),
    /// Named reference, possibly generic: `CourseId`, `Array<T>`, `Omit<A, 'b'>`
    Ref { name: String, args: Vec<TypeNode> },
    /// String or numeric literal type: `'choose'`, `42`
    Literal,
    /// Anything else captured verbatim (intersections, parens, functions)
    Other,
}

impl TypeNode {
    /// True for `T[]` and `Array<T>` shapes
    pub fn is_array(&self) -> bool {
        match &self.kind {
            TypeKind::Array(_) => true,
            TypeKind::Ref { name, args } => name == "Array" && args.len() == 1,
            _ => false,
        }
    }

    /// Top-level union members, when this is a union of >= 2 alternatives
    pub fn union_members(&self) -> Option<&[TypeNode]> {
        match &self.kind {
            TypeKind::Union(members) if members.len() >= 2 => Some(members),
            _ => None,
        }
    }
}
