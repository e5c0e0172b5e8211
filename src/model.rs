use std::fmt;

/// What kind of declaration a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// `interface Name { ... }`
    Interface,
    /// `type Name = { ... }` — an alias whose right-hand side is an inline
    /// object shape, treated identically to an interface
    AliasStruct,
    /// `type Name = <expression>` — any other right-hand side
    AliasScalar,
    /// `enum Name { ... }`
    Enum,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeclKind::Interface => "interface",
            DeclKind::AliasStruct => "type (object)",
            DeclKind::AliasScalar => "type",
            DeclKind::Enum => "enum",
        };
        f.write_str(s)
    }
}

/// Intermediate representation of one top-level type declaration.
///
/// The collection of these records is the contract between extraction and
/// emission; it is built once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    /// Ordered members, for `Interface` / `AliasStruct`
    pub properties: Vec<Property>,
    /// Textual right-hand-side expression, for `AliasScalar`
    pub alias_expression: Option<String>,
    /// Ordered literal values, for `Enum`
    pub enum_values: Vec<String>,
    /// Cleaned leading comment lines
    pub comments: Vec<String>,
    /// Base-type names from the heritage clause, in source order
    pub extends: Vec<String>,
}

/// Intermediate representation of one member of an interface/struct-alias
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    /// Verbatim source text of the member's type
    pub type_expression: String,
    pub optional: bool,
    pub is_array: bool,
    pub is_union: bool,
    /// Member type expressions of a top-level union, in source order
    pub union_members: Vec<String>,
    /// Cleaned leading comment lines
    pub comments: Vec<String>,
}
