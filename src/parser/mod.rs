pub mod tokenizer;
mod tree_builder;

pub use tokenizer::{Position, Span, Token, tokenize};

use crate::ast::SourceTree;
use crate::error::ParseError;
use std::sync::Arc;
use tree_builder::TreeBuilder;

/// Parser trait - converts declaration source code to a syntax tree
pub trait Parser {
    fn parse(&self, source: &str) -> Result<SourceTree, ParseError>;
}

/// TypeScript declaration parser
pub struct DeclarationParser;

impl DeclarationParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DeclarationParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for DeclarationParser {
    fn parse(&self, source: &str) -> Result<SourceTree, ParseError> {
        let tokens = tokenize(source)?;

        let source_arc: Arc<str> = Arc::from(source);
        let mut builder = TreeBuilder::new(tokens, source_arc.clone());
        let decls = builder.build()?;

        Ok(SourceTree::new(decls, source_arc))
    }
}
