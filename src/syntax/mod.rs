//! Lightweight syntax layer for C#-shaped source text.
//!
//! This module family provides just enough structure recovery to drive
//! macro expansion:
//! - Lexer: tokenizes source into a flat token stream, keeping string
//!   literals, comments, and preprocessor lines opaque so braces inside
//!   them never confuse the parser.
//! - Parser: builds a per-file declaration tree (usings, namespaces, nested
//!   type declarations) with byte spans.
//! - Tree: the declaration tree itself plus the positional scope query.
//!
//! Nothing here validates the program; malformed input degrades to a
//! shallower tree rather than an error.

mod kind;
mod lexer;
mod parser;
mod tree;

#[cfg(test)]
mod tests;

pub use kind::SyntaxKind;
pub use lexer::{Lexer, Token, string_literal_value};
pub use parser::parse_file;
pub use tree::{
    Attribute, Decl, EnclosingType, NamespaceDecl, Scope, SourceTree, Span, TypeDecl, TypeKind,
};
