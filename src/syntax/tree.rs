//! The per-file declaration tree and the positional scope query.
//!
//! The tree is built once per file by the parser and then queried per
//! directive, so position lookups never re-scan source text.

/// A half-open byte range `[start, end)` in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Creates a span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns true if `pos` falls inside this span.
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// The kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Record,
    RecordStruct,
}

impl TypeKind {
    /// The declaration keyword, as it must be reproduced on a partial
    /// re-declaration for the host to merge the fragments.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Record => "record",
            Self::RecordStruct => "record struct",
        }
    }
}

/// An attribute attached to a type declaration, e.g. `[Macro("X", "type:T")]`.
///
/// Only string-literal arguments are captured; anything else inside the
/// argument list is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as written (dotted names kept whole).
    pub name: String,
    /// String-literal argument values, in declared order.
    pub args: Vec<String>,
}

impl Attribute {
    /// Returns true if this attribute matches `name`, tolerating the
    /// conventional `...Attribute` suffix.
    pub fn is(&self, name: &str) -> bool {
        let last = self.name.rsplit('.').next().unwrap_or(&self.name);
        last == name || last.strip_suffix("Attribute") == Some(name)
    }
}

/// A type declaration (class, struct, interface, record).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Declaration kind.
    pub kind: TypeKind,
    /// Declared name (generic arity markers not included).
    pub name: String,
    /// True when declared with the `partial` modifier.
    pub is_partial: bool,
    /// Attributes attached to the declaration.
    pub attributes: Vec<Attribute>,
    /// Span of the whole declaration, attributes included.
    pub span: Span,
    /// Span from the opening `{` to the closing `}` (both included).
    /// Zero-length for bodiless declarations (`record R(...);`).
    pub body: Span,
    /// Nested declarations.
    pub children: Vec<Decl>,
}

/// A namespace declaration (block-style or file-scoped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// Declared name, possibly dotted (`A.B.C`).
    pub name: String,
    /// True for `namespace X;` file-scoped form.
    pub file_scoped: bool,
    /// Span of the declaration (to end of file for file-scoped).
    pub span: Span,
    /// Using directives declared inside this namespace.
    pub usings: Vec<String>,
    /// Nested declarations.
    pub children: Vec<Decl>,
}

/// One node in the declaration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Namespace(NamespaceDecl),
    Type(TypeDecl),
}

impl Decl {
    fn span(&self) -> Span {
        match self {
            Self::Namespace(ns) => ns.span,
            Self::Type(ty) => ty.span,
        }
    }
}

/// One link in an enclosing-type chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosingType {
    /// Declaration kind, reproduced on the emitted wrapper.
    pub kind: TypeKind,
    /// Declared name.
    pub name: String,
    /// Whether the original declaration already carries `partial`.
    pub is_partial: bool,
}

/// The lexical context of a source position: enclosing namespace, type
/// chain (outermost first), and visible using directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Dot-joined namespace path; empty string when outside any namespace.
    pub namespace: String,
    /// Enclosing type declarations, outermost to innermost.
    pub types: Vec<EnclosingType>,
    /// Using directives visible at the position (file-level plus every
    /// enclosing namespace's own).
    pub usings: Vec<String>,
}

/// The declaration tree for one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTree {
    /// File-level using directives.
    pub usings: Vec<String>,
    /// Top-level declarations.
    pub decls: Vec<Decl>,
}

impl SourceTree {
    /// Reconstructs the scope enclosing `pos`.
    ///
    /// Sibling spans never overlap in a well-formed tree; if malformed input
    /// produces overlaps, the last (innermost) match wins.
    pub fn scope_at(&self, pos: usize) -> Scope {
        let mut scope = Scope {
            usings: self.usings.clone(),
            ..Scope::default()
        };
        let mut ns_parts: Vec<&str> = Vec::new();

        let mut decls = &self.decls;
        loop {
            let hit = decls.iter().rev().find(|d| d.span().contains(pos));
            match hit {
                Some(Decl::Namespace(ns)) => {
                    ns_parts.push(&ns.name);
                    scope.usings.extend(ns.usings.iter().cloned());
                    decls = &ns.children;
                }
                Some(Decl::Type(ty)) => {
                    scope.types.push(EnclosingType {
                        kind: ty.kind,
                        name: ty.name.clone(),
                        is_partial: ty.is_partial,
                    });
                    decls = &ty.children;
                }
                None => break,
            }
        }

        scope.namespace = ns_parts.join(".");
        scope
    }

    /// All type declarations in the file, outermost first (preorder).
    pub fn types(&self) -> Vec<&TypeDecl> {
        fn walk<'t>(decls: &'t [Decl], out: &mut Vec<&'t TypeDecl>) {
            for decl in decls {
                match decl {
                    Decl::Namespace(ns) => walk(&ns.children, out),
                    Decl::Type(ty) => {
                        out.push(ty);
                        walk(&ty.children, out);
                    }
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.decls, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_contains() {
        let span = Span::new(2, 5);
        assert!(!span.contains(1));
        assert!(span.contains(2));
        assert!(span.contains(4));
        assert!(!span.contains(5));
    }

    #[test]
    fn test_attribute_is_tolerates_suffix() {
        let attr = Attribute {
            name: "MacroAttribute".to_string(),
            args: vec![],
        };
        assert!(attr.is("Macro"));

        let attr = Attribute {
            name: "Game.Macros.Macro".to_string(),
            args: vec![],
        };
        assert!(attr.is("Macro"));
        assert!(!attr.is("Other"));
    }

    #[test]
    fn test_type_kind_keywords() {
        assert_eq!(TypeKind::Class.keyword(), "class");
        assert_eq!(TypeKind::RecordStruct.keyword(), "record struct");
    }
}
