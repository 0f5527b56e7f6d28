//! Syntax kinds for the declaration lexer.
//!
//! Tokens only; the parser builds its tree directly from the token stream
//! and never materializes intermediate nodes.

/// All token kinds produced by the lexer.
///
/// Literals and comments are single opaque tokens: their text is carried
/// verbatim and any braces inside them are invisible to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    /// Plain text content not covered by any other kind.
    Text = 0,
    /// Whitespace (spaces, tabs, newlines).
    Whitespace,
    /// An identifier.
    Ident,

    // Keywords relevant to declaration structure
    /// `using`
    UsingKw,
    /// `namespace`
    NamespaceKw,
    /// `class`
    ClassKw,
    /// `struct`
    StructKw,
    /// `interface`
    InterfaceKw,
    /// `record`
    RecordKw,
    /// `partial`
    PartialKw,

    // Literals, kept opaque
    /// `"..."` or `@"..."` string literal, quotes included.
    StringLit,
    /// `'.'` char literal, quotes included.
    CharLit,

    // Comments and preprocessor lines, kept opaque
    /// `// ...` to end of line.
    LineComment,
    /// `/* ... */`.
    BlockComment,
    /// A `#...` line (directive text up to but excluding the newline).
    /// Only recognized when `#` is the first non-whitespace char on a line.
    PreprocLine,

    // Punctuation
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `.`
    Dot,
}
