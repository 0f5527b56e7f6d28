//! Declaration parser for C#-shaped source text.
//!
//! Walks the token stream once and recovers the declaration structure the
//! engine needs: using directives, namespaces (block and file-scoped), and
//! nested type declarations with modifiers, attributes, and byte spans.
//! Everything else (members, statements, expressions) is brace-matched and
//! skipped. Malformed input never fails: open frames are closed at end of
//! file and the query layer sees a shallower tree.

use super::kind::SyntaxKind;
use super::lexer::{Lexer, Token, string_literal_value};
use super::tree::{Attribute, Decl, NamespaceDecl, SourceTree, Span, TypeDecl, TypeKind};

/// Modifiers that may precede a type declaration. Any other identifier at
/// statement level means we are looking at a member, not a type.
const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "abstract", "sealed", "readonly",
    "ref", "unsafe", "new", "file",
];

/// Parses one source file into its declaration tree.
pub fn parse_file(text: &str) -> SourceTree {
    Parser::new(text).parse()
}

/// An open scope on the parse stack.
enum Frame {
    /// A namespace whose closing brace (if any) has not been seen yet.
    Namespace(NamespaceDecl),
    /// A type declaration whose body is still open.
    Type(TypeDecl),
    /// Any other brace pair (method body, property accessor, initializer).
    Block,
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    frames: Vec<Frame>,
    root_usings: Vec<String>,
    root_decls: Vec<Decl>,
    /// Attributes collected since the last statement boundary.
    pending_attrs: Vec<Attribute>,
    /// Earliest offset of the pending attributes/modifiers.
    pending_start: Option<usize>,
    /// True when `partial` was seen among the pending modifiers.
    pending_partial: bool,
    /// Kind of the last non-trivia token, for attribute-position detection.
    last_sig: Option<SyntaxKind>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            tokens: Lexer::new(text).tokenize(),
            pos: 0,
            frames: Vec::new(),
            root_usings: Vec::new(),
            root_decls: Vec::new(),
            pending_attrs: Vec::new(),
            pending_start: None,
            pending_partial: false,
            last_sig: None,
        }
    }

    fn parse(mut self) -> SourceTree {
        while self.pos < self.tokens.len() {
            let token = &self.tokens[self.pos];
            let kind = token.kind;
            let start = token.start;
            let end = token.end();
            let is_modifier =
                kind == SyntaxKind::Ident && MODIFIERS.contains(&token.text.as_str());
            match kind {
                SyntaxKind::Whitespace
                | SyntaxKind::LineComment
                | SyntaxKind::BlockComment
                | SyntaxKind::PreprocLine => {
                    self.pos += 1;
                    continue;
                }

                SyntaxKind::UsingKw if self.at_declaration_level() => {
                    self.parse_using();
                }

                SyntaxKind::NamespaceKw if self.at_declaration_level() => {
                    self.parse_namespace();
                }

                SyntaxKind::ClassKw
                | SyntaxKind::StructKw
                | SyntaxKind::InterfaceKw
                | SyntaxKind::RecordKw
                    if self.at_declaration_level() =>
                {
                    self.parse_type_decl();
                }

                SyntaxKind::PartialKw => {
                    self.pending_partial = true;
                    self.note_pending_start(start);
                    self.last_sig = Some(kind);
                    self.pos += 1;
                }

                SyntaxKind::Ident if is_modifier => {
                    self.note_pending_start(start);
                    self.last_sig = Some(kind);
                    self.pos += 1;
                }

                SyntaxKind::LBracket if self.at_attribute_position() => {
                    self.note_pending_start(start);
                    self.parse_attribute_list();
                }

                SyntaxKind::LBrace => {
                    self.frames.push(Frame::Block);
                    self.clear_pending();
                    self.last_sig = Some(kind);
                    self.pos += 1;
                }

                SyntaxKind::RBrace => {
                    self.close_brace(end);
                    self.clear_pending();
                    self.last_sig = Some(kind);
                    self.pos += 1;
                }

                _ => {
                    self.clear_pending();
                    self.last_sig = Some(kind);
                    self.pos += 1;
                }
            }
        }

        // Close anything still open at end of file.
        let eof = self.text.len();
        while let Some(frame) = self.frames.pop() {
            match frame {
                Frame::Block => {}
                Frame::Type(mut decl) => {
                    decl.span.end = eof;
                    decl.body.end = eof;
                    self.attach(Decl::Type(decl));
                }
                Frame::Namespace(mut decl) => {
                    decl.span.end = eof;
                    self.attach(Decl::Namespace(decl));
                }
            }
        }

        SourceTree {
            usings: self.root_usings,
            decls: self.root_decls,
        }
    }

    /// True when the current frame can hold a declaration (not inside a
    /// method body or other plain block).
    fn at_declaration_level(&self) -> bool {
        !matches!(self.frames.last(), Some(Frame::Block))
    }

    /// True when a `[` here starts an attribute list rather than an indexer
    /// or array rank: only at a statement boundary, in declaration context.
    fn at_attribute_position(&self) -> bool {
        if !self.at_declaration_level() {
            return false;
        }
        matches!(
            self.last_sig,
            None | Some(
                SyntaxKind::LBrace
                    | SyntaxKind::RBrace
                    | SyntaxKind::Semicolon
                    | SyntaxKind::RBracket
                    | SyntaxKind::PreprocLine
            )
        )
    }

    fn note_pending_start(&mut self, offset: usize) {
        if self.pending_start.is_none() {
            self.pending_start = Some(offset);
        }
    }

    fn clear_pending(&mut self) {
        self.pending_attrs.clear();
        self.pending_start = None;
        self.pending_partial = false;
    }

    /// Index of the next non-trivia token at or after `from`.
    fn next_significant(&self, from: usize) -> Option<usize> {
        self.tokens[from..]
            .iter()
            .position(|t| {
                !matches!(
                    t.kind,
                    SyntaxKind::Whitespace
                        | SyntaxKind::LineComment
                        | SyntaxKind::BlockComment
                        | SyntaxKind::PreprocLine
                )
            })
            .map(|offset| from + offset)
    }

    /// Attaches a finished declaration to the innermost open scope.
    fn attach(&mut self, decl: Decl) {
        for frame in self.frames.iter_mut().rev() {
            match frame {
                Frame::Namespace(ns) => {
                    ns.children.push(decl);
                    return;
                }
                Frame::Type(ty) => {
                    ty.children.push(decl);
                    return;
                }
                // A declaration nested in a plain block is local; scope
                // reconstruction does not descend into those.
                Frame::Block => {
                    log::debug!("dropping declaration nested inside a block");
                    return;
                }
            }
        }
        self.root_decls.push(decl);
    }

    /// `using ...;` at file or namespace level. Captured verbatim, semicolon
    /// included.
    fn parse_using(&mut self) {
        let start = self.tokens[self.pos].start;
        let mut end = None;
        while self.pos < self.tokens.len() {
            let token = &self.tokens[self.pos];
            if token.kind == SyntaxKind::Semicolon {
                end = Some(token.end());
                self.pos += 1;
                break;
            }
            // A brace means this was not a directive after all.
            if token.kind == SyntaxKind::LBrace {
                return;
            }
            self.pos += 1;
        }
        let Some(end) = end else { return };
        self.last_sig = Some(SyntaxKind::Semicolon);
        let text = self.text[start..end].to_string();
        match self.frames.iter_mut().rev().find_map(|f| match f {
            Frame::Namespace(ns) => Some(ns),
            _ => None,
        }) {
            Some(ns) => ns.usings.push(text),
            None => self.root_usings.push(text),
        }
        self.clear_pending();
    }

    /// `namespace A.B { ... }` or file-scoped `namespace A.B;`.
    fn parse_namespace(&mut self) {
        let start = self.tokens[self.pos].start;
        self.pos += 1;

        let mut name = String::new();
        loop {
            let Some(idx) = self.next_significant(self.pos) else {
                return;
            };
            match self.tokens[idx].kind {
                SyntaxKind::Ident => {
                    name.push_str(&self.tokens[idx].text);
                    self.pos = idx + 1;
                }
                SyntaxKind::Dot => {
                    name.push('.');
                    self.pos = idx + 1;
                }
                _ => {
                    self.pos = idx;
                    break;
                }
            }
        }
        if name.is_empty() {
            return;
        }

        let decl = |file_scoped| NamespaceDecl {
            name: name.clone(),
            file_scoped,
            span: Span::new(start, self.text.len()),
            usings: Vec::new(),
            children: Vec::new(),
        };

        match self.tokens.get(self.pos).map(|t| t.kind) {
            Some(SyntaxKind::LBrace) => {
                self.pos += 1;
                self.frames.push(Frame::Namespace(decl(false)));
                self.last_sig = Some(SyntaxKind::LBrace);
            }
            Some(SyntaxKind::Semicolon) => {
                self.pos += 1;
                self.frames.push(Frame::Namespace(decl(true)));
                self.last_sig = Some(SyntaxKind::Semicolon);
            }
            _ => {}
        }
        self.clear_pending();
    }

    /// A type declaration header: `[attrs] modifiers kind Name ... { | ;`.
    fn parse_type_decl(&mut self) {
        let kw = &self.tokens[self.pos];
        let kw_start = kw.start;
        let mut kind = match kw.kind {
            SyntaxKind::ClassKw => TypeKind::Class,
            SyntaxKind::StructKw => TypeKind::Struct,
            SyntaxKind::InterfaceKw => TypeKind::Interface,
            _ => TypeKind::Record,
        };
        self.pos += 1;

        // `record class` / `record struct`
        if kind == TypeKind::Record {
            if let Some(idx) = self.next_significant(self.pos) {
                match self.tokens[idx].kind {
                    SyntaxKind::StructKw => {
                        kind = TypeKind::RecordStruct;
                        self.pos = idx + 1;
                    }
                    SyntaxKind::ClassKw => {
                        self.pos = idx + 1;
                    }
                    _ => {}
                }
            }
        }

        // The name must follow; `where T : class` style constraints do not
        // have one and are not declarations.
        let name = match self.next_significant(self.pos) {
            Some(idx) if self.tokens[idx].kind == SyntaxKind::Ident => {
                let name = self.tokens[idx].text.clone();
                self.pos = idx + 1;
                name
            }
            _ => {
                self.clear_pending();
                return;
            }
        };

        let span_start = self.pending_start.take().unwrap_or(kw_start);
        let is_partial = self.pending_partial;
        let attributes = std::mem::take(&mut self.pending_attrs);
        self.pending_partial = false;

        // Skip generics, base list, and constraints up to the body.
        while self.pos < self.tokens.len() {
            let token = &self.tokens[self.pos];
            match token.kind {
                SyntaxKind::LBrace => {
                    let body_start = token.start;
                    self.pos += 1;
                    self.last_sig = Some(SyntaxKind::LBrace);
                    self.frames.push(Frame::Type(TypeDecl {
                        kind,
                        name,
                        is_partial,
                        attributes,
                        span: Span::new(span_start, self.text.len()),
                        // End patched when the closing brace arrives.
                        body: Span::new(body_start, body_start),
                        children: Vec::new(),
                    }));
                    return;
                }
                SyntaxKind::Semicolon => {
                    // Bodiless declaration, e.g. `record Point(int X, int Y);`
                    let end = token.end();
                    self.pos += 1;
                    self.last_sig = Some(SyntaxKind::Semicolon);
                    self.attach(Decl::Type(TypeDecl {
                        kind,
                        name,
                        is_partial,
                        attributes,
                        span: Span::new(span_start, end),
                        body: Span::new(end, end),
                        children: Vec::new(),
                    }));
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// An attribute list `[Target: Name(args), Name2, ...]`. Only
    /// string-literal arguments are captured.
    fn parse_attribute_list(&mut self) {
        debug_assert_eq!(self.tokens[self.pos].kind, SyntaxKind::LBracket);
        self.pos += 1;

        loop {
            let Some(idx) = self.next_significant(self.pos) else {
                return;
            };
            self.pos = idx;
            match self.tokens[idx].kind {
                SyntaxKind::RBracket => {
                    self.pos += 1;
                    self.last_sig = Some(SyntaxKind::RBracket);
                    return;
                }
                SyntaxKind::Comma => {
                    self.pos += 1;
                }
                SyntaxKind::Ident => {
                    self.parse_one_attribute();
                }
                _ => {
                    // Unexpected shape (array rank, indexer): skip to `]`.
                    self.skip_to_bracket_close();
                    return;
                }
            }
        }
    }

    fn parse_one_attribute(&mut self) {
        let mut name = self.tokens[self.pos].text.clone();
        self.pos += 1;

        // Dotted name, or `target:` specifier followed by the real name.
        loop {
            let Some(idx) = self.next_significant(self.pos) else {
                return;
            };
            match self.tokens[idx].kind {
                SyntaxKind::Dot => {
                    let Some(next) = self.next_significant(idx + 1) else {
                        return;
                    };
                    if self.tokens[next].kind == SyntaxKind::Ident {
                        name.push('.');
                        name.push_str(&self.tokens[next].text);
                        self.pos = next + 1;
                    } else {
                        self.pos = idx + 1;
                        break;
                    }
                }
                SyntaxKind::Colon => {
                    // What came before was the target (`assembly:`, `type:`).
                    let Some(next) = self.next_significant(idx + 1) else {
                        return;
                    };
                    if self.tokens[next].kind == SyntaxKind::Ident {
                        name = self.tokens[next].text.clone();
                        self.pos = next + 1;
                    } else {
                        self.pos = idx + 1;
                        break;
                    }
                }
                _ => {
                    self.pos = idx;
                    break;
                }
            }
        }

        let mut args = Vec::new();
        if self.tokens.get(self.pos).map(|t| t.kind) == Some(SyntaxKind::LParen) {
            self.pos += 1;
            let mut depth = 1usize;
            while self.pos < self.tokens.len() && depth > 0 {
                let token = &self.tokens[self.pos];
                match token.kind {
                    SyntaxKind::LParen => depth += 1,
                    SyntaxKind::RParen => depth -= 1,
                    SyntaxKind::StringLit if depth == 1 => {
                        args.push(string_literal_value(&token.text));
                    }
                    _ => {}
                }
                self.pos += 1;
            }
        }

        self.pending_attrs.push(Attribute { name, args });
    }

    fn skip_to_bracket_close(&mut self) {
        let mut depth = 1usize;
        while self.pos < self.tokens.len() {
            match self.tokens[self.pos].kind {
                SyntaxKind::LBracket => depth += 1,
                SyntaxKind::RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        self.last_sig = Some(SyntaxKind::RBracket);
                        return;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// Closes the innermost open frame at a `}`.
    fn close_brace(&mut self, end: usize) {
        // A file-scoped namespace is closed by end of file, never by a brace;
        // a stray `}` above it is ignored.
        if let Some(Frame::Namespace(ns)) = self.frames.last() {
            if ns.file_scoped {
                return;
            }
        }
        match self.frames.pop() {
            Some(Frame::Block) | None => {}
            Some(Frame::Type(mut decl)) => {
                decl.body.end = end;
                decl.span.end = end;
                self.attach(Decl::Type(decl));
            }
            Some(Frame::Namespace(mut decl)) => {
                decl.span.end = end;
                self.attach(Decl::Namespace(decl));
            }
        }
    }
}
