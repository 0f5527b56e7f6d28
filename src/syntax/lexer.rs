//! Lexer for C#-shaped source text.
//!
//! The lexer is a byte cursor over the input. It produces a flat token
//! stream in which string literals, char literals, comments, and
//! preprocessor lines are single opaque tokens, so that brace matching in
//! the parser only ever sees braces that belong to declaration structure.

use super::kind::SyntaxKind;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: SyntaxKind,
    /// The text of the token.
    pub text: String,
    /// The byte offset where this token starts.
    pub start: usize,
}

impl Token {
    /// Byte offset one past the end of this token.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// The lexer over one source file.
pub struct Lexer<'a> {
    /// The input text.
    input: &'a str,
    /// Current byte position in the input.
    pos: usize,
    /// True when only whitespace has been seen since the last newline.
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            at_line_start: true,
        }
    }

    /// Returns the remaining input from the current position.
    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Peeks at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Advances the position by n bytes.
    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Consumes characters while the predicate is true.
    fn consume_while<F: Fn(char) -> bool>(&mut self, pred: F) {
        while let Some(c) = self.peek() {
            if pred(c) {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
    }

    /// Tokenizes the entire input.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while self.pos < self.input.len() {
            let start = self.pos;
            let kind = self.next_kind();
            let text = self.input[start..self.pos].to_string();

            // Preprocessor recognition depends on being first on the line.
            match kind {
                SyntaxKind::Whitespace => {
                    if text.contains('\n') {
                        self.at_line_start = true;
                    }
                }
                _ => self.at_line_start = false,
            }

            tokens.push(Token { kind, text, start });
        }
        tokens
    }

    /// Lexes one token and returns its kind.
    fn next_kind(&mut self) -> SyntaxKind {
        let remaining = self.remaining();

        // Preprocessor lines: `#` must be the first non-whitespace char.
        if self.at_line_start && remaining.starts_with('#') {
            self.consume_while(|c| c != '\n');
            return SyntaxKind::PreprocLine;
        }

        if remaining.starts_with("//") {
            self.consume_while(|c| c != '\n');
            return SyntaxKind::LineComment;
        }

        if remaining.starts_with("/*") {
            self.advance(2);
            if let Some(end) = self.remaining().find("*/") {
                self.advance(end + 2);
            } else {
                self.pos = self.input.len();
            }
            return SyntaxKind::BlockComment;
        }

        // Verbatim strings: `@"..."` or `@$"..."`, with `""` as the escape.
        if remaining.starts_with("@\"") || remaining.starts_with("@$\"") {
            let quote = remaining.find('"').unwrap_or(0);
            self.advance(quote + 1);
            self.consume_verbatim_string();
            return SyntaxKind::StringLit;
        }

        // Verbatim identifiers: `@class`, `@partial`, ...
        if remaining.starts_with('@')
            && remaining
                .chars()
                .nth(1)
                .map(|c| c.is_alphabetic() || c == '_')
                .unwrap_or(false)
        {
            self.advance(1);
            self.consume_while(|c| c.is_alphanumeric() || c == '_');
            // A verbatim identifier is never a keyword.
            return SyntaxKind::Ident;
        }

        if let Some(kw) = self.try_lex_keyword() {
            return kw;
        }

        let Some(c) = self.peek() else {
            return SyntaxKind::Text;
        };

        match c {
            '"' => {
                self.advance(1);
                self.consume_quoted('"');
                SyntaxKind::StringLit
            }
            '\'' => {
                self.advance(1);
                self.consume_quoted('\'');
                SyntaxKind::CharLit
            }
            '{' => {
                self.advance(1);
                SyntaxKind::LBrace
            }
            '}' => {
                self.advance(1);
                SyntaxKind::RBrace
            }
            '(' => {
                self.advance(1);
                SyntaxKind::LParen
            }
            ')' => {
                self.advance(1);
                SyntaxKind::RParen
            }
            '[' => {
                self.advance(1);
                SyntaxKind::LBracket
            }
            ']' => {
                self.advance(1);
                SyntaxKind::RBracket
            }
            ';' => {
                self.advance(1);
                SyntaxKind::Semicolon
            }
            ':' => {
                self.advance(1);
                SyntaxKind::Colon
            }
            ',' => {
                self.advance(1);
                SyntaxKind::Comma
            }
            '.' => {
                self.advance(1);
                SyntaxKind::Dot
            }
            _ if c.is_whitespace() => {
                self.consume_while(|c| c.is_whitespace());
                SyntaxKind::Whitespace
            }
            _ if c.is_alphabetic() || c == '_' => {
                self.consume_while(|c| c.is_alphanumeric() || c == '_');
                SyntaxKind::Ident
            }
            _ => {
                self.advance(c.len_utf8());
                SyntaxKind::Text
            }
        }
    }

    /// Tries to lex a structural keyword with a word boundary.
    fn try_lex_keyword(&mut self) -> Option<SyntaxKind> {
        let remaining = self.remaining();

        let keywords = [
            ("using", SyntaxKind::UsingKw),
            ("namespace", SyntaxKind::NamespaceKw),
            ("class", SyntaxKind::ClassKw),
            ("struct", SyntaxKind::StructKw),
            ("interface", SyntaxKind::InterfaceKw),
            ("record", SyntaxKind::RecordKw),
            ("partial", SyntaxKind::PartialKw),
        ];

        for (kw, kind) in keywords {
            if remaining.starts_with(kw) {
                let next_char = remaining.chars().nth(kw.len());
                if next_char
                    .map(|c| !c.is_alphanumeric() && c != '_')
                    .unwrap_or(true)
                {
                    self.advance(kw.len());
                    return Some(kind);
                }
            }
        }

        None
    }

    /// Consumes a quoted literal body after the opening quote, including the
    /// closing quote, honoring backslash escapes.
    fn consume_quoted(&mut self, quote: char) {
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.advance(1);
                if let Some(esc) = self.peek() {
                    self.advance(esc.len_utf8());
                }
            } else if c == quote {
                self.advance(1);
                break;
            } else if c == '\n' {
                // Regular literals do not span lines; stop at the break so a
                // missing quote cannot swallow the rest of the file.
                break;
            } else {
                self.advance(c.len_utf8());
            }
        }
    }

    /// Consumes a verbatim string body after the opening quote, where `""`
    /// escapes a quote and newlines are allowed.
    fn consume_verbatim_string(&mut self) {
        while let Some(c) = self.peek() {
            if c == '"' {
                if self.remaining().starts_with("\"\"") {
                    self.advance(2);
                } else {
                    self.advance(1);
                    break;
                }
            } else {
                self.advance(c.len_utf8());
            }
        }
    }
}

/// Returns the value of a string literal token (quotes stripped, escapes
/// resolved). Handles both regular and verbatim forms.
pub fn string_literal_value(text: &str) -> String {
    let verbatim = text.starts_with("@\"") || text.starts_with("@$\"");
    let inner = text
        .trim_start_matches('@')
        .trim_start_matches('$')
        .trim_start_matches('"')
        .trim_end_matches('"');

    if verbatim {
        return inner.replace("\"\"", "\"");
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<(SyntaxKind, String)> {
        Lexer::new(input)
            .tokenize()
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_keywords_and_idents() {
        let tokens = lex("partial class Foo");
        assert_eq!(tokens[0].0, SyntaxKind::PartialKw);
        assert_eq!(tokens[2].0, SyntaxKind::ClassKw);
        assert_eq!(tokens[4], (SyntaxKind::Ident, "Foo".to_string()));
    }

    #[test]
    fn test_keyword_needs_word_boundary() {
        let tokens = lex("classroom");
        assert_eq!(tokens[0], (SyntaxKind::Ident, "classroom".to_string()));
    }

    #[test]
    fn test_string_hides_braces() {
        let tokens = lex(r#"var s = "{ not a brace }";"#);
        let braces = tokens
            .iter()
            .filter(|(k, _)| *k == SyntaxKind::LBrace || *k == SyntaxKind::RBrace)
            .count();
        assert_eq!(braces, 0);
        assert!(tokens.iter().any(|(k, _)| *k == SyntaxKind::StringLit));
    }

    #[test]
    fn test_verbatim_string_double_quote_escape() {
        let tokens = lex(r#"@"he said ""hi"" { }" x"#);
        assert_eq!(tokens[0].0, SyntaxKind::StringLit);
        assert_eq!(tokens[0].1, r#"@"he said ""hi"" { }""#);
    }

    #[test]
    fn test_char_literal() {
        let tokens = lex(r"c = '{';");
        assert_eq!(
            tokens
                .iter()
                .filter(|(k, _)| *k == SyntaxKind::LBrace)
                .count(),
            0
        );
        assert!(tokens.iter().any(|(k, _)| *k == SyntaxKind::CharLit));
    }

    #[test]
    fn test_preproc_line_only_at_line_start() {
        let tokens = lex("  #pragma Macro Foo\nvar x = y #z;");
        assert_eq!(
            tokens
                .iter()
                .filter(|(k, _)| *k == SyntaxKind::PreprocLine)
                .count(),
            1
        );
        let pre = tokens
            .iter()
            .find(|(k, _)| *k == SyntaxKind::PreprocLine)
            .unwrap();
        assert_eq!(pre.1, "#pragma Macro Foo");
    }

    #[test]
    fn test_comments_are_opaque() {
        let tokens = lex("a /* { */ b // }\nc");
        assert!(tokens.iter().any(|(k, _)| *k == SyntaxKind::BlockComment));
        assert!(tokens.iter().any(|(k, _)| *k == SyntaxKind::LineComment));
        let braces = tokens
            .iter()
            .filter(|(k, _)| *k == SyntaxKind::LBrace || *k == SyntaxKind::RBrace)
            .count();
        assert_eq!(braces, 0);
    }

    #[test]
    fn test_verbatim_identifier() {
        let tokens = lex("@class");
        assert_eq!(tokens[0], (SyntaxKind::Ident, "@class".to_string()));
    }

    #[test]
    fn test_string_literal_value_escapes() {
        assert_eq!(string_literal_value(r#""a\nb""#), "a\nb");
        assert_eq!(string_literal_value(r#""say \"hi\"""#), "say \"hi\"");
        assert_eq!(string_literal_value(r#"@"a""b""#), "a\"b");
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let tokens = lex("var s = \"oops\nclass Foo {");
        assert!(tokens.iter().any(|(k, _)| *k == SyntaxKind::ClassKw));
        assert!(tokens.iter().any(|(k, _)| *k == SyntaxKind::LBrace));
    }
}
