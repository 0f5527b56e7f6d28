//! Rewrites `Macro.Expression` marker forms into literal code text.
//!
//! Template authors keep their bodies editor-valid by hiding raw code
//! fragments behind a typed placeholder:
//!
//! - `Macro.Expression("text").Call(args...)` becomes the literal call
//!   `text(args...)` (`text()` when the argument list is empty),
//! - `Macro.Expression("text")` standing alone becomes the literal `text`.
//!
//! Everything else passes through byte-for-byte, including string literals
//! and comments, which are skipped so a marker spelled inside them is left
//! alone. The rewrite runs once per template at extraction time, before
//! parameter substitution, so parameter tokens survive it.

use thiserror::Error;

/// A marker form that could not be rewritten. The extractor falls back to
/// the raw body text and surfaces the error as a diagnostic comment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// `Macro.Expression(` was not followed by a string literal.
    #[error("expected a string literal inside Macro.Expression(...) at byte {0}")]
    ExpectedStringLiteral(usize),
    /// The string literal never closed.
    #[error("unterminated string literal at byte {0}")]
    UnterminatedString(usize),
    /// The literal was not followed by a closing `)`.
    #[error("expected `)` after Macro.Expression literal at byte {0}")]
    ExpectedCloseParen(usize),
    /// A `.Call(` argument list never balanced its parentheses.
    #[error("unbalanced parentheses in .Call(...) arguments at byte {0}")]
    UnbalancedCall(usize),
}

/// Rewrites all marker forms in a template body.
pub fn rewrite_expressions(body: &str) -> Result<String, RewriteError> {
    Rewriter::new(body).run()
}

struct Rewriter<'a> {
    input: &'a str,
    pos: usize,
    out: String,
}

impl<'a> Rewriter<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            out: String::with_capacity(input.len()),
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Copies n bytes from the input to the output.
    fn copy(&mut self, n: usize) {
        self.out.push_str(&self.input[self.pos..self.pos + n]);
        self.pos += n;
    }

    /// Skips whitespace without copying. Only used inside a matched marker
    /// form, whose original spelling is replaced wholesale.
    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn run(mut self) -> Result<String, RewriteError> {
        while let Some(c) = self.peek() {
            let remaining = self.remaining();
            if remaining.starts_with("//") {
                let len = remaining.find('\n').unwrap_or(remaining.len());
                self.copy(len);
            } else if remaining.starts_with("/*") {
                let len = remaining
                    .find("*/")
                    .map(|i| i + 2)
                    .unwrap_or(remaining.len());
                self.copy(len);
            } else if remaining.starts_with("@\"") {
                let len = verbatim_len(remaining);
                self.copy(len);
            } else if c == '"' {
                let len = quoted_len(remaining, '"');
                self.copy(len);
            } else if c == '\'' {
                let len = quoted_len(remaining, '\'');
                self.copy(len);
            } else if c.is_alphabetic() || c == '_' {
                self.ident()?;
            } else {
                self.copy(c.len_utf8());
            }
        }
        Ok(self.out)
    }

    /// Consumes an identifier; if it is the `Macro` marker at a proper
    /// boundary, tries the full marker form.
    fn ident(&mut self) -> Result<(), RewriteError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let ident = &self.input[start..self.pos];

        // `Foo.Macro.Expression` is somebody else's member, not the marker.
        let boundary = self
            .out
            .chars()
            .last()
            .map(|c| !c.is_alphanumeric() && c != '_' && c != '.')
            .unwrap_or(true);

        if ident == "Macro" && boundary && self.try_marker()? {
            return Ok(());
        }

        let ident = &self.input[start..self.pos];
        self.out.push_str(ident);
        Ok(())
    }

    /// Attempts `.Expression("...")` after `Macro`, emitting the rewritten
    /// form. Returns Ok(false) without consuming anything when the shape is
    /// not the marker at all (plain code mentioning `Macro`).
    fn try_marker(&mut self) -> Result<bool, RewriteError> {
        let save = self.pos;

        self.skip_ws();
        if self.peek() != Some('.') {
            self.pos = save;
            return Ok(false);
        }
        self.pos += 1;
        self.skip_ws();
        if !self.eat_ident("Expression") {
            self.pos = save;
            return Ok(false);
        }
        self.skip_ws();
        if self.peek() != Some('(') {
            // Member access without invocation: not the marker form.
            self.pos = save;
            return Ok(false);
        }
        self.pos += 1;

        // Committed: from here, malformed shapes are errors.
        self.skip_ws();
        let value = self.string_literal()?;
        self.skip_ws();
        if self.peek() != Some(')') {
            return Err(RewriteError::ExpectedCloseParen(self.pos));
        }
        self.pos += 1;

        // Optional `.Call(args...)` suffix turns the fragment into a call.
        let after_close = self.pos;
        self.skip_ws();
        if self.peek() == Some('.') {
            self.pos += 1;
            self.skip_ws();
            if self.eat_ident("Call") {
                self.skip_ws();
                if self.peek() == Some('(') {
                    self.pos += 1;
                    let args = self.call_args()?;
                    // Nested markers inside the argument list rewrite too.
                    let args = rewrite_expressions(args.trim())?;
                    self.out.push_str(&value);
                    self.out.push('(');
                    self.out.push_str(&args);
                    self.out.push(')');
                    return Ok(true);
                }
            }
        }

        self.pos = after_close;
        self.out.push_str(&value);
        Ok(true)
    }

    fn eat_ident(&mut self, expected: &str) -> bool {
        let remaining = self.remaining();
        if remaining.starts_with(expected) {
            let next = remaining.chars().nth(expected.len());
            if next.map(|c| !c.is_alphanumeric() && c != '_').unwrap_or(true) {
                self.pos += expected.len();
                return true;
            }
        }
        false
    }

    /// Parses a string literal at the cursor and returns its value.
    fn string_literal(&mut self) -> Result<String, RewriteError> {
        let start = self.pos;
        let remaining = self.remaining();

        if remaining.starts_with("@\"") {
            let len = verbatim_len(remaining);
            if len < 3 || !remaining[..len].ends_with('"') {
                return Err(RewriteError::UnterminatedString(start));
            }
            self.pos += len;
            return Ok(remaining[2..len - 1].replace("\"\"", "\""));
        }

        if !remaining.starts_with('"') {
            return Err(RewriteError::ExpectedStringLiteral(start));
        }
        let len = quoted_len(remaining, '"');
        let lit = &remaining[..len];
        if len < 2 || !lit.ends_with('"') {
            return Err(RewriteError::UnterminatedString(start));
        }
        self.pos += len;
        Ok(unescape(&lit[1..len - 1]))
    }

    /// Captures the raw text of a balanced `.Call(...)` argument list, the
    /// closing paren consumed but excluded.
    fn call_args(&mut self) -> Result<&'a str, RewriteError> {
        let start = self.pos;
        let mut depth = 1usize;
        while let Some(c) = self.peek() {
            let remaining = self.remaining();
            if remaining.starts_with("@\"") {
                self.pos += verbatim_len(remaining);
            } else if c == '"' || c == '\'' {
                self.pos += quoted_len(remaining, c);
            } else {
                if c == '(' {
                    depth += 1;
                } else if c == ')' {
                    depth -= 1;
                    if depth == 0 {
                        let args = &self.input[start..self.pos];
                        self.pos += 1;
                        return Ok(args);
                    }
                }
                self.pos += c.len_utf8();
            }
        }
        Err(RewriteError::UnbalancedCall(start))
    }
}

/// Byte length of a quoted literal starting at `s`, closing quote included
/// (or to end of input when unterminated).
fn quoted_len(s: &str, quote: char) -> usize {
    let mut chars = s.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            return i + c.len_utf8();
        }
    }
    s.len()
}

/// Byte length of a verbatim string starting at `@"`, closing quote
/// included; `""` is the quote escape.
fn verbatim_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 2;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            if bytes.get(i + 1) == Some(&b'"') {
                i += 2;
            } else {
                return i + 1;
            }
        } else {
            i += 1;
        }
    }
    s.len()
}

/// Resolves the common backslash escapes of a regular string literal.
fn unescape(inner: &str) -> String {
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
