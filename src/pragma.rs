//! Invocation directive parsing.
//!
//! A directive is a single line of the form:
//!
//! ```text
//! #pragma Macro Name(arg1, arg2, ...)
//! ```
//!
//! The argument list is optional; without it the directive carries zero
//! arguments. Arguments are comma-split, trimmed, and empties dropped; a
//! `|` inside an argument is unescaped to a literal `,` after splitting, so
//! arguments can carry commas without fooling the splitter. A line that
//! does not match the shape is simply not a directive.

use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// A parsed invocation directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pragma {
    /// The template name being invoked.
    pub name: String,
    /// Raw argument strings, in order, with `|` already unescaped.
    pub args: Vec<String>,
    /// Byte offset of the `#` in the source file, used to resolve the
    /// enclosing scope.
    pub offset: usize,
}

impl Pragma {
    /// Parses one line. Returns `None` for anything that is not an
    /// invocation directive; malformed directives are not errors.
    pub fn parse(line: &str, line_offset: usize) -> Option<Self> {
        let hash_pos = line.find('#')?;
        if !line[..hash_pos].trim().is_empty() {
            return None;
        }

        let rest = line[hash_pos..].strip_prefix("#pragma")?;
        let rest = strip_leading_ws(rest)?;
        let rest = rest.strip_prefix("Macro")?;
        let rest = strip_leading_ws(rest)?;

        let name_len = rest
            .char_indices()
            .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
            .map(|(i, c)| i + c.len_utf8())
            .last()?;
        let name = rest[..name_len].to_string();
        let rest = rest[name_len..].trim_start();

        let args = match rest.strip_prefix('(') {
            // Greedy to the last `)` on the line, so parenthesized argument
            // text survives intact.
            Some(inner) => match inner.rfind(')') {
                Some(close) => split_args(&inner[..close]),
                // Unclosed list: the directive still matches, with no args.
                None => Vec::new(),
            },
            None => Vec::new(),
        };

        Some(Self {
            name,
            args,
            offset: line_offset + hash_pos,
        })
    }

    /// Deterministic hash over (name, arguments). Stable across runs for
    /// the same directive content; used to make emitted unit names unique.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.name.hash(&mut hasher);
        for arg in &self.args {
            arg.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Scans a whole file for directives, tracking byte offsets per line.
pub fn scan(text: &str) -> Vec<Pragma> {
    let mut out = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if let Some(pragma) = Pragma::parse(line.trim_end_matches('\n'), offset) {
            out.push(pragma);
        }
        offset += line.len();
    }
    out
}

/// Requires at least one whitespace char and returns the trimmed remainder.
fn strip_leading_ws(s: &str) -> Option<&str> {
    let trimmed = s.trim_start();
    if trimmed.len() == s.len() {
        return None;
    }
    Some(trimmed)
}

/// Splits a raw argument list on commas, trims each piece, drops empties,
/// and unescapes `|` back to `,`.
fn split_args(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(|a| a.replace('|', ","))
        .collect()
}
