//! Template extraction from annotated type declarations.
//!
//! A template is any type declaration carrying the `[Macro(...)]`
//! attribute. Its parameters are the attribute's string literals, in
//! declared order; a `type:` prefix marks a type parameter (the prefix is
//! stripped before matching). Its body is the exact source slice between
//! the declaration's braces, after two transformations:
//! - ignore regions (`#region Ignore` ... `#endregion`, nesting-aware) are
//!   removed, markers included, so editor-only placeholder code never
//!   reaches generated output;
//! - `Macro.Expression` marker forms are rewritten to literal code.
//!
//! A body whose marker forms cannot be rewritten still yields a usable
//! template: the raw stripped text is kept and the error is appended as a
//! comment, so the author sees the failure in the generated file instead
//! of losing the whole unit.

mod rewriter;

#[cfg(test)]
mod tests;

pub use rewriter::{RewriteError, rewrite_expressions};

use crate::syntax::{Scope, TypeDecl};

/// One declared template parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter token as it appears in the body (the `type:` prefix
    /// already stripped).
    pub name: String,
    /// True when declared with the `type:` prefix; the corresponding
    /// argument names a type and gets an auxiliary scaffold.
    pub is_type: bool,
}

impl Param {
    fn from_literal(literal: &str) -> Self {
        match literal.strip_prefix("type:") {
            Some(stripped) => Self {
                name: stripped.trim().to_string(),
                is_type: true,
            },
            None => Self {
                name: literal.trim().to_string(),
                is_type: false,
            },
        }
    }
}

/// A reusable, parameterized source-code body. Built once per pass from an
/// annotated declaration, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Declared name (the annotated type's name, unique across the pass).
    pub name: String,
    /// Declared parameters, in order.
    pub params: Vec<Param>,
    /// Rewritten body text, parameter tokens still in place.
    pub body: String,
    /// Namespace of the declaring scope, used by the auxiliary scaffold.
    pub namespace: String,
    /// Using directives visible at the declaration site, inherited by
    /// every expansion.
    pub usings: Vec<String>,
}

impl Template {
    /// Extracts a template from a declaration, or `None` when the
    /// declaration does not carry the `[Macro(...)]` attribute.
    ///
    /// `scope` is the declaration's own lexical context; `text` is the full
    /// file the declaration was parsed from.
    pub fn extract(decl: &TypeDecl, scope: &Scope, text: &str) -> Option<Self> {
        let attr = decl.attributes.iter().find(|a| a.is("Macro"))?;
        let mut params = Vec::new();
        for literal in &attr.args {
            let param = Param::from_literal(literal);
            // An empty token would match at every position during
            // substitution; it cannot be a parameter.
            if param.name.is_empty() {
                log::warn!("macro '{}': empty parameter name ignored", decl.name);
                continue;
            }
            params.push(param);
        }

        let raw = if decl.body.end > decl.body.start + 1 {
            &text[decl.body.start + 1..decl.body.end - 1]
        } else {
            ""
        };
        let stripped = strip_ignore_regions(raw);

        let body = match rewrite_expressions(&stripped) {
            Ok(rewritten) => rewritten,
            Err(err) => {
                log::warn!("macro '{}': body not rewritable: {}", decl.name, err);
                format!(
                    "{}\n// macroweave: body could not be parsed: {}\n",
                    stripped, err
                )
            }
        };

        Some(Self {
            name: decl.name.clone(),
            params,
            body,
            namespace: scope.namespace.clone(),
            usings: scope.usings.clone(),
        })
    }
}

/// Removes `#region Ignore` ... `#endregion` spans from a body, markers
/// included. Nested regions of any label inside an open ignore region are
/// swallowed whole. Region markers outside an ignore region pass through
/// untouched, including an unmatched `#endregion`.
pub fn strip_ignore_regions(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    // Depth of open `#region Ignore` spans being dropped.
    let mut ignore_depth = 0usize;
    // Open non-ignore regions whose `#endregion` must be kept.
    let mut kept_regions = 0usize;

    for line in body.split_inclusive('\n') {
        let trimmed = line.trim();
        if let Some(label) = directive_label(trimmed, "#region") {
            if ignore_depth > 0 {
                ignore_depth += 1;
            } else if label == "Ignore" {
                ignore_depth = 1;
            } else {
                kept_regions += 1;
                out.push_str(line);
            }
            continue;
        }
        if directive_label(trimmed, "#endregion").is_some() {
            if ignore_depth > 0 {
                ignore_depth -= 1;
            } else {
                if kept_regions > 0 {
                    kept_regions -= 1;
                }
                // Outside an ignore region the marker passes through,
                // matched or not.
                out.push_str(line);
            }
            continue;
        }
        if ignore_depth == 0 {
            out.push_str(line);
        }
    }

    out
}

/// Returns the trimmed label of a region directive, or `None` when the
/// keyword runs straight into other text (`#regionIgnore` is not a
/// directive, just an ordinary line).
fn directive_label<'a>(trimmed: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = trimmed.strip_prefix(keyword)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}
