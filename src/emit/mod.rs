//! Generated-unit assembly.
//!
//! An expanded body is only useful once it compiles in the scope its
//! directive sat in, so the emitter rebuilds that scope around it:
//! - the provenance header (engine name, template, directive hash),
//! - the using directives visible at the invocation site, then those
//!   visible at the template's declaration site,
//! - the enclosing namespace, when any,
//! - the enclosing type chain re-opened outer to inner as `partial` types,
//! - the body, then every closing brace in reverse.
//!
//! Unit names embed the directive's content hash, so distinct directives
//! never collide and re-running a pass over unchanged input produces
//! byte-identical output.

mod scaffold;

pub use scaffold::arg_struct_unit;

use crate::pragma::Pragma;
use crate::source::GeneratedUnit;
use crate::syntax::Scope;
use crate::template::Template;

const INDENT: &str = "    ";

/// Indentation-tracking text writer for generated source.
#[derive(Debug, Default)]
pub struct Script {
    out: String,
    indent: usize,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    /// Writes one indented line.
    pub fn line(&mut self, text: &str) {
        self.push_indent();
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Writes one indented `// ...` comment line.
    pub fn comment(&mut self, text: &str) {
        self.push_indent();
        self.out.push_str("// ");
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Writes a header line, an opening brace, and indents what follows.
    pub fn open(&mut self, header: &str) {
        self.line(header);
        self.line("{");
        self.indent += 1;
    }

    /// Dedents and writes the matching closing brace.
    pub fn close(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.line("}");
    }

    /// Writes a multi-line fragment at the current indentation, keeping the
    /// fragment's own internal indentation. Blank lines stay blank.
    pub fn raw_block(&mut self, text: &str) {
        for line in text.lines() {
            if line.trim().is_empty() {
                self.out.push('\n');
            } else {
                self.line(line);
            }
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Assembles the generated unit for one expanded directive.
pub fn emit_unit(
    template: &Template,
    pragma: &Pragma,
    scope: &Scope,
    body: &str,
) -> GeneratedUnit {
    let mut script = Script::new();
    write_header(&mut script, &template.name, pragma);

    let usings: Vec<&str> = scope
        .usings
        .iter()
        .chain(&template.usings)
        .map(String::as_str)
        .collect();
    if !usings.is_empty() {
        for using in &usings {
            script.line(using);
        }
        script.blank();
    }

    let mut depth = 0;
    if !scope.namespace.is_empty() {
        script.open(&format!("namespace {}", scope.namespace));
        depth += 1;
    }
    for ty in &scope.types {
        if !ty.is_partial {
            // The re-opened declaration only merges if the original is
            // partial too; the compiler will reject it otherwise.
            log::warn!(
                "macro '{}': enclosing type '{}' is not declared partial",
                template.name,
                ty.name
            );
        }
        script.open(&format!("partial {} {}", ty.kind.keyword(), ty.name));
        depth += 1;
    }

    script.raw_block(body);

    for _ in 0..depth {
        script.close();
    }

    GeneratedUnit::new(unit_name(template, pragma, scope), script.finish())
}

fn write_header(script: &mut Script, template_name: &str, pragma: &Pragma) {
    script.comment("<auto-generated>");
    script.comment(&format!(
        "macroweave: expansion of macro '{}' ({:016x})",
        template_name,
        pragma.content_hash()
    ));
    script.blank();
}

/// Unique name for a directive's unit: namespace path, enclosing type
/// names, then `<template>_<hash>`, dot-joined, with the `.g.cs` suffix.
pub fn unit_name(template: &Template, pragma: &Pragma, scope: &Scope) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !scope.namespace.is_empty() {
        parts.push(scope.namespace.clone());
    }
    parts.extend(scope.types.iter().map(|t| t.name.clone()));
    parts.push(format!("{}_{:016x}", template.name, pragma.content_hash()));
    format!("{}.g.cs", parts.join("."))
}
