//! macroweave: a compile-time macro expansion engine for C#-shaped source.
//!
//! The engine runs as a pass over an immutable snapshot of source files
//! and hands back generated source units, never mutating the input:
//! - a template is any type declaration carrying `[Macro("p1", "p2", ...)]`;
//!   its body is the text between its braces;
//! - a directive is a line of the form `#pragma Macro Name(arg1, arg2)`;
//!   arguments are comma-split, with `|` as an escape for a literal comma;
//! - a `type:` prefix on a parameter marks it as a type name, and each
//!   matching argument additionally gets an inert operator-scaffold struct;
//! - `#region Ignore` ... `#endregion` spans inside a template body are
//!   authoring-time-only and never reach generated output;
//! - `Macro.Expression("text")` (optionally `.Call(args)`) embeds raw code
//!   text the template's own file could not otherwise contain;
//! - each expansion is wrapped in its directive's reconstructed lexical
//!   scope (usings, namespace, `partial` type chain) and emitted under a
//!   unique, content-addressed `.g.cs` name.
//!
//! The pass is deterministic: identical input produces byte-identical
//! units, so downstream caching and diffing stay stable.

mod emit;
mod engine;
mod expand;
mod pragma;
mod source;
mod syntax;
mod template;

pub use emit::{Script, arg_struct_unit, emit_unit, unit_name};
pub use engine::{PASS_ERROR_UNIT, run_pass};
pub use expand::{Expansion, expand};
pub use pragma::{Pragma, scan as scan_pragmas};
pub use source::{GeneratedUnit, SourceFile};
pub use syntax::{
    Attribute, Decl, EnclosingType, NamespaceDecl, Scope, SourceTree, Span, SyntaxKind, TypeDecl,
    TypeKind, parse_file,
};
pub use template::{Param, RewriteError, Template, rewrite_expressions, strip_ignore_regions};
