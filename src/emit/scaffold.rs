//! Auxiliary struct scaffolds for `type:` arguments.
//!
//! A template body written against a type parameter only stays editor-valid
//! if some type by that name exists while the template is being authored.
//! For each `type:` argument the engine therefore emits a placeholder value
//! struct, nested in a re-opened `partial class` named after the template,
//! that accepts the operator and conversion shapes a body is likely to use.
//! Every member is inert: operators yield `default`/`false`, conversions
//! yield `default`. Real semantics come from the argument's actual type at
//! the invocation site; the scaffold only keeps the template compiling.

use super::Script;
use crate::pragma::Pragma;
use crate::source::GeneratedUnit;
use crate::template::Template;

const BINARY_SELF_OPS: &[&str] = &["+", "-", "*", "/", "%", "&", "|", "^"];
const SHIFT_OPS: &[&str] = &["<<", ">>"];
const COMPARISON_OPS: &[&str] = &["==", "!=", "<", ">", "<=", ">="];
const UNARY_SELF_OPS: &[&str] = &["+", "-", "~", "++", "--"];

/// C# built-in targets for the implicit conversions. Conversion to `object`
/// is predefined for every type and may not be declared, so it is absent.
const CONVERSION_TARGETS: &[&str] = &[
    "bool", "byte", "sbyte", "short", "ushort", "int", "uint", "long", "ulong", "char", "float",
    "double", "decimal", "string",
];

/// Emits the placeholder struct unit for one `type:` argument.
pub fn arg_struct_unit(template: &Template, pragma: &Pragma, arg: &str) -> GeneratedUnit {
    let mut script = Script::new();
    super::write_header(&mut script, &template.name, pragma);

    let mut depth = 0;
    if !template.namespace.is_empty() {
        script.open(&format!("namespace {}", template.namespace));
        depth += 1;
    }
    script.open(&format!("partial class {}", template.name));
    script.open(&format!("public struct {}", arg));
    depth += 2;

    script.line("public override bool Equals(object obj) => false;");
    script.line("public override int GetHashCode() => 0;");
    script.line("public override string ToString() => \"\";");
    script.blank();

    for op in COMPARISON_OPS {
        script.line(&format!(
            "public static bool operator {op}({arg} a, {arg} b) => false;"
        ));
    }
    script.blank();

    for op in BINARY_SELF_OPS {
        script.line(&format!(
            "public static {arg} operator {op}({arg} a, {arg} b) => default;"
        ));
    }
    for op in SHIFT_OPS {
        script.line(&format!(
            "public static {arg} operator {op}({arg} a, int b) => default;"
        ));
    }
    script.blank();

    for op in UNARY_SELF_OPS {
        script.line(&format!("public static {arg} operator {op}({arg} a) => default;"));
    }
    script.line(&format!("public static bool operator !({arg} a) => false;"));
    script.line(&format!("public static bool operator true({arg} a) => false;"));
    script.line(&format!("public static bool operator false({arg} a) => false;"));
    script.blank();

    for target in CONVERSION_TARGETS {
        script.line(&format!(
            "public static implicit operator {target}({arg} a) => default;"
        ));
    }

    for _ in 0..depth {
        script.close();
    }

    GeneratedUnit::new(scaffold_unit_name(template, pragma, arg), script.finish())
}

/// Scaffold unit names reuse the directive hash so each invocation's
/// scaffolds sort next to its main unit.
fn scaffold_unit_name(template: &Template, pragma: &Pragma, arg: &str) -> String {
    let sanitized: String = arg
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    let mut parts: Vec<String> = Vec::new();
    if !template.namespace.is_empty() {
        parts.push(template.namespace.clone());
    }
    parts.push(template.name.clone());
    parts.push(format!("{}Arg_{:016x}", sanitized, pragma.content_hash()));
    format!("{}.g.cs", parts.join("."))
}
