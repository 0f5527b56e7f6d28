use crate::syntax::parse_file;
use crate::template::{Param, Template, strip_ignore_regions};

fn extract_first(text: &str) -> Template {
    let tree = parse_file(text);
    let decls = tree.types();
    let decl = decls
        .iter()
        .find(|d| d.attributes.iter().any(|a| a.is("Macro")))
        .expect("no [Macro] class in test source");
    let scope = tree.scope_at(decl.span.start);
    Template::extract(decl, &scope, text).expect("extraction failed")
}

#[test]
fn test_extracts_name_and_params() {
    let tpl = extract_first(
        r#"
[Macro("A", "B")]
class Repeat
{
    int A = B;
}
"#,
    );
    assert_eq!(tpl.name, "Repeat");
    assert_eq!(
        tpl.params,
        vec![
            Param { name: "A".into(), is_type: false },
            Param { name: "B".into(), is_type: false },
        ]
    );
    assert_eq!(tpl.body.trim(), "int A = B;");
}

#[test]
fn test_type_prefix_marks_param() {
    let tpl = extract_first(
        r#"
[Macro("type:T", " count ")]
class Buffer
{
    T[] items = new T[count];
}
"#,
    );
    assert_eq!(
        tpl.params,
        vec![
            Param { name: "T".into(), is_type: true },
            Param { name: "count".into(), is_type: false },
        ]
    );
}

#[test]
fn test_empty_parameter_literal_is_dropped() {
    let tpl = extract_first(
        r#"
[Macro("", "X")]
class Gen
{
    int X;
}
"#,
    );
    assert_eq!(
        tpl.params,
        vec![Param { name: "X".into(), is_type: false }]
    );
}

#[test]
fn test_bare_type_prefix_is_dropped() {
    let tpl = extract_first(
        r#"
[Macro("type:")]
class Gen
{
    int x;
}
"#,
    );
    assert!(tpl.params.is_empty());
}

#[test]
fn test_captures_namespace_and_usings() {
    let text = r#"
using System;
namespace App.Core
{
    using System.Linq;

    [Macro("X")]
    class Gen
    {
        int X;
    }
}
"#;
    let tpl = extract_first(text);
    assert_eq!(tpl.namespace, "App.Core");
    assert_eq!(tpl.usings, vec!["using System;", "using System.Linq;"]);
}

#[test]
fn test_rewrites_expression_markers_in_body() {
    let tpl = extract_first(
        r#"
[Macro("X")]
class Gen
{
    var v = Macro.Expression("X + 1");
}
"#,
    );
    assert_eq!(tpl.body.trim(), "var v = X + 1;");
}

#[test]
fn test_rewrite_failure_falls_back_to_raw_body() {
    let tpl = extract_first(
        r#"
[Macro("X")]
class Gen
{
    var v = Macro.Expression(X);
}
"#,
    );
    assert!(tpl.body.contains("Macro.Expression(X)"));
    assert!(tpl.body.contains("// macroweave: body could not be parsed"));
}

#[test]
fn test_bodiless_template_has_empty_body() {
    let text = r#"
[Macro("X")]
class Gen;
"#;
    let tree = parse_file(text);
    let decls = tree.types();
    let decl = decls[0];
    let scope = tree.scope_at(decl.span.start);
    let tpl = Template::extract(decl, &scope, text).unwrap();
    assert_eq!(tpl.body, "");
}

#[test]
fn test_class_without_attribute_is_not_a_template() {
    let text = "class Plain { }";
    let tree = parse_file(text);
    let decl = tree.types()[0];
    let scope = tree.scope_at(decl.span.start);
    assert!(Template::extract(decl, &scope, text).is_none());
}

#[test]
fn test_strip_ignore_regions_removes_marked_lines() {
    let body = "\
int keep1;
#region Ignore
int gone;
#endregion
int keep2;
";
    let out = strip_ignore_regions(body);
    assert!(out.contains("keep1"));
    assert!(out.contains("keep2"));
    assert!(!out.contains("gone"));
    assert!(!out.contains("#region"));
    assert!(!out.contains("#endregion"));
}

#[test]
fn test_strip_ignore_regions_handles_nesting() {
    let body = "\
#region Ignore
outer;
#region Helpers
inner;
#endregion
still_gone;
#endregion
kept;
";
    let out = strip_ignore_regions(body);
    assert!(!out.contains("outer"));
    assert!(!out.contains("inner"));
    assert!(!out.contains("still_gone"));
    assert!(out.contains("kept"));
}

#[test]
fn test_strip_keeps_other_regions() {
    let body = "\
#region Fields
int x;
#endregion
";
    let out = strip_ignore_regions(body);
    assert_eq!(out, body);
}

#[test]
fn test_strip_passes_unmatched_endregion_through() {
    let body = "int x;\n#endregion\nint y;\n";
    assert_eq!(strip_ignore_regions(body), body);
}

#[test]
fn test_fused_region_token_is_ordinary_text() {
    let body = "#regionIgnore\nint x;\n#endregionIgnore\n";
    assert_eq!(strip_ignore_regions(body), body);
}

#[test]
fn test_strip_is_idempotent() {
    let body = "\
a;
#region Ignore
b;
#endregion
c;
";
    let once = strip_ignore_regions(body);
    assert_eq!(strip_ignore_regions(&once), once);
}
