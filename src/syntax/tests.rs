//! Tests for the declaration parser and the scope query.

use super::*;

fn first_type<'t>(tree: &'t SourceTree) -> &'t TypeDecl {
    tree.types().into_iter().next().expect("no type declaration")
}

#[test]
fn test_top_level_class() {
    let tree = parse_file("class Foo { int x; }");
    let ty = first_type(&tree);
    assert_eq!(ty.name, "Foo");
    assert_eq!(ty.kind, TypeKind::Class);
    assert!(!ty.is_partial);
}

#[test]
fn test_partial_modifier_recorded() {
    let tree = parse_file("public partial class Foo { }");
    let ty = first_type(&tree);
    assert!(ty.is_partial);
}

#[test]
fn test_block_namespace_and_nesting() {
    let src = r#"
namespace App
{
    class Outer
    {
        class Inner
        {
            int x;
        }
    }
}
"#;
    let tree = parse_file(src);
    let types = tree.types();
    assert_eq!(types.len(), 2);
    assert_eq!(types[0].name, "Outer");
    assert_eq!(types[1].name, "Inner");

    let pos = src.find("int x;").unwrap();
    let scope = tree.scope_at(pos);
    assert_eq!(scope.namespace, "App");
    let names: Vec<&str> = scope.types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Outer", "Inner"]);
}

#[test]
fn test_file_scoped_namespace() {
    let src = "using System;\nnamespace App.Core;\n\nclass Foo { int y; }\n";
    let tree = parse_file(src);
    let pos = src.find("int y;").unwrap();
    let scope = tree.scope_at(pos);
    assert_eq!(scope.namespace, "App.Core");
    assert_eq!(scope.types.len(), 1);
    assert_eq!(scope.usings, ["using System;"]);
}

#[test]
fn test_usings_per_namespace() {
    let src = r#"
using System;

namespace App
{
    using System.Text;

    class Foo { int z; }
}
"#;
    let tree = parse_file(src);
    let pos = src.find("int z;").unwrap();
    let scope = tree.scope_at(pos);
    assert_eq!(scope.usings, ["using System;", "using System.Text;"]);
}

#[test]
fn test_attribute_with_string_args() {
    let src = r#"
[Macro("A", "type:T")]
public class Template
{
}
"#;
    let tree = parse_file(src);
    let ty = first_type(&tree);
    assert_eq!(ty.attributes.len(), 1);
    assert!(ty.attributes[0].is("Macro"));
    assert_eq!(ty.attributes[0].args, ["A", "type:T"]);
    // The attribute belongs to the declaration span.
    assert!(ty.span.start <= src.find("[Macro").unwrap());
}

#[test]
fn test_method_body_braces_do_not_nest_types() {
    let src = r#"
class Foo
{
    void Bar()
    {
        if (true) { var x = new int[3]; }
    }
    int marker;
}
"#;
    let tree = parse_file(src);
    let pos = src.find("int marker;").unwrap();
    let scope = tree.scope_at(pos);
    assert_eq!(scope.types.len(), 1);
    assert_eq!(scope.types[0].name, "Foo");
}

#[test]
fn test_braces_in_strings_ignored() {
    let src = "class Foo { string s = \"}}}{{{\"; int marker; }";
    let tree = parse_file(src);
    let pos = src.find("int marker;").unwrap();
    let scope = tree.scope_at(pos);
    assert_eq!(scope.types.len(), 1);
}

#[test]
fn test_record_and_record_struct() {
    let tree = parse_file("record Point { } record struct Size { }");
    let types = tree.types();
    assert_eq!(types[0].kind, TypeKind::Record);
    assert_eq!(types[1].kind, TypeKind::RecordStruct);
}

#[test]
fn test_bodiless_record() {
    let src = "record Point(int X, int Y);\nclass After { }";
    let tree = parse_file(src);
    let types = tree.types();
    assert_eq!(types.len(), 2);
    assert_eq!(types[0].name, "Point");
    assert_eq!(types[0].body.start, types[0].body.end);
    assert_eq!(types[1].name, "After");
}

#[test]
fn test_generic_constraint_class_keyword_is_not_a_decl() {
    let src = "class Wrapper<T> where T : class { int marker; }";
    let tree = parse_file(src);
    let types = tree.types();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].name, "Wrapper");
    let scope = tree.scope_at(src.find("int marker;").unwrap());
    assert_eq!(scope.types.len(), 1);
}

#[test]
fn test_unclosed_brace_recovers_at_eof() {
    let src = "namespace App { class Foo { int marker;";
    let tree = parse_file(src);
    let scope = tree.scope_at(src.find("int marker;").unwrap());
    assert_eq!(scope.namespace, "App");
    assert_eq!(scope.types.len(), 1);
}

#[test]
fn test_scope_outside_everything_is_empty() {
    let src = "int marker;\nclass Foo { }";
    let tree = parse_file(src);
    let scope = tree.scope_at(0);
    assert_eq!(scope.namespace, "");
    assert!(scope.types.is_empty());
}

#[test]
fn test_template_body_span_excludes_braces() {
    let src = "class T { int X = X; }";
    let tree = parse_file(src);
    let ty = first_type(&tree);
    let body = &src[ty.body.start + 1..ty.body.end - 1];
    assert_eq!(body, " int X = X; ");
}

#[test]
fn test_pragma_line_does_not_disturb_structure() {
    let src = r#"
class Holder
{
    #pragma Macro Foo(1, 2)
    int marker;
}
"#;
    let tree = parse_file(src);
    let pos = src.find("#pragma").unwrap();
    let scope = tree.scope_at(pos);
    assert_eq!(scope.types.len(), 1);
    assert_eq!(scope.types[0].name, "Holder");
}

#[test]
fn test_attribute_after_open_brace() {
    let src = r#"
namespace App
{
    [Macro("P")]
    class T { }
}
"#;
    let tree = parse_file(src);
    let ty = first_type(&tree);
    assert_eq!(ty.attributes.len(), 1);
    assert_eq!(ty.attributes[0].args, ["P"]);
}

#[test]
fn test_indexer_brackets_are_not_attributes() {
    let src = r#"
class Foo
{
    public int this[int i] { get { return i; } }
    class Nested { }
}
"#;
    let tree = parse_file(src);
    let types = tree.types();
    assert_eq!(types.len(), 2);
    assert!(types[1].attributes.is_empty());
}
