//! Argument substitution: pairs a directive with its template and produces
//! the expanded body text.
//!
//! Substitution is textual and runs per parameter, in declared order:
//! first every `Macro.Arg("name")` placeholder becomes the argument, then
//! every bare occurrence of the parameter token does. The bare pass is a
//! plain substring replacement, so a parameter named `X` also rewrites the
//! `X` inside `MaxX`; template authors pick distinctive parameter names to
//! stay clear of that.

use crate::pragma::Pragma;
use crate::template::Template;

/// Outcome of expanding one directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// The directive matched and the substituted body is ready to emit.
    Expanded(String),
    /// The directive named a known template but supplied the wrong number
    /// of arguments. No output is produced for it.
    ArityMismatch { expected: usize, got: usize },
    /// No template with the directive's name exists in this pass.
    UnknownTemplate(String),
}

/// Substitutes a directive's arguments into its template body.
pub fn expand(template: Option<&Template>, pragma: &Pragma) -> Expansion {
    let Some(template) = template else {
        return Expansion::UnknownTemplate(pragma.name.clone());
    };

    if template.params.len() != pragma.args.len() {
        return Expansion::ArityMismatch {
            expected: template.params.len(),
            got: pragma.args.len(),
        };
    }

    let mut body = template.body.clone();
    for (param, arg) in template.params.iter().zip(&pragma.args) {
        let placeholder = format!("Macro.Arg(\"{}\")", param.name);
        body = body.replace(&placeholder, arg);
        body = body.replace(&param.name, arg);
    }
    Expansion::Expanded(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Param;

    fn template(params: &[(&str, bool)], body: &str) -> Template {
        Template {
            name: "T".to_string(),
            params: params
                .iter()
                .map(|(name, is_type)| Param {
                    name: name.to_string(),
                    is_type: *is_type,
                })
                .collect(),
            body: body.to_string(),
            namespace: String::new(),
            usings: Vec::new(),
        }
    }

    fn pragma(args: &[&str]) -> Pragma {
        Pragma {
            name: "T".to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            offset: 0,
        }
    }

    #[test]
    fn test_substitutes_bare_tokens() {
        let tpl = template(&[("X", false)], "int X = X;");
        let out = expand(Some(&tpl), &pragma(&["42"]));
        assert_eq!(out, Expansion::Expanded("int 42 = 42;".to_string()));
    }

    #[test]
    fn test_substitutes_arg_placeholder() {
        let tpl = template(&[("name", false)], r#"var v = Macro.Arg("name");"#);
        let out = expand(Some(&tpl), &pragma(&["total"]));
        assert_eq!(out, Expansion::Expanded("var v = total;".to_string()));
    }

    #[test]
    fn test_parameters_substitute_in_declared_order() {
        let tpl = template(&[("first", false), ("second", false)], "first second");
        let out = expand(Some(&tpl), &pragma(&["a", "b"]));
        assert_eq!(out, Expansion::Expanded("a b".to_string()));
    }

    #[test]
    fn test_argument_containing_later_param_token() {
        // The first substitution may introduce text matching a later
        // parameter; the later pass rewrites it too. Textual replacement
        // is declared-order, not simultaneous.
        let tpl = template(&[("A", false), ("B", false)], "A");
        let out = expand(Some(&tpl), &pragma(&["B", "c"]));
        assert_eq!(out, Expansion::Expanded("c".to_string()));
    }

    #[test]
    fn test_too_few_arguments() {
        let tpl = template(&[("X", false), ("Y", false)], "X Y");
        let out = expand(Some(&tpl), &pragma(&["1"]));
        assert_eq!(out, Expansion::ArityMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn test_too_many_arguments() {
        let tpl = template(&[], "body");
        let out = expand(Some(&tpl), &pragma(&["extra"]));
        assert_eq!(out, Expansion::ArityMismatch { expected: 0, got: 1 });
    }

    #[test]
    fn test_unknown_template() {
        let out = expand(None, &pragma(&["1"]));
        assert_eq!(out, Expansion::UnknownTemplate("T".to_string()));
    }

    #[test]
    fn test_zero_parameter_template_passes_body_through() {
        let tpl = template(&[], "static void Ping() { }");
        let out = expand(Some(&tpl), &pragma(&[]));
        assert_eq!(
            out,
            Expansion::Expanded("static void Ping() { }".to_string())
        );
    }

    #[test]
    fn test_substring_hazard_is_by_replacement() {
        let tpl = template(&[("X", false)], "int MaxX = X;");
        let out = expand(Some(&tpl), &pragma(&["9"]));
        assert_eq!(out, Expansion::Expanded("int Max9 = 9;".to_string()));
    }
}
