//! The expansion pass: sources in, generated units out.
//!
//! One pass runs in two phases over an immutable snapshot of the input:
//! 1. collect every `[Macro(...)]` template across all files into a
//!    name-keyed registry;
//! 2. scan every file for directives, resolve each against the registry
//!    and its own lexical scope, and emit one unit per match (plus one
//!    scaffold unit per `type:` argument).
//!
//! Both phases see the full file set, so a directive may invoke a template
//! declared in another file. A failed directive never aborts the pass: it
//! is logged and skipped. A panic anywhere inside the pass is contained
//! and surfaced as a single diagnostic unit, so the host always gets a
//! result set back.

use std::hash::{Hash, Hasher};
use std::panic::{AssertUnwindSafe, catch_unwind};

use rustc_hash::{FxHashMap, FxHasher};

use crate::emit::{arg_struct_unit, emit_unit};
use crate::expand::{Expansion, expand};
use crate::pragma;
use crate::source::{GeneratedUnit, SourceFile};
use crate::syntax::parse_file;
use crate::template::Template;

/// Unit name used when the pass itself fails.
pub const PASS_ERROR_UNIT: &str = "MacroPassError.g.cs";

/// Runs one expansion pass over a set of source files.
///
/// The returned units are in deterministic order: files in input order,
/// directives in file order, each directive's main unit before its
/// scaffolds. Running the pass twice over the same input yields identical
/// output.
pub fn run_pass(files: &[SourceFile]) -> Vec<GeneratedUnit> {
    let mut units = Vec::new();
    let outcome = catch_unwind(AssertUnwindSafe(|| run_pass_inner(files, &mut units)));
    if let Err(payload) = outcome {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        log::error!("macro pass aborted: {}", message);
        units.push(GeneratedUnit::new(
            PASS_ERROR_UNIT,
            format!("// <auto-generated>\n// macroweave: macro pass aborted\n// {}\n", message),
        ));
    }
    units
}

fn run_pass_inner(files: &[SourceFile], units: &mut Vec<GeneratedUnit>) {
    let trees: Vec<_> = files.iter().map(|f| parse_file(&f.text)).collect();

    // Phase 1: template registry. First declaration of a name wins.
    let mut registry: FxHashMap<String, Template> = FxHashMap::default();
    for (file, tree) in files.iter().zip(&trees) {
        for decl in tree.types() {
            let scope = tree.scope_at(decl.span.start);
            let Some(template) = Template::extract(decl, &scope, &file.text) else {
                continue;
            };
            if registry.contains_key(&template.name) {
                log::warn!(
                    "{}: duplicate macro '{}' ignored, first declaration wins",
                    file.name,
                    template.name
                );
                continue;
            }
            registry.insert(template.name.clone(), template);
        }
    }

    // Phase 2: directive expansion. A literally repeated directive in the
    // same scope names an identical unit; it is emitted once.
    let mut emitted: FxHashMap<String, usize> = FxHashMap::default();
    for (file, tree) in files.iter().zip(&trees) {
        for pragma in pragma::scan(&file.text) {
            let scope = tree.scope_at(pragma.offset);
            match expand(registry.get(&pragma.name), &pragma) {
                Expansion::Expanded(body) => {
                    let template = &registry[&pragma.name];
                    push_unique(units, &mut emitted, emit_unit(template, &pragma, &scope, &body));
                    for (param, arg) in template.params.iter().zip(&pragma.args) {
                        if param.is_type {
                            push_unique(
                                units,
                                &mut emitted,
                                arg_struct_unit(template, &pragma, arg),
                            );
                        }
                    }
                }
                Expansion::ArityMismatch { expected, got } => {
                    log::warn!(
                        "{}: macro '{}' takes {} argument(s), directive supplied {}; skipped",
                        file.name,
                        pragma.name,
                        expected,
                        got
                    );
                }
                Expansion::UnknownTemplate(name) => {
                    log::warn!("{}: no macro named '{}'; directive skipped", file.name, name);
                }
            }
        }
    }
}

fn push_unique(
    units: &mut Vec<GeneratedUnit>,
    emitted: &mut FxHashMap<String, usize>,
    unit: GeneratedUnit,
) {
    match emitted.get(&unit.name) {
        None => {
            emitted.insert(unit.name.clone(), units.len());
            units.push(unit);
        }
        Some(&prior) if units[prior].text == unit.text => {
            log::debug!("unit '{}' already emitted, skipping duplicate", unit.name);
        }
        Some(_) => {
            // Same name but different text: two directives whose scopes
            // agree on namespace and type chain (fragments of one partial
            // type, say) but differ in visible usings. Folding the unit's
            // own text into the name keeps both expansions.
            let renamed = GeneratedUnit::new(disambiguated_name(&unit), unit.text);
            log::warn!(
                "unit name '{}' collided with different content, emitting as '{}'",
                unit.name,
                renamed.name
            );
            match emitted.get(&renamed.name) {
                None => {
                    emitted.insert(renamed.name.clone(), units.len());
                    units.push(renamed);
                }
                Some(&prior) if units[prior].text == renamed.text => {
                    log::debug!("unit '{}' already emitted, skipping duplicate", renamed.name);
                }
                Some(_) => {
                    log::error!("unit '{}' still collides, dropping it", renamed.name);
                }
            }
        }
    }
}

fn disambiguated_name(unit: &GeneratedUnit) -> String {
    let mut hasher = FxHasher::default();
    unit.text.hash(&mut hasher);
    let base = unit.name.strip_suffix(".g.cs").unwrap_or(&unit.name);
    format!("{}_{:016x}.g.cs", base, hasher.finish())
}
