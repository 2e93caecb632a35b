//! Render3 View Compiler
//!
//! Compiles component metadata into a `ɵɵdefineComponent({...})` expression.

use crate::constant_pool::ConstantPool;
use crate::error::Result;
use crate::output::output_ast as o;
use crate::render3::r3_identifiers::Identifiers as R3;
use crate::render3::view::api::{R3CompiledExpression, R3ComponentMetadata, ViewEncapsulation};
use crate::render3::view::util::{create_inputs_literal, create_outputs_literal, DefinitionMap};
use crate::template::pipeline::src::{emit_template_fn, ingest_component, transform};
use crate::template_parser::binding_parser::BindingParser;

/// Compile a component for the render3 runtime as defined by the
/// `R3ComponentMetadata`. Embedded view functions are pushed into
/// `constant_pool`. Host bindings are not compiled, so `_binding_parser` is
/// currently unused.
pub fn compile_component_from_metadata(
    meta: &R3ComponentMetadata,
    constant_pool: &mut ConstantPool,
    _binding_parser: &BindingParser,
) -> Result<R3CompiledExpression> {
    let mut definition_map = base_directive_fields(meta);

    let mut job = ingest_component(&meta.name, &meta.template.nodes, meta.defer.clone())?;
    transform(&mut job);
    let template_fn = emit_template_fn(&job, constant_pool);

    let root = job.root();
    tracing::debug!(
        component = %meta.name,
        views = job.views.len(),
        decls = root.decls,
        vars = root.vars.unwrap_or(0),
        "compiled component template"
    );
    definition_map.set("decls", Some(o::literal(root.decls)));
    definition_map.set("vars", Some(o::literal(root.vars.unwrap_or(0))));
    if !job.consts.is_empty() {
        definition_map.set("consts", Some(o::literal_arr(job.consts.clone())));
    }
    definition_map.set("template", Some(template_fn));

    if !meta.declarations.is_empty() {
        definition_map.set("dependencies", Some(o::literal_arr(meta.declarations.clone())));
    }

    if !meta.styles.is_empty() {
        let styles = meta.styles.iter().map(|s| o::literal(s.as_str())).collect();
        definition_map.set("styles", Some(o::literal_arr(styles)));
    }

    // Emulated encapsulation without styles has nothing to scope.
    let encapsulation = match meta.encapsulation {
        ViewEncapsulation::Emulated if meta.styles.is_empty() => ViewEncapsulation::None,
        other => other,
    };
    if encapsulation != ViewEncapsulation::Emulated {
        definition_map.set("encapsulation", Some(o::literal(encapsulation as usize)));
    }

    let expression = o::import_ref(R3::define_component()).call_fn(vec![definition_map.to_literal_map()]);
    Ok(R3CompiledExpression {
        expression,
        statements: vec![],
    })
}

/// Fields shared by every directive-like definition, in emission order.
fn base_directive_fields(meta: &R3ComponentMetadata) -> DefinitionMap {
    let mut definition_map = DefinitionMap::new();

    definition_map.set("type", Some(meta.type_.clone()));
    definition_map.set(
        "selectors",
        Some(o::literal_arr(vec![o::literal_arr(vec![o::literal(meta.selector.as_str())])])),
    );
    definition_map.set("inputs", create_inputs_literal(&meta.inputs));
    definition_map.set("outputs", create_outputs_literal(&meta.outputs));

    if let Some(export_as) = &meta.export_as {
        let names = export_as.iter().map(|name| o::literal(name.as_str())).collect();
        definition_map.set("exportAs", Some(o::literal_arr(names)));
    }

    if meta.is_standalone {
        definition_map.set("standalone", Some(o::literal(true)));
        definition_map.set(
            "features",
            Some(o::literal_arr(vec![o::import_ref(R3::standalone_feature())])),
        );
    }

    definition_map
}
