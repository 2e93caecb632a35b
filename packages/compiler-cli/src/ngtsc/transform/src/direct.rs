//! Direct component instances
//!
//! With the direct strategy the factory calls the component function itself.
//! The function builds the instance: its input signals under their public
//! names, and the compiled template as a closure over its locals. The
//! definition's template forwards to that closure.

use ngxc_compiler::output::output_ast as o;
use oxc_ast::ast::{Expression, Statement};

use crate::ngtsc::transform::src::extractor::InputDeclaration;
use crate::ngtsc::transform::src::lazy::TEMPLATE_FIELD;
use crate::ngtsc::translator::src::api::ast_factory::{AstFactory, ObjectLiteralProperty};
use crate::ngtsc::translator::src::typescript_ast_factory::TypeScriptAstFactory;

/// `function Name_HostTemplate(rf, ctx) { ctx.ɵɵtemplate(rf, ctx); }`
pub fn host_template(component: &str) -> o::Expression {
    let forward = o::variable("ctx")
        .prop(TEMPLATE_FIELD)
        .call_fn(vec![o::variable("rf"), o::variable("ctx")])
        .to_stmt();
    o::fn_(
        vec![o::FnParam::new("rf"), o::FnParam::new("ctx")],
        vec![forward],
        Some(format!("{}_HostTemplate", component)),
    )
}

/// `Name.ɵfac = function Name_Factory(t) { return Name({}); }`
///
/// The empty object lets input initialisers in a destructured first
/// parameter run.
pub fn factory_assignment(component: &str) -> o::Statement {
    let instance = o::variable(component).call_fn(vec![o::literal_map(vec![])]);
    o::variable(component)
        .set_prop(
            "ɵfac",
            o::fn_(
                vec![o::FnParam::new("t")],
                vec![instance.to_return_stmt()],
                Some(format!("{}_Factory", component)),
            ),
        )
        .to_stmt()
}

/// `return { <input>: <binding>, ..., ɵɵtemplate: <template> };`, the tail of
/// a direct component function.
pub fn instance_return<'a>(
    factory: &TypeScriptAstFactory<'a>,
    inputs: &[InputDeclaration],
    template: Expression<'a>,
) -> Statement<'a> {
    let mut properties: Vec<_> = inputs
        .iter()
        .map(|input| ObjectLiteralProperty {
            property_name: input.property_name.clone(),
            value: factory.create_identifier(&input.binding_name),
            quoted: false,
        })
        .collect();
    properties.push(ObjectLiteralProperty {
        property_name: TEMPLATE_FIELD.to_string(),
        value: template,
        quoted: false,
    });
    factory.create_return_statement(Some(factory.create_object_literal(properties)))
}
