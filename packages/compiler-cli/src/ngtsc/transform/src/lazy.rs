//! Lazy component instances
//!
//! With the lazy strategy a component function runs once per instance,
//! inside `ngOnInit`, and hands back its template closure. Until then the
//! instance created by the factory only holds the injector, the input
//! signals and a placeholder template that refuses to render.
//!
//! ```text
//! constructed --ngOnInit--> initializing --component returns--> ready
//! ```

use ngxc_compiler::output::output_ast as o;
use ngxc_compiler::render3::Identifiers;
use oxc_allocator::Box;
use oxc_ast::ast::{Expression, FormalParameters, Statement};

use crate::error::Result;
use crate::ngtsc::transform::src::extractor::InputDeclaration;
use crate::ngtsc::translator::src::api::ast_factory::{
    ArrowFunctionBody, AstFactory, LiteralValue, ObjectLiteralProperty, VariableDeclarationType,
};
use crate::ngtsc::translator::src::typescript_ast_factory::TypeScriptAstFactory;
use crate::ngtsc::translator::src::ExpressionTranslatorVisitor;

pub const INJECTOR_FIELD: &str = "ɵɵinjector";
pub const PHASE_FIELD: &str = "ɵɵphase";
pub const TEMPLATE_IMPL_FIELD: &str = "ɵɵtemplateImpl";
pub const TEMPLATE_FIELD: &str = "ɵɵtemplate";
pub const INITIALIZED_FIELD: &str = "ɵɵinitialized";

/// Lifecycle of a lazily initialised component instance, stored in its
/// `ɵɵphase` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LazyPhase {
    /// Created by the factory; the template is a placeholder.
    Constructed,
    /// `ngOnInit` is running the component function.
    Initializing,
    /// The real template is installed.
    Ready,
}

impl LazyPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            LazyPhase::Constructed => "constructed",
            LazyPhase::Initializing => "initializing",
            LazyPhase::Ready => "ready",
        }
    }
}

pub fn uninitialized_message(component: &str) -> String {
    format!("Template of {} used before initialization", component)
}

/// The `template` of a lazy definition: one embedded view that renders the
/// instance's own template once `ɵɵinitialized` flips.
///
/// ```text
/// function Name_HostTemplate(rf, ctx) {
///   if (rf & 1) { ɵɵtemplate(0, ctx.ɵɵtemplate, decls, vars); }
///   if (rf & 2) { ɵɵconditional(ctx.ɵɵinitialized() ? 0 : -1); }
/// }
/// ```
pub fn host_template(component: &str, decls: o::Expression, vars: o::Expression) -> o::Expression {
    let rf = || o::variable("rf");
    let ctx = || o::variable("ctx");

    let create = o::import_ref(Identifiers::template_create())
        .call_fn(vec![o::literal(0), ctx().prop(TEMPLATE_FIELD), decls, vars])
        .to_stmt();
    let update = o::import_ref(Identifiers::conditional())
        .call_fn(vec![ctx()
            .prop(INITIALIZED_FIELD)
            .call_fn(vec![])
            .conditional(o::literal(0), Some(o::literal(-1)))])
        .to_stmt();

    o::fn_(
        vec![o::FnParam::new("rf"), o::FnParam::new("ctx")],
        vec![
            o::if_stmt(rf().bitwise_and(o::literal(1)), vec![create], vec![]),
            o::if_stmt(rf().bitwise_and(o::literal(2)), vec![update], vec![]),
        ],
        Some(format!("{}_HostTemplate", component)),
    )
}

/// `return { ɵɵtemplate: <template> };`, the tail of a lazy component
/// function.
pub fn template_return<'a>(factory: &TypeScriptAstFactory<'a>, template: Expression<'a>) -> Statement<'a> {
    factory.create_return_statement(Some(factory.create_object_literal(vec![ObjectLiteralProperty {
        property_name: TEMPLATE_FIELD.to_string(),
        value: template,
        quoted: false,
    }])))
}

/// Builds the object standing in for the component type:
///
/// ```text
/// {
///   ɵfac: () => { var ctx = { ɵɵinjector, ɵɵphase, ɵɵtemplateImpl, ɵɵtemplate,
///                             ɵɵinitialized, ...((<params>) => ({ inputs }))({}) };
///                 return ctx; },
///   prototype: { ngOnInit: function ngOnInit() { ... } }
/// }
/// ```
///
/// `parameters` are the component function's own parameters, so the input
/// initialisers run in the factory's injection context.
pub struct LazyTypeBuilder<'f, 't, 'a, TFile> {
    factory: &'f TypeScriptAstFactory<'a>,
    translator: &'f mut ExpressionTranslatorVisitor<'t, TypeScriptAstFactory<'a>, TFile>,
    component: &'f str,
}

impl<'f, 't, 'a, TFile: Clone> LazyTypeBuilder<'f, 't, 'a, TFile> {
    pub fn new(
        factory: &'f TypeScriptAstFactory<'a>,
        translator: &'f mut ExpressionTranslatorVisitor<'t, TypeScriptAstFactory<'a>, TFile>,
        component: &'f str,
    ) -> Self {
        Self { factory, translator, component }
    }

    pub fn build(
        &mut self,
        parameters: Box<'a, FormalParameters<'a>>,
        inputs: &[InputDeclaration],
    ) -> Result<Expression<'a>> {
        let factory_fn = self.factory_function(parameters, inputs)?;
        let ng_on_init = self.ng_on_init()?;
        let prototype = self.object(vec![("ngOnInit", ng_on_init)]);
        Ok(self.object(vec![("ɵfac", factory_fn), ("prototype", prototype)]))
    }

    fn core(&mut self, reference: o::ExternalReference) -> Result<Expression<'a>> {
        self.translator.translate_expression(&o::import_ref(reference))
    }

    fn object(&self, properties: Vec<(&str, Expression<'a>)>) -> Expression<'a> {
        self.factory.create_object_literal(
            properties
                .into_iter()
                .map(|(name, value)| ObjectLiteralProperty { property_name: name.to_string(), value, quoted: false })
                .collect(),
        )
    }

    fn string(&self, value: &str) -> Result<Expression<'a>> {
        self.factory.create_literal(LiteralValue::String(value))
    }

    fn this_field(&self, field: &str) -> Expression<'a> {
        self.factory.create_property_access(self.factory.create_this_expression(), field)
    }

    fn assign_this(&self, field: &str, value: Expression<'a>) -> Result<Statement<'a>> {
        let assignment = self.factory.create_assignment(self.this_field(field), value)?;
        Ok(self.factory.create_expression_statement(assignment))
    }

    fn factory_function(
        &mut self,
        parameters: Box<'a, FormalParameters<'a>>,
        inputs: &[InputDeclaration],
    ) -> Result<Expression<'a>> {
        let f = self.factory;

        let inject = self.core(Identifiers::inject())?;
        let injector = self.core(Identifiers::injector())?;
        let signal = self.core(Identifiers::signal())?;

        let placeholder = f.create_arrow_function_expression(
            &[],
            ArrowFunctionBody::Stmts(vec![f.create_throw_statement(f.create_new_expression(
                f.create_identifier("Error"),
                vec![self.string(&uninitialized_message(self.component))?],
            ))]),
        );
        let forward = f.create_arrow_function_expression(
            &["rf".to_string(), "context".to_string()],
            ArrowFunctionBody::Stmts(vec![f.create_expression_statement(f.create_call_expression(
                f.create_property_access(f.create_identifier("ctx"), TEMPLATE_IMPL_FIELD),
                vec![f.create_identifier("rf"), f.create_identifier("context")],
                false,
            ))]),
        );

        let bindings = inputs
            .iter()
            .map(|input| ObjectLiteralProperty {
                property_name: input.property_name.clone(),
                value: f.create_identifier(&input.binding_name),
                quoted: false,
            })
            .collect();
        let evaluate_inputs = f.create_call_expression(
            f.create_parenthesized_expression(f.create_arrow_function_with_parameters(
                parameters,
                ArrowFunctionBody::Expr(f.create_parenthesized_expression(f.create_object_literal(bindings))),
            )),
            vec![f.create_object_literal(vec![])],
            false,
        );

        let fields = vec![
            (INJECTOR_FIELD, f.create_call_expression(inject, vec![injector], false)),
            (PHASE_FIELD, self.string(LazyPhase::Constructed.as_str())?),
            (TEMPLATE_IMPL_FIELD, placeholder),
            (TEMPLATE_FIELD, forward),
            (
                INITIALIZED_FIELD,
                f.create_call_expression(signal, vec![f.create_literal(LiteralValue::Boolean(false))?], false),
            ),
        ];
        let instance = f.create_object_literal_with_spread(
            fields
                .into_iter()
                .map(|(name, value)| ObjectLiteralProperty { property_name: name.to_string(), value, quoted: false })
                .collect(),
            evaluate_inputs,
        );

        Ok(f.create_arrow_function_expression(
            &[],
            ArrowFunctionBody::Stmts(vec![
                f.create_variable_declaration("ctx", Some(instance), VariableDeclarationType::Var),
                f.create_return_statement(Some(f.create_identifier("ctx"))),
            ]),
        ))
    }

    fn ng_on_init(&mut self) -> Result<Expression<'a>> {
        let f = self.factory;
        let run_in_context = self.core(Identifiers::run_in_injection_context())?;

        let run_component = f.create_arrow_function_expression(
            &[],
            ArrowFunctionBody::Expr(
                f.create_call_expression(f.create_identifier(self.component), vec![f.create_this_expression()], false),
            ),
        );
        let instance = f.create_call_expression(run_in_context, vec![self.this_field(INJECTOR_FIELD), run_component], false);

        let body = vec![
            self.assign_this(PHASE_FIELD, self.string(LazyPhase::Initializing.as_str())?)?,
            f.create_variable_declaration("instance", Some(instance), VariableDeclarationType::Var),
            self.assign_this(
                TEMPLATE_IMPL_FIELD,
                f.create_property_access(f.create_identifier("instance"), TEMPLATE_FIELD),
            )?,
            self.assign_this(PHASE_FIELD, self.string(LazyPhase::Ready.as_str())?)?,
            f.create_expression_statement(f.create_call_expression(
                f.create_property_access(self.this_field(INITIALIZED_FIELD), "set"),
                vec![f.create_literal(LiteralValue::Boolean(true))?],
                false,
            )),
        ];
        Ok(f.create_function_expression(Some("ngOnInit"), &[], body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_name_phases_as_stored_on_the_instance() {
        let phases = [LazyPhase::Constructed, LazyPhase::Initializing, LazyPhase::Ready];
        assert_eq!(phases.map(LazyPhase::as_str), ["constructed", "initializing", "ready"]);
    }

    #[test]
    fn should_name_component_in_placeholder_error() {
        assert_eq!(uninitialized_message("Counter"), "Template of Counter used before initialization");
    }

    #[test]
    fn should_render_instance_template_when_initialized() {
        match host_template("Counter", o::literal(3), o::literal(1)) {
            o::Expression::Fn(function) => {
                assert_eq!(function.name.as_deref(), Some("Counter_HostTemplate"));
                assert_eq!(function.params.len(), 2);
                assert_eq!(function.statements.len(), 2);
            }
            other => panic!("expected a function, got {:?}", other),
        }
    }
}
