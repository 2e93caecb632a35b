//! Definition synthesis
//!
//! Compiles one extracted component into an Angular component definition
//! and splices it into the program: the template `return` of the component
//! function is replaced and the statements that attach the definition to the
//! function are handed back to the driver.

use std::fmt;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use ngxc_compiler::directive_matching::SelectorMatcher;
use ngxc_compiler::output::output_ast as o;
use ngxc_compiler::render3::r3_ast as t;
use ngxc_compiler::render3::view::{
    ParseTemplateOptions, R3ComponentDeferMetadata, R3ComponentMetadata, R3ComponentTemplate, R3InputMetadata,
    R3TargetBinder, Target, ViewEncapsulation,
};
use ngxc_compiler::{
    compile_component_from_metadata, make_binding_parser, parse_template, ConstantPool, DEFAULT_INTERPOLATION_CONFIG,
};
use oxc_allocator::{CloneIn, Vec as ArenaVec};
use oxc_ast::ast::{
    Argument, Expression, Function, ObjectExpression, ObjectPropertyKind, PropertyKind, Statement,
};
use oxc_ast::AstBuilder;
use oxc_ast_visit::{walk_mut, VisitMut};
use oxc_span::SPAN;
use oxc_syntax::scope::ScopeFlags;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TransformError};
use crate::ngtsc::transform::src::extractor::{returned_element, root_tag_name, ComponentCandidate};
use crate::ngtsc::transform::src::direct;
use crate::ngtsc::transform::src::lazy::{self, LazyTypeBuilder};
use crate::ngtsc::transform::src::preprocess::preprocess;
use crate::ngtsc::transform::src::rewriter::{ContextQualifierStripper, SelectorTagRewriter};
use crate::ngtsc::translator::src::api::ast_factory::AstFactory;
use crate::ngtsc::translator::src::{
    CoreImportGenerator, ExpressionTranslatorVisitor, ImportSet, TranslatorOptions, TypeScriptAstFactory,
};

/// How a component function is turned into something Angular can render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisStrategy {
    /// The function runs per instance in `ngOnInit` and returns its template
    /// closure; the definition's type is a factory object.
    #[default]
    Lazy,
    /// The function itself is the type. Its factory calls it with empty
    /// props, and the instance it returns carries the template closure.
    Direct,
}

impl fmt::Display for SynthesisStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisStrategy::Lazy => write!(f, "lazy"),
            SynthesisStrategy::Direct => write!(f, "direct"),
        }
    }
}

impl FromStr for SynthesisStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "lazy" => Ok(SynthesisStrategy::Lazy),
            "direct" => Ok(SynthesisStrategy::Direct),
            other => Err(format!("unknown strategy `{}`, expected `lazy` or `direct`", other)),
        }
    }
}

/// File-level helpers requested while synthesizing components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HelperRequests {
    pub selector_tag: bool,
}

/// Per-file state shared by every component of the file.
pub struct SynthesisContext<'s, 'a> {
    pub factory: TypeScriptAstFactory<'a>,
    pub file_name: &'s str,
    pub strategy: SynthesisStrategy,
    pub imports: &'s mut ImportSet,
    pub helpers: &'s mut HelperRequests,
}

pub struct SynthesizedComponent<'a> {
    /// Statements to insert right after the component function.
    pub trailing: Vec<Statement<'a>>,
    /// Components referenced by capitalised tags in the template.
    pub dependencies: IndexSet<String>,
}

/// A compiled definition before translation.
pub struct CompiledDefinition {
    /// `ɵɵdefineComponent({...})`.
    pub definition: o::Expression,
    /// Constant pool statements, such as embedded view templates.
    pub hoisted: Vec<o::Statement>,
}

/// Parses and compiles the template of `candidate`.
pub fn compile_definition(candidate: &ComponentCandidate, file_name: &str) -> Result<CompiledDefinition> {
    let template_text = preprocess(&candidate.template_text);
    let parsed = parse_template(&template_text, file_name, ParseTemplateOptions::default());
    if let Some(error) = parsed.errors.iter().flatten().next() {
        return Err(TransformError::TemplateParse {
            component: candidate.name.clone(),
            message: error.msg.clone(),
        });
    }

    let defer = defer_metadata(&parsed.nodes);
    let meta = component_metadata(candidate, parsed.nodes, defer);

    let mut constant_pool = ConstantPool::new();
    let binding_parser = make_binding_parser(DEFAULT_INTERPOLATION_CONFIG);
    let compiled = compile_component_from_metadata(&meta, &mut constant_pool, &binding_parser)?;

    let mut hoisted = constant_pool.statements;
    hoisted.extend(compiled.statements);
    Ok(CompiledDefinition {
        definition: compiled.expression,
        hoisted,
    })
}

fn defer_metadata(nodes: &[t::R3Node]) -> R3ComponentDeferMetadata {
    let binder = R3TargetBinder::<()>::new(SelectorMatcher::new());
    let bound = binder.bind(Target { template: nodes });
    let blocks = bound
        .get_defer_blocks()
        .iter()
        .map(|block| (block.source_span.start.offset, None))
        .collect();
    R3ComponentDeferMetadata::PerBlock { blocks }
}

fn component_metadata(
    candidate: &ComponentCandidate,
    nodes: Vec<t::R3Node>,
    defer: R3ComponentDeferMetadata,
) -> R3ComponentMetadata {
    let inputs = candidate
        .inputs
        .iter()
        .map(|input| {
            let metadata = R3InputMetadata {
                class_property_name: input.property_name.clone(),
                binding_property_name: input.property_name.clone(),
                required: input.required,
                is_signal: true,
            };
            (input.property_name.clone(), metadata)
        })
        .collect();

    R3ComponentMetadata {
        name: candidate.name.clone(),
        type_: o::wrapped_identifier(candidate.name.as_str()),
        selector: candidate.selector.clone(),
        inputs,
        outputs: IndexMap::new(),
        export_as: Some(Vec::new()),
        is_standalone: true,
        template: R3ComponentTemplate { nodes },
        declarations: Vec::new(),
        defer,
        styles: Vec::new(),
        encapsulation: ViewEncapsulation::Emulated,
    }
}

/// Compiles `candidate`, rewrites the template `return` of `function` and
/// returns the statements that must follow the function.
pub fn synthesize<'a>(
    candidate: &ComponentCandidate,
    function: &mut Function<'a>,
    cx: &mut SynthesisContext<'_, 'a>,
) -> Result<SynthesizedComponent<'a>> {
    let CompiledDefinition { definition, hoisted } = compile_definition(candidate, cx.file_name)?;
    let factory = cx.factory;
    let ast = factory.builder();

    let mut generator = CoreImportGenerator::new(factory, &mut *cx.imports);
    let mut translator = ExpressionTranslatorVisitor::new(
        &factory,
        &mut generator,
        cx.file_name,
        TranslatorOptions {
            downlevel_variable_declarations: true,
        },
    );
    let mut rewriter = SelectorTagRewriter::new(ast);

    let (definition, template) = split_definition(definition, &candidate.name, cx.strategy)?;
    let mut definition = translator.translate_expression(&definition)?;
    let mut template = translator.translate_expression(&template)?;
    let mut body = translator.translate_statements(&hoisted)?;

    let mut stripper = ContextQualifierStripper::new(ast);
    stripper.visit_expression(&mut template);
    stripper.strip_statements(&mut body);
    rewriter.visit_expression(&mut template);
    rewriter.rewrite_statements(&mut body);
    debug!(component = %candidate.name, stripped = stripper.stripped(), "stripped context qualifiers");

    match cx.strategy {
        SynthesisStrategy::Lazy => {
            let parameters = function.params.clone_in(ast.allocator);
            let type_object =
                LazyTypeBuilder::new(&factory, &mut translator, &candidate.name).build(parameters, &candidate.inputs)?;
            set_property(definition_object(&mut definition)?, "type", type_object)?;
            body.push(lazy::template_return(&factory, template));
        }
        SynthesisStrategy::Direct => body.push(direct::instance_return(&factory, &candidate.inputs, template)),
    }

    let dependencies = rewriter.into_dependencies();
    if !dependencies.is_empty() {
        insert_dependencies(&factory, definition_object(&mut definition)?, &dependencies);
    }

    let component_def = factory.create_property_access(factory.create_identifier(&candidate.name), "ɵcmp");
    let mut trailing = vec![factory.create_expression_statement(factory.create_assignment(component_def, definition)?)];
    if cx.strategy == SynthesisStrategy::Direct {
        trailing.push(translator.translate_statement(&direct::factory_assignment(&candidate.name))?);
    }

    replace_template_return(ast, function, body)?;
    if !dependencies.is_empty() {
        cx.helpers.selector_tag = true;
    }

    debug!(
        component = %candidate.name,
        strategy = %cx.strategy,
        trailing = trailing.len(),
        dependencies = dependencies.len(),
        "synthesized component definition"
    );
    Ok(SynthesizedComponent { trailing, dependencies })
}

fn malformed_definition(detail: &str) -> TransformError {
    TransformError::UnsupportedNode {
        kind: format!("component definition {}", detail),
    }
}

/// Moves the compiled template out of `definition` and puts the host
/// template of `strategy` in its place. The lazy host template declares one
/// embedded view, so `decls` and `vars` become 1.
fn split_definition(
    mut definition: o::Expression,
    component: &str,
    strategy: SynthesisStrategy,
) -> Result<(o::Expression, o::Expression)> {
    let entries = match &mut definition {
        o::Expression::InvokeFn(call) => match call.args.first_mut() {
            Some(o::Expression::LiteralMap(map)) => &mut map.entries,
            _ => return Err(malformed_definition("without a literal map")),
        },
        _ => return Err(malformed_definition("is not a call")),
    };

    let position = |key: &str| {
        entries
            .iter()
            .position(|entry| entry.key == key)
            .ok_or_else(|| malformed_definition(&format!("without `{}`", key)))
    };
    let template_at = position("template")?;
    let host = match strategy {
        SynthesisStrategy::Lazy => {
            let decls_at = position("decls")?;
            let vars_at = position("vars")?;
            let decls = std::mem::replace(&mut *entries[decls_at].value, o::literal(1));
            let vars = std::mem::replace(&mut *entries[vars_at].value, o::literal(1));
            lazy::host_template(component, decls, vars)
        }
        SynthesisStrategy::Direct => direct::host_template(component),
    };
    let template = std::mem::replace(&mut *entries[template_at].value, host);
    Ok((definition, template))
}

fn definition_object<'s, 'a>(definition: &'s mut Expression<'a>) -> Result<&'s mut ObjectExpression<'a>> {
    match definition {
        Expression::CallExpression(call) => match call.arguments.first_mut() {
            Some(Argument::ObjectExpression(object)) => Ok(&mut **object),
            _ => Err(malformed_definition("without an object literal")),
        },
        _ => Err(malformed_definition("is not a call")),
    }
}

fn property_index(object: &ObjectExpression<'_>, key: &str) -> Option<usize> {
    object.properties.iter().position(|property| {
        matches!(property, ObjectPropertyKind::ObjectProperty(property)
            if property.key.static_name().is_some_and(|name| name == key))
    })
}

fn set_property<'a>(object: &mut ObjectExpression<'a>, key: &str, value: Expression<'a>) -> Result<()> {
    let index = property_index(object, key).ok_or_else(|| malformed_definition(&format!("without `{}`", key)))?;
    if let ObjectPropertyKind::ObjectProperty(property) = &mut object.properties[index] {
        property.value = value;
    }
    Ok(())
}

/// Adds `dependencies: [A, B]` right after the `template` entry.
fn insert_dependencies<'a>(
    factory: &TypeScriptAstFactory<'a>,
    object: &mut ObjectExpression<'a>,
    dependencies: &IndexSet<String>,
) {
    let ast = factory.builder();
    let elements = dependencies.iter().map(|name| factory.create_identifier(name)).collect();
    let property = ast.object_property_kind_object_property(
        SPAN,
        PropertyKind::Init,
        ast.property_key_static_identifier(SPAN, "dependencies"),
        factory.create_array_literal(elements),
        false,
        false,
        false,
    );
    let at = property_index(object, "template").map_or(object.properties.len(), |index| index + 1);
    object.properties.insert(at, property);
}

/// Replaces the JSX `return` of `function` with `replacement`.
fn replace_template_return<'a>(
    ast: AstBuilder<'a>,
    function: &mut Function<'a>,
    replacement: Vec<Statement<'a>>,
) -> Result<()> {
    let mut replacer = TemplateReturnReplacer {
        ast,
        replacement: Some(replacement),
    };
    if let Some(body) = function.body.as_mut() {
        replacer.visit_function_body(body);
    }
    match replacer.replacement {
        None => Ok(()),
        Some(_) => Err(TransformError::UnsupportedNode {
            kind: "template return outside a statement list".to_string(),
        }),
    }
}

struct TemplateReturnReplacer<'a> {
    ast: AstBuilder<'a>,
    replacement: Option<Vec<Statement<'a>>>,
}

impl<'a> TemplateReturnReplacer<'a> {
    fn is_pending_template_return(&self, statement: &Statement<'a>) -> bool {
        self.replacement.is_some()
            && matches!(statement, Statement::ReturnStatement(ret)
                if returned_element(ret).and_then(root_tag_name).is_some())
    }
}

impl<'a> VisitMut<'a> for TemplateReturnReplacer<'a> {
    fn visit_statements(&mut self, statements: &mut ArenaVec<'a, Statement<'a>>) {
        let original = std::mem::replace(statements, self.ast.vec());
        for mut statement in original {
            if self.is_pending_template_return(&statement) {
                for replacement in self.replacement.take().unwrap_or_default() {
                    statements.push(replacement);
                }
            } else {
                self.visit_statement(&mut statement);
                statements.push(statement);
            }
        }
    }

    fn visit_statement(&mut self, statement: &mut Statement<'a>) {
        if self.is_pending_template_return(statement) {
            let body = ArenaVec::from_iter_in(self.replacement.take().unwrap_or_default(), self.ast.allocator);
            *statement = self.ast.statement_block(SPAN, body);
            return;
        }
        walk_mut::walk_statement(self, statement);
    }

    // Nested functions never hold the component's template return.
    fn visit_function(&mut self, _function: &mut Function<'a>, _flags: ScopeFlags) {}

    fn visit_arrow_function_expression(&mut self, _arrow: &mut oxc_ast::ast::ArrowFunctionExpression<'a>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ngtsc::transform::src::extractor::InputDeclaration;

    fn candidate(template_text: &str) -> ComponentCandidate {
        ComponentCandidate {
            name: "Greeting".to_string(),
            selector: "x-greeting".to_string(),
            template_text: template_text.to_string(),
            inputs: vec![InputDeclaration {
                property_name: "name".to_string(),
                binding_name: "name".to_string(),
                required: true,
            }],
            statement_index: 0,
        }
    }

    fn entry<'e>(definition: &'e o::Expression, key: &str) -> &'e o::Expression {
        match definition {
            o::Expression::InvokeFn(call) => match &call.args[0] {
                o::Expression::LiteralMap(map) => map.entries.iter().find(|e| e.key == key).unwrap().value.as_ref(),
                other => panic!("expected a literal map, got {:?}", other),
            },
            other => panic!("expected a call, got {:?}", other),
        }
    }

    #[test]
    fn should_parse_strategy_names() {
        assert_eq!("lazy".parse::<SynthesisStrategy>().unwrap(), SynthesisStrategy::Lazy);
        assert_eq!("direct".parse::<SynthesisStrategy>().unwrap(), SynthesisStrategy::Direct);
        assert!("eager".parse::<SynthesisStrategy>().is_err());
        assert_eq!(SynthesisStrategy::default(), SynthesisStrategy::Lazy);
    }

    #[test]
    fn should_deserialize_lowercase_strategy() {
        let strategy: SynthesisStrategy = serde_json::from_str("\"direct\"").unwrap();
        assert_eq!(strategy, SynthesisStrategy::Direct);
    }

    #[test]
    fn should_compile_definition_with_selector_and_inputs() {
        let compiled = compile_definition(&candidate("<p>{name()}</p>"), "greeting.ng.tsx").unwrap();
        assert_eq!(
            entry(&compiled.definition, "selectors"),
            &o::literal_arr(vec![o::literal_arr(vec![o::literal("x-greeting")])])
        );
        assert!(matches!(entry(&compiled.definition, "template"), o::Expression::Fn(_)));
        assert!(matches!(entry(&compiled.definition, "inputs"), o::Expression::LiteralMap(_)));
    }

    #[test]
    fn should_report_template_parse_errors_for_component() {
        let err = compile_definition(&candidate("<div>"), "greeting.ng.tsx").err().unwrap();
        match err {
            TransformError::TemplateParse { component, message } => {
                assert_eq!(component, "Greeting");
                assert_eq!(message, "Unclosed element \"div\"");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn should_split_lazy_definition() {
        let compiled = compile_definition(&candidate("<p>Hi</p>"), "greeting.ng.tsx").unwrap();
        let original_template = entry(&compiled.definition, "template").clone();
        let (definition, template) =
            split_definition(compiled.definition, "Greeting", SynthesisStrategy::Lazy).unwrap();

        assert_eq!(template, original_template);
        assert_eq!(entry(&definition, "decls"), &o::literal(1));
        assert_eq!(entry(&definition, "vars"), &o::literal(1));
        match entry(&definition, "template") {
            o::Expression::Fn(host) => assert_eq!(host.name.as_deref(), Some("Greeting_HostTemplate")),
            other => panic!("expected the host template, got {:?}", other),
        }
    }

    #[test]
    fn should_split_direct_definition_keeping_slot_counts() {
        let compiled = compile_definition(&candidate("<p>Hi</p><b>{name()}</b>"), "greeting.ng.tsx").unwrap();
        let decls = entry(&compiled.definition, "decls").clone();
        let vars = entry(&compiled.definition, "vars").clone();
        let (definition, template) =
            split_definition(compiled.definition, "Greeting", SynthesisStrategy::Direct).unwrap();

        assert!(matches!(template, o::Expression::Fn(ref f) if f.name.as_deref() == Some("Greeting_Template")));
        assert_eq!(entry(&definition, "decls"), &decls);
        assert_eq!(entry(&definition, "vars"), &vars);
        assert_eq!(entry(&definition, "template"), &direct::host_template("Greeting"));
    }

    #[test]
    fn should_reject_definitions_without_template() {
        let definition = o::variable("define").call_fn(vec![o::literal_map(vec![])]);
        assert!(matches!(
            split_definition(definition, "Greeting", SynthesisStrategy::Direct),
            Err(TransformError::UnsupportedNode { .. })
        ));
    }
}
