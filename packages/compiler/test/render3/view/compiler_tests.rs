/**
 * Component Compiler Tests
 *
 * Compiles small templates end to end and checks the printed definition
 * and hoisted view functions.
 */

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use ngxc_compiler::constant_pool::ConstantPool;
    use ngxc_compiler::output::abstract_emitter::{
        AbstractEmitterVisitor, EmitError, EmitterVisitorContext, ExternalReferenceResolver,
    };
    use ngxc_compiler::output::output_ast as o;
    use ngxc_compiler::render3::view::{
        compile_component_from_metadata, make_binding_parser, parse_template, ParseTemplateOptions,
        R3ComponentDeferMetadata, R3ComponentMetadata, R3ComponentTemplate, R3InputMetadata, R3TargetBinder,
        Target, ViewEncapsulation, DEFAULT_INTERPOLATION_CONFIG,
    };
    use ngxc_compiler::directive_matching::SelectorMatcher;
    use ngxc_compiler::CompileError;

    struct BareNames;

    impl ExternalReferenceResolver for BareNames {
        fn resolve_external_reference(&mut self, reference: &o::ExternalReference) -> Result<String, EmitError> {
            Ok(reference.name.clone().unwrap_or_default())
        }
    }

    struct Compiled {
        definition: String,
        pool: String,
    }

    fn metadata(name: &str, template: &str) -> R3ComponentMetadata {
        let parsed = parse_template(template, "test.html", ParseTemplateOptions::default());
        assert!(parsed.errors.is_none(), "unexpected errors: {:?}", parsed.errors);

        let bound = R3TargetBinder::<()>::new(SelectorMatcher::new()).bind(Target {
            template: &parsed.nodes,
        });
        let blocks = bound
            .get_defer_blocks()
            .iter()
            .map(|block| (block.source_span.start.offset, None))
            .collect();

        R3ComponentMetadata {
            name: name.to_string(),
            type_: o::wrapped_identifier(name),
            selector: "my-cmp".to_string(),
            inputs: IndexMap::new(),
            outputs: IndexMap::new(),
            export_as: None,
            is_standalone: true,
            template: R3ComponentTemplate {
                nodes: parsed.nodes.clone(),
            },
            declarations: vec![],
            defer: R3ComponentDeferMetadata::PerBlock { blocks },
            styles: vec![],
            encapsulation: ViewEncapsulation::Emulated,
        }
    }

    fn compile(meta: &R3ComponentMetadata) -> Compiled {
        let mut pool = ConstantPool::new();
        let binding_parser = make_binding_parser(DEFAULT_INTERPOLATION_CONFIG);
        let compiled = compile_component_from_metadata(meta, &mut pool, &binding_parser).unwrap();

        let mut visitor = AbstractEmitterVisitor::new(BareNames, false);
        let mut ctx = EmitterVisitorContext::create_root();
        compiled.expression.visit_expression(&mut visitor, &mut ctx).unwrap();
        let definition = ctx.to_source();

        let mut ctx = EmitterVisitorContext::create_root();
        visitor.visit_all_statements(&pool.statements, &mut ctx).unwrap();
        Compiled {
            definition,
            pool: ctx.to_source(),
        }
    }

    fn assert_in_order(haystack: &str, needles: &[&str]) {
        let mut from = 0;
        for needle in needles {
            match haystack[from..].find(needle) {
                Some(pos) => from += pos + needle.len(),
                None => panic!("expected `{}` after offset {} in:\n{}", needle, from, haystack),
            }
        }
    }

    #[test]
    fn should_compile_elements_listeners_and_interpolations() {
        let compiled = compile(&metadata(
            "Counter",
            "<button (click)=\"inc()\">Increment</button><p>Count: {{count()}}</p>",
        ));
        assert_in_order(
            &compiled.definition,
            &[
                "ɵɵdefineComponent({",
                "type:Counter",
                "selectors:[['my-cmp']]",
                "standalone:true",
                "features:[ɵɵStandaloneFeature]",
                "decls:4",
                "vars:1",
                "consts:[[3,'click']]",
                "template:function Counter_Template(rf,ctx) {",
                "ɵɵelementStart(0,'button',0);",
                "ɵɵlistener('click',function Counter_Template_button_click_0_listener() {",
                "return ctx.inc();",
                "ɵɵtext(1,'Increment');",
                "ɵɵelementEnd();",
                "ɵɵelementStart(2,'p');",
                "ɵɵtext(3);",
                "ɵɵelementEnd();",
                "if (rf & 2)",
                "ɵɵadvance(3);",
                "ɵɵtextInterpolate1('Count: ',ctx.count(),'');",
                "encapsulation:2",
            ],
        );
        assert!(compiled.pool.is_empty());
    }

    #[test]
    fn should_hoist_conditional_views_into_the_pool() {
        let compiled = compile(&metadata(
            "Counter",
            "<p>{{count()}}</p>@if (count() > 2) {<span>big</span>} @else {<span>{{count()}}</span>}",
        ));
        assert_in_order(
            &compiled.definition,
            &[
                "decls:4",
                "vars:2",
                "ɵɵtemplate(2,Counter_Conditional_2_Template,2,0);",
                "ɵɵtemplate(3,Counter_Conditional_3_Template,2,1);",
                "ɵɵadvance();",
                "ɵɵtextInterpolate(ctx.count());",
                "ɵɵadvance();",
                "ɵɵconditional((ctx.count() > 2? 2: 3));",
            ],
        );
        assert_in_order(
            &compiled.pool,
            &[
                "function Counter_Conditional_2_Template(rf,ctx) {",
                "ɵɵelementStart(0,'span');",
                "ɵɵtext(1,'big');",
                "function Counter_Conditional_3_Template(rf,ctx) {",
                "var ctx_r1 = ɵɵnextContext();",
                "ɵɵadvance();",
                "ɵɵtextInterpolate(ctx_r1.count());",
            ],
        );
    }

    #[test]
    fn should_restore_the_view_in_embedded_listeners() {
        let compiled = compile(&metadata(
            "Dialog",
            "@if (open()) {<button (click)=\"close($event)\">x</button>}",
        ));
        assert_in_order(&compiled.definition, &["ɵɵconditional((ctx.open()? 0: -1));"]);
        assert_in_order(
            &compiled.pool,
            &[
                "function Dialog_Conditional_0_Template(rf,ctx) {",
                "var _r2 = ɵɵgetCurrentView();",
                "ɵɵelementStart(0,'button',0);",
                "function Dialog_Conditional_0_Template_button_click_0_listener($event) {",
                "ɵɵrestoreView(_r2);",
                "var ctx_r1 = ɵɵnextContext();",
                "return ɵɵresetView(ctx_r1.close($event));",
            ],
        );
    }

    #[test]
    fn should_emit_nested_views_before_their_parents() {
        let compiled = compile(&metadata("Nest", "@if (a) {@if (b) {<i>{{c}}</i>}}"));
        assert_in_order(
            &compiled.pool,
            &[
                "function Nest_Conditional_0_Conditional_0_Template(rf,ctx) {",
                "ɵɵnextContext(2);",
                "function Nest_Conditional_0_Template(rf,ctx) {",
            ],
        );
    }

    #[test]
    fn should_compile_defer_blocks_on_idle() {
        let compiled = compile(&metadata("Lazy", "@defer {<p>{{a}}</p>}"));
        assert_in_order(
            &compiled.definition,
            &[
                "decls:2",
                "vars:0",
                "ɵɵtemplate(0,Lazy_Defer_0_Template,2,1);",
                "ɵɵdefer(1,0);",
                "ɵɵdeferOnIdle();",
            ],
        );
        assert_in_order(&compiled.pool, &["function Lazy_Defer_0_Template(rf,ctx) {"]);
    }

    #[test]
    fn should_compile_style_and_property_bindings() {
        let compiled = compile(&metadata(
            "Box",
            "<p [style.fontSize]=\"size\" [style.width.px]=\"w\" [title]=\"t\"></p>",
        ));
        assert_in_order(
            &compiled.definition,
            &[
                "vars:5",
                "consts:[[3,'title']]",
                "ɵɵelement(0,'p',0);",
                "ɵɵstyleProp('font-size',ctx.size)",
                "ɵɵstyleProp('width',ctx.w,'px')",
                "ɵɵproperty('title',ctx.t)",
            ],
        );
        assert!(!compiled.definition.contains("ɵɵadvance"));
    }

    #[test]
    fn should_serialize_inputs_and_export_as() {
        let mut meta = metadata("Hello", "<p>{{name()}}</p>");
        meta.inputs.insert(
            "name".to_string(),
            R3InputMetadata {
                class_property_name: "name".to_string(),
                binding_property_name: "name".to_string(),
                required: false,
                is_signal: true,
            },
        );
        meta.export_as = Some(vec![]);
        let compiled = compile(&meta);
        assert_in_order(
            &compiled.definition,
            &["selectors:", "inputs:{name:[1,'name']}", "exportAs:[]", "standalone:true"],
        );
    }

    #[test]
    fn should_keep_emulated_encapsulation_with_styles() {
        let mut meta = metadata("Styled", "<p></p>");
        meta.styles = vec!["p { color: red; }".to_string()];
        let compiled = compile(&meta);
        assert!(compiled.definition.contains("styles:['p { color: red; }']"));
        assert!(!compiled.definition.contains("encapsulation"));
    }

    #[test]
    fn should_fail_without_defer_metadata() {
        let mut meta = metadata("Lazy", "@defer {<p>x</p>}");
        meta.defer = R3ComponentDeferMetadata::default();
        let mut pool = ConstantPool::new();
        let binding_parser = make_binding_parser(DEFAULT_INTERPOLATION_CONFIG);
        let err = compile_component_from_metadata(&meta, &mut pool, &binding_parser).unwrap_err();
        assert!(matches!(err, CompileError::MissingDeferBlock(0)));
    }
}
