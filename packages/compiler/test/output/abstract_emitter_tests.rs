/**
 * Abstract Emitter Tests
 *
 * Prints output AST statements and expressions to JavaScript source.
 */

#[cfg(test)]
mod tests {
    use ngxc_compiler::output::abstract_emitter::{
        escape_identifier, AbstractEmitterVisitor, EmitError, EmitterVisitorContext, ExternalReferenceResolver,
    };
    use ngxc_compiler::output::output_ast as o;
    use pretty_assertions::assert_eq;

    /// Resolves every import to its bare symbol name.
    struct BareNames;

    impl ExternalReferenceResolver for BareNames {
        fn resolve_external_reference(&mut self, reference: &o::ExternalReference) -> Result<String, EmitError> {
            Ok(reference.name.clone().unwrap_or_default())
        }
    }

    fn emit_expr(expr: &o::Expression) -> String {
        let mut visitor = AbstractEmitterVisitor::new(BareNames, false);
        let mut ctx = EmitterVisitorContext::create_root();
        expr.visit_expression(&mut visitor, &mut ctx).unwrap();
        ctx.to_source()
    }

    fn emit_stmts(statements: &[o::Statement]) -> String {
        let mut visitor = AbstractEmitterVisitor::new(BareNames, false);
        let mut ctx = EmitterVisitorContext::create_root();
        visitor.visit_all_statements(statements, &mut ctx).unwrap();
        ctx.to_source().trim_end().to_string()
    }

    fn core(name: &str) -> o::Expression {
        o::import_ref(o::ExternalReference {
            module_name: Some("@angular/core".to_string()),
            name: Some(name.to_string()),
        })
    }

    mod escaping {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_escape_single_quotes() {
            assert_eq!(escape_identifier("'", false, true), "'\\''");
        }

        #[test]
        fn should_escape_backslash() {
            assert_eq!(escape_identifier("\\", false, true), "'\\\\'");
        }

        #[test]
        fn should_escape_newlines() {
            assert_eq!(escape_identifier("\n", false, true), "'\\n'");
            assert_eq!(escape_identifier("\r", false, true), "'\\r'");
        }

        #[test]
        fn should_escape_dollar_only_when_asked() {
            assert_eq!(escape_identifier("$", true, true), "'\\$'");
            assert_eq!(escape_identifier("$", false, true), "'$'");
        }

        #[test]
        fn should_quote_non_identifiers_only() {
            assert_eq!(escape_identifier("fontSize", false, false), "fontSize");
            assert_eq!(escape_identifier("==", false, false), "'=='");
        }
    }

    mod expressions {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_print_literals() {
            assert_eq!(emit_expr(&o::literal(5usize)), "5");
            assert_eq!(emit_expr(&o::literal(1.5)), "1.5");
            assert_eq!(emit_expr(&o::literal("a'b")), "'a\\'b'");
            assert_eq!(emit_expr(&o::literal(true)), "true");
            assert_eq!(emit_expr(&o::null_expr()), "null");
        }

        #[test]
        fn should_print_calls_and_property_reads() {
            let expr = o::variable("ctx").prop("count").call_fn(vec![]);
            assert_eq!(emit_expr(&expr), "ctx.count()");
        }

        #[test]
        fn should_print_imported_symbols() {
            let expr = core("ɵɵtext").call_fn(vec![o::literal(0usize), o::literal("Hi")]);
            assert_eq!(emit_expr(&expr), "ɵɵtext(0,'Hi')");
        }

        #[test]
        fn should_print_literal_maps_with_quoted_keys() {
            let expr = o::literal_map(vec![
                o::LiteralMapEntry::new("name", o::literal_arr(vec![o::literal(1usize), o::literal("name")]), false),
                o::LiteralMapEntry::new("font-size", o::literal("x"), true),
            ]);
            assert_eq!(emit_expr(&expr), "{name:[1,'name'],'font-size':'x'}");
        }

        #[test]
        fn should_print_binary_operators() {
            let expr = o::variable("rf").bitwise_and(o::literal(2usize));
            assert_eq!(emit_expr(&expr), "rf & 2");
        }

        #[test]
        fn should_print_nested_conditionals() {
            let expr = o::variable("a").conditional(
                o::literal(0usize),
                Some(o::variable("b").conditional(o::literal(1usize), Some(o::literal(-1)))),
            );
            assert_eq!(emit_expr(&expr), "(a? 0: (b? 1: -1))");
        }

        #[test]
        fn should_wrap_long_argument_lists() {
            let args = (0..10).map(|_| o::literal("aaaaaaaaaa")).collect();
            let source = emit_expr(&o::variable("f").call_fn(args));
            let lines: Vec<&str> = source.lines().collect();
            assert_eq!(lines.len(), 2);
            assert!(lines[0].starts_with("f('aaaaaaaaaa',"));
            assert!(lines[1].starts_with("    'aaaaaaaaaa'"));
            assert!(lines[1].ends_with("'aaaaaaaaaa')"));
        }

        #[test]
        fn should_surface_resolver_errors() {
            struct Rejecting;
            impl ExternalReferenceResolver for Rejecting {
                fn resolve_external_reference(&mut self, reference: &o::ExternalReference) -> Result<String, EmitError> {
                    Err(EmitError::UnnamedReference {
                        module: reference.module_name.clone().unwrap_or_default(),
                    })
                }
            }
            let mut visitor = AbstractEmitterVisitor::new(Rejecting, false);
            let mut ctx = EmitterVisitorContext::create_root();
            let err = core("ɵɵtext").visit_expression(&mut visitor, &mut ctx).unwrap_err();
            assert_eq!(
                err,
                EmitError::UnnamedReference {
                    module: "@angular/core".to_string()
                }
            );
        }
    }

    mod statements {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_print_variable_declarations() {
            let stmt = o::declare_var("_r1", Some(core("ɵɵgetCurrentView").call_fn(vec![])));
            assert_eq!(emit_stmts(&[stmt]), "var _r1 = ɵɵgetCurrentView();");
        }

        #[test]
        fn should_keep_single_statement_ifs_on_one_line() {
            let stmt = o::if_stmt(
                o::variable("rf").bitwise_and(o::literal(1usize)),
                vec![core("ɵɵtext").call_fn(vec![o::literal(0usize)]).to_stmt()],
                vec![],
            );
            assert_eq!(emit_stmts(&[stmt]), "if (rf & 1) { ɵɵtext(0); }");
        }

        #[test]
        fn should_indent_multi_statement_ifs() {
            let stmt = o::if_stmt(
                o::variable("rf").bitwise_and(o::literal(1usize)),
                vec![
                    core("ɵɵelementStart").call_fn(vec![o::literal(0usize), o::literal("p")]).to_stmt(),
                    core("ɵɵelementEnd").call_fn(vec![]).to_stmt(),
                ],
                vec![],
            );
            assert_eq!(
                emit_stmts(&[stmt]),
                "if (rf & 1) {\n  ɵɵelementStart(0,'p');\n  ɵɵelementEnd();\n}"
            );
        }

        #[test]
        fn should_print_function_declarations() {
            let function = o::fn_(
                vec![o::FnParam::new("rf"), o::FnParam::new("ctx")],
                vec![o::variable("ctx").to_return_stmt()],
                Some("Cmp_Template".to_string()),
            );
            let o::Expression::Fn(function) = function else { panic!("expected function") };
            let stmt = function.to_declare_fn("Cmp_Template");
            assert_eq!(emit_stmts(&[stmt]), "function Cmp_Template(rf,ctx) {\n  return ctx;\n}");
        }
    }
}
