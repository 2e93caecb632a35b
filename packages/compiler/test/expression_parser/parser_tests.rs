/**
 * Expression Parser Tests
 *
 * Parses binding and action expressions and prints them back through a
 * small unparser to check structure and precedence.
 */

#[cfg(test)]
mod tests {
    use ngxc_compiler::expression_parser::{
        LiteralPrimitive, ParseSpan, Parser, DEFAULT_INTERPOLATION_CONFIG, AST,
    };

    fn unparse(ast: &AST) -> String {
        match ast {
            AST::EmptyExpr(_) | AST::ImplicitReceiver(_) => String::new(),
            AST::PropertyRead(read) => match read.receiver.as_ref() {
                AST::ImplicitReceiver(_) => read.name.clone(),
                receiver => format!("{}.{}", unparse(receiver), read.name),
            },
            AST::KeyedRead(read) => format!("{}[{}]", unparse(&read.receiver), unparse(&read.key)),
            AST::Call(call) => {
                let args: Vec<String> = call.args.iter().map(unparse).collect();
                format!("{}({})", unparse(&call.receiver), args.join(", "))
            }
            AST::LiteralPrimitive(LiteralPrimitive::String(value), _) => format!("\"{}\"", value),
            AST::LiteralPrimitive(LiteralPrimitive::Number(value), _) => value.to_string(),
            AST::LiteralPrimitive(LiteralPrimitive::Boolean(value), _) => value.to_string(),
            AST::LiteralPrimitive(LiteralPrimitive::Null, _) => "null".to_string(),
            AST::LiteralPrimitive(LiteralPrimitive::Undefined, _) => "undefined".to_string(),
            AST::LiteralArray(array) => {
                let items: Vec<String> = array.expressions.iter().map(unparse).collect();
                format!("[{}]", items.join(", "))
            }
            AST::Binary(binary) => format!(
                "{} {} {}",
                unparse(&binary.left),
                binary.operation,
                unparse(&binary.right)
            ),
            AST::PrefixNot(not) => format!("!{}", unparse(&not.expression)),
            AST::Unary(unary) => format!("{}{}", unary.operator, unparse(&unary.expr)),
            AST::Conditional(cond) => format!(
                "{} ? {} : {}",
                unparse(&cond.condition),
                unparse(&cond.true_exp),
                unparse(&cond.false_exp)
            ),
            AST::ParenthesizedExpression(parens) => format!("({})", unparse(&parens.expression)),
        }
    }

    fn check_binding(input: &str, expected: &str) {
        let ast = Parser::new().parse_binding(input, 0).unwrap();
        assert_eq!(unparse(&ast), expected);
    }

    fn binding_error(input: &str) -> String {
        Parser::new().parse_binding(input, 0).unwrap_err().message
    }

    mod bindings {
        use super::*;

        #[test]
        fn should_parse_property_reads_and_calls() {
            check_binding("a", "a");
            check_binding("a.b.c", "a.b.c");
            check_binding("count()", "count()");
            check_binding("user.greet(name, 1)", "user.greet(name, 1)");
            check_binding("items[0]", "items[0]");
        }

        #[test]
        fn should_parse_literals() {
            check_binding("'hello'", "\"hello\"");
            check_binding("1.5", "1.5");
            check_binding("true", "true");
            check_binding("null", "null");
            check_binding("undefined", "undefined");
            check_binding("[1, a]", "[1, a]");
        }

        #[test]
        fn should_parse_operators_with_precedence() {
            let ast = Parser::new().parse_binding("a || b && c", 0).unwrap();
            let AST::Binary(or) = ast else { panic!("expected binary") };
            assert_eq!(or.operation, "||");
            let AST::Binary(and) = *or.right else { panic!("expected binary") };
            assert_eq!(and.operation, "&&");
        }

        #[test]
        fn should_be_left_associative() {
            let ast = Parser::new().parse_binding("a - b - c", 0).unwrap();
            let AST::Binary(outer) = ast else { panic!("expected binary") };
            assert_eq!(unparse(&outer.left), "a - b");
            assert_eq!(unparse(&outer.right), "c");
        }

        #[test]
        fn should_parse_prefix_operators() {
            check_binding("!open", "!open");
            check_binding("-x", "-x");
            check_binding("!!open", "!!open");
        }

        #[test]
        fn should_parse_conditionals_and_parens() {
            check_binding("count() > 2 ? 'big' : 'small'", "count() > 2 ? \"big\" : \"small\"");
            check_binding("(a + b) * c", "(a + b) * c");
        }

        #[test]
        fn should_treat_this_as_implicit_receiver() {
            let ast = Parser::new().parse_binding("this", 0).unwrap();
            assert!(ast.is_implicit_receiver());
        }

        #[test]
        fn should_parse_empty_input_as_empty_expr() {
            let ast = Parser::new().parse_binding("", 5).unwrap();
            assert_eq!(ast, AST::EmptyExpr(ParseSpan::new(5, 5)));
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn should_reject_pipes() {
            assert!(binding_error("a | upper").starts_with("Pipes are not supported"));
        }

        #[test]
        fn should_reject_assignments() {
            assert!(binding_error("a = 1").starts_with("Assignments are not supported"));
        }

        #[test]
        fn should_reject_safe_navigation() {
            assert!(binding_error("a?.b").starts_with("Safe navigation is not supported"));
        }

        #[test]
        fn should_reject_object_literals() {
            assert!(binding_error("{a: 1}").starts_with("Object literals are not supported"));
        }

        #[test]
        fn should_reject_chains_in_bindings() {
            assert!(binding_error("a; b").starts_with("Binding expression cannot contain chained expression"));
        }

        #[test]
        fn should_reject_chains_in_actions() {
            let err = Parser::new().parse_action("a(); b()", 0).unwrap_err();
            assert!(err
                .message
                .starts_with("Multiple statements in an event handler are not supported"));
        }

        #[test]
        fn should_accept_a_trailing_semicolon_in_actions() {
            let ast = Parser::new().parse_action("close();", 0).unwrap();
            assert_eq!(unparse(&ast), "close()");
        }
    }

    mod interpolation {
        use super::*;

        #[test]
        fn should_return_none_without_markers() {
            let result = Parser::new()
                .parse_interpolation("plain text", 0, &DEFAULT_INTERPOLATION_CONFIG)
                .unwrap();
            assert!(result.is_none());
        }

        #[test]
        fn should_parse_strings_and_expressions() {
            let result = Parser::new()
                .parse_interpolation("Count: {{count()}} of {{ total }}", 0, &DEFAULT_INTERPOLATION_CONFIG)
                .unwrap()
                .unwrap();
            assert_eq!(result.strings, vec!["Count: ", " of ", ""]);
            let expressions: Vec<String> = result.expressions.iter().map(unparse).collect();
            assert_eq!(expressions, vec!["count()", "total"]);
        }

        #[test]
        fn should_offset_expression_spans() {
            let result = Parser::new()
                .parse_interpolation("{{a}}", 100, &DEFAULT_INTERPOLATION_CONFIG)
                .unwrap()
                .unwrap();
            assert_eq!(result.expressions[0].span(), ParseSpan::new(102, 103));
        }

        #[test]
        fn should_ignore_end_markers_inside_quotes() {
            let parts = Parser::new().split_interpolation("{{ '}}' }}", 0, &DEFAULT_INTERPOLATION_CONFIG);
            assert_eq!(parts.expressions.len(), 1);
            assert_eq!(parts.expressions[0].text, " '}}' ");
        }
    }
}
