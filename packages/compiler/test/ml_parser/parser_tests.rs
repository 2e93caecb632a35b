/**
 * Markup Parser Tests
 *
 * Covers elements, attributes, text, comments and control-flow blocks, the
 * collected parse errors and whitespace removal.
 */

#[cfg(test)]
mod tests {
    use ngxc_compiler::ml_parser::{remove_whitespaces, Node, Parser, ParseTreeResult};

    fn parse(source: &str) -> ParseTreeResult {
        Parser::new().parse(source, "TestComp")
    }

    fn error_messages(result: &ParseTreeResult) -> Vec<String> {
        result.errors.iter().map(|e| e.msg.clone()).collect()
    }

    mod elements {
        use super::*;

        #[test]
        fn should_parse_elements_with_attributes_and_text() {
            let result = parse("<div class=\"a\" [title]=\"t\" (click)=\"go()\">hi</div>");
            assert!(result.errors.is_empty());
            let Node::Element(div) = &result.root_nodes[0] else { panic!("expected element") };
            assert_eq!(div.name, "div");
            let attrs: Vec<(&str, &str)> = div.attrs.iter().map(|a| (a.name.as_str(), a.value.as_str())).collect();
            assert_eq!(attrs, vec![("class", "a"), ("[title]", "t"), ("(click)", "go()")]);
            let Node::Text(text) = &div.children[0] else { panic!("expected text") };
            assert_eq!(text.value, "hi");
            assert!(div.end_source_span.is_some());
        }

        #[test]
        fn should_record_attribute_value_spans() {
            let result = parse("<p title=\"abc\"></p>");
            let Node::Element(p) = &result.root_nodes[0] else { panic!("expected element") };
            let span = p.attrs[0].value_span.as_ref().unwrap();
            assert_eq!(span.start.offset, 10);
            assert_eq!(span.text(), "abc");
        }

        #[test]
        fn should_keep_valueless_attributes() {
            let result = parse("<input disabled>");
            let Node::Element(input) = &result.root_nodes[0] else { panic!("expected element") };
            assert_eq!(input.attrs[0].name, "disabled");
            assert_eq!(input.attrs[0].value, "");
            assert!(input.attrs[0].value_span.is_none());
        }

        #[test]
        fn should_not_expect_children_for_void_elements() {
            let result = parse("<input value=\"x\"><br><span></span>");
            assert!(result.errors.is_empty());
            assert_eq!(result.root_nodes.len(), 3);
        }

        #[test]
        fn should_support_self_closing_elements() {
            let result = parse("<my-cmp/><p>x</p>");
            assert!(result.errors.is_empty());
            let Node::Element(cmp) = &result.root_nodes[0] else { panic!("expected element") };
            assert!(cmp.is_self_closing);
            assert!(cmp.children.is_empty());
        }

        #[test]
        fn should_decode_entities_in_text_and_attributes() {
            let result = parse("<p title=\"a &amp; b\">&lt;x&gt;</p>");
            let Node::Element(p) = &result.root_nodes[0] else { panic!("expected element") };
            assert_eq!(p.attrs[0].value, "a & b");
            let Node::Text(text) = &p.children[0] else { panic!("expected text") };
            assert_eq!(text.value, "<x>");
        }

        #[test]
        fn should_parse_comments() {
            let result = parse("<!-- note --><p></p>");
            let Node::Comment(comment) = &result.root_nodes[0] else { panic!("expected comment") };
            assert_eq!(comment.value, " note ");
        }
    }

    mod blocks {
        use super::*;

        #[test]
        fn should_parse_blocks_with_parameters() {
            let result = parse("@if (a; as b) {<p>x</p>} @else {y}");
            assert!(result.errors.is_empty());
            let Node::Block(if_block) = &result.root_nodes[0] else { panic!("expected block") };
            assert_eq!(if_block.name, "if");
            let params: Vec<&str> = if_block.parameters.iter().map(|p| p.expression.as_str()).collect();
            assert_eq!(params, vec!["a", "as b"]);
            let Node::Block(else_block) = &result.root_nodes[2] else { panic!("expected block") };
            assert_eq!(else_block.name, "else");
            assert!(else_block.parameters.is_empty());
        }

        #[test]
        fn should_normalize_multi_word_block_names() {
            let result = parse("@if (a) {x}@else  if (b) {y}");
            let Node::Block(block) = &result.root_nodes[1] else { panic!("expected block") };
            assert_eq!(block.name, "else if");
            assert_eq!(block.parameters[0].expression, "b");
        }

        #[test]
        fn should_keep_parentheses_inside_parameters() {
            let result = parse("@if (count() > (2)) {x}");
            let Node::Block(block) = &result.root_nodes[0] else { panic!("expected block") };
            assert_eq!(block.parameters[0].expression, "count() > (2)");
        }

        #[test]
        fn should_not_close_blocks_inside_interpolations() {
            let result = parse("@defer {{{ b }}}");
            assert!(result.errors.is_empty());
            let Node::Block(block) = &result.root_nodes[0] else { panic!("expected block") };
            let Node::Text(text) = &block.children[0] else { panic!("expected text") };
            assert_eq!(text.value, "{{ b }}");
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn should_report_mismatched_closing_tags() {
            let result = parse("<div><span></div>");
            let messages = error_messages(&result);
            assert_eq!(messages[0], "Unexpected closing tag \"div\"");
            assert!(messages.contains(&"Unclosed element \"span\"".to_string()));
        }

        #[test]
        fn should_report_stray_block_close() {
            let result = parse("<p>a</p>}");
            assert_eq!(error_messages(&result), vec!["Unexpected closing block"]);
        }

        #[test]
        fn should_report_unclosed_blocks() {
            let result = parse("@if (a) {<p></p>");
            assert_eq!(error_messages(&result), vec!["Unclosed block \"@if\""]);
            assert_eq!(result.root_nodes.len(), 1);
        }

        #[test]
        fn should_report_unterminated_attribute_values() {
            let result = parse("<p title=\"abc></p>");
            assert_eq!(error_messages(&result), vec!["Unterminated attribute value"]);
        }
    }

    mod whitespaces {
        use super::*;

        #[test]
        fn should_drop_blank_text_and_collapse_runs() {
            let result = parse("<p>  a   b  </p>\n  <pre>  x  </pre>");
            let nodes = remove_whitespaces(result.root_nodes);
            assert_eq!(nodes.len(), 2);
            let Node::Element(p) = &nodes[0] else { panic!("expected element") };
            let Node::Text(text) = &p.children[0] else { panic!("expected text") };
            assert_eq!(text.value, " a b ");
            let Node::Element(pre) = &nodes[1] else { panic!("expected element") };
            let Node::Text(text) = &pre.children[0] else { panic!("expected text") };
            assert_eq!(text.value, "  x  ");
        }
    }
}
