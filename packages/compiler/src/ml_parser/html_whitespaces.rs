//! HTML Whitespace Processing
//!
//! Walks the parse tree and:
//! - drops text nodes consisting of whitespace characters only;
//! - replaces consecutive whitespace characters in other text nodes with one space.
//!
//! Content of `pre` and `textarea` elements is kept verbatim.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ml_parser::ast::*;

static SKIP_WS_TRIM_TAGS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["pre", "textarea", "script", "style"].into_iter().collect());

// Equivalent to \s with \u00a0 (non-breaking space) excluded.
const WS_CHARS: &str = " \u{000C}\n\r\t\u{000B}\u{1680}\u{180E}\u{2000}\u{2001}\u{2002}\u{2003}\u{2004}\u{2005}\u{2006}\u{2007}\u{2008}\u{2009}\u{200A}\u{2028}\u{2029}\u{202F}\u{205F}\u{3000}\u{FEFF}";

static NO_WS_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("[^{}]", regex::escape(WS_CHARS))).unwrap());

static WS_REPLACE_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("[{}]{{2,}}", regex::escape(WS_CHARS))).unwrap());

pub fn remove_whitespaces(nodes: Vec<Node>) -> Vec<Node> {
    nodes.into_iter().filter_map(visit_node).collect()
}

fn visit_node(node: Node) -> Option<Node> {
    match node {
        Node::Text(mut text) => {
            if !NO_WS_REGEXP.is_match(&text.value) {
                return None;
            }
            text.value = WS_REPLACE_REGEXP.replace_all(&text.value, " ").into_owned();
            Some(Node::Text(text))
        }
        Node::Element(mut element) => {
            if !SKIP_WS_TRIM_TAGS.contains(element.name.to_lowercase().as_str()) {
                element.children = remove_whitespaces(element.children);
            }
            Some(Node::Element(element))
        }
        Node::Block(mut block) => {
            block.children = remove_whitespaces(block.children);
            Some(Node::Block(block))
        }
        Node::Comment(_) => Some(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml_parser::parser::Parser;

    fn texts(nodes: &[Node]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(t.value.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn should_drop_blank_text_and_collapse_runs() {
        let parsed = Parser::new().parse("\n  <p>a</p>\n  Count:   {{n}}\n  ", "t");
        let nodes = remove_whitespaces(parsed.root_nodes);
        assert_eq!(nodes.len(), 2);
        assert_eq!(texts(&nodes), vec![" Count: {{n}} ".to_string()]);
    }

    #[test]
    fn should_keep_pre_content() {
        let parsed = Parser::new().parse("<pre>  a  </pre>", "t");
        let nodes = remove_whitespaces(parsed.root_nodes);
        let Node::Element(pre) = &nodes[0] else { panic!("expected element") };
        assert_eq!(texts(&pre.children), vec!["  a  ".to_string()]);
    }
}
