//! Render3 Template Parser
//!
//! Entry point that turns template text into render3 nodes.

use crate::expression_parser::parser::{InterpolationConfig, Parser};
use crate::ml_parser::{remove_whitespaces, Parser as HtmlParser};
use crate::parse_util::ParseError;
use crate::render3::r3_ast as t;
use crate::render3::r3_template_transform::html_ast_to_render3_ast;
use crate::template_parser::binding_parser::BindingParser;

pub use crate::expression_parser::parser::DEFAULT_INTERPOLATION_CONFIG;

/// Options that can be used to modify how a template is parsed.
#[derive(Debug, Clone, Default)]
pub struct ParseTemplateOptions {
    /// Include whitespace nodes in the parsed output.
    pub preserve_whitespaces: bool,
    pub interpolation: Option<InterpolationConfig>,
}

/// Information about the template which was extracted during parsing.
#[derive(Debug, Clone, Default)]
pub struct ParsedTemplate {
    /// Any errors from parsing the template.
    pub errors: Option<Vec<ParseError>>,
    /// The template AST, parsed from the template.
    pub nodes: Vec<t::R3Node>,
}

/// Parse a template into render3 `Node`s.
pub fn parse_template(template: &str, template_url: &str, options: ParseTemplateOptions) -> ParsedTemplate {
    let parse_result = HtmlParser::new().parse(template, template_url);

    let mut html_nodes = parse_result.root_nodes;
    if !options.preserve_whitespaces {
        html_nodes = remove_whitespaces(html_nodes);
    }

    let binding_parser = make_binding_parser(options.interpolation.unwrap_or(DEFAULT_INTERPOLATION_CONFIG));
    let r3_result = html_ast_to_render3_ast(&html_nodes, &binding_parser);

    let mut errors = parse_result.errors;
    errors.extend(r3_result.errors);

    ParsedTemplate {
        errors: if errors.is_empty() { None } else { Some(errors) },
        nodes: r3_result.nodes,
    }
}

/// Construct a `BindingParser` with a default configuration.
pub fn make_binding_parser(interpolation_config: InterpolationConfig) -> BindingParser {
    BindingParser::new(Parser::new(), interpolation_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_collect_markup_and_binding_errors() {
        let parsed = parse_template("<p>{{a +}}</p><div>", "t", ParseTemplateOptions::default());
        let errors = parsed.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].msg, "Unclosed element \"div\"");
        assert!(errors[1].msg.starts_with("Parser Error:"));
    }

    #[test]
    fn should_parse_clean_templates_without_errors() {
        let parsed = parse_template("Hello", "t", ParseTemplateOptions::default());
        assert!(parsed.errors.is_none());
        assert_eq!(parsed.nodes.len(), 1);
    }
}
