//! Render3 Template Transform
//!
//! Converts the markup tree into render3 nodes: attributes are split into
//! static attributes, property/style bindings and listeners, text is checked
//! for interpolations, and `@if` blocks absorb the `@else if` / `@else`
//! blocks that follow them.

use crate::ml_parser::ast as html;
use crate::parse_util::{ParseError, ParseSourceSpan};
use crate::render3::r3_ast as t;
use crate::template_parser::binding_parser::{BindingParser, BindingType};

const IF_BLOCK: &str = "if";
const ELSE_IF_BLOCK: &str = "else if";
const ELSE_BLOCK: &str = "else";
const DEFER_BLOCK: &str = "defer";

#[derive(Debug)]
pub struct Render3ParseResult {
    pub nodes: Vec<t::R3Node>,
    pub errors: Vec<ParseError>,
}

pub fn html_ast_to_render3_ast(html_nodes: &[html::Node], binding_parser: &BindingParser) -> Render3ParseResult {
    let mut transformer = HtmlAstToIvyAst {
        binding_parser,
        errors: Vec::new(),
    };
    let nodes = transformer.visit_siblings(html_nodes);
    Render3ParseResult {
        nodes,
        errors: transformer.errors,
    }
}

struct HtmlAstToIvyAst<'b> {
    binding_parser: &'b BindingParser,
    errors: Vec<ParseError>,
}

fn is_connected_block(node: &html::Node) -> bool {
    matches!(node, html::Node::Block(b) if b.name == ELSE_IF_BLOCK || b.name == ELSE_BLOCK)
}

fn is_skippable(node: &html::Node) -> bool {
    match node {
        html::Node::Comment(_) => true,
        html::Node::Text(text) => text.value.trim().is_empty(),
        _ => false,
    }
}

impl<'b> HtmlAstToIvyAst<'b> {
    fn report(&mut self, span: &ParseSourceSpan, msg: impl Into<String>) {
        self.errors.push(ParseError::new(span.clone(), msg));
    }

    fn visit_siblings(&mut self, nodes: &[html::Node]) -> Vec<t::R3Node> {
        let mut result = Vec::new();
        let mut index = 0;
        while index < nodes.len() {
            match &nodes[index] {
                html::Node::Block(block) if block.name == IF_BLOCK => {
                    let (if_block, consumed) = self.create_if_block(block, &nodes[index + 1..]);
                    result.extend(if_block.map(t::R3Node::IfBlock));
                    index += 1 + consumed;
                    continue;
                }
                html::Node::Block(block) if block.name == ELSE_IF_BLOCK || block.name == ELSE_BLOCK => {
                    self.report(
                        &block.source_span,
                        format!("@{} block can only be used after an @if or @else if block.", block.name),
                    );
                }
                html::Node::Block(block) if block.name == DEFER_BLOCK => {
                    let children = self.visit_siblings(&block.children);
                    result.push(t::R3Node::DeferredBlock(t::DeferredBlock {
                        children,
                        source_span: block.source_span.clone(),
                    }));
                }
                html::Node::Block(block) => {
                    self.report(&block.source_span, format!("Unrecognized block @{}.", block.name));
                }
                html::Node::Element(element) => {
                    if let Some(element) = self.visit_element(element) {
                        result.push(t::R3Node::Element(element));
                    }
                }
                html::Node::Text(text) => {
                    if let Some(node) = self.visit_text(text) {
                        result.push(node);
                    }
                }
                html::Node::Comment(_) => {}
            }
            index += 1;
        }
        result
    }

    /// Builds an `@if` block from `main` and the connected blocks in
    /// `following`. Returns the number of following nodes consumed.
    fn create_if_block(&mut self, main: &html::Block, following: &[html::Node]) -> (Option<t::IfBlock>, usize) {
        let mut branches = Vec::new();
        let mut valid = true;

        match self.parse_branch_condition(main) {
            Some(expression) => branches.push(t::IfBlockBranch {
                expression: Some(expression),
                children: self.visit_siblings(&main.children),
                source_span: main.source_span.clone(),
            }),
            None => valid = false,
        }

        let mut consumed = 0;
        let mut has_else = false;
        for (i, node) in following.iter().enumerate() {
            if is_skippable(node) {
                continue;
            }
            if !is_connected_block(node) {
                break;
            }
            let html::Node::Block(block) = node else {
                break;
            };
            consumed = i + 1;

            if has_else {
                let msg = if block.name == ELSE_BLOCK {
                    "Conditional can only have one @else block"
                } else {
                    "@else block must be last inside the conditional"
                };
                self.report(&block.source_span, msg);
                valid = false;
                continue;
            }

            if block.name == ELSE_BLOCK {
                has_else = true;
                if !block.parameters.is_empty() {
                    self.report(&block.source_span, "@else block cannot have parameters");
                    valid = false;
                    continue;
                }
                branches.push(t::IfBlockBranch {
                    expression: None,
                    children: self.visit_siblings(&block.children),
                    source_span: block.source_span.clone(),
                });
            } else {
                match self.parse_branch_condition(block) {
                    Some(expression) => branches.push(t::IfBlockBranch {
                        expression: Some(expression),
                        children: self.visit_siblings(&block.children),
                        source_span: block.source_span.clone(),
                    }),
                    None => valid = false,
                }
            }
        }

        if !valid {
            return (None, consumed);
        }
        let end_span = match following[..consumed].last() {
            Some(last) => last.source_span().clone(),
            None => main.source_span.clone(),
        };
        let source_span = ParseSourceSpan::new(main.source_span.start.clone(), end_span.end);
        (Some(t::IfBlock { branches, source_span }), consumed)
    }

    fn parse_branch_condition(&mut self, block: &html::Block) -> Option<crate::expression_parser::AST> {
        match block.parameters.as_slice() {
            [] => {
                self.report(&block.source_span, "Conditional block does not have an expression");
                None
            }
            [condition] => match self.binding_parser.parse_binding(&condition.expression, &condition.source_span) {
                Ok(expression) => Some(expression),
                Err(err) => {
                    self.errors.push(err);
                    None
                }
            },
            [_, extra, ..] => {
                self.report(
                    &extra.source_span,
                    format!("Unrecognized conditional parameter \"{}\"", extra.expression),
                );
                None
            }
        }
    }

    fn visit_element(&mut self, element: &html::Element) -> Option<t::Element> {
        let mut attributes = Vec::new();
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        let mut valid = true;

        for attr in &element.attrs {
            let value_span = attr.value_span.clone().unwrap_or_else(|| attr.source_span.clone());

            if let Some(event) = attr.name.strip_prefix('(').and_then(|n| n.strip_suffix(')')) {
                match self.binding_parser.parse_event(&attr.value, &value_span) {
                    Ok(handler) => outputs.push(t::BoundEvent {
                        name: event.to_string(),
                        handler,
                        source_span: attr.source_span.clone(),
                    }),
                    Err(err) => {
                        self.errors.push(err);
                        valid = false;
                    }
                }
                continue;
            }

            if let Some(property) = attr.name.strip_prefix('[').and_then(|n| n.strip_suffix(']')) {
                let bound = self
                    .binding_parser
                    .parse_property_binding(property, &attr.source_span)
                    .and_then(|target| {
                        let value = self.binding_parser.parse_binding(&attr.value, &value_span)?;
                        Ok(t::BoundAttribute {
                            name: target.name,
                            type_: target.type_,
                            value,
                            unit: target.unit,
                            source_span: attr.source_span.clone(),
                        })
                    });
                match bound {
                    Ok(input) => inputs.push(input),
                    Err(err) => {
                        self.errors.push(err);
                        valid = false;
                    }
                }
                continue;
            }

            match self.binding_parser.parse_interpolation(&attr.value, &value_span) {
                Ok(None) => attributes.push(t::TextAttribute {
                    name: attr.name.clone(),
                    value: attr.value.clone(),
                    source_span: attr.source_span.clone(),
                }),
                Ok(Some(mut interpolation)) => {
                    let whole_value = interpolation.expressions.len() == 1
                        && interpolation.strings.iter().all(|s| s.is_empty());
                    if whole_value {
                        inputs.push(t::BoundAttribute {
                            name: attr.name.clone(),
                            type_: BindingType::Property,
                            value: interpolation.expressions.remove(0),
                            unit: None,
                            source_span: attr.source_span.clone(),
                        });
                    } else {
                        self.report(
                            &attr.source_span,
                            format!("Interpolation in attribute \"{}\" must span the whole value", attr.name),
                        );
                        valid = false;
                    }
                }
                Err(err) => {
                    self.errors.push(err);
                    valid = false;
                }
            }
        }

        let children = self.visit_siblings(&element.children);
        valid.then(|| t::Element {
            name: element.name.clone(),
            attributes,
            inputs,
            outputs,
            children,
            source_span: element.source_span.clone(),
        })
    }

    fn visit_text(&mut self, text: &html::Text) -> Option<t::R3Node> {
        match self.binding_parser.parse_interpolation(&text.value, &text.source_span) {
            Ok(Some(value)) => Some(t::R3Node::BoundText(t::BoundText {
                value,
                source_span: text.source_span.clone(),
            })),
            Ok(None) => Some(t::R3Node::Text(t::Text {
                value: text.value.clone(),
                source_span: text.source_span.clone(),
            })),
            Err(err) => {
                self.errors.push(err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression_parser::{Parser as ExprParser, DEFAULT_INTERPOLATION_CONFIG};
    use crate::ml_parser::{remove_whitespaces, Parser};

    fn transform(template: &str) -> Render3ParseResult {
        let parsed = Parser::new().parse(template, "t");
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let binding_parser = BindingParser::new(ExprParser::new(), DEFAULT_INTERPOLATION_CONFIG);
        html_ast_to_render3_ast(&remove_whitespaces(parsed.root_nodes), &binding_parser)
    }

    #[test]
    fn should_classify_attributes() {
        let result = transform(r#"<button id="b" (click)="inc()" [style.fontSize]="size">+</button>"#);
        assert!(result.errors.is_empty());
        let t::R3Node::Element(button) = &result.nodes[0] else { panic!("expected element") };
        assert_eq!(button.attributes.len(), 1);
        assert_eq!(button.outputs[0].name, "click");
        assert_eq!(button.inputs[0].name, "fontSize");
        assert_eq!(button.inputs[0].type_, BindingType::Style);
    }

    #[test]
    fn should_connect_else_branches() {
        let result = transform("@if (a) {<p>a</p>} @else if (b) {<p>b</p>} @else {<p>c</p>}");
        assert!(result.errors.is_empty());
        assert_eq!(result.nodes.len(), 1);
        let t::R3Node::IfBlock(block) = &result.nodes[0] else { panic!("expected if block") };
        assert_eq!(block.branches.len(), 3);
        assert!(block.branches[2].expression.is_none());
    }

    #[test]
    fn should_reject_orphan_else() {
        let result = transform("<p></p>@else {<p>c</p>}");
        assert_eq!(
            result.errors[0].msg,
            "@else block can only be used after an @if or @else if block."
        );
    }

    #[test]
    fn should_reject_unknown_blocks() {
        let result = transform("@for (x of xs) {<p></p>}");
        assert_eq!(result.errors[0].msg, "Unrecognized block @for.");
    }

    #[test]
    fn should_bind_whole_value_interpolations_as_properties() {
        let result = transform("<input value={{name}}>");
        let t::R3Node::Element(input) = &result.nodes[0] else { panic!("expected element") };
        assert_eq!(input.inputs[0].name, "value");
        assert_eq!(input.inputs[0].type_, BindingType::Property);
    }
}
