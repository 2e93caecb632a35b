//! Render3 AST
//!
//! Template nodes after markup has been classified into elements, bound
//! attributes, listeners and control-flow blocks.

use crate::expression_parser::ast::{Interpolation, AST as ExprAST};
use crate::parse_util::ParseSourceSpan;
use crate::template_parser::binding_parser::BindingType;

#[derive(Debug, Clone)]
pub struct Text {
    pub value: String,
    pub source_span: ParseSourceSpan,
}

/// Text with at least one interpolation
#[derive(Debug, Clone)]
pub struct BoundText {
    pub value: Interpolation,
    pub source_span: ParseSourceSpan,
}

/// Static attribute
#[derive(Debug, Clone)]
pub struct TextAttribute {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone)]
pub struct BoundAttribute {
    pub name: String,
    pub type_: BindingType,
    pub value: ExprAST,
    pub unit: Option<String>,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone)]
pub struct BoundEvent {
    pub name: String,
    pub handler: ExprAST,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<TextAttribute>,
    pub inputs: Vec<BoundAttribute>,
    pub outputs: Vec<BoundEvent>,
    pub children: Vec<R3Node>,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone)]
pub struct IfBlock {
    pub branches: Vec<IfBlockBranch>,
    pub source_span: ParseSourceSpan,
}

/// One `@if` / `@else if` / `@else` branch. `@else` has no expression.
#[derive(Debug, Clone)]
pub struct IfBlockBranch {
    pub expression: Option<ExprAST>,
    pub children: Vec<R3Node>,
    pub source_span: ParseSourceSpan,
}

/// `@defer` block, always triggered on idle
#[derive(Debug, Clone)]
pub struct DeferredBlock {
    pub children: Vec<R3Node>,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone)]
pub enum R3Node {
    Text(Text),
    BoundText(BoundText),
    Element(Element),
    IfBlock(IfBlock),
    DeferredBlock(DeferredBlock),
}

impl R3Node {
    pub fn source_span(&self) -> &ParseSourceSpan {
        match self {
            R3Node::Text(n) => &n.source_span,
            R3Node::BoundText(n) => &n.source_span,
            R3Node::Element(n) => &n.source_span,
            R3Node::IfBlock(n) => &n.source_span,
            R3Node::DeferredBlock(n) => &n.source_span,
        }
    }

    pub fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        match self {
            R3Node::Text(n) => visitor.visit_text(n),
            R3Node::BoundText(n) => visitor.visit_bound_text(n),
            R3Node::Element(n) => visitor.visit_element(n),
            R3Node::IfBlock(n) => visitor.visit_if_block(n),
            R3Node::DeferredBlock(n) => visitor.visit_deferred_block(n),
        }
    }
}

/// Visitor trait for R3 AST. Visitors may keep references to the nodes
/// they are handed for as long as the tree lives.
pub trait Visitor<'a> {
    type Result;

    fn visit_element(&mut self, element: &'a Element) -> Self::Result;
    fn visit_text(&mut self, text: &'a Text) -> Self::Result;
    fn visit_bound_text(&mut self, text: &'a BoundText) -> Self::Result;
    fn visit_if_block(&mut self, block: &'a IfBlock) -> Self::Result;
    fn visit_deferred_block(&mut self, block: &'a DeferredBlock) -> Self::Result;
}

/// Visit all nodes in a list
pub fn visit_all<'a, V: Visitor<'a>>(visitor: &mut V, nodes: &'a [R3Node]) -> Vec<V::Result> {
    nodes.iter().map(|node| node.visit(visitor)).collect()
}
