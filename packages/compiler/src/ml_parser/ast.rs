//! ML Parser AST
//!
//! Markup node tree produced by the HTML-like parser. Spans index into the
//! template text handed to the parser.

use smallvec::SmallVec;

use crate::parse_util::ParseSourceSpan;

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(Text),
    Comment(Comment),
    Block(Block),
}

impl Node {
    pub fn source_span(&self) -> &ParseSourceSpan {
        match self {
            Node::Element(e) => &e.source_span,
            Node::Text(t) => &t.source_span,
            Node::Comment(c) => &c.source_span,
            Node::Block(b) => &b.source_span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Text {
    pub value: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
    /// Span of the raw value between the quotes, if a value was given.
    pub value_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    pub is_self_closing: bool,
    pub source_span: ParseSourceSpan,
    pub start_source_span: ParseSourceSpan,
    pub end_source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub value: String,
    pub source_span: ParseSourceSpan,
}

/// Control-flow block (`@if (cond) { ... }`)
#[derive(Debug, Clone)]
pub struct Block {
    pub name: String,
    pub parameters: SmallVec<[BlockParameter; 2]>,
    pub children: Vec<Node>,
    pub source_span: ParseSourceSpan,
    pub name_span: ParseSourceSpan,
}

#[derive(Debug, Clone)]
pub struct BlockParameter {
    pub expression: String,
    pub source_span: ParseSourceSpan,
}

impl BlockParameter {
    pub fn new(expression: String, source_span: ParseSourceSpan) -> Self {
        BlockParameter {
            expression,
            source_span,
        }
    }
}
