//! Expression AST
//!
//! Binding expressions as parsed from attribute values and interpolations.
//! Spans are absolute offsets into the template source.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseSpan {
    pub start: usize,
    pub end: usize,
}

impl ParseSpan {
    pub fn new(start: usize, end: usize) -> Self {
        ParseSpan { start, end }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralPrimitive {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AST {
    EmptyExpr(ParseSpan),
    /// The component instance every unqualified name is read from.
    ImplicitReceiver(ParseSpan),
    PropertyRead(PropertyRead),
    KeyedRead(KeyedRead),
    Call(Call),
    LiteralPrimitive(LiteralPrimitive, ParseSpan),
    LiteralArray(LiteralArray),
    Binary(Binary),
    PrefixNot(PrefixNot),
    Unary(Unary),
    Conditional(Conditional),
    ParenthesizedExpression(ParenthesizedExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRead {
    pub receiver: Box<AST>,
    pub name: String,
    pub span: ParseSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRead {
    pub receiver: Box<AST>,
    pub key: Box<AST>,
    pub span: ParseSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub receiver: Box<AST>,
    pub args: Vec<AST>,
    pub span: ParseSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralArray {
    pub expressions: Vec<AST>,
    pub span: ParseSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub operation: String,
    pub left: Box<AST>,
    pub right: Box<AST>,
    pub span: ParseSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixNot {
    pub expression: Box<AST>,
    pub span: ParseSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: char,
    pub expr: Box<AST>,
    pub span: ParseSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub condition: Box<AST>,
    pub true_exp: Box<AST>,
    pub false_exp: Box<AST>,
    pub span: ParseSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenthesizedExpression {
    pub expression: Box<AST>,
    pub span: ParseSpan,
}

/// Text with embedded expressions: `strings.len() == expressions.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    pub strings: Vec<String>,
    pub expressions: Vec<AST>,
    pub span: ParseSpan,
}

impl AST {
    pub fn span(&self) -> ParseSpan {
        match self {
            AST::EmptyExpr(span) | AST::ImplicitReceiver(span) | AST::LiteralPrimitive(_, span) => *span,
            AST::PropertyRead(e) => e.span,
            AST::KeyedRead(e) => e.span,
            AST::Call(e) => e.span,
            AST::LiteralArray(e) => e.span,
            AST::Binary(e) => e.span,
            AST::PrefixNot(e) => e.span,
            AST::Unary(e) => e.span,
            AST::Conditional(e) => e.span,
            AST::ParenthesizedExpression(e) => e.span,
        }
    }

    pub fn is_implicit_receiver(&self) -> bool {
        matches!(self, AST::ImplicitReceiver(_))
    }
}
