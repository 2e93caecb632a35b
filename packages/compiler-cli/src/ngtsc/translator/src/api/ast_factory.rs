use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableDeclarationType {
    Const,
    Let,
    Var,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    And,
    Greater,
    GreaterEquals,
    BitAnd,
    BitOr,
    Divide,
    Equals,
    IdentityEquals,
    Less,
    LessEquals,
    Minus,
    Modulo,
    Multiply,
    NotEquals,
    IdentityNotEquals,
    Or,
    Plus,
    NullishCoalesce,
}

pub struct ObjectLiteralProperty<TExpression> {
    pub property_name: String,
    pub value: TExpression,
    pub quoted: bool,
}

pub struct TemplateLiteral<TExpression> {
    pub elements: Vec<TemplateElement>,
    pub expressions: Vec<TExpression>,
}

pub struct TemplateElement {
    pub raw: String,
    pub cooked: String,
}

impl TemplateElement {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            raw: escape_for_template_literal(&text),
            cooked: text,
        }
    }
}

/// Escapes the characters that would otherwise end or interpolate inside a
/// template literal.
fn escape_for_template_literal(text: &str) -> String {
    let mut raw = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => raw.push_str("\\\\"),
            '`' => raw.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => raw.push_str("\\$"),
            _ => raw.push(c),
        }
    }
    raw
}

pub enum ArrowFunctionBody<S, E> {
    Stmts(Vec<S>),
    Expr(E),
}

pub enum LiteralValue<'v> {
    String(&'v str),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
}

/// Builds host-language nodes for the expression translator.
///
/// Every IR node kind maps onto exactly one of these calls. Fallible methods
/// reject inputs the host AST cannot represent.
pub trait AstFactory {
    type Statement;
    type Expression;

    fn create_array_literal(&self, elements: Vec<Self::Expression>) -> Self::Expression;

    /// `target = value`, where `target` must be an identifier or a member access.
    fn create_assignment(&self, target: Self::Expression, value: Self::Expression) -> Result<Self::Expression>;

    fn create_binary_expression(
        &self,
        left_operand: Self::Expression,
        operator: BinaryOperator,
        right_operand: Self::Expression,
    ) -> Self::Expression;

    fn create_block(&self, body: Vec<Self::Statement>) -> Self::Statement;

    fn create_call_expression(&self, callee: Self::Expression, args: Vec<Self::Expression>, pure: bool) -> Self::Expression;

    fn create_comma_expression(&self, parts: Vec<Self::Expression>) -> Self::Expression;

    fn create_conditional(
        &self,
        condition: Self::Expression,
        then_expression: Self::Expression,
        else_expression: Self::Expression,
    ) -> Self::Expression;

    fn create_element_access(&self, expression: Self::Expression, element: Self::Expression) -> Self::Expression;

    fn create_expression_statement(&self, expression: Self::Expression) -> Self::Statement;

    fn create_function_declaration(
        &self,
        function_name: &str,
        parameters: &[String],
        body: Vec<Self::Statement>,
    ) -> Self::Statement;

    fn create_function_expression(
        &self,
        function_name: Option<&str>,
        parameters: &[String],
        body: Vec<Self::Statement>,
    ) -> Self::Expression;

    fn create_arrow_function_expression(
        &self,
        parameters: &[String],
        body: ArrowFunctionBody<Self::Statement, Self::Expression>,
    ) -> Self::Expression;

    fn create_identifier(&self, name: &str) -> Self::Expression;

    fn create_if_statement(
        &self,
        condition: Self::Expression,
        then_statement: Self::Statement,
        else_statement: Option<Self::Statement>,
    ) -> Self::Statement;

    fn create_literal(&self, value: LiteralValue) -> Result<Self::Expression>;

    fn create_new_expression(&self, expression: Self::Expression, args: Vec<Self::Expression>) -> Self::Expression;

    fn create_object_literal(&self, properties: Vec<ObjectLiteralProperty<Self::Expression>>) -> Self::Expression;

    fn create_parenthesized_expression(&self, expression: Self::Expression) -> Self::Expression;

    fn create_property_access(&self, expression: Self::Expression, property_name: &str) -> Self::Expression;

    fn create_return_statement(&self, expression: Option<Self::Expression>) -> Self::Statement;

    fn create_tagged_template(&self, tag: Self::Expression, template: TemplateLiteral<Self::Expression>) -> Self::Expression;

    fn create_template_literal(&self, template: TemplateLiteral<Self::Expression>) -> Self::Expression;

    fn create_throw_statement(&self, expression: Self::Expression) -> Self::Statement;

    fn create_type_of_expression(&self, expression: Self::Expression) -> Self::Expression;

    fn create_unary_expression(&self, operator: UnaryOperator, operand: Self::Expression) -> Self::Expression;

    fn create_variable_declaration(
        &self,
        variable_name: &str,
        initializer: Option<Self::Expression>,
        type_: VariableDeclarationType,
    ) -> Self::Statement;
}
