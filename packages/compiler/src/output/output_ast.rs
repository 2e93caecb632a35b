//! Output AST Module
//!
//! The expression/statement intermediate representation produced by the component
//! compiler and consumed by the emitters. The node sets are closed: every consumer
//! handles each kind explicitly through [`ExpressionVisitor`] and [`StatementVisitor`].

use bitflags::bitflags;

use crate::parse_util::ParseSourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Minus,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Equals,
    NotEquals,
    Identical,
    NotIdentical,
    Minus,
    Plus,
    Divide,
    Multiply,
    Modulo,
    And,
    Or,
    BitwiseOr,
    BitwiseAnd,
    Lower,
    LowerEquals,
    Bigger,
    BiggerEquals,
    NullishCoalesce,
    Exponentiation,
    In,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StmtModifier: u8 {
        const FINAL = 1 << 0;
        const PRIVATE = 1 << 1;
        const EXPORTED = 1 << 2;
        const STATIC = 1 << 3;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Undefined,
    String(String),
    Number(f64),
    Bool(bool),
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::String(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<usize> for LiteralValue {
    fn from(value: usize) -> Self {
        LiteralValue::Number(value as f64)
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        LiteralValue::Number(f64::from(value))
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Bool(value)
    }
}

/// A symbol exported by another module, e.g. `ɵɵelementStart` from `@angular/core`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalReference {
    pub module_name: Option<String>,
    pub name: Option<String>,
}

/// Host-language node carried through the IR untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrappedNode {
    /// Reference to a declaration of the host file by name.
    Identifier(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnParam {
    pub name: String,
}

impl FnParam {
    pub fn new(name: impl Into<String>) -> Self {
        FnParam { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    ReadVar(ReadVarExpr),
    WriteVar(WriteVarExpr),
    WriteKey(WriteKeyExpr),
    WriteProp(WritePropExpr),
    InvokeFn(InvokeFunctionExpr),
    TaggedTemplate(TaggedTemplateLiteralExpr),
    Instantiate(InstantiateExpr),
    Literal(LiteralExpr),
    Localized(LocalizedString),
    External(ExternalExpr),
    Conditional(ConditionalExpr),
    NotExpr(NotExpr),
    Fn(FunctionExpr),
    ArrowFn(ArrowFunctionExpr),
    BinaryOp(BinaryOperatorExpr),
    Unary(UnaryOperatorExpr),
    ReadProp(ReadPropExpr),
    ReadKey(ReadKeyExpr),
    LiteralArray(LiteralArrayExpr),
    LiteralMap(LiteralMapExpr),
    CommaExpr(CommaExpr),
    WrappedNode(WrappedNodeExpr),
    Parens(ParenthesizedExpr),
    TypeOf(TypeofExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadVarExpr {
    pub name: String,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteVarExpr {
    pub name: String,
    pub value: Box<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteKeyExpr {
    pub receiver: Box<Expression>,
    pub index: Box<Expression>,
    pub value: Box<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WritePropExpr {
    pub receiver: Box<Expression>,
    pub name: String,
    pub value: Box<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvokeFunctionExpr {
    pub fn_: Box<Expression>,
    pub args: Vec<Expression>,
    pub pure: bool,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLiteralElement {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLiteral {
    pub elements: Vec<TemplateLiteralElement>,
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedTemplateLiteralExpr {
    pub tag: Box<Expression>,
    pub template: TemplateLiteral,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstantiateExpr {
    pub class_expr: Box<Expression>,
    pub args: Vec<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: LiteralValue,
    pub source_span: Option<ParseSourceSpan>,
}

/// A `$localize` message: `message_parts.len() == expressions.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedString {
    pub message_parts: Vec<String>,
    pub placeholder_names: Vec<String>,
    pub expressions: Vec<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

impl LocalizedString {
    /// Raw text of the `i`th template part, with its placeholder marker when it has one.
    pub fn serialize_part(&self, i: usize) -> String {
        let text = self.message_parts.get(i).cloned().unwrap_or_default();
        match i.checked_sub(1).and_then(|p| self.placeholder_names.get(p)) {
            Some(name) => format!(":{}:{}", name, text),
            None => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalExpr {
    pub value: ExternalReference,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub condition: Box<Expression>,
    pub true_case: Box<Expression>,
    pub false_case: Option<Box<Expression>>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotExpr {
    pub condition: Box<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub params: Vec<FnParam>,
    pub statements: Vec<Statement>,
    pub name: Option<String>,
    pub source_span: Option<ParseSourceSpan>,
}

impl FunctionExpr {
    /// Turn a named function expression into a declaration statement.
    pub fn to_declare_fn(self, name: impl Into<String>) -> Statement {
        Statement::DeclareFn(DeclareFunctionStmt {
            name: name.into(),
            params: self.params,
            statements: self.statements,
            modifiers: StmtModifier::FINAL,
            source_span: self.source_span,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowFunctionBody {
    Expression(Box<Expression>),
    Statements(Vec<Statement>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunctionExpr {
    pub params: Vec<FnParam>,
    pub body: ArrowFunctionBody,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperatorExpr {
    pub operator: BinaryOperator,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
    pub parens: bool,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperatorExpr {
    pub operator: UnaryOperator,
    pub expr: Box<Expression>,
    pub parens: bool,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadPropExpr {
    pub receiver: Box<Expression>,
    pub name: String,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadKeyExpr {
    pub receiver: Box<Expression>,
    pub index: Box<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralArrayExpr {
    pub entries: Vec<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralMapEntry {
    pub key: String,
    pub value: Box<Expression>,
    pub quoted: bool,
}

impl LiteralMapEntry {
    pub fn new(key: impl Into<String>, value: Expression, quoted: bool) -> Self {
        LiteralMapEntry {
            key: key.into(),
            value: Box::new(value),
            quoted,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralMapExpr {
    pub entries: Vec<LiteralMapEntry>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommaExpr {
    pub parts: Vec<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WrappedNodeExpr {
    pub node: WrappedNode,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenthesizedExpr {
    pub expr: Box<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeofExpr {
    pub expr: Box<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    DeclareVar(DeclareVarStmt),
    DeclareFn(DeclareFunctionStmt),
    Expression(ExpressionStatement),
    Return(ReturnStatement),
    IfStmt(IfStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclareVarStmt {
    pub name: String,
    pub value: Option<Box<Expression>>,
    pub modifiers: StmtModifier,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclareFunctionStmt {
    pub name: String,
    pub params: Vec<FnParam>,
    pub statements: Vec<Statement>,
    pub modifiers: StmtModifier,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expr: Box<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Box<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Box<Expression>,
    pub true_case: Vec<Statement>,
    pub false_case: Vec<Statement>,
    pub source_span: Option<ParseSourceSpan>,
}

/// Traversal contract over every expression kind.
///
/// Implemented once for printing source text and once for building host-language
/// AST nodes; `C` is the per-traversal context each realization threads through.
pub trait ExpressionVisitor<C> {
    type Output;
    type Error;

    fn visit_read_var_expr(&mut self, expr: &ReadVarExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_write_var_expr(&mut self, expr: &WriteVarExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_write_key_expr(&mut self, expr: &WriteKeyExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_write_prop_expr(&mut self, expr: &WritePropExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_invoke_function_expr(&mut self, expr: &InvokeFunctionExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_tagged_template_expr(&mut self, expr: &TaggedTemplateLiteralExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_instantiate_expr(&mut self, expr: &InstantiateExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_literal_expr(&mut self, expr: &LiteralExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_localized_string(&mut self, expr: &LocalizedString, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_external_expr(&mut self, expr: &ExternalExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_conditional_expr(&mut self, expr: &ConditionalExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_not_expr(&mut self, expr: &NotExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_function_expr(&mut self, expr: &FunctionExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_arrow_function_expr(&mut self, expr: &ArrowFunctionExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_binary_operator_expr(&mut self, expr: &BinaryOperatorExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_unary_operator_expr(&mut self, expr: &UnaryOperatorExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_read_prop_expr(&mut self, expr: &ReadPropExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_read_key_expr(&mut self, expr: &ReadKeyExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_literal_array_expr(&mut self, expr: &LiteralArrayExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_literal_map_expr(&mut self, expr: &LiteralMapExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_comma_expr(&mut self, expr: &CommaExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_wrapped_node_expr(&mut self, expr: &WrappedNodeExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_parenthesized_expr(&mut self, expr: &ParenthesizedExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_typeof_expr(&mut self, expr: &TypeofExpr, context: &mut C) -> Result<Self::Output, Self::Error>;
}

pub trait StatementVisitor<C> {
    type Output;
    type Error;

    fn visit_declare_var_stmt(&mut self, stmt: &DeclareVarStmt, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_declare_function_stmt(&mut self, stmt: &DeclareFunctionStmt, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_expression_stmt(&mut self, stmt: &ExpressionStatement, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_return_stmt(&mut self, stmt: &ReturnStatement, context: &mut C) -> Result<Self::Output, Self::Error>;
    fn visit_if_stmt(&mut self, stmt: &IfStmt, context: &mut C) -> Result<Self::Output, Self::Error>;
}

impl Expression {
    pub fn visit_expression<C, V: ExpressionVisitor<C> + ?Sized>(
        &self,
        visitor: &mut V,
        context: &mut C,
    ) -> Result<V::Output, V::Error> {
        match self {
            Expression::ReadVar(e) => visitor.visit_read_var_expr(e, context),
            Expression::WriteVar(e) => visitor.visit_write_var_expr(e, context),
            Expression::WriteKey(e) => visitor.visit_write_key_expr(e, context),
            Expression::WriteProp(e) => visitor.visit_write_prop_expr(e, context),
            Expression::InvokeFn(e) => visitor.visit_invoke_function_expr(e, context),
            Expression::TaggedTemplate(e) => visitor.visit_tagged_template_expr(e, context),
            Expression::Instantiate(e) => visitor.visit_instantiate_expr(e, context),
            Expression::Literal(e) => visitor.visit_literal_expr(e, context),
            Expression::Localized(e) => visitor.visit_localized_string(e, context),
            Expression::External(e) => visitor.visit_external_expr(e, context),
            Expression::Conditional(e) => visitor.visit_conditional_expr(e, context),
            Expression::NotExpr(e) => visitor.visit_not_expr(e, context),
            Expression::Fn(e) => visitor.visit_function_expr(e, context),
            Expression::ArrowFn(e) => visitor.visit_arrow_function_expr(e, context),
            Expression::BinaryOp(e) => visitor.visit_binary_operator_expr(e, context),
            Expression::Unary(e) => visitor.visit_unary_operator_expr(e, context),
            Expression::ReadProp(e) => visitor.visit_read_prop_expr(e, context),
            Expression::ReadKey(e) => visitor.visit_read_key_expr(e, context),
            Expression::LiteralArray(e) => visitor.visit_literal_array_expr(e, context),
            Expression::LiteralMap(e) => visitor.visit_literal_map_expr(e, context),
            Expression::CommaExpr(e) => visitor.visit_comma_expr(e, context),
            Expression::WrappedNode(e) => visitor.visit_wrapped_node_expr(e, context),
            Expression::Parens(e) => visitor.visit_parenthesized_expr(e, context),
            Expression::TypeOf(e) => visitor.visit_typeof_expr(e, context),
        }
    }

    pub fn prop(self, name: impl Into<String>) -> Expression {
        Expression::ReadProp(ReadPropExpr {
            receiver: Box::new(self),
            name: name.into(),
            source_span: None,
        })
    }

    pub fn key(self, index: Expression) -> Expression {
        Expression::ReadKey(ReadKeyExpr {
            receiver: Box::new(self),
            index: Box::new(index),
            source_span: None,
        })
    }

    pub fn call_fn(self, args: Vec<Expression>) -> Expression {
        Expression::InvokeFn(InvokeFunctionExpr {
            fn_: Box::new(self),
            args,
            pure: false,
            source_span: None,
        })
    }

    pub fn instantiate(self, args: Vec<Expression>) -> Expression {
        Expression::Instantiate(InstantiateExpr {
            class_expr: Box::new(self),
            args,
            source_span: None,
        })
    }

    pub fn conditional(self, true_case: Expression, false_case: Option<Expression>) -> Expression {
        Expression::Conditional(ConditionalExpr {
            condition: Box::new(self),
            true_case: Box::new(true_case),
            false_case: false_case.map(Box::new),
            source_span: None,
        })
    }

    pub fn binary(self, operator: BinaryOperator, rhs: Expression) -> Expression {
        Expression::BinaryOp(BinaryOperatorExpr {
            operator,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
            parens: false,
            source_span: None,
        })
    }

    pub fn bitwise_and(self, rhs: Expression) -> Expression {
        self.binary(BinaryOperator::BitwiseAnd, rhs)
    }

    pub fn or(self, rhs: Expression) -> Expression {
        self.binary(BinaryOperator::Or, rhs)
    }

    pub fn set_prop(self, name: impl Into<String>, value: Expression) -> Expression {
        Expression::WriteProp(WritePropExpr {
            receiver: Box::new(self),
            name: name.into(),
            value: Box::new(value),
            source_span: None,
        })
    }

    pub fn with_source_span(mut self, span: Option<ParseSourceSpan>) -> Expression {
        match &mut self {
            Expression::ReadVar(e) => e.source_span = span,
            Expression::ReadProp(e) => e.source_span = span,
            Expression::ReadKey(e) => e.source_span = span,
            Expression::InvokeFn(e) => e.source_span = span,
            Expression::Literal(e) => e.source_span = span,
            Expression::BinaryOp(e) => e.source_span = span,
            Expression::Conditional(e) => e.source_span = span,
            _ => {}
        }
        self
    }

    pub fn to_stmt(self) -> Statement {
        Statement::Expression(ExpressionStatement {
            expr: Box::new(self),
            source_span: None,
        })
    }

    pub fn to_return_stmt(self) -> Statement {
        Statement::Return(ReturnStatement {
            value: Box::new(self),
            source_span: None,
        })
    }

    pub fn is_literal_map(&self) -> bool {
        matches!(self, Expression::LiteralMap(_))
    }

    pub fn is_function_literal(&self) -> bool {
        matches!(self, Expression::Fn(_) | Expression::ArrowFn(_))
    }
}

impl Statement {
    pub fn visit_statement<C, V: StatementVisitor<C> + ?Sized>(
        &self,
        visitor: &mut V,
        context: &mut C,
    ) -> Result<V::Output, V::Error> {
        match self {
            Statement::DeclareVar(s) => visitor.visit_declare_var_stmt(s, context),
            Statement::DeclareFn(s) => visitor.visit_declare_function_stmt(s, context),
            Statement::Expression(s) => visitor.visit_expression_stmt(s, context),
            Statement::Return(s) => visitor.visit_return_stmt(s, context),
            Statement::IfStmt(s) => visitor.visit_if_stmt(s, context),
        }
    }
}

pub fn variable(name: impl Into<String>) -> Expression {
    Expression::ReadVar(ReadVarExpr {
        name: name.into(),
        source_span: None,
    })
}

pub fn literal(value: impl Into<LiteralValue>) -> Expression {
    Expression::Literal(LiteralExpr {
        value: value.into(),
        source_span: None,
    })
}

pub fn null_expr() -> Expression {
    literal(LiteralValue::Null)
}

pub fn literal_arr(entries: Vec<Expression>) -> Expression {
    Expression::LiteralArray(LiteralArrayExpr {
        entries,
        source_span: None,
    })
}

pub fn literal_map(entries: Vec<LiteralMapEntry>) -> Expression {
    Expression::LiteralMap(LiteralMapExpr {
        entries,
        source_span: None,
    })
}

pub fn import_ref(value: ExternalReference) -> Expression {
    Expression::External(ExternalExpr {
        value,
        source_span: None,
    })
}

pub fn wrapped_identifier(name: impl Into<String>) -> Expression {
    Expression::WrappedNode(WrappedNodeExpr {
        node: WrappedNode::Identifier(name.into()),
        source_span: None,
    })
}

pub fn not(condition: Expression) -> Expression {
    Expression::NotExpr(NotExpr {
        condition: Box::new(condition),
        source_span: None,
    })
}

pub fn unary(operator: UnaryOperator, expr: Expression) -> Expression {
    Expression::Unary(UnaryOperatorExpr {
        operator,
        expr: Box::new(expr),
        parens: false,
        source_span: None,
    })
}

pub fn fn_(params: Vec<FnParam>, statements: Vec<Statement>, name: Option<String>) -> Expression {
    Expression::Fn(FunctionExpr {
        params,
        statements,
        name,
        source_span: None,
    })
}

pub fn arrow_fn(params: Vec<FnParam>, body: ArrowFunctionBody) -> Expression {
    Expression::ArrowFn(ArrowFunctionExpr {
        params,
        body,
        source_span: None,
    })
}

pub fn declare_var(name: impl Into<String>, value: Option<Expression>) -> Statement {
    Statement::DeclareVar(DeclareVarStmt {
        name: name.into(),
        value: value.map(Box::new),
        modifiers: StmtModifier::empty(),
        source_span: None,
    })
}

pub fn if_stmt(condition: Expression, true_case: Vec<Statement>, false_case: Vec<Statement>) -> Statement {
    Statement::IfStmt(IfStmt {
        condition: Box::new(condition),
        true_case,
        false_case,
        source_span: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_property_writes() {
        let write = variable("a").set_prop("b", literal(1));
        match write {
            Expression::WriteProp(w) => {
                assert_eq!(w.name, "b");
                assert_eq!(*w.value, literal(1));
            }
            other => panic!("expected a property write, got {:?}", other),
        }
    }

    #[test]
    fn should_compare_structurally() {
        let a = literal_arr(vec![literal("disabled"), literal("")]);
        let b = literal_arr(vec![literal("disabled"), literal("")]);
        assert_eq!(a, b);
        assert_ne!(a, literal_arr(vec![literal("disabled")]));
    }

    #[test]
    fn should_serialize_localized_parts_with_placeholders() {
        let msg = LocalizedString {
            message_parts: vec!["Hello ".into(), "!".into()],
            placeholder_names: vec!["INTERPOLATION".into()],
            expressions: vec![variable("name")],
            source_span: None,
        };
        assert_eq!(msg.serialize_part(0), "Hello ");
        assert_eq!(msg.serialize_part(1), ":INTERPOLATION:!");
    }
}
