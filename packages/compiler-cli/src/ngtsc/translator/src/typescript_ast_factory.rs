use oxc_allocator::{Box, Vec};
use oxc_ast::ast::{
    Argument, ArrayExpressionElement, AssignmentTarget, BindingPattern, Expression, FormalParameterKind,
    FormalParameters, Function, FunctionBody, FunctionType, ObjectPropertyKind, PropertyKey, PropertyKind, Statement,
    TemplateElementValue, VariableDeclarationKind,
};
use oxc_ast::{AstBuilder, NONE};
use oxc_span::SPAN;
use oxc_syntax::operator::{
    AssignmentOperator, BinaryOperator as OxcBinaryOperator, LogicalOperator, UnaryOperator as OxcUnaryOperator,
};

use crate::error::{Result, TransformError};
use crate::ngtsc::translator::src::api::ast_factory::{
    ArrowFunctionBody, AstFactory, BinaryOperator, LiteralValue, ObjectLiteralProperty, TemplateLiteral,
    UnaryOperator, VariableDeclarationType,
};
use crate::ngtsc::translator::src::ts_util::ts_numeric_expression;

/// `AstFactory` producing oxc nodes allocated in the builder's arena.
#[derive(Clone, Copy)]
pub struct TypeScriptAstFactory<'a> {
    builder: AstBuilder<'a>,
}

impl<'a> TypeScriptAstFactory<'a> {
    pub fn new(builder: AstBuilder<'a>) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> AstBuilder<'a> {
        self.builder
    }

    fn map_binary_operator(&self, op: BinaryOperator) -> OxcBinaryOperator {
        match op {
            BinaryOperator::BitAnd => OxcBinaryOperator::BitwiseAnd,
            BinaryOperator::BitOr => OxcBinaryOperator::BitwiseOR,
            BinaryOperator::Divide => OxcBinaryOperator::Division,
            BinaryOperator::Equals => OxcBinaryOperator::Equality,
            BinaryOperator::IdentityEquals => OxcBinaryOperator::StrictEquality,
            BinaryOperator::Greater => OxcBinaryOperator::GreaterThan,
            BinaryOperator::GreaterEquals => OxcBinaryOperator::GreaterEqualThan,
            BinaryOperator::Less => OxcBinaryOperator::LessThan,
            BinaryOperator::LessEquals => OxcBinaryOperator::LessEqualThan,
            BinaryOperator::Minus => OxcBinaryOperator::Subtraction,
            BinaryOperator::Modulo => OxcBinaryOperator::Remainder,
            BinaryOperator::Multiply => OxcBinaryOperator::Multiplication,
            BinaryOperator::NotEquals => OxcBinaryOperator::Inequality,
            BinaryOperator::IdentityNotEquals => OxcBinaryOperator::StrictInequality,
            BinaryOperator::Plus => OxcBinaryOperator::Addition,
            BinaryOperator::And | BinaryOperator::Or | BinaryOperator::NullishCoalesce => {
                unreachable!("logical operators are built as LogicalExpression")
            }
        }
    }

    fn map_logical_operator(&self, op: BinaryOperator) -> Option<LogicalOperator> {
        match op {
            BinaryOperator::And => Some(LogicalOperator::And),
            BinaryOperator::Or => Some(LogicalOperator::Or),
            BinaryOperator::NullishCoalesce => Some(LogicalOperator::Coalesce),
            _ => None,
        }
    }

    fn binding_pattern(&self, name: &str) -> BindingPattern<'a> {
        let kind = self.builder.binding_pattern_kind_binding_identifier(SPAN, self.builder.atom(name));
        self.builder.binding_pattern(kind, NONE, false)
    }

    fn formal_parameters(&self, parameters: &[String]) -> Box<'a, FormalParameters<'a>> {
        let items = Vec::from_iter_in(
            parameters.iter().map(|name| {
                self.builder
                    .formal_parameter(SPAN, self.builder.vec(), self.binding_pattern(name), None, false, false)
            }),
            self.builder.allocator,
        );
        self.builder
            .alloc_formal_parameters(SPAN, FormalParameterKind::FormalParameter, items, NONE)
    }

    fn function_body(&self, body: std::vec::Vec<Statement<'a>>) -> Box<'a, FunctionBody<'a>> {
        self.builder
            .alloc_function_body(SPAN, self.builder.vec(), Vec::from_iter_in(body, self.builder.allocator))
    }

    fn function(
        &self,
        function_type: FunctionType,
        name: Option<&str>,
        parameters: Box<'a, FormalParameters<'a>>,
        body: std::vec::Vec<Statement<'a>>,
    ) -> Box<'a, Function<'a>> {
        let id = name.map(|name| self.builder.binding_identifier(SPAN, self.builder.atom(name)));
        self.builder.alloc_function(
            SPAN,
            function_type,
            id,
            false,
            false,
            false,
            NONE,
            NONE,
            parameters,
            NONE,
            Some(self.function_body(body)),
        )
    }

    fn arrow(
        &self,
        parameters: Box<'a, FormalParameters<'a>>,
        body: ArrowFunctionBody<Statement<'a>, Expression<'a>>,
    ) -> Expression<'a> {
        let (is_expression, statements) = match body {
            ArrowFunctionBody::Expr(expression) => (true, vec![self.create_expression_statement(expression)]),
            ArrowFunctionBody::Stmts(statements) => (false, statements),
        };
        Expression::ArrowFunctionExpression(self.builder.alloc_arrow_function_expression(
            SPAN,
            is_expression,
            false,
            NONE,
            parameters,
            NONE,
            self.function_body(statements),
        ))
    }

    fn property_key(&self, name: &str, quoted: bool) -> PropertyKey<'a> {
        if quoted {
            PropertyKey::StringLiteral(self.builder.alloc(self.builder.string_literal(
                SPAN,
                self.builder.atom(name),
                None,
            )))
        } else {
            self.builder.property_key_static_identifier(SPAN, self.builder.atom(name))
        }
    }

    /// An arrow function reusing parameters taken from existing source, such
    /// as a component's destructured inputs.
    pub fn create_arrow_function_with_parameters(
        &self,
        parameters: Box<'a, FormalParameters<'a>>,
        body: ArrowFunctionBody<Statement<'a>, Expression<'a>>,
    ) -> Expression<'a> {
        self.arrow(parameters, body)
    }

    /// An object literal whose trailing entry spreads `spread`.
    pub fn create_object_literal_with_spread(
        &self,
        properties: std::vec::Vec<ObjectLiteralProperty<Expression<'a>>>,
        spread: Expression<'a>,
    ) -> Expression<'a> {
        let mut props = self.object_properties(properties);
        props.push(self.builder.object_property_kind_spread_property(SPAN, spread));
        self.builder.expression_object(SPAN, props)
    }

    pub fn create_this_expression(&self) -> Expression<'a> {
        self.builder.expression_this(SPAN)
    }

    fn object_properties(
        &self,
        properties: std::vec::Vec<ObjectLiteralProperty<Expression<'a>>>,
    ) -> Vec<'a, ObjectPropertyKind<'a>> {
        Vec::from_iter_in(
            properties.into_iter().map(|p| {
                self.builder.object_property_kind_object_property(
                    SPAN,
                    PropertyKind::Init,
                    self.property_key(&p.property_name, p.quoted),
                    p.value,
                    false,
                    false,
                    false,
                )
            }),
            self.builder.allocator,
        )
    }

    fn template_literal(&self, template: TemplateLiteral<Expression<'a>>) -> oxc_ast::ast::TemplateLiteral<'a> {
        let count = template.elements.len();
        let quasis = Vec::from_iter_in(
            template.elements.into_iter().enumerate().map(|(i, element)| {
                let value = TemplateElementValue {
                    raw: self.builder.atom(&element.raw),
                    cooked: Some(self.builder.atom(&element.cooked)),
                };
                self.builder.template_element(SPAN, value, i + 1 == count)
            }),
            self.builder.allocator,
        );
        let expressions = Vec::from_iter_in(template.expressions, self.builder.allocator);
        self.builder.template_literal(SPAN, quasis, expressions)
    }
}

impl<'a> AstFactory for TypeScriptAstFactory<'a> {
    type Statement = Statement<'a>;
    type Expression = Expression<'a>;

    fn create_array_literal(&self, elements: std::vec::Vec<Self::Expression>) -> Self::Expression {
        let elements = Vec::from_iter_in(
            elements.into_iter().map(ArrayExpressionElement::from),
            self.builder.allocator,
        );
        self.builder.expression_array(SPAN, elements)
    }

    fn create_assignment(&self, target: Self::Expression, value: Self::Expression) -> Result<Self::Expression> {
        let target = match target {
            Expression::Identifier(id) => AssignmentTarget::AssignmentTargetIdentifier(id),
            Expression::StaticMemberExpression(e) => AssignmentTarget::StaticMemberExpression(e),
            Expression::ComputedMemberExpression(e) => AssignmentTarget::ComputedMemberExpression(e),
            _ => {
                return Err(TransformError::UnsupportedNode {
                    kind: "assignment to a non-reference expression".to_string(),
                })
            }
        };
        Ok(self
            .builder
            .expression_assignment(SPAN, AssignmentOperator::Assign, target, value))
    }

    fn create_binary_expression(
        &self,
        left_operand: Self::Expression,
        operator: BinaryOperator,
        right_operand: Self::Expression,
    ) -> Self::Expression {
        match self.map_logical_operator(operator) {
            Some(op) => self.builder.expression_logical(SPAN, left_operand, op, right_operand),
            None => {
                let op = self.map_binary_operator(operator);
                self.builder.expression_binary(SPAN, left_operand, op, right_operand)
            }
        }
    }

    fn create_block(&self, body: std::vec::Vec<Self::Statement>) -> Self::Statement {
        self.builder
            .statement_block(SPAN, Vec::from_iter_in(body, self.builder.allocator))
    }

    fn create_call_expression(
        &self,
        callee: Self::Expression,
        args: std::vec::Vec<Self::Expression>,
        _pure: bool,
    ) -> Self::Expression {
        let args = Vec::from_iter_in(args.into_iter().map(Argument::from), self.builder.allocator);
        self.builder.expression_call(SPAN, callee, NONE, args, false)
    }

    fn create_comma_expression(&self, parts: std::vec::Vec<Self::Expression>) -> Self::Expression {
        self.builder
            .expression_sequence(SPAN, Vec::from_iter_in(parts, self.builder.allocator))
    }

    fn create_conditional(
        &self,
        condition: Self::Expression,
        then_expression: Self::Expression,
        else_expression: Self::Expression,
    ) -> Self::Expression {
        self.builder
            .expression_conditional(SPAN, condition, then_expression, else_expression)
    }

    fn create_element_access(&self, expression: Self::Expression, element: Self::Expression) -> Self::Expression {
        self.builder
            .member_expression_computed(SPAN, expression, element, false)
            .into()
    }

    fn create_expression_statement(&self, expression: Self::Expression) -> Self::Statement {
        self.builder.statement_expression(SPAN, expression)
    }

    fn create_function_declaration(
        &self,
        function_name: &str,
        parameters: &[String],
        body: std::vec::Vec<Self::Statement>,
    ) -> Self::Statement {
        let params = self.formal_parameters(parameters);
        Statement::FunctionDeclaration(self.function(
            FunctionType::FunctionDeclaration,
            Some(function_name),
            params,
            body,
        ))
    }

    fn create_function_expression(
        &self,
        function_name: Option<&str>,
        parameters: &[String],
        body: std::vec::Vec<Self::Statement>,
    ) -> Self::Expression {
        let params = self.formal_parameters(parameters);
        Expression::FunctionExpression(self.function(FunctionType::FunctionExpression, function_name, params, body))
    }

    fn create_arrow_function_expression(
        &self,
        parameters: &[String],
        body: ArrowFunctionBody<Self::Statement, Self::Expression>,
    ) -> Self::Expression {
        self.arrow(self.formal_parameters(parameters), body)
    }

    fn create_identifier(&self, name: &str) -> Self::Expression {
        self.builder.expression_identifier(SPAN, self.builder.atom(name))
    }

    fn create_if_statement(
        &self,
        condition: Self::Expression,
        then_statement: Self::Statement,
        else_statement: Option<Self::Statement>,
    ) -> Self::Statement {
        self.builder
            .statement_if(SPAN, condition, then_statement, else_statement)
    }

    fn create_literal(&self, value: LiteralValue) -> Result<Self::Expression> {
        Ok(match value {
            LiteralValue::String(s) => self
                .builder
                .expression_string_literal(SPAN, self.builder.atom(s), None),
            LiteralValue::Number(n) => ts_numeric_expression(&self.builder, n)?,
            LiteralValue::Boolean(b) => self.builder.expression_boolean_literal(SPAN, b),
            LiteralValue::Null => self.builder.expression_null_literal(SPAN),
            LiteralValue::Undefined => self.create_identifier("undefined"),
        })
    }

    fn create_new_expression(&self, expression: Self::Expression, args: std::vec::Vec<Self::Expression>) -> Self::Expression {
        let args = Vec::from_iter_in(args.into_iter().map(Argument::from), self.builder.allocator);
        self.builder.expression_new(SPAN, expression, NONE, args)
    }

    fn create_object_literal(&self, properties: std::vec::Vec<ObjectLiteralProperty<Self::Expression>>) -> Self::Expression {
        let props = self.object_properties(properties);
        self.builder.expression_object(SPAN, props)
    }

    fn create_parenthesized_expression(&self, expression: Self::Expression) -> Self::Expression {
        self.builder.expression_parenthesized(SPAN, expression)
    }

    fn create_property_access(&self, expression: Self::Expression, property_name: &str) -> Self::Expression {
        self.builder
            .member_expression_static(
                SPAN,
                expression,
                self.builder.identifier_name(SPAN, self.builder.atom(property_name)),
                false,
            )
            .into()
    }

    fn create_return_statement(&self, expression: Option<Self::Expression>) -> Self::Statement {
        self.builder.statement_return(SPAN, expression)
    }

    fn create_tagged_template(&self, tag: Self::Expression, template: TemplateLiteral<Self::Expression>) -> Self::Expression {
        let quasi = self.template_literal(template);
        self.builder.expression_tagged_template(SPAN, tag, NONE, quasi)
    }

    fn create_template_literal(&self, template: TemplateLiteral<Self::Expression>) -> Self::Expression {
        Expression::TemplateLiteral(self.builder.alloc(self.template_literal(template)))
    }

    fn create_throw_statement(&self, expression: Self::Expression) -> Self::Statement {
        self.builder.statement_throw(SPAN, expression)
    }

    fn create_type_of_expression(&self, expression: Self::Expression) -> Self::Expression {
        self.builder
            .expression_unary(SPAN, OxcUnaryOperator::Typeof, expression)
    }

    fn create_unary_expression(&self, operator: UnaryOperator, operand: Self::Expression) -> Self::Expression {
        let op = match operator {
            UnaryOperator::Plus => OxcUnaryOperator::UnaryPlus,
            UnaryOperator::Minus => OxcUnaryOperator::UnaryNegation,
            UnaryOperator::Not => OxcUnaryOperator::LogicalNot,
        };
        self.builder.expression_unary(SPAN, op, operand)
    }

    fn create_variable_declaration(
        &self,
        variable_name: &str,
        initializer: Option<Self::Expression>,
        type_: VariableDeclarationType,
    ) -> Self::Statement {
        let kind = match type_ {
            VariableDeclarationType::Const => VariableDeclarationKind::Const,
            VariableDeclarationType::Let => VariableDeclarationKind::Let,
            VariableDeclarationType::Var => VariableDeclarationKind::Var,
        };
        let declarator = self
            .builder
            .variable_declarator(SPAN, kind, self.binding_pattern(variable_name), initializer, false);
        Statement::VariableDeclaration(self.builder.alloc_variable_declaration(
            SPAN,
            kind,
            self.builder.vec1(declarator),
            false,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_codegen::Codegen;

    fn print_statement<'a>(allocator: &'a Allocator, statement: Statement<'a>) -> String {
        let mut program = oxc_parser::Parser::new(allocator, "", oxc_span::SourceType::mjs())
            .parse()
            .program;
        program.body.push(statement);
        Codegen::new().build(&program).code
    }

    #[test]
    fn should_build_logical_operators_as_logical_expressions() {
        let allocator = Allocator::default();
        let factory = TypeScriptAstFactory::new(AstBuilder::new(&allocator));
        let expr = factory.create_binary_expression(
            factory.create_identifier("a"),
            BinaryOperator::NullishCoalesce,
            factory.create_identifier("b"),
        );
        assert!(matches!(expr, Expression::LogicalExpression(_)));
    }

    #[test]
    fn should_reject_assignment_to_a_call() {
        let allocator = Allocator::default();
        let factory = TypeScriptAstFactory::new(AstBuilder::new(&allocator));
        let callee = factory.create_call_expression(factory.create_identifier("f"), vec![], false);
        let err = factory
            .create_assignment(callee, factory.create_identifier("x"))
            .unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedNode { .. }));
    }

    #[test]
    fn should_print_function_declarations() {
        let allocator = Allocator::default();
        let factory = TypeScriptAstFactory::new(AstBuilder::new(&allocator));
        let body = vec![factory.create_return_statement(Some(factory.create_identifier("ctx")))];
        let stmt = factory.create_function_declaration("Cmp_Template", &["rf".to_string(), "ctx".to_string()], body);
        let code = print_statement(&allocator, stmt);
        assert!(code.contains("function Cmp_Template(rf, ctx)"), "{}", code);
        assert!(code.contains("return ctx;"), "{}", code);
    }

    #[test]
    fn should_print_var_declarations() {
        let allocator = Allocator::default();
        let factory = TypeScriptAstFactory::new(AstBuilder::new(&allocator));
        let init = factory.create_call_expression(factory.create_identifier("ɵɵgetCurrentView"), vec![], false);
        let stmt = factory.create_variable_declaration("_r1", Some(init), VariableDeclarationType::Var);
        assert_eq!(print_statement(&allocator, stmt).trim(), "var _r1 = ɵɵgetCurrentView();");
    }
}
