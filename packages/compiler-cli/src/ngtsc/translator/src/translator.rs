use ngxc_compiler::output::output_ast as o;

use crate::error::{Result, TransformError};
use crate::ngtsc::translator::src::api::ast_factory::{
    ArrowFunctionBody, AstFactory, BinaryOperator, LiteralValue, ObjectLiteralProperty, TemplateElement,
    TemplateLiteral, UnaryOperator, VariableDeclarationType,
};
use crate::ngtsc::translator::src::api::import_generator::{ImportGenerator, ImportRequest};
use crate::ngtsc::translator::src::context::Context;

#[derive(Debug, Clone, Copy, Default)]
pub struct TranslatorOptions {
    /// Emit every variable declaration as `var`.
    pub downlevel_variable_declarations: bool,
}

/// Build-mode realization of the IR visitors: each node kind becomes exactly
/// one `AstFactory` call.
pub struct ExpressionTranslatorVisitor<'f, A: AstFactory, TFile> {
    factory: &'f A,
    imports: &'f mut dyn ImportGenerator<TFile, A::Expression>,
    context_file: TFile,
    downlevel_variable_declarations: bool,
}

impl<'f, A: AstFactory, TFile: Clone> ExpressionTranslatorVisitor<'f, A, TFile> {
    pub fn new(
        factory: &'f A,
        imports: &'f mut dyn ImportGenerator<TFile, A::Expression>,
        context_file: TFile,
        options: TranslatorOptions,
    ) -> Self {
        Self {
            factory,
            imports,
            context_file,
            downlevel_variable_declarations: options.downlevel_variable_declarations,
        }
    }

    pub fn translate_expression(&mut self, expression: &o::Expression) -> Result<A::Expression> {
        expression.visit_expression(self, &mut Context::new(false))
    }

    pub fn translate_statement(&mut self, statement: &o::Statement) -> Result<A::Statement> {
        statement.visit_statement(self, &mut Context::new(true))
    }

    pub fn translate_statements(&mut self, statements: &[o::Statement]) -> Result<Vec<A::Statement>> {
        statements.iter().map(|s| self.translate_statement(s)).collect()
    }

    fn visit_expr(&mut self, expression: &o::Expression, context: &Context) -> Result<A::Expression> {
        expression.visit_expression(self, &mut context.with_expression_mode())
    }

    fn visit_exprs(&mut self, expressions: &[o::Expression], context: &Context) -> Result<Vec<A::Expression>> {
        expressions.iter().map(|e| self.visit_expr(e, context)).collect()
    }

    fn visit_statements(&mut self, statements: &[o::Statement], context: &Context) -> Result<Vec<A::Statement>> {
        let mut context = context.with_statement_mode();
        statements
            .iter()
            .map(|s| s.visit_statement(self, &mut context))
            .collect()
    }

    fn param_names(params: &[o::FnParam]) -> Vec<String> {
        params.iter().map(|p| p.name.clone()).collect()
    }

    fn maybe_parenthesize(&self, expression: A::Expression, parens: bool) -> A::Expression {
        if parens {
            self.factory.create_parenthesized_expression(expression)
        } else {
            expression
        }
    }

    fn template_literal(&mut self, parts: Vec<String>, expressions: &[o::Expression], context: &Context) -> Result<TemplateLiteral<A::Expression>> {
        Ok(TemplateLiteral {
            elements: parts.into_iter().map(TemplateElement::new).collect(),
            expressions: self.visit_exprs(expressions, context)?,
        })
    }
}

impl<'f, A: AstFactory, TFile: Clone> o::StatementVisitor<Context> for ExpressionTranslatorVisitor<'f, A, TFile> {
    type Output = A::Statement;
    type Error = TransformError;

    fn visit_declare_var_stmt(&mut self, stmt: &o::DeclareVarStmt, context: &mut Context) -> Result<A::Statement> {
        let var_type = if self.downlevel_variable_declarations {
            VariableDeclarationType::Var
        } else if stmt.modifiers.contains(o::StmtModifier::FINAL) {
            VariableDeclarationType::Const
        } else {
            VariableDeclarationType::Let
        };
        let initializer = match &stmt.value {
            Some(value) => Some(self.visit_expr(value, context)?),
            None => None,
        };
        Ok(self
            .factory
            .create_variable_declaration(&stmt.name, initializer, var_type))
    }

    fn visit_declare_function_stmt(
        &mut self,
        stmt: &o::DeclareFunctionStmt,
        context: &mut Context,
    ) -> Result<A::Statement> {
        let body = self.visit_statements(&stmt.statements, context)?;
        Ok(self
            .factory
            .create_function_declaration(&stmt.name, &Self::param_names(&stmt.params), body))
    }

    fn visit_expression_stmt(&mut self, stmt: &o::ExpressionStatement, context: &mut Context) -> Result<A::Statement> {
        let expr = self.visit_expr(&stmt.expr, context)?;
        Ok(self.factory.create_expression_statement(expr))
    }

    fn visit_return_stmt(&mut self, stmt: &o::ReturnStatement, context: &mut Context) -> Result<A::Statement> {
        let value = self.visit_expr(&stmt.value, context)?;
        Ok(self.factory.create_return_statement(Some(value)))
    }

    fn visit_if_stmt(&mut self, stmt: &o::IfStmt, context: &mut Context) -> Result<A::Statement> {
        let condition = self.visit_expr(&stmt.condition, context)?;
        let true_case = self.visit_statements(&stmt.true_case, context)?;
        let false_case = if stmt.false_case.is_empty() {
            None
        } else {
            Some(self.factory.create_block(self.visit_statements(&stmt.false_case, context)?))
        };
        Ok(self
            .factory
            .create_if_statement(condition, self.factory.create_block(true_case), false_case))
    }
}

impl<'f, A: AstFactory, TFile: Clone> o::ExpressionVisitor<Context> for ExpressionTranslatorVisitor<'f, A, TFile> {
    type Output = A::Expression;
    type Error = TransformError;

    fn visit_read_var_expr(&mut self, ast: &o::ReadVarExpr, _context: &mut Context) -> Result<A::Expression> {
        Ok(self.factory.create_identifier(&ast.name))
    }

    fn visit_write_var_expr(&mut self, ast: &o::WriteVarExpr, context: &mut Context) -> Result<A::Expression> {
        let target = self.factory.create_identifier(&ast.name);
        let value = self.visit_expr(&ast.value, context)?;
        self.factory.create_assignment(target, value)
    }

    fn visit_write_key_expr(&mut self, ast: &o::WriteKeyExpr, context: &mut Context) -> Result<A::Expression> {
        let receiver = self.visit_expr(&ast.receiver, context)?;
        let index = self.visit_expr(&ast.index, context)?;
        let value = self.visit_expr(&ast.value, context)?;
        self.factory
            .create_assignment(self.factory.create_element_access(receiver, index), value)
    }

    fn visit_write_prop_expr(&mut self, ast: &o::WritePropExpr, context: &mut Context) -> Result<A::Expression> {
        let receiver = self.visit_expr(&ast.receiver, context)?;
        let value = self.visit_expr(&ast.value, context)?;
        self.factory
            .create_assignment(self.factory.create_property_access(receiver, &ast.name), value)
    }

    fn visit_invoke_function_expr(
        &mut self,
        ast: &o::InvokeFunctionExpr,
        context: &mut Context,
    ) -> Result<A::Expression> {
        let callee = self.visit_expr(&ast.fn_, context)?;
        // An invoked function literal is only callable when wrapped.
        let callee = self.maybe_parenthesize(callee, ast.fn_.is_function_literal());
        let args = self.visit_exprs(&ast.args, context)?;
        Ok(self.factory.create_call_expression(callee, args, ast.pure))
    }

    fn visit_tagged_template_expr(
        &mut self,
        ast: &o::TaggedTemplateLiteralExpr,
        context: &mut Context,
    ) -> Result<A::Expression> {
        let tag = self.visit_expr(&ast.tag, context)?;
        let parts = ast.template.elements.iter().map(|e| e.text.clone()).collect();
        let template = self.template_literal(parts, &ast.template.expressions, context)?;
        Ok(self.factory.create_tagged_template(tag, template))
    }

    fn visit_instantiate_expr(&mut self, ast: &o::InstantiateExpr, context: &mut Context) -> Result<A::Expression> {
        let class_expr = self.visit_expr(&ast.class_expr, context)?;
        let args = self.visit_exprs(&ast.args, context)?;
        Ok(self.factory.create_new_expression(class_expr, args))
    }

    fn visit_literal_expr(&mut self, ast: &o::LiteralExpr, _context: &mut Context) -> Result<A::Expression> {
        let value = match &ast.value {
            o::LiteralValue::Null => LiteralValue::Null,
            o::LiteralValue::Undefined => LiteralValue::Undefined,
            o::LiteralValue::String(s) => LiteralValue::String(s),
            o::LiteralValue::Number(n) => LiteralValue::Number(*n),
            o::LiteralValue::Bool(b) => LiteralValue::Boolean(*b),
        };
        self.factory.create_literal(value)
    }

    fn visit_localized_string(&mut self, ast: &o::LocalizedString, context: &mut Context) -> Result<A::Expression> {
        let tag = self.factory.create_identifier("$localize");
        let parts = (0..ast.message_parts.len()).map(|i| ast.serialize_part(i)).collect();
        let template = self.template_literal(parts, &ast.expressions, context)?;
        Ok(self.factory.create_tagged_template(tag, template))
    }

    fn visit_external_expr(&mut self, ast: &o::ExternalExpr, _context: &mut Context) -> Result<A::Expression> {
        let name = ast.value.name.clone().ok_or_else(|| TransformError::UnsupportedNode {
            kind: "external reference without a symbol name".to_string(),
        })?;
        match &ast.value.module_name {
            Some(module_name) => self.imports.add_import(ImportRequest {
                export_symbol_name: name,
                export_module_specifier: module_name.clone(),
                requested_file: self.context_file.clone(),
            }),
            // Ambient global.
            None => Ok(self.factory.create_identifier(&name)),
        }
    }

    fn visit_conditional_expr(&mut self, ast: &o::ConditionalExpr, context: &mut Context) -> Result<A::Expression> {
        let condition = self.visit_expr(&ast.condition, context)?;
        let true_case = self.visit_expr(&ast.true_case, context)?;
        let false_case = match &ast.false_case {
            Some(false_case) => self.visit_expr(false_case, context)?,
            None => self.factory.create_literal(LiteralValue::Null)?,
        };
        Ok(self.factory.create_conditional(condition, true_case, false_case))
    }

    fn visit_not_expr(&mut self, ast: &o::NotExpr, context: &mut Context) -> Result<A::Expression> {
        let operand = self.visit_expr(&ast.condition, context)?;
        Ok(self.factory.create_unary_expression(UnaryOperator::Not, operand))
    }

    fn visit_function_expr(&mut self, ast: &o::FunctionExpr, context: &mut Context) -> Result<A::Expression> {
        let body = self.visit_statements(&ast.statements, context)?;
        Ok(self
            .factory
            .create_function_expression(ast.name.as_deref(), &Self::param_names(&ast.params), body))
    }

    fn visit_arrow_function_expr(&mut self, ast: &o::ArrowFunctionExpr, context: &mut Context) -> Result<A::Expression> {
        let body = match &ast.body {
            o::ArrowFunctionBody::Expression(expr) => {
                let translated = self.visit_expr(expr, context)?;
                // `() => {}` would read as a block body.
                ArrowFunctionBody::Expr(self.maybe_parenthesize(translated, expr.is_literal_map()))
            }
            o::ArrowFunctionBody::Statements(statements) => {
                ArrowFunctionBody::Stmts(self.visit_statements(statements, context)?)
            }
        };
        Ok(self
            .factory
            .create_arrow_function_expression(&Self::param_names(&ast.params), body))
    }

    fn visit_binary_operator_expr(
        &mut self,
        ast: &o::BinaryOperatorExpr,
        context: &mut Context,
    ) -> Result<A::Expression> {
        let operator = map_binary_operator(ast.operator)?;
        let lhs = self.visit_expr(&ast.lhs, context)?;
        let rhs = self.visit_expr(&ast.rhs, context)?;
        let binary = self.factory.create_binary_expression(lhs, operator, rhs);
        Ok(self.maybe_parenthesize(binary, ast.parens))
    }

    fn visit_unary_operator_expr(
        &mut self,
        ast: &o::UnaryOperatorExpr,
        context: &mut Context,
    ) -> Result<A::Expression> {
        let operator = match ast.operator {
            o::UnaryOperator::Minus => UnaryOperator::Minus,
            o::UnaryOperator::Plus => UnaryOperator::Plus,
        };
        let operand = self.visit_expr(&ast.expr, context)?;
        let unary = self.factory.create_unary_expression(operator, operand);
        Ok(self.maybe_parenthesize(unary, ast.parens))
    }

    fn visit_read_prop_expr(&mut self, ast: &o::ReadPropExpr, context: &mut Context) -> Result<A::Expression> {
        let receiver = self.visit_expr(&ast.receiver, context)?;
        Ok(self.factory.create_property_access(receiver, &ast.name))
    }

    fn visit_read_key_expr(&mut self, ast: &o::ReadKeyExpr, context: &mut Context) -> Result<A::Expression> {
        let receiver = self.visit_expr(&ast.receiver, context)?;
        let index = self.visit_expr(&ast.index, context)?;
        Ok(self.factory.create_element_access(receiver, index))
    }

    fn visit_literal_array_expr(&mut self, ast: &o::LiteralArrayExpr, context: &mut Context) -> Result<A::Expression> {
        let entries = self.visit_exprs(&ast.entries, context)?;
        Ok(self.factory.create_array_literal(entries))
    }

    fn visit_literal_map_expr(&mut self, ast: &o::LiteralMapExpr, context: &mut Context) -> Result<A::Expression> {
        let properties = ast
            .entries
            .iter()
            .map(|entry| {
                Ok(ObjectLiteralProperty {
                    property_name: entry.key.clone(),
                    value: self.visit_expr(&entry.value, context)?,
                    quoted: entry.quoted,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.factory.create_object_literal(properties))
    }

    fn visit_comma_expr(&mut self, ast: &o::CommaExpr, context: &mut Context) -> Result<A::Expression> {
        let parts = self.visit_exprs(&ast.parts, context)?;
        Ok(self.factory.create_comma_expression(parts))
    }

    fn visit_wrapped_node_expr(&mut self, ast: &o::WrappedNodeExpr, _context: &mut Context) -> Result<A::Expression> {
        self.imports.resolve_wrapped_node(&ast.node)
    }

    fn visit_parenthesized_expr(&mut self, ast: &o::ParenthesizedExpr, context: &mut Context) -> Result<A::Expression> {
        let expr = self.visit_expr(&ast.expr, context)?;
        Ok(self.factory.create_parenthesized_expression(expr))
    }

    fn visit_typeof_expr(&mut self, ast: &o::TypeofExpr, context: &mut Context) -> Result<A::Expression> {
        let expr = self.visit_expr(&ast.expr, context)?;
        Ok(self.factory.create_type_of_expression(expr))
    }
}

fn map_binary_operator(op: o::BinaryOperator) -> Result<BinaryOperator> {
    Ok(match op {
        o::BinaryOperator::And => BinaryOperator::And,
        o::BinaryOperator::Bigger => BinaryOperator::Greater,
        o::BinaryOperator::BiggerEquals => BinaryOperator::GreaterEquals,
        o::BinaryOperator::BitwiseAnd => BinaryOperator::BitAnd,
        o::BinaryOperator::BitwiseOr => BinaryOperator::BitOr,
        o::BinaryOperator::Divide => BinaryOperator::Divide,
        o::BinaryOperator::Equals => BinaryOperator::Equals,
        o::BinaryOperator::Identical => BinaryOperator::IdentityEquals,
        o::BinaryOperator::Lower => BinaryOperator::Less,
        o::BinaryOperator::LowerEquals => BinaryOperator::LessEquals,
        o::BinaryOperator::Minus => BinaryOperator::Minus,
        o::BinaryOperator::Modulo => BinaryOperator::Modulo,
        o::BinaryOperator::Multiply => BinaryOperator::Multiply,
        o::BinaryOperator::NotEquals => BinaryOperator::NotEquals,
        o::BinaryOperator::NotIdentical => BinaryOperator::IdentityNotEquals,
        o::BinaryOperator::Or => BinaryOperator::Or,
        o::BinaryOperator::Plus => BinaryOperator::Plus,
        o::BinaryOperator::NullishCoalesce => BinaryOperator::NullishCoalesce,
        o::BinaryOperator::Exponentiation | o::BinaryOperator::In => {
            return Err(TransformError::UnsupportedOperator {
                operator: format!("{:?}", op),
            })
        }
    })
}
