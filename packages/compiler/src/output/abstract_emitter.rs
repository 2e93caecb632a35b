//! Abstract Emitter Module
//!
//! Print-mode realization of the output AST traversal: renders statements and
//! expressions as JavaScript source into an [`EmitterVisitorContext`].

use std::collections::HashMap;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::output::output_ast as o;

const INDENT_WITH: &str = "  ";
const LINE_WRAP_THRESHOLD: usize = 80;

lazy_static::lazy_static! {
    static ref SINGLE_QUOTE_ESCAPE_STRING_RE: Regex = Regex::new(r"'|\\|\n|\r|\$").unwrap();
    static ref LEGAL_IDENTIFIER_RE: Regex = Regex::new(r"(?i)^[$A-Z_][0-9A-Z_$]*$").unwrap();

    pub static ref BINARY_OPERATORS: HashMap<o::BinaryOperator, &'static str> = {
        let mut m = HashMap::new();
        m.insert(o::BinaryOperator::Equals, "==");
        m.insert(o::BinaryOperator::Identical, "===");
        m.insert(o::BinaryOperator::NotEquals, "!=");
        m.insert(o::BinaryOperator::NotIdentical, "!==");
        m.insert(o::BinaryOperator::And, "&&");
        m.insert(o::BinaryOperator::Or, "||");
        m.insert(o::BinaryOperator::BitwiseAnd, "&");
        m.insert(o::BinaryOperator::BitwiseOr, "|");
        m.insert(o::BinaryOperator::Plus, "+");
        m.insert(o::BinaryOperator::Minus, "-");
        m.insert(o::BinaryOperator::Divide, "/");
        m.insert(o::BinaryOperator::Multiply, "*");
        m.insert(o::BinaryOperator::Modulo, "%");
        m.insert(o::BinaryOperator::Lower, "<");
        m.insert(o::BinaryOperator::LowerEquals, "<=");
        m.insert(o::BinaryOperator::Bigger, ">");
        m.insert(o::BinaryOperator::BiggerEquals, ">=");
        m.insert(o::BinaryOperator::NullishCoalesce, "??");
        m
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("Unsupported operator {operator}")]
    UnsupportedOperator { operator: String },
    #[error("Unexpected import {name} from {module}")]
    UnexpectedImport { name: String, module: String },
    #[error("External reference to {module} has no symbol name")]
    UnnamedReference { module: String },
}

/// Maps symbolic references onto names usable at the emission site.
pub trait ExternalReferenceResolver {
    fn resolve_external_reference(
        &mut self,
        reference: &o::ExternalReference,
    ) -> Result<String, EmitError>;

    fn resolve_wrapped_node(&mut self, node: &o::WrappedNode) -> Result<String, EmitError> {
        match node {
            o::WrappedNode::Identifier(name) => Ok(name.clone()),
        }
    }
}

#[derive(Debug, Clone)]
struct EmittedLine {
    parts_length: usize,
    parts: Vec<String>,
    indent: usize,
}

impl EmittedLine {
    fn new(indent: usize) -> Self {
        EmittedLine {
            parts_length: 0,
            parts: Vec::new(),
            indent,
        }
    }
}

pub struct EmitterVisitorContext {
    lines: Vec<EmittedLine>,
    indent: usize,
}

impl EmitterVisitorContext {
    pub fn create_root() -> Self {
        EmitterVisitorContext::new(0)
    }

    pub fn new(indent: usize) -> Self {
        EmitterVisitorContext {
            lines: vec![EmittedLine::new(indent)],
            indent,
        }
    }

    fn current_line_mut(&mut self) -> &mut EmittedLine {
        if self.lines.is_empty() {
            self.lines.push(EmittedLine::new(self.indent));
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    pub fn println(&mut self, last_part: &str) {
        self.print(last_part, true);
    }

    pub fn line_is_empty(&self) -> bool {
        self.lines.last().map_or(true, |l| l.parts.is_empty())
    }

    pub fn line_length(&self) -> usize {
        self.lines
            .last()
            .map_or(0, |l| l.indent * INDENT_WITH.len() + l.parts_length)
    }

    pub fn print(&mut self, part: &str, new_line: bool) {
        if !part.is_empty() {
            let current = self.current_line_mut();
            current.parts.push(part.to_string());
            current.parts_length += part.chars().count();
        }
        if new_line {
            self.lines.push(EmittedLine::new(self.indent));
        }
    }

    pub fn remove_empty_last_line(&mut self) {
        if self.line_is_empty() {
            self.lines.pop();
        }
    }

    pub fn inc_indent(&mut self) {
        self.indent += 1;
        let indent = self.indent;
        if self.line_is_empty() {
            self.current_line_mut().indent = indent;
        }
    }

    pub fn dec_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        let indent = self.indent;
        if self.line_is_empty() {
            self.current_line_mut().indent = indent;
        }
    }

    pub fn to_source(&self) -> String {
        self.lines
            .iter()
            .map(|l| {
                if l.parts.is_empty() {
                    String::new()
                } else {
                    format!("{}{}", INDENT_WITH.repeat(l.indent), l.parts.concat())
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Escape a string for a single-quoted JavaScript literal.
///
/// With `always_quote == false` legal identifiers are returned bare.
pub fn escape_identifier(input: &str, escape_dollar: bool, always_quote: bool) -> String {
    let body = SINGLE_QUOTE_ESCAPE_STRING_RE.replace_all(input, |caps: &Captures| {
        match &caps[0] {
            "$" if escape_dollar => "\\$".to_string(),
            "$" => "$".to_string(),
            "\n" => "\\n".to_string(),
            "\r" => "\\r".to_string(),
            other => format!("\\{}", other),
        }
    });
    if always_quote || !LEGAL_IDENTIFIER_RE.is_match(&body) {
        format!("'{}'", body)
    } else {
        body.into_owned()
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        value.to_string()
    }
}

pub struct AbstractEmitterVisitor<R> {
    resolver: R,
    escape_dollar_in_strings: bool,
}

impl<R: ExternalReferenceResolver> AbstractEmitterVisitor<R> {
    pub fn new(resolver: R, escape_dollar_in_strings: bool) -> Self {
        AbstractEmitterVisitor {
            resolver,
            escape_dollar_in_strings,
        }
    }

    pub fn into_resolver(self) -> R {
        self.resolver
    }

    pub fn visit_all_statements(
        &mut self,
        statements: &[o::Statement],
        ctx: &mut EmitterVisitorContext,
    ) -> Result<(), EmitError> {
        for stmt in statements {
            stmt.visit_statement(self, ctx)?;
        }
        Ok(())
    }

    pub fn visit_all_expressions(
        &mut self,
        expressions: &[o::Expression],
        ctx: &mut EmitterVisitorContext,
        separator: &str,
    ) -> Result<(), EmitError> {
        self.visit_all_objects(
            |this, expr, ctx| expr.visit_expression(this, ctx),
            expressions,
            ctx,
            separator,
        )
    }

    /// Print `items` separated by `separator`, wrapping onto double-indented
    /// continuation lines once the current line grows past the wrap threshold.
    fn visit_all_objects<T>(
        &mut self,
        mut handler: impl FnMut(&mut Self, &T, &mut EmitterVisitorContext) -> Result<(), EmitError>,
        items: &[T],
        ctx: &mut EmitterVisitorContext,
        separator: &str,
    ) -> Result<(), EmitError> {
        let mut incremented_indent = false;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                if ctx.line_length() > LINE_WRAP_THRESHOLD {
                    ctx.print(separator, true);
                    if !incremented_indent {
                        ctx.inc_indent();
                        ctx.inc_indent();
                        incremented_indent = true;
                    }
                } else {
                    ctx.print(separator, false);
                }
            }
            handler(self, item, ctx)?;
        }
        if incremented_indent {
            ctx.dec_indent();
            ctx.dec_indent();
        }
        Ok(())
    }

    fn visit_params(&mut self, params: &[o::FnParam], ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        self.visit_all_objects(
            |_, param, ctx| {
                ctx.print(&param.name, false);
                Ok(())
            },
            params,
            ctx,
            ",",
        )
    }

    fn print_template_literal(
        &mut self,
        parts: &[String],
        expressions: &[o::Expression],
        ctx: &mut EmitterVisitorContext,
    ) -> Result<(), EmitError> {
        ctx.print(&format!("`{}", parts.first().map(String::as_str).unwrap_or("")), false);
        for (i, expr) in expressions.iter().enumerate() {
            ctx.print("${", false);
            expr.visit_expression(self, ctx)?;
            let part = parts.get(i + 1).map(String::as_str).unwrap_or("");
            ctx.print(&format!("}}{}", part), false);
        }
        ctx.print("`", false);
        Ok(())
    }

    fn print_write_start(&self, ctx: &mut EmitterVisitorContext) -> bool {
        let line_was_empty = ctx.line_is_empty();
        if !line_was_empty {
            ctx.print("(", false);
        }
        line_was_empty
    }

    fn print_write_end(&self, line_was_empty: bool, ctx: &mut EmitterVisitorContext) {
        if !line_was_empty {
            ctx.print(")", false);
        }
    }
}

impl<R: ExternalReferenceResolver> o::StatementVisitor<EmitterVisitorContext> for AbstractEmitterVisitor<R> {
    type Output = ();
    type Error = EmitError;

    fn visit_declare_var_stmt(&mut self, stmt: &o::DeclareVarStmt, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        ctx.print(&format!("var {}", stmt.name), false);
        if let Some(value) = &stmt.value {
            ctx.print(" = ", false);
            value.visit_expression(self, ctx)?;
        }
        ctx.println(";");
        Ok(())
    }

    fn visit_declare_function_stmt(
        &mut self,
        stmt: &o::DeclareFunctionStmt,
        ctx: &mut EmitterVisitorContext,
    ) -> Result<(), EmitError> {
        ctx.print(&format!("function {}(", stmt.name), false);
        self.visit_params(&stmt.params, ctx)?;
        ctx.println(") {");
        ctx.inc_indent();
        self.visit_all_statements(&stmt.statements, ctx)?;
        ctx.dec_indent();
        ctx.println("}");
        Ok(())
    }

    fn visit_expression_stmt(&mut self, stmt: &o::ExpressionStatement, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        stmt.expr.visit_expression(self, ctx)?;
        ctx.println(";");
        Ok(())
    }

    fn visit_return_stmt(&mut self, stmt: &o::ReturnStatement, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        ctx.print("return ", false);
        stmt.value.visit_expression(self, ctx)?;
        ctx.println(";");
        Ok(())
    }

    fn visit_if_stmt(&mut self, stmt: &o::IfStmt, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        ctx.print("if (", false);
        stmt.condition.visit_expression(self, ctx)?;
        ctx.print(") {", false);
        let has_else_case = !stmt.false_case.is_empty();
        if stmt.true_case.len() <= 1 && !has_else_case {
            ctx.print(" ", false);
            self.visit_all_statements(&stmt.true_case, ctx)?;
            ctx.remove_empty_last_line();
            ctx.print(" ", false);
        } else {
            ctx.println("");
            ctx.inc_indent();
            self.visit_all_statements(&stmt.true_case, ctx)?;
            ctx.dec_indent();
            if has_else_case {
                ctx.println("} else {");
                ctx.inc_indent();
                self.visit_all_statements(&stmt.false_case, ctx)?;
                ctx.dec_indent();
            }
        }
        ctx.println("}");
        Ok(())
    }
}

impl<R: ExternalReferenceResolver> o::ExpressionVisitor<EmitterVisitorContext> for AbstractEmitterVisitor<R> {
    type Output = ();
    type Error = EmitError;

    fn visit_read_var_expr(&mut self, expr: &o::ReadVarExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        ctx.print(&expr.name, false);
        Ok(())
    }

    fn visit_write_var_expr(&mut self, expr: &o::WriteVarExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        let line_was_empty = self.print_write_start(ctx);
        ctx.print(&format!("{} = ", expr.name), false);
        expr.value.visit_expression(self, ctx)?;
        self.print_write_end(line_was_empty, ctx);
        Ok(())
    }

    fn visit_write_key_expr(&mut self, expr: &o::WriteKeyExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        let line_was_empty = self.print_write_start(ctx);
        expr.receiver.visit_expression(self, ctx)?;
        ctx.print("[", false);
        expr.index.visit_expression(self, ctx)?;
        ctx.print("] = ", false);
        expr.value.visit_expression(self, ctx)?;
        self.print_write_end(line_was_empty, ctx);
        Ok(())
    }

    fn visit_write_prop_expr(&mut self, expr: &o::WritePropExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        let line_was_empty = self.print_write_start(ctx);
        expr.receiver.visit_expression(self, ctx)?;
        ctx.print(&format!(".{} = ", expr.name), false);
        expr.value.visit_expression(self, ctx)?;
        self.print_write_end(line_was_empty, ctx);
        Ok(())
    }

    fn visit_invoke_function_expr(
        &mut self,
        expr: &o::InvokeFunctionExpr,
        ctx: &mut EmitterVisitorContext,
    ) -> Result<(), EmitError> {
        let should_parenthesize = expr.fn_.is_function_literal();
        if should_parenthesize {
            ctx.print("(", false);
        }
        expr.fn_.visit_expression(self, ctx)?;
        if should_parenthesize {
            ctx.print(")", false);
        }
        ctx.print("(", false);
        self.visit_all_expressions(&expr.args, ctx, ",")?;
        ctx.print(")", false);
        Ok(())
    }

    fn visit_tagged_template_expr(
        &mut self,
        expr: &o::TaggedTemplateLiteralExpr,
        ctx: &mut EmitterVisitorContext,
    ) -> Result<(), EmitError> {
        expr.tag.visit_expression(self, ctx)?;
        let parts: Vec<String> = expr.template.elements.iter().map(|e| e.text.clone()).collect();
        self.print_template_literal(&parts, &expr.template.expressions, ctx)
    }

    fn visit_instantiate_expr(&mut self, expr: &o::InstantiateExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        ctx.print("new ", false);
        let needs_parens = matches!(
            expr.class_expr.as_ref(),
            o::Expression::BinaryOp(_) | o::Expression::Conditional(_)
        );
        if needs_parens {
            ctx.print("(", false);
        }
        expr.class_expr.visit_expression(self, ctx)?;
        if needs_parens {
            ctx.print(")", false);
        }
        ctx.print("(", false);
        self.visit_all_expressions(&expr.args, ctx, ",")?;
        ctx.print(")", false);
        Ok(())
    }

    fn visit_literal_expr(&mut self, expr: &o::LiteralExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        let value = match &expr.value {
            o::LiteralValue::Null => "null".to_string(),
            o::LiteralValue::Undefined => "undefined".to_string(),
            o::LiteralValue::String(s) => escape_identifier(s, self.escape_dollar_in_strings, true),
            o::LiteralValue::Number(n) => format_number(*n),
            o::LiteralValue::Bool(b) => b.to_string(),
        };
        ctx.print(&value, false);
        Ok(())
    }

    fn visit_localized_string(&mut self, expr: &o::LocalizedString, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        ctx.print("$localize ", false);
        let parts: Vec<String> = (0..expr.message_parts.len())
            .map(|i| expr.serialize_part(i))
            .collect();
        self.print_template_literal(&parts, &expr.expressions, ctx)
    }

    fn visit_external_expr(&mut self, expr: &o::ExternalExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        let name = self.resolver.resolve_external_reference(&expr.value)?;
        ctx.print(&name, false);
        Ok(())
    }

    fn visit_conditional_expr(&mut self, expr: &o::ConditionalExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        ctx.print("(", false);
        expr.condition.visit_expression(self, ctx)?;
        ctx.print("? ", false);
        expr.true_case.visit_expression(self, ctx)?;
        ctx.print(": ", false);
        match &expr.false_case {
            Some(false_case) => false_case.visit_expression(self, ctx)?,
            None => ctx.print("null", false),
        }
        ctx.print(")", false);
        Ok(())
    }

    fn visit_not_expr(&mut self, expr: &o::NotExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        ctx.print("!", false);
        expr.condition.visit_expression(self, ctx)
    }

    fn visit_function_expr(&mut self, expr: &o::FunctionExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        match &expr.name {
            Some(name) => ctx.print(&format!("function {}(", name), false),
            None => ctx.print("function(", false),
        }
        self.visit_params(&expr.params, ctx)?;
        ctx.println(") {");
        ctx.inc_indent();
        self.visit_all_statements(&expr.statements, ctx)?;
        ctx.dec_indent();
        ctx.print("}", false);
        Ok(())
    }

    fn visit_arrow_function_expr(
        &mut self,
        expr: &o::ArrowFunctionExpr,
        ctx: &mut EmitterVisitorContext,
    ) -> Result<(), EmitError> {
        ctx.print("(", false);
        self.visit_params(&expr.params, ctx)?;
        ctx.print(") => ", false);
        match &expr.body {
            o::ArrowFunctionBody::Statements(stmts) => {
                ctx.println("{");
                ctx.inc_indent();
                self.visit_all_statements(stmts, ctx)?;
                ctx.dec_indent();
                ctx.print("}", false);
            }
            o::ArrowFunctionBody::Expression(body) => {
                let is_object_literal = body.is_literal_map();
                if is_object_literal {
                    ctx.print("(", false);
                }
                body.visit_expression(self, ctx)?;
                if is_object_literal {
                    ctx.print(")", false);
                }
            }
        }
        Ok(())
    }

    fn visit_binary_operator_expr(
        &mut self,
        expr: &o::BinaryOperatorExpr,
        ctx: &mut EmitterVisitorContext,
    ) -> Result<(), EmitError> {
        let op = BINARY_OPERATORS
            .get(&expr.operator)
            .ok_or_else(|| EmitError::UnsupportedOperator {
                operator: format!("{:?}", expr.operator),
            })?;
        if expr.parens {
            ctx.print("(", false);
        }
        expr.lhs.visit_expression(self, ctx)?;
        ctx.print(&format!(" {} ", op), false);
        expr.rhs.visit_expression(self, ctx)?;
        if expr.parens {
            ctx.print(")", false);
        }
        Ok(())
    }

    fn visit_unary_operator_expr(
        &mut self,
        expr: &o::UnaryOperatorExpr,
        ctx: &mut EmitterVisitorContext,
    ) -> Result<(), EmitError> {
        let op = match expr.operator {
            o::UnaryOperator::Minus => "-",
            o::UnaryOperator::Plus => "+",
        };
        if expr.parens {
            ctx.print("(", false);
        }
        ctx.print(op, false);
        expr.expr.visit_expression(self, ctx)?;
        if expr.parens {
            ctx.print(")", false);
        }
        Ok(())
    }

    fn visit_read_prop_expr(&mut self, expr: &o::ReadPropExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        expr.receiver.visit_expression(self, ctx)?;
        ctx.print(".", false);
        ctx.print(&expr.name, false);
        Ok(())
    }

    fn visit_read_key_expr(&mut self, expr: &o::ReadKeyExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        expr.receiver.visit_expression(self, ctx)?;
        ctx.print("[", false);
        expr.index.visit_expression(self, ctx)?;
        ctx.print("]", false);
        Ok(())
    }

    fn visit_literal_array_expr(&mut self, expr: &o::LiteralArrayExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        ctx.print("[", false);
        self.visit_all_expressions(&expr.entries, ctx, ",")?;
        ctx.print("]", false);
        Ok(())
    }

    fn visit_literal_map_expr(&mut self, expr: &o::LiteralMapExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        ctx.print("{", false);
        let escape_dollar = self.escape_dollar_in_strings;
        self.visit_all_objects(
            |this, entry: &o::LiteralMapEntry, ctx| {
                ctx.print(
                    &format!("{}:", escape_identifier(&entry.key, escape_dollar, entry.quoted)),
                    false,
                );
                entry.value.visit_expression(this, ctx)
            },
            &expr.entries,
            ctx,
            ",",
        )?;
        ctx.print("}", false);
        Ok(())
    }

    fn visit_comma_expr(&mut self, expr: &o::CommaExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        ctx.print("(", false);
        self.visit_all_expressions(&expr.parts, ctx, ",")?;
        ctx.print(")", false);
        Ok(())
    }

    fn visit_wrapped_node_expr(&mut self, expr: &o::WrappedNodeExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        let name = self.resolver.resolve_wrapped_node(&expr.node)?;
        ctx.print(&name, false);
        Ok(())
    }

    fn visit_parenthesized_expr(
        &mut self,
        expr: &o::ParenthesizedExpr,
        ctx: &mut EmitterVisitorContext,
    ) -> Result<(), EmitError> {
        ctx.print("(", false);
        expr.expr.visit_expression(self, ctx)?;
        ctx.print(")", false);
        Ok(())
    }

    fn visit_typeof_expr(&mut self, expr: &o::TypeofExpr, ctx: &mut EmitterVisitorContext) -> Result<(), EmitError> {
        ctx.print("typeof ", false);
        expr.expr.visit_expression(self, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BareNames;

    impl ExternalReferenceResolver for BareNames {
        fn resolve_external_reference(&mut self, reference: &o::ExternalReference) -> Result<String, EmitError> {
            Ok(reference.name.clone().unwrap_or_default())
        }
    }

    fn emit(expr: &o::Expression) -> String {
        let mut visitor = AbstractEmitterVisitor::new(BareNames, false);
        let mut ctx = EmitterVisitorContext::create_root();
        expr.visit_expression(&mut visitor, &mut ctx).unwrap();
        ctx.to_source()
    }

    #[test]
    fn should_escape_quotes_and_newlines() {
        assert_eq!(escape_identifier("it's\n", false, true), "'it\\'s\\n'");
        assert_eq!(escape_identifier("a$b", true, true), "'a\\$b'");
        assert_eq!(escape_identifier("a$b", false, false), "a$b");
        assert_eq!(escape_identifier("font-size", false, false), "'font-size'");
    }

    #[test]
    fn should_print_conditionals_compactly() {
        let expr = o::variable("a").conditional(o::literal(0), Some(o::literal(-1)));
        assert_eq!(emit(&expr), "(a? 0: -1)");
    }

    #[test]
    fn should_parenthesize_object_literal_arrow_bodies() {
        let expr = o::arrow_fn(
            vec![],
            o::ArrowFunctionBody::Expression(Box::new(o::literal_map(vec![o::LiteralMapEntry::new(
                "a",
                o::literal(1),
                false,
            )]))),
        )
        .call_fn(vec![]);
        assert_eq!(emit(&expr), "(() => ({a:1}))()");
    }

    #[test]
    fn should_reject_operators_outside_the_table() {
        let expr = o::variable("a").binary(o::BinaryOperator::Exponentiation, o::literal(2));
        let mut visitor = AbstractEmitterVisitor::new(BareNames, false);
        let mut ctx = EmitterVisitorContext::create_root();
        let err = expr.visit_expression(&mut visitor, &mut ctx).unwrap_err();
        assert_eq!(
            err,
            EmitError::UnsupportedOperator {
                operator: "Exponentiation".into()
            }
        );
    }
}
