//! Conversion Module
//!
//! Lowers binding expressions into output expressions. Unqualified names are
//! read from the component context: `ctx` in the root view and a
//! `ɵɵnextContext()` variable in embedded views.

use crate::error::{CompileError, Result};
use crate::expression_parser::ast::{LiteralPrimitive, AST};
use crate::output::output_ast::{self as o, BinaryOperator};
use crate::template::pipeline::src::compilation::ComponentCompilationJob;

/// Binary operator mappings from string to BinaryOperator
pub static BINARY_OPERATORS: &[(&str, BinaryOperator)] = &[
    ("&&", BinaryOperator::And),
    (">", BinaryOperator::Bigger),
    (">=", BinaryOperator::BiggerEquals),
    ("/", BinaryOperator::Divide),
    ("==", BinaryOperator::Equals),
    ("===", BinaryOperator::Identical),
    ("<", BinaryOperator::Lower),
    ("<=", BinaryOperator::LowerEquals),
    ("-", BinaryOperator::Minus),
    ("%", BinaryOperator::Modulo),
    ("*", BinaryOperator::Multiply),
    ("!=", BinaryOperator::NotEquals),
    ("!==", BinaryOperator::NotIdentical),
    ("??", BinaryOperator::NullishCoalesce),
    ("||", BinaryOperator::Or),
    ("+", BinaryOperator::Plus),
];

pub fn binary_operator_from_str(op: &str) -> Option<BinaryOperator> {
    BINARY_OPERATORS
        .iter()
        .find(|(k, _)| *k == op)
        .map(|(_, v)| *v)
}

/// Name of the template function's context parameter.
pub const ROOT_CONTEXT: &str = "ctx";

/// Name of the event parameter available to listeners.
pub const DOLLAR_EVENT: &str = "$event";

/// Where a converted expression will be evaluated.
#[derive(Debug, Clone)]
pub struct ConversionScope {
    depth: usize,
    context_variable: Option<String>,
    in_listener: bool,
    consumes_dollar_event: bool,
}

impl ConversionScope {
    /// The update block of a view at `depth`, reusing its context variable.
    pub fn update(depth: usize, context_variable: Option<String>) -> Self {
        ConversionScope {
            depth,
            context_variable,
            in_listener: false,
            consumes_dollar_event: false,
        }
    }

    /// The body of a listener declared in a view at `depth`.
    pub fn listener(depth: usize) -> Self {
        ConversionScope {
            depth,
            context_variable: None,
            in_listener: true,
            consumes_dollar_event: false,
        }
    }

    pub fn context_variable(&self) -> Option<&str> {
        self.context_variable.as_deref()
    }

    pub fn into_context_variable(self) -> Option<String> {
        self.context_variable
    }

    pub fn consumes_dollar_event(&self) -> bool {
        self.consumes_dollar_event
    }

    fn context(&mut self, job: &mut ComponentCompilationJob) -> o::Expression {
        if self.depth == 0 {
            return o::variable(ROOT_CONTEXT);
        }
        let name = self
            .context_variable
            .get_or_insert_with(|| job.allocate_variable_name("ctx_r"));
        o::variable(name.clone())
    }
}

/// Convert a template AST expression into an output expression.
pub fn convert_ast(job: &mut ComponentCompilationJob, ast: &AST, scope: &mut ConversionScope) -> Result<o::Expression> {
    Ok(match ast {
        AST::EmptyExpr(_) => o::literal(o::LiteralValue::Undefined),
        AST::ImplicitReceiver(_) => scope.context(job),
        AST::PropertyRead(read) => {
            if read.receiver.is_implicit_receiver() && scope.in_listener && read.name == DOLLAR_EVENT {
                scope.consumes_dollar_event = true;
                o::variable(DOLLAR_EVENT)
            } else {
                convert_ast(job, &read.receiver, scope)?.prop(read.name.clone())
            }
        }
        AST::KeyedRead(read) => {
            let receiver = convert_ast(job, &read.receiver, scope)?;
            receiver.key(convert_ast(job, &read.key, scope)?)
        }
        AST::Call(call) => {
            let receiver = convert_ast(job, &call.receiver, scope)?;
            let args = call
                .args
                .iter()
                .map(|arg| convert_ast(job, arg, scope))
                .collect::<Result<Vec<_>>>()?;
            receiver.call_fn(args)
        }
        AST::LiteralPrimitive(value, _) => match value {
            LiteralPrimitive::String(s) => o::literal(s.clone()),
            LiteralPrimitive::Number(n) => o::literal(*n),
            LiteralPrimitive::Boolean(b) => o::literal(*b),
            LiteralPrimitive::Null => o::null_expr(),
            LiteralPrimitive::Undefined => o::literal(o::LiteralValue::Undefined),
        },
        AST::LiteralArray(array) => o::literal_arr(
            array
                .expressions
                .iter()
                .map(|e| convert_ast(job, e, scope))
                .collect::<Result<Vec<_>>>()?,
        ),
        AST::Binary(binary) => {
            let operator = binary_operator_from_str(&binary.operation)
                .ok_or_else(|| CompileError::UnsupportedOperator(binary.operation.clone()))?;
            let lhs = convert_ast(job, &binary.left, scope)?;
            lhs.binary(operator, convert_ast(job, &binary.right, scope)?)
        }
        AST::PrefixNot(not) => o::not(convert_ast(job, &not.expression, scope)?),
        AST::Unary(unary) => {
            let operator = match unary.operator {
                '-' => o::UnaryOperator::Minus,
                '+' => o::UnaryOperator::Plus,
                other => return Err(CompileError::UnsupportedUnaryOperator(other)),
            };
            o::unary(operator, convert_ast(job, &unary.expr, scope)?)
        }
        AST::Conditional(cond) => {
            let condition = convert_ast(job, &cond.condition, scope)?;
            let true_case = convert_ast(job, &cond.true_exp, scope)?;
            condition.conditional(true_case, Some(convert_ast(job, &cond.false_exp, scope)?))
        }
        AST::ParenthesizedExpression(parens) => o::Expression::Parens(o::ParenthesizedExpr {
            expr: Box::new(convert_ast(job, &parens.expression, scope)?),
            source_span: None,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression_parser::Parser;
    use crate::render3::view::api::R3ComponentDeferMetadata;

    fn job() -> ComponentCompilationJob {
        ComponentCompilationJob::new("Cmp", R3ComponentDeferMetadata::default())
    }

    #[test]
    fn should_read_names_from_ctx_in_the_root_view() {
        let ast = Parser::new().parse_binding("count() + 1", 0).unwrap();
        let mut job = job();
        let mut scope = ConversionScope::update(0, None);
        let expr = convert_ast(&mut job, &ast, &mut scope).unwrap();
        assert_eq!(
            expr,
            o::variable("ctx")
                .prop("count")
                .call_fn(vec![])
                .binary(BinaryOperator::Plus, o::literal(1.0))
        );
        assert!(scope.context_variable().is_none());
    }

    #[test]
    fn should_allocate_one_context_variable_per_scope() {
        let ast = Parser::new().parse_binding("a && b", 0).unwrap();
        let mut job = job();
        let mut scope = ConversionScope::update(1, None);
        let expr = convert_ast(&mut job, &ast, &mut scope).unwrap();
        assert_eq!(scope.context_variable(), Some("ctx_r1"));
        assert_eq!(
            expr,
            o::variable("ctx_r1")
                .prop("a")
                .binary(BinaryOperator::And, o::variable("ctx_r1").prop("b"))
        );
    }

    #[test]
    fn should_only_bind_dollar_event_in_listeners() {
        let ast = Parser::new().parse_action("save($event)", 0).unwrap();
        let mut job = job();
        let mut scope = ConversionScope::listener(0);
        let expr = convert_ast(&mut job, &ast, &mut scope).unwrap();
        assert!(scope.consumes_dollar_event());
        assert_eq!(expr, o::variable("ctx").prop("save").call_fn(vec![o::variable("$event")]));

        let mut update = ConversionScope::update(0, None);
        let read = Parser::new().parse_binding("$event", 0).unwrap();
        assert_eq!(convert_ast(&mut job, &read, &mut update).unwrap(), o::variable("ctx").prop("$event"));
    }
}
