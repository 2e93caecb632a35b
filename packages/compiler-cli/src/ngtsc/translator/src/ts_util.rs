use oxc_ast::ast::Expression;
use oxc_ast::AstBuilder;
use oxc_span::{Atom, SPAN};
use oxc_syntax::number::NumberBase;
use oxc_syntax::operator::UnaryOperator;

use crate::error::{Result, TransformError};

/// Creates a node representing a numeric value. Negative numbers become a
/// prefix negation of their absolute value.
pub fn ts_numeric_expression<'a>(builder: &AstBuilder<'a>, value: f64) -> Result<Expression<'a>> {
    if !value.is_finite() {
        return Err(TransformError::UnsupportedLiteralType {
            literal: value.to_string(),
        });
    }
    if value < 0.0 {
        let operand = positive_literal(builder, -value);
        Ok(builder.expression_unary(SPAN, UnaryOperator::UnaryNegation, operand))
    } else {
        Ok(positive_literal(builder, value))
    }
}

fn positive_literal<'a>(builder: &AstBuilder<'a>, value: f64) -> Expression<'a> {
    let raw = builder.allocator.alloc_str(&value.to_string());
    builder.expression_numeric_literal(SPAN, value, Some(Atom::from(raw)), NumberBase::Decimal)
}
