//! Binding Parser
//!
//! Parses the expressions of bound attributes, event handlers, block
//! parameters and interpolated text, and classifies property binding
//! targets. Expression parser errors are turned into template parse errors
//! located at the offending span.

use std::sync::Arc;

use crate::expression_parser::ast::{Interpolation, AST as ExprAST};
use crate::expression_parser::parser::{InterpolationConfig, Parser, ParserError};
use crate::parse_util::{ParseError, ParseSourceFile, ParseSourceSpan};

const PROPERTY_PARTS_SEPARATOR: char = '.';
const STYLE_PREFIX: &str = "style";
const ATTRIBUTE_PREFIX: &str = "attr";
const CLASS_PREFIX: &str = "class";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingType {
    Property,
    Style,
}

/// A classified `[target]` name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingTarget {
    pub name: String,
    pub type_: BindingType,
    pub unit: Option<String>,
}

#[derive(Debug)]
pub struct BindingParser {
    expr_parser: Parser,
    interpolation_config: InterpolationConfig,
}

impl BindingParser {
    pub fn new(expr_parser: Parser, interpolation_config: InterpolationConfig) -> Self {
        BindingParser {
            expr_parser,
            interpolation_config,
        }
    }

    pub fn interpolation_config(&self) -> &InterpolationConfig {
        &self.interpolation_config
    }

    /// Parse text that may contain interpolations, `None` if it has none.
    pub fn parse_interpolation(
        &self,
        value: &str,
        source_span: &ParseSourceSpan,
    ) -> Result<Option<Interpolation>, ParseError> {
        self.expr_parser
            .parse_interpolation(value, source_span.start.offset, &self.interpolation_config)
            .map_err(|err| to_parse_error(&source_span.start.file, err, value.len()))
    }

    pub fn parse_binding(&self, value: &str, value_span: &ParseSourceSpan) -> Result<ExprAST, ParseError> {
        self.expr_parser
            .parse_binding(value, value_span.start.offset)
            .map_err(|err| to_parse_error(&value_span.start.file, err, value.len()))
    }

    pub fn parse_event(&self, value: &str, value_span: &ParseSourceSpan) -> Result<ExprAST, ParseError> {
        let ast = self
            .expr_parser
            .parse_action(value, value_span.start.offset)
            .map_err(|err| to_parse_error(&value_span.start.file, err, value.len()))?;
        if matches!(ast, ExprAST::EmptyExpr(_)) {
            return Err(ParseError::new(
                value_span.clone(),
                "Empty expressions are not allowed",
            ));
        }
        Ok(ast)
    }

    /// Classify a property binding name such as `value` or `style.font-size.px`.
    pub fn parse_property_binding(
        &self,
        name: &str,
        source_span: &ParseSourceSpan,
    ) -> Result<BindingTarget, ParseError> {
        let mut parts = name.split(PROPERTY_PARTS_SEPARATOR);
        let first = parts.next().unwrap_or_default();
        let rest: Vec<&str> = parts.collect();

        match (first, rest.as_slice()) {
            (STYLE_PREFIX, [property]) | (STYLE_PREFIX, [property, _]) if !property.is_empty() => {
                Ok(BindingTarget {
                    name: property.to_string(),
                    type_: BindingType::Style,
                    unit: rest.get(1).map(|unit| unit.to_string()),
                })
            }
            (ATTRIBUTE_PREFIX | CLASS_PREFIX, _) => Err(ParseError::new(
                source_span.clone(),
                format!("Unsupported binding target \"[{}]\"", name),
            )),
            (property, []) if !property.is_empty() => Ok(BindingTarget {
                name: property.to_string(),
                type_: BindingType::Property,
                unit: None,
            }),
            _ => Err(ParseError::new(
                source_span.clone(),
                format!("Invalid property name \"{}\"", name),
            )),
        }
    }
}

fn to_parse_error(file: &Arc<ParseSourceFile>, err: ParserError, len: usize) -> ParseError {
    let start = err.location.min(file.content.len());
    let end = (start + len).min(file.content.len()).max(start);
    ParseError::new(file.span(start, end), err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression_parser::DEFAULT_INTERPOLATION_CONFIG;

    fn binding_parser() -> BindingParser {
        BindingParser::new(Parser::new(), DEFAULT_INTERPOLATION_CONFIG)
    }

    fn span() -> ParseSourceSpan {
        ParseSourceFile::new("<p></p>", "t").span(0, 3)
    }

    #[test]
    fn should_classify_style_bindings() {
        let target = binding_parser().parse_property_binding("style.width.px", &span()).unwrap();
        assert_eq!(target.type_, BindingType::Style);
        assert_eq!(target.name, "width");
        assert_eq!(target.unit.as_deref(), Some("px"));
    }

    #[test]
    fn should_classify_property_bindings() {
        let target = binding_parser().parse_property_binding("disabled", &span()).unwrap();
        assert_eq!(target.type_, BindingType::Property);
    }

    #[test]
    fn should_reject_class_bindings() {
        let err = binding_parser().parse_property_binding("class.on", &span()).unwrap_err();
        assert!(err.msg.contains("[class.on]"));
    }
}
