//! Expression Parser
//!
//! Recursive descent parser for binding expressions. Actions (event
//! handlers) and bindings share the grammar; actions additionally accept a
//! `;`-separated chain, of which only single expressions are supported.

use super::ast::*;
use super::lexer::{Lexer, Token, TokenType};

/// Start and end markers of an interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpolationConfig {
    pub start: &'static str,
    pub end: &'static str,
}

pub const DEFAULT_INTERPOLATION_CONFIG: InterpolationConfig = InterpolationConfig {
    start: "{{",
    end: "}}",
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Parser Error: {message} in [{input}]")]
pub struct ParserError {
    pub message: String,
    pub input: String,
    /// Absolute offset of the offending token.
    pub location: usize,
}

pub type Result<T> = std::result::Result<T, ParserError>;

/// Interpolation piece (text between or inside the markers)
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationPiece {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Split interpolation result
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInterpolation {
    pub strings: Vec<InterpolationPiece>,
    pub expressions: Vec<InterpolationPiece>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseFlags {
    None,
    Action,
}

#[derive(Debug, Default)]
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new() -> Self {
        Parser { lexer: Lexer::new() }
    }

    /// Parse an action expression (event handler)
    pub fn parse_action(&self, input: &str, absolute_offset: usize) -> Result<AST> {
        self.parse(input, absolute_offset, ParseFlags::Action)
    }

    /// Parse a binding expression (property binding)
    pub fn parse_binding(&self, input: &str, absolute_offset: usize) -> Result<AST> {
        self.parse(input, absolute_offset, ParseFlags::None)
    }

    fn parse(&self, input: &str, absolute_offset: usize, flags: ParseFlags) -> Result<AST> {
        let tokens = self.lexer.tokenize(input);
        let mut parse_ast = ParseAST::new(input, absolute_offset, tokens, flags);
        parse_ast.parse_chain()
    }

    /// Parse text containing interpolations. Returns `None` when the text
    /// has no interpolation at all.
    pub fn parse_interpolation(
        &self,
        input: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
    ) -> Result<Option<Interpolation>> {
        let parts = self.split_interpolation(input, absolute_offset, config);
        if parts.expressions.is_empty() {
            return Ok(None);
        }

        let mut expressions = Vec::with_capacity(parts.expressions.len());
        for piece in &parts.expressions {
            if piece.text.trim().is_empty() {
                return Err(ParserError {
                    message: "Blank expressions are not allowed in interpolated strings".to_string(),
                    input: input.to_string(),
                    location: piece.start,
                });
            }
            expressions.push(self.parse_binding(&piece.text, piece.start)?);
        }

        Ok(Some(Interpolation {
            strings: parts.strings.into_iter().map(|piece| piece.text).collect(),
            expressions,
            span: ParseSpan::new(absolute_offset, absolute_offset + input.len()),
        }))
    }

    /// Split text on interpolation markers. An opening marker without a
    /// matching end marker is kept as text.
    pub fn split_interpolation(
        &self,
        input: &str,
        absolute_offset: usize,
        config: &InterpolationConfig,
    ) -> SplitInterpolation {
        let mut strings = Vec::new();
        let mut expressions = Vec::new();
        let mut text_start = 0;
        let mut cursor = 0;

        while let Some(found) = input[cursor..].find(config.start) {
            let expr_start = cursor + found + config.start.len();
            let Some(expr_end) = find_interpolation_end(input, expr_start, config.end) else {
                break;
            };
            strings.push(InterpolationPiece {
                text: input[text_start..cursor + found].to_string(),
                start: absolute_offset + text_start,
                end: absolute_offset + cursor + found,
            });
            expressions.push(InterpolationPiece {
                text: input[expr_start..expr_end].to_string(),
                start: absolute_offset + expr_start,
                end: absolute_offset + expr_end,
            });
            cursor = expr_end + config.end.len();
            text_start = cursor;
        }

        strings.push(InterpolationPiece {
            text: input[text_start..].to_string(),
            start: absolute_offset + text_start,
            end: absolute_offset + input.len(),
        });
        SplitInterpolation { strings, expressions }
    }
}

/// Find the end marker, ignoring markers inside quoted strings.
fn find_interpolation_end(input: &str, from: usize, end_marker: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, ch) in input[from..].char_indices() {
        let at = from + i;
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                }
            }
            None => {
                if ch == '\'' || ch == '"' || ch == '`' {
                    quote = Some(ch);
                } else if input[at..].starts_with(end_marker) {
                    return Some(at);
                }
            }
        }
    }
    None
}

struct ParseAST<'i> {
    input: &'i str,
    offset: usize,
    tokens: Vec<Token>,
    index: usize,
    flags: ParseFlags,
}

impl<'i> ParseAST<'i> {
    fn new(input: &'i str, offset: usize, tokens: Vec<Token>, flags: ParseFlags) -> Self {
        ParseAST {
            input,
            offset,
            tokens,
            index: 0,
            flags,
        }
    }

    fn next(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Absolute position where the next token starts.
    fn input_index(&self) -> usize {
        self.offset + self.next().map_or(self.input.len(), |t| t.index)
    }

    /// Absolute position where the previous token ended.
    fn prev_end(&self) -> usize {
        match self.index {
            0 => self.offset,
            i => self.offset + self.tokens[i - 1].end,
        }
    }

    fn span(&self, start: usize) -> ParseSpan {
        ParseSpan::new(start, self.prev_end().max(start))
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T> {
        let location = match self.next() {
            Some(token) => format!(" at column {}", token.index + 1),
            None => " at the end of the expression".to_string(),
        };
        Err(ParserError {
            message: format!("{}{}", message.into(), location),
            input: self.input.to_string(),
            location: self.input_index(),
        })
    }

    fn consume_optional_character(&mut self, code: char) -> bool {
        if self.next().is_some_and(|t| t.is_character(code)) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn consume_optional_operator(&mut self, op: &str) -> bool {
        if self.next().is_some_and(|t| t.is_operator(op)) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect_character(&mut self, code: char) -> Result<()> {
        if self.consume_optional_character(code) {
            return Ok(());
        }
        self.error(format!("Missing expected {}", code))
    }

    fn expect_identifier(&mut self) -> Result<String> {
        match self.next() {
            Some(token) if token.is_identifier() || token.token_type == TokenType::Keyword => {
                let name = token.str_value.clone();
                self.index += 1;
                Ok(name)
            }
            Some(token) => {
                let text = token.str_value.clone();
                self.error(format!("Unexpected token {}, expected identifier or keyword", text))
            }
            None => self.error("Unexpected end of input, expected identifier or keyword"),
        }
    }

    fn parse_chain(&mut self) -> Result<AST> {
        if let Some(token) = self.next().filter(|t| t.is_error()) {
            let message = format!("Lexer Error: {}", token.str_value);
            return self.error(message);
        }
        if self.next().is_none() {
            return Ok(AST::EmptyExpr(ParseSpan::new(self.offset, self.offset + self.input.len())));
        }

        let expr = self.parse_pipe()?;
        let mut chained = false;
        while self.consume_optional_character(';') {
            chained = true;
        }

        match self.next() {
            None => Ok(expr),
            Some(token) if token.is_error() => {
                let message = format!("Lexer Error: {}", token.str_value);
                self.error(message)
            }
            Some(_) if chained && self.flags == ParseFlags::Action => {
                self.error("Multiple statements in an event handler are not supported")
            }
            Some(_) if chained => self.error("Binding expression cannot contain chained expression"),
            Some(token) => {
                let text = token.str_value.clone();
                self.error(format!("Unexpected token '{}'", text))
            }
        }
    }

    fn parse_pipe(&mut self) -> Result<AST> {
        let expr = self.parse_expression()?;
        if self.next().is_some_and(|t| t.is_operator("|")) {
            return self.error("Pipes are not supported");
        }
        if self.next().is_some_and(|t| t.is_operator("=")) {
            return self.error("Assignments are not supported");
        }
        Ok(expr)
    }

    fn parse_expression(&mut self) -> Result<AST> {
        self.parse_conditional()
    }

    fn parse_conditional(&mut self) -> Result<AST> {
        let start = self.input_index();
        let condition = self.parse_logical_or()?;

        if !self.consume_optional_operator("?") {
            return Ok(condition);
        }
        let true_exp = self.parse_pipe()?;
        if !self.consume_optional_character(':') {
            return self.error("Conditional expression requires all 3 expressions");
        }
        let false_exp = self.parse_pipe()?;
        Ok(AST::Conditional(Conditional {
            condition: Box::new(condition),
            true_exp: Box::new(true_exp),
            false_exp: Box::new(false_exp),
            span: self.span(start),
        }))
    }

    fn binary(&self, start: usize, operation: &str, left: AST, right: AST) -> AST {
        AST::Binary(Binary {
            operation: operation.to_string(),
            left: Box::new(left),
            right: Box::new(right),
            span: self.span(start),
        })
    }

    /// One left-associative precedence level.
    fn parse_binary_level(
        &mut self,
        operators: &[&str],
        operand: fn(&mut Self) -> Result<AST>,
    ) -> Result<AST> {
        let start = self.input_index();
        let mut result = operand(self)?;
        loop {
            let Some(op) = self
                .next()
                .and_then(|t| operators.iter().find(|op| t.is_operator(op)))
                .copied()
            else {
                return Ok(result);
            };
            self.index += 1;
            let right = operand(self)?;
            result = self.binary(start, op, result, right);
        }
    }

    fn parse_logical_or(&mut self) -> Result<AST> {
        self.parse_binary_level(&["||"], Self::parse_logical_and)
    }

    fn parse_logical_and(&mut self) -> Result<AST> {
        self.parse_binary_level(&["&&"], Self::parse_nullish_coalescing)
    }

    fn parse_nullish_coalescing(&mut self) -> Result<AST> {
        self.parse_binary_level(&["??"], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<AST> {
        self.parse_binary_level(&["==", "!=", "===", "!=="], Self::parse_relational)
    }

    fn parse_relational(&mut self) -> Result<AST> {
        self.parse_binary_level(&["<", ">", "<=", ">="], Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Result<AST> {
        self.parse_binary_level(&["+", "-"], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Result<AST> {
        self.parse_binary_level(&["*", "%", "/"], Self::parse_prefix)
    }

    fn parse_prefix(&mut self) -> Result<AST> {
        let start = self.input_index();
        let operator = match self.next() {
            Some(token) if token.is_operator("+") => '+',
            Some(token) if token.is_operator("-") => '-',
            Some(token) if token.is_operator("!") => '!',
            _ => return self.parse_call_chain(),
        };
        self.index += 1;
        let expression = Box::new(self.parse_prefix()?);
        let span = self.span(start);
        if operator == '!' {
            Ok(AST::PrefixNot(PrefixNot { expression, span }))
        } else {
            Ok(AST::Unary(Unary {
                operator,
                expr: expression,
                span,
            }))
        }
    }

    fn parse_call_chain(&mut self) -> Result<AST> {
        let start = self.input_index();
        let mut result = self.parse_primary()?;
        loop {
            if self.consume_optional_character('.') {
                let name = self.expect_identifier()?;
                result = AST::PropertyRead(PropertyRead {
                    receiver: Box::new(result),
                    name,
                    span: self.span(start),
                });
            } else if self.consume_optional_character('[') {
                let key = self.parse_pipe()?;
                self.expect_character(']')?;
                result = AST::KeyedRead(KeyedRead {
                    receiver: Box::new(result),
                    key: Box::new(key),
                    span: self.span(start),
                });
            } else if self.consume_optional_character('(') {
                let args = self.parse_call_arguments()?;
                self.expect_character(')')?;
                result = AST::Call(Call {
                    receiver: Box::new(result),
                    args,
                    span: self.span(start),
                });
            } else if self.next().is_some_and(|t| t.is_operator("?.")) {
                return self.error("Safe navigation is not supported");
            } else {
                return Ok(result);
            }
        }
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<AST>> {
        let mut args = Vec::new();
        if self.next().is_some_and(|t| t.is_character(')')) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_pipe()?);
            if !self.consume_optional_character(',') {
                return Ok(args);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<AST> {
        let start = self.input_index();
        let Some(token) = self.next().cloned() else {
            return self.error("Unexpected end of expression");
        };

        if token.is_character('(') {
            self.index += 1;
            let expression = self.parse_pipe()?;
            self.expect_character(')')?;
            return Ok(AST::ParenthesizedExpression(ParenthesizedExpression {
                expression: Box::new(expression),
                span: self.span(start),
            }));
        }
        if token.is_character('[') {
            self.index += 1;
            let mut expressions = Vec::new();
            if !self.next().is_some_and(|t| t.is_character(']')) {
                loop {
                    expressions.push(self.parse_pipe()?);
                    if !self.consume_optional_character(',') {
                        break;
                    }
                }
            }
            self.expect_character(']')?;
            return Ok(AST::LiteralArray(LiteralArray {
                expressions,
                span: self.span(start),
            }));
        }
        if token.is_character('{') {
            return self.error("Object literals are not supported");
        }

        let literal = match token.token_type {
            TokenType::Keyword => match token.str_value.as_str() {
                "null" => Some(LiteralPrimitive::Null),
                "undefined" => Some(LiteralPrimitive::Undefined),
                "true" => Some(LiteralPrimitive::Boolean(true)),
                "false" => Some(LiteralPrimitive::Boolean(false)),
                "this" => {
                    self.index += 1;
                    return Ok(AST::ImplicitReceiver(self.span(start)));
                }
                other => return self.error(format!("Unexpected keyword {}", other)),
            },
            TokenType::Number => Some(LiteralPrimitive::Number(token.num_value)),
            TokenType::String => Some(LiteralPrimitive::String(token.str_value.clone())),
            TokenType::Identifier => None,
            TokenType::Error => return self.error(format!("Lexer Error: {}", token.str_value)),
            _ => return self.error(format!("Unexpected token {}", token.str_value)),
        };
        self.index += 1;

        match literal {
            Some(value) => Ok(AST::LiteralPrimitive(value, self.span(start))),
            None => Ok(AST::PropertyRead(PropertyRead {
                receiver: Box::new(AST::ImplicitReceiver(ParseSpan::new(start, start))),
                name: token.str_value,
                span: self.span(start),
            })),
        }
    }
}
