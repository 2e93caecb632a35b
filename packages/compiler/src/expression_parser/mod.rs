//! Expression Parser Module
//!
//! Lexer, AST and parser for the expressions found in bindings, event
//! handlers, block parameters and text interpolations.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::{InterpolationConfig, Parser, ParserError, DEFAULT_INTERPOLATION_CONFIG};
