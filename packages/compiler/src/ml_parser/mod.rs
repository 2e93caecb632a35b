//! ML (Markup Language) Parser Module
//!
//! Parses template markup into a node tree.

pub mod ast;
pub mod html_whitespaces;
pub mod parser;
pub mod tags;

pub use ast::*;
pub use html_whitespaces::remove_whitespaces;
pub use parser::{ParseTreeResult, Parser};
pub use tags::is_void_element;
