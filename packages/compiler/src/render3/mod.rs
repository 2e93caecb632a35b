//! Render3 Module
//!
//! Render tree, template transform and the component definition compiler.

pub mod r3_ast;
pub mod r3_identifiers;
pub mod r3_template_transform;
pub mod view;

pub use r3_identifiers::Identifiers;
pub use r3_template_transform::{html_ast_to_render3_ast, Render3ParseResult};
