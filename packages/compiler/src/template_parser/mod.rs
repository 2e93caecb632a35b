//! Template Parser Module

pub mod binding_parser;

pub use binding_parser::{BindingParser, BindingTarget, BindingType};
