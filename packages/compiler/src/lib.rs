#![deny(clippy::all)]

//! ngxc compiler
//!
//! Parses Angular-flavoured templates and compiles component metadata into
//! `ɵɵdefineComponent` expressions, with a print-mode emitter for the
//! resulting expression IR.

pub mod constant_pool;
pub mod directive_matching;
pub mod error;
pub mod parse_util;

// Parsers
pub mod expression_parser;
pub mod ml_parser;
pub mod template_parser;

// Compilation
pub mod output;
pub mod render3;
pub mod template;

pub use constant_pool::ConstantPool;
pub use error::CompileError;
pub use render3::view::{
    compile_component_from_metadata, make_binding_parser, parse_template, DEFAULT_INTERPOLATION_CONFIG,
};
