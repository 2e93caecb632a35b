//! Render3 View Module
//!
//! Template parsing entry point, binding and component compilation.

pub mod api;
pub mod compiler;
pub mod t2_binder;
pub mod template;
pub mod util;

pub use api::*;
pub use compiler::compile_component_from_metadata;
pub use t2_binder::{BoundTarget, R3TargetBinder, Target};
pub use template::{
    make_binding_parser, parse_template, ParseTemplateOptions, ParsedTemplate, DEFAULT_INTERPOLATION_CONFIG,
};
