//! Pipeline Source Module

pub mod compilation;
pub mod conversion;
pub mod emit;
pub mod ingest;
pub mod instruction;
pub mod phases;

pub use compilation::*;
pub use emit::{emit_template_fn, transform};
pub use ingest::ingest_component;
