#![deny(clippy::all)]

/**
 * ngxc - TSX component compiler
 *
 * Rewrites TSX component functions into Angular component definitions.
 */
// Template compiler, re-exported for consumers of the transform output
pub use ngxc_compiler as compiler;

pub mod config;
pub mod error;
pub mod main_entry;
pub mod ngtsc;

pub use error::{Result, TransformError};
pub use ngtsc::core::{compile_file, compile_file_with_options, emit_definitions, CompileOptions};

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
