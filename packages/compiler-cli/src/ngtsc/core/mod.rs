//! Core
//!
//! Entry points compiling whole source files.

pub mod compiler;

pub use compiler::{compile_file, compile_file_with_options, emit_definitions, CompileOptions};
