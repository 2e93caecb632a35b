//! Output Module
//!
//! Expression IR and its print-mode emitter.

pub mod abstract_emitter;
pub mod output_ast;
