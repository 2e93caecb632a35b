//! Template Module
//!
//! Lowering of parsed templates into Ivy template functions.

pub mod pipeline;
