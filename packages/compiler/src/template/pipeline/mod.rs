//! Template Pipeline
//!
//! `ir` holds the operations; `src` ingests templates, runs the phases and
//! emits template functions.

#[path = "ir/src/mod.rs"]
pub mod ir;
pub mod src;
