//! Component compiler
//!
//! Source-to-source transform turning TSX component functions into Angular
//! component definitions.

pub mod core;
pub mod transform;
pub mod translator;
