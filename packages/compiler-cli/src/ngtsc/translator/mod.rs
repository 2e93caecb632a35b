//! Translator
//!
//! Turns the compiler's expression IR into oxc AST nodes.

pub mod src;
