//! Compiler errors

use thiserror::Error;

/// Failures while lowering a parsed template into a component definition.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Unsupported binary operator \"{0}\" in template expression")]
    UnsupportedOperator(String),

    #[error("Unsupported unary operator \"{0}\" in template expression")]
    UnsupportedUnaryOperator(char),

    #[error("Missing dependency information for the @defer block at offset {0}")]
    MissingDeferBlock(usize),
}

pub type Result<T> = std::result::Result<T, CompileError>;
