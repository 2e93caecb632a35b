//! Transform errors
//!
//! Every failure that aborts the compilation of a single file. Messages name
//! the offending construct so they can be shown to the component author as is.

use ngxc_compiler::output::abstract_emitter::EmitError;
use ngxc_compiler::CompileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Failed to read {file}: {message}")]
    Read { file: String, message: String },

    #[error("Failed to parse {file}: {message}")]
    SourceParse { file: String, message: String },

    /// A destructured input binding that is not `key = input(...)` or
    /// `key = input.required(...)`.
    #[error("Malformed input declaration for \"{property}\": {reason}")]
    MalformedInputDeclaration { property: String, reason: String },

    #[error("Template returned from \"{function}\" is not inside a component function declaration")]
    OrphanedTemplateReturn { function: String },

    #[error("Component \"{component}\" returns more than one template")]
    MultipleTemplateReturns { component: String },

    #[error("Template of \"{component}\" failed to parse: {message}")]
    TemplateParse { component: String, message: String },

    #[error("Unsupported operator {operator}")]
    UnsupportedOperator { operator: String },

    #[error("Unsupported literal type {literal}")]
    UnsupportedLiteralType { literal: String },

    #[error("Unsupported node {kind}")]
    UnsupportedNode { kind: String },

    #[error("Unexpected import {name} from {module} in {file}")]
    UnexpectedImport { name: String, module: String, file: String },

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
