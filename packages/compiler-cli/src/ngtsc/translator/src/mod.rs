pub mod api;
pub mod context;
pub mod core_imports;
pub mod translator;
pub mod ts_util;
pub mod typescript_ast_factory;

pub use context::Context;
pub use core_imports::{CoreImportGenerator, ImportSet};
pub use translator::{ExpressionTranslatorVisitor, TranslatorOptions};
pub use typescript_ast_factory::TypeScriptAstFactory;
