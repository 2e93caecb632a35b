pub mod ast_factory;
pub mod import_generator;
