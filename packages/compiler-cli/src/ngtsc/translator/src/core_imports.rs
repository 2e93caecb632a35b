//! Core imports
//!
//! Every runtime symbol a generated definition references comes from
//! `@angular/core`. The generator here hands out bare identifiers and records
//! the names so the driver can emit one consolidated import per file.

use std::fmt;

use indexmap::IndexSet;
use ngxc_compiler::output::output_ast::WrappedNode;
use ngxc_compiler::render3::r3_identifiers::CORE;
use oxc_ast::ast::Expression;

use crate::error::{Result, TransformError};
use crate::ngtsc::translator::src::api::ast_factory::AstFactory;
use crate::ngtsc::translator::src::api::import_generator::{ImportGenerator, ImportRequest};
use crate::ngtsc::translator::src::typescript_ast_factory::TypeScriptAstFactory;

/// Deduplicated `@angular/core` symbol names, in first-use order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    names: IndexSet<String>,
}

impl ImportSet {
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.names.shift_remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

pub struct CoreImportGenerator<'s, 'a> {
    factory: TypeScriptAstFactory<'a>,
    imports: &'s mut ImportSet,
}

impl<'s, 'a> CoreImportGenerator<'s, 'a> {
    pub fn new(factory: TypeScriptAstFactory<'a>, imports: &'s mut ImportSet) -> Self {
        Self { factory, imports }
    }
}

impl<'s, 'a, TFile: fmt::Display> ImportGenerator<TFile, Expression<'a>> for CoreImportGenerator<'s, 'a> {
    fn add_import(&mut self, request: ImportRequest<TFile>) -> Result<Expression<'a>> {
        if request.export_module_specifier != CORE {
            return Err(TransformError::UnexpectedImport {
                name: request.export_symbol_name,
                module: request.export_module_specifier,
                file: request.requested_file.to_string(),
            });
        }
        let identifier = self.factory.create_identifier(&request.export_symbol_name);
        self.imports.insert(request.export_symbol_name);
        Ok(identifier)
    }

    /// Wrapped nodes name declarations of the file being compiled, which are
    /// in scope wherever the definition is spliced.
    fn resolve_wrapped_node(&mut self, node: &WrappedNode) -> Result<Expression<'a>> {
        match node {
            WrappedNode::Identifier(name) => Ok(self.factory.create_identifier(name)),
        }
    }
}
