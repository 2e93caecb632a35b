use ngxc_compiler::output::output_ast::WrappedNode;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ImportRequest<TFile> {
    /// Name of the export to be imported.
    pub export_symbol_name: String,

    /// Module specifier to be imported.
    pub export_module_specifier: String,

    /// File for which the import is requested. Only used to word errors.
    pub requested_file: TFile,
}

/// Resolves references that leave the IR: exports of other modules, and
/// nodes of the host file wrapped into it.
pub trait ImportGenerator<TFile, TExpression> {
    /// Resolves a reference to another module's export into an expression
    /// usable at the current position, recording whatever import that requires.
    fn add_import(&mut self, request: ImportRequest<TFile>) -> Result<TExpression>;

    fn resolve_wrapped_node(&mut self, node: &WrappedNode) -> Result<TExpression>;
}
