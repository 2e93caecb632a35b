//! File compiler
//!
//! Drives one source file through the component transform: parse, extract
//! component functions, synthesize a definition for each of them and print
//! the rewritten program with a single `@angular/core` import in front.

use std::iter::Peekable;

use ngxc_compiler::output::abstract_emitter::{
    AbstractEmitterVisitor, EmitError, EmitterVisitorContext, ExternalReferenceResolver,
};
use ngxc_compiler::output::output_ast as o;
use ngxc_compiler::render3::r3_identifiers::CORE;
use oxc_allocator::{Allocator, Vec as ArenaVec};
use oxc_ast::ast::{
    Declaration, ExportDefaultDeclarationKind, Function, ImportDeclarationSpecifier, ImportOrExportKind,
    ModuleExportName, Program, Statement, WithClause,
};
use oxc_ast::AstBuilder;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::{SourceType, SPAN};
use tracing::{info, warn};

use crate::error::{Result, TransformError};
use crate::ngtsc::transform::src::{compile_definition, selector_tag_helper, synthesize, CompiledDefinition};
use crate::ngtsc::transform::{
    extract_components, shield_blocks, HelperRequests, SynthesisContext, SynthesisStrategy,
};
use crate::ngtsc::translator::src::{ImportSet, TypeScriptAstFactory};

/// Options shared by every file of a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    pub strategy: SynthesisStrategy,
    /// Escape `$` in string literals printed by [`emit_definitions`].
    pub escape_dollar_in_strings: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strategy: SynthesisStrategy::default(),
            escape_dollar_in_strings: true,
        }
    }
}

/// Compiles `source_text` with the default options.
pub fn compile_file(file_name: &str, source_text: &str) -> Result<String> {
    compile_file_with_options(file_name, source_text, &CompileOptions::default())
}

pub fn compile_file_with_options(file_name: &str, source_text: &str, options: &CompileOptions) -> Result<String> {
    let shielded = shield_blocks(source_text);
    let allocator = Allocator::default();
    let mut program = parse_program(&allocator, file_name, &shielded)?;

    // Block markers are blanked in the parsed text only; templates are cut
    // from the original, which has the same byte offsets.
    let candidates = extract_components(&program, source_text)?;
    if candidates.is_empty() {
        warn!(file = file_name, "no component functions found");
        return Ok(Codegen::new().build(&program).code);
    }

    let ast = AstBuilder::new(&allocator);
    let factory = TypeScriptAstFactory::new(ast);
    let mut imports = ImportSet::default();
    let mut helpers = HelperRequests::default();
    let mut trailing = Vec::with_capacity(candidates.len());

    let mut cx = SynthesisContext {
        factory,
        file_name,
        strategy: options.strategy,
        imports: &mut imports,
        helpers: &mut helpers,
    };
    for candidate in &candidates {
        let function = program
            .body
            .get_mut(candidate.statement_index)
            .and_then(component_function_mut)
            .ok_or_else(|| TransformError::UnsupportedNode {
                kind: format!("component declaration {}", candidate.name),
            })?;
        let synthesized = synthesize(candidate, function, &mut cx)?;
        trailing.push((candidate.statement_index, synthesized.trailing));
    }

    splice_trailing(ast, &mut program, trailing.into_iter().peekable());

    for name in existing_core_imports(&program) {
        imports.remove(&name);
    }
    if !imports.is_empty() {
        program.body.insert(0, core_import_declaration(ast, &imports));
    }
    if helpers.selector_tag {
        program.body.push(selector_tag_helper(&factory)?);
    }

    info!(
        file = file_name,
        components = candidates.len(),
        imports = imports.len(),
        strategy = %options.strategy,
        "compiled file"
    );
    Ok(Codegen::new().build(&program).code)
}

/// Prints the compiled definition and hoisted template functions of every
/// component in `source_text`, without touching the surrounding code.
pub fn emit_definitions(file_name: &str, source_text: &str, options: &CompileOptions) -> Result<String> {
    let shielded = shield_blocks(source_text);
    let allocator = Allocator::default();
    let program = parse_program(&allocator, file_name, &shielded)?;
    let candidates = extract_components(&program, source_text)?;

    let mut visitor = AbstractEmitterVisitor::new(BareNames, options.escape_dollar_in_strings);
    let mut sections = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        let CompiledDefinition { definition, hoisted } = compile_definition(candidate, file_name)?;

        let mut ctx = EmitterVisitorContext::create_root();
        ctx.println(&format!("// {}", candidate.name));
        visitor.visit_all_statements(&hoisted, &mut ctx)?;
        definition.visit_expression(&mut visitor, &mut ctx)?;
        ctx.println(";");
        sections.push(ctx.to_source());
    }
    Ok(sections.join("\n"))
}

/// Refers to runtime symbols by their bare exported name.
struct BareNames;

impl ExternalReferenceResolver for BareNames {
    fn resolve_external_reference(&mut self, reference: &o::ExternalReference) -> std::result::Result<String, EmitError> {
        reference.name.clone().ok_or_else(|| EmitError::UnnamedReference {
            module: reference.module_name.clone().unwrap_or_default(),
        })
    }
}

fn parse_program<'a>(allocator: &'a Allocator, file_name: &str, source_text: &'a str) -> Result<Program<'a>> {
    let source_type = SourceType::from_path(file_name).unwrap_or_else(|_| SourceType::tsx()).with_jsx(true);
    let ret = Parser::new(allocator, source_text, source_type).parse();
    if let Some(error) = ret.errors.first() {
        return Err(TransformError::SourceParse {
            file: file_name.to_string(),
            message: error.to_string(),
        });
    }
    Ok(ret.program)
}

fn component_function_mut<'s, 'a>(statement: &'s mut Statement<'a>) -> Option<&'s mut Function<'a>> {
    match statement {
        Statement::FunctionDeclaration(function) => Some(&mut **function),
        Statement::ExportNamedDeclaration(export) => match &mut export.declaration {
            Some(Declaration::FunctionDeclaration(function)) => Some(&mut **function),
            _ => None,
        },
        Statement::ExportDefaultDeclaration(export) => match &mut export.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(function) => Some(&mut **function),
            _ => None,
        },
        _ => None,
    }
}

/// Rebuilds the program body with each component's trailing statements
/// right after its function. `trailing` is ordered by statement index.
fn splice_trailing<'a, I>(ast: AstBuilder<'a>, program: &mut Program<'a>, mut trailing: Peekable<I>)
where
    I: Iterator<Item = (usize, Vec<Statement<'a>>)>,
{
    let original = std::mem::replace(&mut program.body, ast.vec());
    for (index, statement) in original.into_iter().enumerate() {
        program.body.push(statement);
        while let Some((_, statements)) = trailing.next_if(|(at, _)| *at == index) {
            for statement in statements {
                program.body.push(statement);
            }
        }
    }
}

/// Names the program already imports, unaliased, from `@angular/core`.
fn existing_core_imports(program: &Program<'_>) -> Vec<String> {
    program
        .body
        .iter()
        .filter_map(|statement| match statement {
            Statement::ImportDeclaration(import) if import.source.value.as_str() == CORE => import.specifiers.as_ref(),
            _ => None,
        })
        .flatten()
        .filter_map(|specifier| match specifier {
            ImportDeclarationSpecifier::ImportSpecifier(spec) if spec.imported.name() == spec.local.name => {
                Some(spec.local.name.to_string())
            }
            _ => None,
        })
        .collect()
}

/// `import { a, b } from "@angular/core";`
fn core_import_declaration<'a>(ast: AstBuilder<'a>, imports: &ImportSet) -> Statement<'a> {
    let mut specifiers = ArenaVec::new_in(ast.allocator);
    for name in imports.names() {
        let local = ast.binding_identifier(SPAN, ast.atom(name));
        let imported = ModuleExportName::IdentifierName(ast.identifier_name(SPAN, ast.atom(name)));
        specifiers.push(ImportDeclarationSpecifier::ImportSpecifier(ast.alloc(ast.import_specifier(
            SPAN,
            imported,
            local,
            ImportOrExportKind::Value,
        ))));
    }

    let source = ast.string_literal(SPAN, ast.atom(CORE), None);
    Statement::from(ast.module_declaration_import_declaration(
        SPAN,
        Some(specifiers),
        source,
        None,
        None::<oxc_allocator::Box<'_, WithClause<'_>>>,
        ImportOrExportKind::Value,
    ))
}
