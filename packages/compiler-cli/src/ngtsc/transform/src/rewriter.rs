//! Generated code rewriters
//!
//! Passes over the translated definition and template code:
//!
//! * [`ContextQualifierStripper`] turns `ctx.member` (and `ctx_r1.member`)
//!   into `member`, so a template closure reads the bindings in scope of the
//!   component function instead of a component instance.
//! * [`SelectorTagRewriter`] resolves capitalised element tags to the
//!   selector of the referenced component.

use indexmap::IndexSet;
use ngxc_compiler::render3::Identifiers;
use once_cell::sync::Lazy;
use oxc_ast::ast::{Argument, CallExpression, Expression, SimpleAssignmentTarget, Statement};
use oxc_ast::{AstBuilder, NONE};
use oxc_ast_visit::{walk_mut, VisitMut};
use oxc_span::{Atom, SPAN};
use regex::Regex;

use crate::error::Result;
use crate::ngtsc::translator::src::api::ast_factory::{AstFactory, LiteralValue};
use crate::ngtsc::translator::src::typescript_ast_factory::TypeScriptAstFactory;

static CONTEXT_QUALIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ctx(_r\d+)?$").unwrap());

/// Name of the file-local helper returning a component's element selector.
pub const SELECTOR_TAG_HELPER: &str = "ɵɵselectorTag";

fn is_context_reference(expression: &Expression<'_>) -> bool {
    matches!(expression, Expression::Identifier(identifier) if CONTEXT_QUALIFIER.is_match(&identifier.name))
}

pub struct ContextQualifierStripper<'a> {
    ast: AstBuilder<'a>,
    stripped: usize,
}

impl<'a> ContextQualifierStripper<'a> {
    pub fn new(ast: AstBuilder<'a>) -> Self {
        Self { ast, stripped: 0 }
    }

    pub fn strip_statements(&mut self, statements: &mut [Statement<'a>]) {
        for statement in statements {
            self.visit_statement(statement);
        }
    }

    /// Number of member accesses rewritten so far.
    pub fn stripped(&self) -> usize {
        self.stripped
    }

    fn qualified_member(expression: &Expression<'a>) -> Option<Atom<'a>> {
        match expression {
            Expression::StaticMemberExpression(member) if is_context_reference(&member.object) => {
                Some(member.property.name)
            }
            _ => None,
        }
    }
}

impl<'a> VisitMut<'a> for ContextQualifierStripper<'a> {
    fn visit_expression(&mut self, expression: &mut Expression<'a>) {
        match Self::qualified_member(expression) {
            Some(name) => {
                *expression = self.ast.expression_identifier(SPAN, name);
                self.stripped += 1;
            }
            None => walk_mut::walk_expression(self, expression),
        }
    }

    fn visit_simple_assignment_target(&mut self, target: &mut SimpleAssignmentTarget<'a>) {
        if let SimpleAssignmentTarget::StaticMemberExpression(member) = target {
            if is_context_reference(&member.object) {
                let name = member.property.name;
                *target = SimpleAssignmentTarget::AssignmentTargetIdentifier(
                    self.ast.alloc_identifier_reference(SPAN, name),
                );
                self.stripped += 1;
                return;
            }
        }
        walk_mut::walk_simple_assignment_target(self, target);
    }
}

/// Rewrites `ɵɵelementStart(i, "Tag", ...)` and `ɵɵelement(i, "Tag", ...)`
/// calls whose tag contains an uppercase letter into
/// `ɵɵelementStart(i, ɵɵselectorTag(Tag), ...)`, collecting the referenced
/// components.
pub struct SelectorTagRewriter<'a> {
    ast: AstBuilder<'a>,
    element_instructions: [String; 2],
    dependencies: IndexSet<String>,
}

impl<'a> SelectorTagRewriter<'a> {
    pub fn new(ast: AstBuilder<'a>) -> Self {
        let name = |reference: ngxc_compiler::output::output_ast::ExternalReference| {
            reference.name.unwrap_or_default()
        };
        Self {
            ast,
            element_instructions: [name(Identifiers::element_start()), name(Identifiers::element())],
            dependencies: IndexSet::new(),
        }
    }

    pub fn rewrite_statements(&mut self, statements: &mut [Statement<'a>]) {
        for statement in statements {
            self.visit_statement(statement);
        }
    }

    /// Referenced component names, in first-use order.
    pub fn into_dependencies(self) -> IndexSet<String> {
        self.dependencies
    }

    fn is_element_instruction(&self, callee: &Expression<'a>) -> bool {
        matches!(callee, Expression::Identifier(identifier)
            if self.element_instructions.iter().any(|name| identifier.name == name.as_str()))
    }
}

impl<'a> VisitMut<'a> for SelectorTagRewriter<'a> {
    fn visit_call_expression(&mut self, call: &mut CallExpression<'a>) {
        walk_mut::walk_call_expression(self, call);

        if !self.is_element_instruction(&call.callee) {
            return;
        }
        let tag = match call.arguments.get(1) {
            Some(Argument::StringLiteral(literal)) if literal.value.chars().any(char::is_uppercase) => literal.value,
            _ => return,
        };

        let selector = self.ast.expression_call(
            SPAN,
            self.ast.expression_identifier(SPAN, SELECTOR_TAG_HELPER),
            NONE,
            self.ast.vec1(Argument::from(self.ast.expression_identifier(SPAN, tag))),
            false,
        );
        call.arguments[1] = Argument::from(selector);
        self.dependencies.insert(tag.to_string());
    }
}

/// `function ɵɵselectorTag(C) { return C.ɵcmp.selectors[0][0]; }`
pub fn selector_tag_helper<'a>(factory: &TypeScriptAstFactory<'a>) -> Result<Statement<'a>> {
    let selectors = factory.create_property_access(
        factory.create_property_access(factory.create_identifier("C"), "ɵcmp"),
        "selectors",
    );
    let first = factory.create_element_access(
        factory.create_element_access(selectors, factory.create_literal(LiteralValue::Number(0.0))?),
        factory.create_literal(LiteralValue::Number(0.0))?,
    );
    Ok(factory.create_function_declaration(
        SELECTOR_TAG_HELPER,
        &["C".to_string()],
        vec![factory.create_return_statement(Some(first))],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_codegen::Codegen;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    fn squash(code: &str) -> String {
        code.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn rewrite(source: &str, pass: impl for<'a> FnOnce(AstBuilder<'a>, &mut oxc_ast::ast::Program<'a>)) -> String {
        let allocator = Allocator::default();
        let mut program = Parser::new(&allocator, source, SourceType::mjs()).parse().program;
        pass(AstBuilder::new(&allocator), &mut program);
        squash(&Codegen::new().build(&program).code)
    }

    #[test]
    fn should_strip_context_qualifiers() {
        let code = rewrite("ctx.count(); ctx_r2.inc(); notctx.value; ctx.a.b;", |ast, program| {
            let mut stripper = ContextQualifierStripper::new(ast);
            stripper.strip_statements(&mut program.body);
            assert_eq!(stripper.stripped(), 3);
        });
        assert_eq!(code, "count(); inc(); notctx.value; a.b;");
    }

    #[test]
    fn should_strip_assignment_targets_and_nested_functions() {
        let code = rewrite("ctx.x = 1; function f() { return () => ctx_r1.y; }", |ast, program| {
            ContextQualifierStripper::new(ast).strip_statements(&mut program.body);
        });
        assert_eq!(code, "x = 1; function f() { return () => y; }");
    }

    #[test]
    fn should_leave_ctx_r_without_digits() {
        let code = rewrite("ctx_r.value; ctx_rx.value;", |ast, program| {
            ContextQualifierStripper::new(ast).strip_statements(&mut program.body);
        });
        assert_eq!(code, "ctx_r.value; ctx_rx.value;");
    }

    #[test]
    fn should_resolve_component_tags() {
        let code = rewrite("ɵɵelementStart(0, \"Counter\"); ɵɵelement(1, \"span\"); ɵɵelement(2, \"Badge\", 0);", |ast, program| {
            let mut rewriter = SelectorTagRewriter::new(ast);
            rewriter.rewrite_statements(&mut program.body);
            assert_eq!(rewriter.into_dependencies().into_iter().collect::<Vec<_>>(), vec!["Counter", "Badge"]);
        });
        assert_eq!(
            code,
            "ɵɵelementStart(0, ɵɵselectorTag(Counter)); ɵɵelement(1, \"span\"); ɵɵelement(2, ɵɵselectorTag(Badge), 0);"
        );
    }

    #[test]
    fn should_ignore_other_calls() {
        let code = rewrite("ɵɵtext(0, \"Hello\");", |ast, program| {
            let mut rewriter = SelectorTagRewriter::new(ast);
            rewriter.rewrite_statements(&mut program.body);
            assert!(rewriter.into_dependencies().is_empty());
        });
        assert_eq!(code, "ɵɵtext(0, \"Hello\");");
    }

    #[test]
    fn should_build_selector_tag_helper() {
        let code = rewrite("", |ast, program| {
            let helper = selector_tag_helper(&TypeScriptAstFactory::new(ast)).unwrap();
            program.body.push(helper);
        });
        assert_eq!(code, "function ɵɵselectorTag(C) { return C.ɵcmp.selectors[0][0]; }");
    }
}
