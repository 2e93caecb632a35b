//! Render3 T2 Binder
//!
//! Walks a parsed template and records what later compilation stages need
//! to look up: the deferred blocks in document order and the directives
//! matched on each element.

use crate::directive_matching::SelectorMatcher;
use crate::render3::r3_ast::{self as t, DeferredBlock, Element};

/// A logical target for analysis.
#[derive(Debug, Clone, Copy)]
pub struct Target<'t> {
    pub template: &'t [t::R3Node],
}

/// Processes `Target`s with a given set of directives and performs binding.
#[derive(Debug)]
pub struct R3TargetBinder<D> {
    directive_matcher: SelectorMatcher<D>,
}

impl<D: Clone> R3TargetBinder<D> {
    pub fn new(directive_matcher: SelectorMatcher<D>) -> Self {
        R3TargetBinder { directive_matcher }
    }

    pub fn bind<'t>(&self, target: Target<'t>) -> BoundTarget<'t, D> {
        let mut scanner = TemplateScanner {
            matcher: &self.directive_matcher,
            defer_blocks: Vec::new(),
            directives: Vec::new(),
        };
        t::visit_all(&mut scanner, target.template);
        BoundTarget {
            target,
            defer_blocks: scanner.defer_blocks,
            directives: scanner.directives,
        }
    }
}

/// Result of performing the binding operation against a `Target`.
#[derive(Debug)]
pub struct BoundTarget<'t, D> {
    target: Target<'t>,
    defer_blocks: Vec<&'t DeferredBlock>,
    directives: Vec<(&'t Element, Vec<D>)>,
}

impl<'t, D> BoundTarget<'t, D> {
    pub fn target(&self) -> &Target<'t> {
        &self.target
    }

    /// Deferred blocks in document order, nested ones after their parent.
    pub fn get_defer_blocks(&self) -> &[&'t DeferredBlock] {
        &self.defer_blocks
    }

    pub fn get_directives_of_node(&self, node: &Element) -> Option<&[D]> {
        self.directives
            .iter()
            .find(|(element, _)| std::ptr::eq(*element, node))
            .map(|(_, directives)| directives.as_slice())
    }
}

struct TemplateScanner<'m, 't, D> {
    matcher: &'m SelectorMatcher<D>,
    defer_blocks: Vec<&'t DeferredBlock>,
    directives: Vec<(&'t Element, Vec<D>)>,
}

impl<'m, 't, D: Clone> t::Visitor<'t> for TemplateScanner<'m, 't, D> {
    type Result = ();

    fn visit_element(&mut self, element: &'t Element) {
        let matched = self.matcher.match_element(&element.name);
        if !matched.is_empty() {
            self.directives.push((element, matched.to_vec()));
        }
        t::visit_all(self, &element.children);
    }

    fn visit_text(&mut self, _text: &'t t::Text) {}

    fn visit_bound_text(&mut self, _text: &'t t::BoundText) {}

    fn visit_if_block(&mut self, block: &'t t::IfBlock) {
        for branch in &block.branches {
            t::visit_all(self, &branch.children);
        }
    }

    fn visit_deferred_block(&mut self, block: &'t DeferredBlock) {
        self.defer_blocks.push(block);
        t::visit_all(self, &block.children);
    }
}
