//! Ingest Module
//!
//! Builds a `ComponentCompilationJob` from render3 template nodes. Every
//! node gets a slot in its view; bindings become update ops on that slot,
//! and `@if` branches and `@defer` bodies become embedded views.

use crate::error::{CompileError, Result};
use crate::output::output_ast as o;
use crate::render3::r3_ast as t;
use crate::render3::view::api::R3ComponentDeferMetadata;
use crate::template::pipeline::ir;
use crate::template::pipeline::src::compilation::ComponentCompilationJob;
use crate::template::pipeline::src::conversion::{convert_ast, ConversionScope};
use crate::template_parser::binding_parser::BindingType;

/// Marker preceding bound property and event names in an element's
/// attribute array.
const BINDINGS_MARKER: usize = 3;

/// Process a template AST and convert it into a `ComponentCompilationJob`.
pub fn ingest_component(
    component_name: &str,
    template: &[t::R3Node],
    defer_meta: R3ComponentDeferMetadata,
) -> Result<ComponentCompilationJob> {
    let mut job = ComponentCompilationJob::new(component_name, defer_meta);
    let root = job.root_xref();
    ingest_nodes(&mut job, root, template)?;
    Ok(job)
}

fn ingest_nodes(job: &mut ComponentCompilationJob, view: ir::XrefId, nodes: &[t::R3Node]) -> Result<()> {
    let mut ingester = Ingester { job, view };
    t::visit_all(&mut ingester, nodes).into_iter().collect()
}

struct Ingester<'j> {
    job: &'j mut ComponentCompilationJob,
    view: ir::XrefId,
}

impl<'j> Ingester<'j> {
    fn depth(&self) -> usize {
        self.job.view(self.view).depth
    }

    /// Convert an expression evaluated in this view's update block.
    fn convert_update(&mut self, ast: &crate::expression_parser::AST) -> Result<o::Expression> {
        let unit = self.job.view(self.view);
        let mut scope = ConversionScope::update(unit.depth, unit.context_variable.clone());
        let expr = convert_ast(self.job, ast, &mut scope)?;
        self.job.view_mut(self.view).context_variable = scope.into_context_variable();
        Ok(expr)
    }

    fn push_create(&mut self, op: ir::CreateOp) {
        self.job.view_mut(self.view).create.push(op);
    }

    fn push_update(&mut self, op: ir::UpdateOp) {
        self.job.view_mut(self.view).update.push(op);
    }

    fn allocate_slot(&mut self) -> usize {
        self.job.view_mut(self.view).allocate_slot()
    }

    fn element_attributes(&mut self, element: &t::Element) -> Option<ir::ConstIndex> {
        let mut entries = Vec::new();
        for attr in &element.attributes {
            entries.push(o::literal(attr.name.as_str()));
            entries.push(o::literal(attr.value.as_str()));
        }

        let bound_names: Vec<&str> = element
            .inputs
            .iter()
            .filter(|input| input.type_ == BindingType::Property)
            .map(|input| input.name.as_str())
            .chain(element.outputs.iter().map(|output| output.name.as_str()))
            .collect();
        if !bound_names.is_empty() {
            entries.push(o::literal(BINDINGS_MARKER));
            entries.extend(bound_names.into_iter().map(o::literal));
        }

        if entries.is_empty() {
            None
        } else {
            Some(self.job.add_const(o::literal_arr(entries)))
        }
    }
}

impl<'a, 'j> t::Visitor<'a> for Ingester<'j> {
    type Result = Result<()>;

    fn visit_element(&mut self, element: &'a t::Element) -> Result<()> {
        let slot = self.allocate_slot();
        let attributes = self.element_attributes(element);
        self.push_create(ir::CreateOp::ElementStart(ir::ElementOp {
            slot,
            tag: element.name.clone(),
            attributes,
            source_span: Some(element.source_span.clone()),
        }));

        let depth = self.depth();
        for output in &element.outputs {
            let mut scope = ConversionScope::listener(depth);
            let handler = convert_ast(self.job, &output.handler, &mut scope)?;
            self.push_create(ir::CreateOp::Listener(ir::ListenerOp {
                target_slot: slot,
                tag: element.name.clone(),
                name: output.name.clone(),
                handler,
                consumes_dollar_event: scope.consumes_dollar_event(),
                context_variable: scope.into_context_variable(),
                handler_fn_name: None,
                source_span: Some(output.source_span.clone()),
            }));
        }

        let (styles, properties): (Vec<_>, Vec<_>) = element
            .inputs
            .iter()
            .partition(|input| input.type_ == BindingType::Style);
        for input in styles {
            let expression = self.convert_update(&input.value)?;
            self.push_update(ir::UpdateOp::StyleProp(ir::StylePropOp {
                target_slot: slot,
                name: hyphenate(&input.name),
                expression,
                unit: input.unit.clone(),
                source_span: Some(input.source_span.clone()),
            }));
        }
        for input in properties {
            let expression = self.convert_update(&input.value)?;
            self.push_update(ir::UpdateOp::Property(ir::PropertyOp {
                target_slot: slot,
                name: input.name.clone(),
                expression,
                source_span: Some(input.source_span.clone()),
            }));
        }

        t::visit_all(self, &element.children).into_iter().collect::<Result<()>>()?;
        self.push_create(ir::CreateOp::ElementEnd);
        Ok(())
    }

    fn visit_text(&mut self, text: &'a t::Text) -> Result<()> {
        let slot = self.allocate_slot();
        self.push_create(ir::CreateOp::Text(ir::TextOp {
            slot,
            initial_value: text.value.clone(),
            source_span: Some(text.source_span.clone()),
        }));
        Ok(())
    }

    fn visit_bound_text(&mut self, text: &'a t::BoundText) -> Result<()> {
        let slot = self.allocate_slot();
        self.push_create(ir::CreateOp::Text(ir::TextOp {
            slot,
            initial_value: String::new(),
            source_span: Some(text.source_span.clone()),
        }));
        let expressions = text
            .value
            .expressions
            .iter()
            .map(|expr| self.convert_update(expr))
            .collect::<Result<Vec<_>>>()?;
        self.push_update(ir::UpdateOp::InterpolateText(ir::InterpolateTextOp {
            target_slot: slot,
            strings: text.value.strings.clone(),
            expressions,
            source_span: Some(text.source_span.clone()),
        }));
        Ok(())
    }

    fn visit_if_block(&mut self, block: &'a t::IfBlock) -> Result<()> {
        let mut cases = Vec::with_capacity(block.branches.len());
        for branch in &block.branches {
            let slot = self.allocate_slot();
            let branch_view = self.job.allocate_view(self.view, ir::TemplateKind::Conditional, slot);
            self.push_create(ir::CreateOp::Template(ir::TemplateOp {
                slot,
                view: branch_view,
                kind: ir::TemplateKind::Conditional,
                source_span: Some(branch.source_span.clone()),
            }));
            ingest_nodes(self.job, branch_view, &branch.children)?;

            let expression = match &branch.expression {
                Some(expr) => Some(self.convert_update(expr)?),
                None => None,
            };
            cases.push(ir::ConditionalCase { slot, expression });
        }

        if let Some(first) = cases.first() {
            let target_slot = first.slot;
            self.push_update(ir::UpdateOp::Conditional(ir::ConditionalOp {
                target_slot,
                cases,
                processed: None,
                source_span: Some(block.source_span.clone()),
            }));
        }
        Ok(())
    }

    fn visit_deferred_block(&mut self, block: &'a t::DeferredBlock) -> Result<()> {
        let dependency_resolver = self
            .job
            .defer_meta
            .block(block)
            .cloned()
            .ok_or(CompileError::MissingDeferBlock(block.source_span.start.offset))?;

        let main_slot = self.allocate_slot();
        let main_view = self.job.allocate_view(self.view, ir::TemplateKind::Defer, main_slot);
        self.push_create(ir::CreateOp::Template(ir::TemplateOp {
            slot: main_slot,
            view: main_view,
            kind: ir::TemplateKind::Defer,
            source_span: Some(block.source_span.clone()),
        }));
        ingest_nodes(self.job, main_view, &block.children)?;

        let slot = self.allocate_slot();
        self.push_create(ir::CreateOp::Defer(ir::DeferOp {
            slot,
            main_slot,
            dependency_resolver,
            source_span: Some(block.source_span.clone()),
        }));
        self.push_create(ir::CreateOp::DeferOnIdle);
        Ok(())
    }
}

/// `fontSize` -> `font-size`. Already hyphenated names are unchanged.
pub fn hyphenate(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.char_indices() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render3::view::template::{parse_template, ParseTemplateOptions};

    fn ingest(template: &str) -> ComponentCompilationJob {
        let parsed = parse_template(template, "t", ParseTemplateOptions::default());
        assert!(parsed.errors.is_none(), "{:?}", parsed.errors);
        ingest_component("Cmp", &parsed.nodes, R3ComponentDeferMetadata::default()).unwrap()
    }

    #[test]
    fn should_hyphenate_style_names() {
        assert_eq!(hyphenate("fontSize"), "font-size");
        assert_eq!(hyphenate("font-size"), "font-size");
    }

    #[test]
    fn should_allocate_slots_in_document_order() {
        let job = ingest("<div><p>{{a}}</p>Hi</div>");
        let root = job.root();
        assert_eq!(root.decls, 4);
        assert!(matches!(&root.create[0], ir::CreateOp::ElementStart(op) if op.slot == 0));
        assert!(matches!(&root.update[0], ir::UpdateOp::InterpolateText(op) if op.target_slot == 2));
    }

    #[test]
    fn should_collect_bound_names_after_the_marker() {
        let job = ingest("<button id=\"b\" (click)=\"go()\" [title]=\"t\" [style.color]=\"c\">x</button>");
        assert_eq!(
            job.consts,
            vec![o::literal_arr(vec![
                o::literal("id"),
                o::literal("b"),
                o::literal(3usize),
                o::literal("title"),
                o::literal("click"),
            ])]
        );
    }

    #[test]
    fn should_create_one_view_per_if_branch() {
        let job = ingest("@if (a) {<p>1</p>} @else if (b) {<p>2</p>} @else {<p>3</p>}");
        assert_eq!(job.views.len(), 4);
        assert_eq!(job.root().decls, 3);
        match &job.root().update[0] {
            ir::UpdateOp::Conditional(op) => {
                assert_eq!(op.cases.len(), 3);
                assert!(op.cases[2].expression.is_none());
            }
            other => panic!("expected a conditional, got {:?}", other),
        }
    }

    #[test]
    fn should_require_defer_metadata() {
        let parsed = parse_template("@defer {<p>x</p>}", "t", ParseTemplateOptions::default());
        let err = ingest_component("Cmp", &parsed.nodes, R3ComponentDeferMetadata::default()).unwrap_err();
        assert!(matches!(err, CompileError::MissingDeferBlock(0)));
    }
}
