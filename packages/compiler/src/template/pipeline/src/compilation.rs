//! Compilation Module
//!
//! The in-progress compilation of one component template: the root view,
//! every embedded view, and the component-level `consts` array.

use indexmap::IndexMap;

use crate::output::output_ast as o;
use crate::render3::view::api::R3ComponentDeferMetadata;
use crate::template::pipeline::ir;

/// Compilation-in-progress of a whole component's template, including the
/// main template and any embedded views.
#[derive(Debug)]
pub struct ComponentCompilationJob {
    pub component_name: String,
    pub defer_meta: R3ComponentDeferMetadata,
    /// All views in allocation order. The root view is always first.
    pub views: IndexMap<ir::XrefId, ViewCompilationUnit>,
    pub consts: Vec<o::Expression>,
    next_xref_id: usize,
    next_var_id: usize,
}

impl ComponentCompilationJob {
    pub fn new(component_name: impl Into<String>, defer_meta: R3ComponentDeferMetadata) -> Self {
        let component_name = component_name.into();
        let root_xref = ir::XrefId::new(0);
        let mut views = IndexMap::new();
        views.insert(
            root_xref,
            ViewCompilationUnit::new(root_xref, None, 0, format!("{}_Template", component_name)),
        );
        ComponentCompilationJob {
            component_name,
            defer_meta,
            views,
            consts: Vec::new(),
            next_xref_id: 1,
            next_var_id: 1,
        }
    }

    pub fn root_xref(&self) -> ir::XrefId {
        ir::XrefId::new(0)
    }

    pub fn root(&self) -> &ViewCompilationUnit {
        self.view(self.root_xref())
    }

    pub fn view(&self, xref: ir::XrefId) -> &ViewCompilationUnit {
        &self.views[&xref]
    }

    pub fn view_mut(&mut self, xref: ir::XrefId) -> &mut ViewCompilationUnit {
        &mut self.views[&xref]
    }

    /// Add a `ViewCompilationUnit` for a new embedded view. Its function is
    /// named after the parent's, e.g. `App_Conditional_3_Template`.
    pub fn allocate_view(&mut self, parent: ir::XrefId, kind: ir::TemplateKind, slot: usize) -> ir::XrefId {
        let xref = ir::XrefId::new(self.next_xref_id);
        self.next_xref_id += 1;

        let parent_view = self.view(parent);
        let base = parent_view
            .fn_name
            .strip_suffix("_Template")
            .unwrap_or(&parent_view.fn_name);
        let kind_name = match kind {
            ir::TemplateKind::Conditional => "Conditional",
            ir::TemplateKind::Defer => "Defer",
        };
        let fn_name = format!("{}_{}_{}_Template", base, kind_name, slot);
        let depth = parent_view.depth + 1;

        self.views
            .insert(xref, ViewCompilationUnit::new(xref, Some(parent), depth, fn_name));
        xref
    }

    /// Add a constant `Expression` to the compilation and return its index
    /// in the `consts` array. Structurally equal constants share an index.
    pub fn add_const(&mut self, new_const: o::Expression) -> ir::ConstIndex {
        if let Some(idx) = self.consts.iter().position(|existing| *existing == new_const) {
            return ir::ConstIndex::new(idx);
        }
        self.consts.push(new_const);
        ir::ConstIndex::new(self.consts.len() - 1)
    }

    /// Hand out a fresh variable name such as `ctx_r3` or `_r4`. The counter
    /// is shared by every prefix.
    pub fn allocate_variable_name(&mut self, prefix: &str) -> String {
        let name = format!("{}{}", prefix, self.next_var_id);
        self.next_var_id += 1;
        name
    }
}

/// Compilation-in-progress of one view: the root template or an embedded
/// view created by `@if` or `@defer`.
#[derive(Debug)]
pub struct ViewCompilationUnit {
    pub xref: ir::XrefId,
    pub parent: Option<ir::XrefId>,
    /// Number of views between this one and the root.
    pub depth: usize,
    pub fn_name: String,
    pub create: Vec<ir::CreateOp>,
    pub update: Vec<ir::UpdateOp>,
    /// Number of slots used by this view.
    pub decls: usize,
    /// Number of binding slots, computed by var counting.
    pub vars: Option<usize>,
    /// Variable holding the component context in the update block.
    pub context_variable: Option<String>,
    /// Variable holding `ɵɵgetCurrentView()`, for views whose listeners
    /// must restore them.
    pub saved_view: Option<String>,
}

impl ViewCompilationUnit {
    pub fn new(xref: ir::XrefId, parent: Option<ir::XrefId>, depth: usize, fn_name: String) -> Self {
        ViewCompilationUnit {
            xref,
            parent,
            depth,
            fn_name,
            create: Vec::new(),
            update: Vec::new(),
            decls: 0,
            vars: None,
            context_variable: None,
            saved_view: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn allocate_slot(&mut self) -> usize {
        let slot = self.decls;
        self.decls += 1;
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_name_embedded_views_after_their_parent() {
        let mut job = ComponentCompilationJob::new("Counter", R3ComponentDeferMetadata::default());
        let root = job.root_xref();
        let child = job.allocate_view(root, ir::TemplateKind::Conditional, 6);
        let grandchild = job.allocate_view(child, ir::TemplateKind::Defer, 2);
        assert_eq!(job.root().fn_name, "Counter_Template");
        assert_eq!(job.view(child).fn_name, "Counter_Conditional_6_Template");
        assert_eq!(job.view(grandchild).fn_name, "Counter_Conditional_6_Defer_2_Template");
        assert_eq!(job.view(grandchild).depth, 2);
    }

    #[test]
    fn should_deduplicate_consts() {
        let mut job = ComponentCompilationJob::new("A", R3ComponentDeferMetadata::default());
        let first = job.add_const(o::literal_arr(vec![o::literal(3), o::literal("click")]));
        let other = job.add_const(o::literal_arr(vec![o::literal("id"), o::literal("x")]));
        let again = job.add_const(o::literal_arr(vec![o::literal(3), o::literal("click")]));
        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(job.consts.len(), 2);
    }

    #[test]
    fn should_share_one_variable_counter() {
        let mut job = ComponentCompilationJob::new("A", R3ComponentDeferMetadata::default());
        assert_eq!(job.allocate_variable_name("_r"), "_r1");
        assert_eq!(job.allocate_variable_name("ctx_r"), "ctx_r2");
    }
}
