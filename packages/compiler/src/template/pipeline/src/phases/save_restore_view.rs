//! Save Restore View Phase
//!
//! Listeners in embedded views run outside of their view's render pass and
//! must restore it first. Each such view saves itself with
//! `ɵɵgetCurrentView()` at the start of its creation block.

use crate::template::pipeline::ir;
use crate::template::pipeline::src::compilation::ComponentCompilationJob;

pub fn save_and_restore_view(job: &mut ComponentCompilationJob) {
    let xrefs: Vec<ir::XrefId> = job.views.keys().copied().collect();
    for xref in xrefs {
        let unit = job.view(xref);
        let has_listener = unit
            .create
            .iter()
            .any(|op| matches!(op, ir::CreateOp::Listener(_)));
        if unit.is_root() || !has_listener {
            continue;
        }

        let name = job.allocate_variable_name("_r");
        let unit = job.view_mut(xref);
        unit.create.insert(0, ir::CreateOp::SavedView(name.clone()));
        unit.saved_view = Some(name);
    }
}
