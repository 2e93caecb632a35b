//! Empty Elements Phase
//!
//! Replace an `ElementStart` directly followed by its `ElementEnd` with a
//! single `Element` op.

use crate::template::pipeline::ir;
use crate::template::pipeline::src::compilation::{ComponentCompilationJob, ViewCompilationUnit};

pub fn collapse_empty_instructions(job: &mut ComponentCompilationJob) {
    for unit in job.views.values_mut() {
        process_unit(unit);
    }
}

fn process_unit(unit: &mut ViewCompilationUnit) {
    let ops = std::mem::take(&mut unit.create);
    let mut collapsed = Vec::with_capacity(ops.len());
    for op in ops {
        if matches!(op, ir::CreateOp::ElementEnd) {
            if let Some(ir::CreateOp::ElementStart(start)) = collapsed.last() {
                let start = start.clone();
                collapsed.pop();
                collapsed.push(ir::CreateOp::Element(start));
                continue;
            }
        }
        collapsed.push(op);
    }
    unit.create = collapsed;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render3::view::api::R3ComponentDeferMetadata;

    fn element(slot: usize) -> ir::ElementOp {
        ir::ElementOp {
            slot,
            tag: "p".into(),
            attributes: None,
            source_span: None,
        }
    }

    #[test]
    fn should_merge_only_childless_elements() {
        let mut job = ComponentCompilationJob::new("A", R3ComponentDeferMetadata::default());
        let root = job.root_xref();
        job.view_mut(root).create = vec![
            ir::CreateOp::ElementStart(element(0)),
            ir::CreateOp::ElementStart(element(1)),
            ir::CreateOp::ElementEnd,
            ir::CreateOp::ElementEnd,
        ];
        collapse_empty_instructions(&mut job);
        let create = &job.root().create;
        assert_eq!(create.len(), 3);
        assert!(matches!(&create[0], ir::CreateOp::ElementStart(op) if op.slot == 0));
        assert!(matches!(&create[1], ir::CreateOp::Element(op) if op.slot == 1));
        assert!(matches!(&create[2], ir::CreateOp::ElementEnd));
    }
}
