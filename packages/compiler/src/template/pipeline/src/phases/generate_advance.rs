//! Generate Advance Phase
//!
//! Insert `Advance` ops between update ops so the runtime's selected slot
//! matches the slot each op targets.

use crate::template::pipeline::ir;
use crate::template::pipeline::src::compilation::{ComponentCompilationJob, ViewCompilationUnit};

pub fn generate_advance(job: &mut ComponentCompilationJob) {
    for unit in job.views.values_mut() {
        process_unit(unit);
    }
}

fn process_unit(unit: &mut ViewCompilationUnit) {
    let ops = std::mem::take(&mut unit.update);
    let mut with_advance = Vec::with_capacity(ops.len() * 2);
    let mut slot_context = 0;
    for op in ops {
        if let Some(target) = op.target_slot() {
            if target > slot_context {
                with_advance.push(ir::UpdateOp::Advance(target - slot_context));
                slot_context = target;
            }
        }
        with_advance.push(op);
    }
    unit.update = with_advance;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::output_ast as o;
    use crate::render3::view::api::R3ComponentDeferMetadata;

    fn property(slot: usize) -> ir::UpdateOp {
        ir::UpdateOp::Property(ir::PropertyOp {
            target_slot: slot,
            name: "p".into(),
            expression: o::variable("x"),
            source_span: None,
        })
    }

    #[test]
    fn should_advance_only_between_slots() {
        let mut job = ComponentCompilationJob::new("A", R3ComponentDeferMetadata::default());
        let root = job.root_xref();
        job.view_mut(root).update = vec![property(0), property(2), property(2), property(3)];
        generate_advance(&mut job);
        let deltas: Vec<Option<usize>> = job
            .root()
            .update
            .iter()
            .map(|op| match op {
                ir::UpdateOp::Advance(delta) => Some(*delta),
                _ => None,
            })
            .collect();
        assert_eq!(deltas, vec![None, Some(2), None, None, Some(1), None]);
    }
}
