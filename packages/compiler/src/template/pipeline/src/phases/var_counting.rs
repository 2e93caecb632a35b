//! Variable Counting Phase
//!
//! Counts the binding slots each view needs: one per interpolated
//! expression, one per property, two per style property and one per
//! conditional.

use crate::template::pipeline::ir;
use crate::template::pipeline::src::compilation::ComponentCompilationJob;

pub fn count_variables(job: &mut ComponentCompilationJob) {
    for unit in job.views.values_mut() {
        let vars = unit.update.iter().map(vars_used_by_op).sum();
        unit.vars = Some(vars);
    }
}

fn vars_used_by_op(op: &ir::UpdateOp) -> usize {
    match op {
        ir::UpdateOp::Property(_) | ir::UpdateOp::Conditional(_) => 1,
        ir::UpdateOp::StyleProp(_) => 2,
        ir::UpdateOp::InterpolateText(op) => op.expressions.len(),
        ir::UpdateOp::Advance(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render3::view::api::R3ComponentDeferMetadata;
    use crate::render3::view::template::{parse_template, ParseTemplateOptions};
    use crate::template::pipeline::src::ingest::ingest_component;

    #[test]
    fn should_count_binding_slots_per_view() {
        let parsed = parse_template(
            "<p [style.color]=\"c\" [title]=\"t\">{{a}} and {{b}}</p>@if (x) {<span>{{y}}</span>}",
            "t",
            ParseTemplateOptions::default(),
        );
        let mut job = ingest_component("Cmp", &parsed.nodes, R3ComponentDeferMetadata::default()).unwrap();
        count_variables(&mut job);
        let views: Vec<_> = job.views.values().collect();
        assert_eq!(views[0].vars, Some(2 + 1 + 2 + 1));
        assert_eq!(views[1].vars, Some(1));
    }
}
