//! Conditionals Phase
//!
//! Collapse the cases of each `@if` chain into the single test expression
//! passed to `ɵɵconditional`: the slot of the first matching branch, or `-1`.

use crate::output::output_ast as o;
use crate::template::pipeline::ir;
use crate::template::pipeline::src::compilation::ComponentCompilationJob;

pub fn generate_conditional_expressions(job: &mut ComponentCompilationJob) {
    for unit in job.views.values_mut() {
        for op in unit.update.iter_mut() {
            if let ir::UpdateOp::Conditional(cond) = op {
                cond.processed = Some(build_test(&cond.cases));
            }
        }
    }
}

fn build_test(cases: &[ir::ConditionalCase]) -> o::Expression {
    let mut test = o::literal(-1);
    for case in cases.iter().rev() {
        test = match &case.expression {
            Some(expr) => expr.clone().conditional(o::literal(case.slot), Some(test)),
            None => o::literal(case.slot),
        };
    }
    test
}
