//! Pipeline Phases Module
//!
//! Transformations applied to an ingested job, in order, before the views
//! are reified into template functions.

pub mod conditionals;
pub mod empty_elements;
pub mod generate_advance;
pub mod naming;
pub mod save_restore_view;
pub mod var_counting;

use crate::template::pipeline::src::compilation::ComponentCompilationJob;

/// Run every phase over the job.
pub fn run(job: &mut ComponentCompilationJob) {
    empty_elements::collapse_empty_instructions(job);
    conditionals::generate_conditional_expressions(job);
    save_restore_view::save_and_restore_view(job);
    naming::name_functions(job);
    var_counting::count_variables(job);
    generate_advance::generate_advance(job);
}
