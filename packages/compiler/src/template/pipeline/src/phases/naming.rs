//! Naming Phase
//!
//! Name listener functions after their view, element, event and slot:
//! `App_Template_button_click_2_listener`.

use crate::parse_util::sanitize_identifier;
use crate::template::pipeline::ir;
use crate::template::pipeline::src::compilation::ComponentCompilationJob;

pub fn name_functions(job: &mut ComponentCompilationJob) {
    for unit in job.views.values_mut() {
        for op in unit.create.iter_mut() {
            if let ir::CreateOp::Listener(listener) = op {
                let name = format!(
                    "{}_{}_{}_{}_listener",
                    unit.fn_name, listener.tag, listener.name, listener.target_slot
                );
                listener.handler_fn_name = Some(sanitize_identifier(&name));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::output_ast as o;
    use crate::render3::view::api::R3ComponentDeferMetadata;

    #[test]
    fn should_sanitize_event_names() {
        let mut job = ComponentCompilationJob::new("App", R3ComponentDeferMetadata::default());
        let root = job.root_xref();
        job.view_mut(root).create.push(ir::CreateOp::Listener(ir::ListenerOp {
            target_slot: 2,
            tag: "my-input".into(),
            name: "value-change".into(),
            handler: o::variable("x"),
            context_variable: None,
            consumes_dollar_event: false,
            handler_fn_name: None,
            source_span: None,
        }));
        name_functions(&mut job);
        match &job.root().create[0] {
            ir::CreateOp::Listener(op) => assert_eq!(
                op.handler_fn_name.as_deref(),
                Some("App_Template_my_input_value_change_2_listener")
            ),
            other => panic!("expected a listener, got {:?}", other),
        }
    }
}
