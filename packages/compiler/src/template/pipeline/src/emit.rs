//! Emit Module
//!
//! Runs the phases over an ingested job and reifies each view into a
//! template function. Embedded views are declared in the constant pool,
//! children before their parents.

use crate::constant_pool::ConstantPool;
use crate::output::output_ast as o;
use crate::template::pipeline::ir;
use crate::template::pipeline::src::compilation::{ComponentCompilationJob, ViewCompilationUnit};
use crate::template::pipeline::src::conversion::{DOLLAR_EVENT, ROOT_CONTEXT};
use crate::template::pipeline::src::instruction as ng;
use crate::template::pipeline::src::phases;

/// Run all transformation phases on the job.
pub fn transform(job: &mut ComponentCompilationJob) {
    phases::run(job);
}

/// Emit the root template function of a transformed job, pushing every
/// embedded view function into `pool`.
pub fn emit_template_fn(job: &ComponentCompilationJob, pool: &mut ConstantPool) -> o::Expression {
    let root = job.root();
    emit_child_views(job, root.xref, pool);
    emit_view(job, root)
}

fn emit_child_views(job: &ComponentCompilationJob, parent: ir::XrefId, pool: &mut ConstantPool) {
    for unit in job.views.values() {
        if unit.parent != Some(parent) {
            continue;
        }
        // Child views are emitted depth-first.
        emit_child_views(job, unit.xref, pool);
        if let o::Expression::Fn(view_fn) = emit_view(job, unit) {
            pool.push(view_fn.to_declare_fn(unit.fn_name.clone()));
        }
    }
}

fn emit_view(job: &ComponentCompilationJob, unit: &ViewCompilationUnit) -> o::Expression {
    let create_statements: Vec<o::Statement> = unit.create.iter().map(|op| reify_create_op(job, unit, op)).collect();

    let mut update_statements = Vec::new();
    if let Some(context) = &unit.context_variable {
        update_statements.push(o::declare_var(context.clone(), Some(ng::next_context(unit.depth))));
    }
    update_statements.extend(unit.update.iter().map(reify_update_op));

    let mut body = Vec::new();
    if !create_statements.is_empty() {
        body.push(o::if_stmt(
            o::variable("rf").bitwise_and(o::literal(1)),
            create_statements,
            vec![],
        ));
    }
    if !update_statements.is_empty() {
        body.push(o::if_stmt(
            o::variable("rf").bitwise_and(o::literal(2)),
            update_statements,
            vec![],
        ));
    }

    o::fn_(
        vec![o::FnParam::new("rf"), o::FnParam::new(ROOT_CONTEXT)],
        body,
        Some(unit.fn_name.clone()),
    )
}

fn reify_create_op(job: &ComponentCompilationJob, unit: &ViewCompilationUnit, op: &ir::CreateOp) -> o::Statement {
    match op {
        ir::CreateOp::ElementStart(op) => ng::element_start(op.slot, &op.tag, op.attributes, op.source_span.clone()),
        ir::CreateOp::Element(op) => ng::element(op.slot, &op.tag, op.attributes, op.source_span.clone()),
        ir::CreateOp::ElementEnd => ng::element_end(),
        ir::CreateOp::Text(op) => ng::text(op.slot, &op.initial_value, op.source_span.clone()),
        ir::CreateOp::Listener(op) => ng::listener(&op.name, reify_listener_handler(unit, op), op.source_span.clone()),
        ir::CreateOp::Template(op) => {
            let view = job.view(op.view);
            ng::template(
                op.slot,
                o::variable(view.fn_name.clone()),
                view.decls,
                view.vars.unwrap_or(0),
                op.source_span.clone(),
            )
        }
        ir::CreateOp::Defer(op) => ng::defer(
            op.slot,
            op.main_slot,
            op.dependency_resolver.clone(),
            op.source_span.clone(),
        ),
        ir::CreateOp::DeferOnIdle => ng::defer_on_idle(),
        ir::CreateOp::SavedView(name) => o::declare_var(name.clone(), Some(ng::get_current_view())),
    }
}

fn reify_listener_handler(unit: &ViewCompilationUnit, op: &ir::ListenerOp) -> o::Expression {
    let params = if op.consumes_dollar_event {
        vec![o::FnParam::new(DOLLAR_EVENT)]
    } else {
        vec![]
    };

    let mut statements = Vec::new();
    let result = match &unit.saved_view {
        Some(saved_view) => {
            statements.push(ng::restore_view(saved_view));
            if let Some(context) = &op.context_variable {
                statements.push(o::declare_var(context.clone(), Some(ng::next_context(unit.depth))));
            }
            ng::reset_view(op.handler.clone())
        }
        None => op.handler.clone(),
    };
    statements.push(result.to_return_stmt());

    o::fn_(params, statements, op.handler_fn_name.clone())
}

fn reify_update_op(op: &ir::UpdateOp) -> o::Statement {
    match op {
        ir::UpdateOp::Advance(delta) => ng::advance(*delta, None),
        ir::UpdateOp::Property(op) => ng::property(&op.name, op.expression.clone(), op.source_span.clone()),
        ir::UpdateOp::StyleProp(op) => ng::style_prop(
            &op.name,
            op.expression.clone(),
            op.unit.as_deref(),
            op.source_span.clone(),
        ),
        ir::UpdateOp::InterpolateText(op) => {
            ng::text_interpolate(op.strings.clone(), op.expressions.clone(), op.source_span.clone())
        }
        ir::UpdateOp::Conditional(op) => ng::conditional(
            op.processed.clone().unwrap_or_else(|| o::literal(-1)),
            op.source_span.clone(),
        ),
    }
}
