//! Helpers for generating calls to Ivy instructions.

use crate::output::output_ast as o;
use crate::parse_util::ParseSourceSpan;
use crate::render3::r3_identifiers::Identifiers;
use crate::template::pipeline::ir;
use o::ExternalReference;

pub fn call(fn_: ExternalReference, args: Vec<o::Expression>, source_span: Option<ParseSourceSpan>) -> o::Statement {
    let expr = o::import_ref(fn_).call_fn(args).with_source_span(source_span.clone());
    o::Statement::Expression(o::ExpressionStatement {
        expr: Box::new(expr),
        source_span,
    })
}

fn element_or_container_base(
    instruction: ExternalReference,
    slot: usize,
    tag: &str,
    const_index: Option<ir::ConstIndex>,
    source_span: Option<ParseSourceSpan>,
) -> o::Statement {
    let mut args = vec![o::literal(slot), o::literal(tag)];
    if let Some(index) = const_index {
        args.push(o::literal(index.as_usize()));
    }
    call(instruction, args, source_span)
}

pub fn element_start(
    slot: usize,
    tag: &str,
    const_index: Option<ir::ConstIndex>,
    source_span: Option<ParseSourceSpan>,
) -> o::Statement {
    element_or_container_base(Identifiers::element_start(), slot, tag, const_index, source_span)
}

pub fn element(
    slot: usize,
    tag: &str,
    const_index: Option<ir::ConstIndex>,
    source_span: Option<ParseSourceSpan>,
) -> o::Statement {
    element_or_container_base(Identifiers::element(), slot, tag, const_index, source_span)
}

pub fn element_end() -> o::Statement {
    call(Identifiers::element_end(), vec![], None)
}

pub fn text(slot: usize, initial_value: &str, source_span: Option<ParseSourceSpan>) -> o::Statement {
    let mut args = vec![o::literal(slot)];
    if !initial_value.is_empty() {
        args.push(o::literal(initial_value));
    }
    call(Identifiers::text(), args, source_span)
}

pub fn listener(name: &str, handler_fn: o::Expression, source_span: Option<ParseSourceSpan>) -> o::Statement {
    call(Identifiers::listener(), vec![o::literal(name), handler_fn], source_span)
}

pub fn template(
    slot: usize,
    template_fn_ref: o::Expression,
    decls: usize,
    vars: usize,
    source_span: Option<ParseSourceSpan>,
) -> o::Statement {
    call(
        Identifiers::template_create(),
        vec![o::literal(slot), template_fn_ref, o::literal(decls), o::literal(vars)],
        source_span,
    )
}

pub fn defer(
    slot: usize,
    primary_slot: usize,
    dependency_resolver_fn: Option<o::Expression>,
    source_span: Option<ParseSourceSpan>,
) -> o::Statement {
    let mut args = vec![o::literal(slot), o::literal(primary_slot)];
    if let Some(resolver) = dependency_resolver_fn {
        args.push(resolver);
    }
    call(Identifiers::defer(), args, source_span)
}

pub fn defer_on_idle() -> o::Statement {
    call(Identifiers::defer_on_idle(), vec![], None)
}

pub fn get_current_view() -> o::Expression {
    o::import_ref(Identifiers::get_current_view()).call_fn(vec![])
}

pub fn restore_view(saved_view: &str) -> o::Statement {
    call(Identifiers::restore_view(), vec![o::variable(saved_view)], None)
}

pub fn reset_view(value: o::Expression) -> o::Expression {
    o::import_ref(Identifiers::reset_view()).call_fn(vec![value])
}

/// `ɵɵnextContext()` for one step up, `ɵɵnextContext(n)` otherwise.
pub fn next_context(steps: usize) -> o::Expression {
    let args = if steps == 1 { vec![] } else { vec![o::literal(steps)] };
    o::import_ref(Identifiers::next_context()).call_fn(args)
}

pub fn advance(delta: usize, source_span: Option<ParseSourceSpan>) -> o::Statement {
    let args = if delta > 1 { vec![o::literal(delta)] } else { vec![] };
    call(Identifiers::advance(), args, source_span)
}

pub fn property(name: &str, expression: o::Expression, source_span: Option<ParseSourceSpan>) -> o::Statement {
    call(Identifiers::property(), vec![o::literal(name), expression], source_span)
}

pub fn style_prop(
    name: &str,
    expression: o::Expression,
    unit: Option<&str>,
    source_span: Option<ParseSourceSpan>,
) -> o::Statement {
    let mut args = vec![o::literal(name), expression];
    if let Some(unit) = unit {
        args.push(o::literal(unit));
    }
    call(Identifiers::style_prop(), args, source_span)
}

pub fn conditional(test: o::Expression, source_span: Option<ParseSourceSpan>) -> o::Statement {
    call(Identifiers::conditional(), vec![test], source_span)
}

/// `ɵɵtextInterpolate(e)` for a lone expression, otherwise the
/// `ɵɵtextInterpolateN` variant matching the expression count with the
/// static strings interleaved.
pub fn text_interpolate(
    strings: Vec<String>,
    expressions: Vec<o::Expression>,
    source_span: Option<ParseSourceSpan>,
) -> o::Statement {
    if expressions.len() == 1 && strings.iter().all(String::is_empty) {
        return call(Identifiers::text_interpolate(), expressions, source_span);
    }

    let count = expressions.len();
    let mut args = Vec::with_capacity(strings.len() + count);
    let mut strings = strings.into_iter();
    for expression in expressions {
        args.push(o::literal(strings.next().unwrap_or_default()));
        args.push(expression);
    }
    args.push(o::literal(strings.next().unwrap_or_default()));

    if count > 8 {
        call(Identifiers::text_interpolate_n(count), vec![o::literal_arr(args)], source_span)
    } else {
        call(Identifiers::text_interpolate_n(count), args, source_span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(stmt: &o::Statement) -> &[o::Expression] {
        match stmt {
            o::Statement::Expression(s) => match s.expr.as_ref() {
                o::Expression::InvokeFn(call) => &call.args,
                other => panic!("expected a call, got {:?}", other),
            },
            other => panic!("expected an expression statement, got {:?}", other),
        }
    }

    #[test]
    fn should_omit_single_step_advance_argument() {
        assert!(args_of(&advance(1, None)).is_empty());
        assert_eq!(args_of(&advance(3, None)), &[o::literal(3usize)]);
    }

    #[test]
    fn should_interleave_interpolation_strings() {
        let stmt = text_interpolate(vec!["Count: ".into(), "".into()], vec![o::variable("x")], None);
        assert_eq!(
            args_of(&stmt),
            &[o::literal("Count: "), o::variable("x"), o::literal("")]
        );
        let single = text_interpolate(vec!["".into(), "".into()], vec![o::variable("x")], None);
        assert_eq!(args_of(&single), &[o::variable("x")]);
    }

    #[test]
    fn should_pack_long_interpolations_into_an_array() {
        let strings = vec![String::new(); 10];
        let expressions = (0..9).map(|i| o::variable(format!("v{}", i))).collect();
        let stmt = text_interpolate(strings, expressions, None);
        assert_eq!(args_of(&stmt).len(), 1);
    }
}
