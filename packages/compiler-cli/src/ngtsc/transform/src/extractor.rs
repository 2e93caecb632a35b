//! Component extraction
//!
//! Finds the function declarations of a file that are components: an
//! uppercase name and a `return` of a JSX element. For each one the JSX root
//! gives the selector and the template text, and the destructured first
//! parameter gives the signal inputs.

use oxc_ast::ast::{
    ArrowFunctionExpression, BindingPatternKind, BindingProperty, Declaration, ExportDefaultDeclarationKind,
    Expression, Function, JSXElement, JSXElementName, ObjectPattern, Program, PropertyKey, ReturnStatement,
    Statement,
};
use oxc_ast_visit::{walk, Visit};
use oxc_span::GetSpan;
use oxc_syntax::scope::ScopeFlags;

use crate::error::{Result, TransformError};

/// A destructured `key = input(...)` parameter property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDeclaration {
    /// Public input name (the destructured key).
    pub property_name: String,
    /// Local name bound inside the component function.
    pub binding_name: String,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentCandidate {
    pub name: String,
    pub selector: String,
    /// Original text between the end of the root opening tag and the start
    /// of its closing tag. Empty for a self-closing root.
    pub template_text: String,
    pub inputs: Vec<InputDeclaration>,
    /// Index of the declaring statement in `Program::body`.
    pub statement_index: usize,
}

/// Returns the components of `program` in document order.
///
/// `source_text` must have the same byte layout as the text `program` was
/// parsed from; templates are sliced out of it.
pub fn extract_components(program: &Program<'_>, source_text: &str) -> Result<Vec<ComponentCandidate>> {
    let mut finder = TemplateReturnFinder::new(source_text);
    let mut candidates = Vec::new();

    for (statement_index, statement) in program.body.iter().enumerate() {
        match component_function(statement) {
            Some((name, function)) => {
                let found = finder.search_component(name, function);
                if let Some(error) = finder.error.take() {
                    return Err(error);
                }
                if let Some(root) = found {
                    candidates.push(ComponentCandidate {
                        name: name.to_string(),
                        selector: root.selector,
                        template_text: root.template_text,
                        inputs: infer_inputs(function, source_text)?,
                        statement_index,
                    });
                }
            }
            None => {
                finder.visit_statement(statement);
                if let Some(error) = finder.error.take() {
                    return Err(error);
                }
            }
        }
    }

    Ok(candidates)
}

/// The uppercase-named function declared by `statement`, looking through
/// `export` and `export default`.
fn component_function<'s, 'a>(statement: &'s Statement<'a>) -> Option<(&'s str, &'s Function<'a>)> {
    let function = match statement {
        Statement::FunctionDeclaration(function) => function,
        Statement::ExportNamedDeclaration(export) => match &export.declaration {
            Some(Declaration::FunctionDeclaration(function)) => function,
            _ => return None,
        },
        Statement::ExportDefaultDeclaration(export) => match &export.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(function) => function,
            _ => return None,
        },
        _ => return None,
    };
    let name = function.id.as_ref()?.name.as_str();
    name.starts_with(|c: char| c.is_ascii_uppercase()).then_some((name, &**function))
}

/// The JSX element a `return` statement yields, if any.
pub(crate) fn returned_element<'s, 'a>(statement: &'s ReturnStatement<'a>) -> Option<&'s JSXElement<'a>> {
    let mut expression = statement.argument.as_ref()?;
    while let Expression::ParenthesizedExpression(parenthesized) = expression {
        expression = &parenthesized.expression;
    }
    match expression {
        Expression::JSXElement(element) => Some(&**element),
        _ => None,
    }
}

/// Tag name of a JSX root, or `None` for member and namespaced names.
pub(crate) fn root_tag_name<'s>(element: &'s JSXElement<'_>) -> Option<&'s str> {
    match &element.opening_element.name {
        JSXElementName::Identifier(identifier) => Some(identifier.name.as_str()),
        JSXElementName::IdentifierReference(identifier) => Some(identifier.name.as_str()),
        _ => None,
    }
}

struct TemplateRoot {
    selector: String,
    template_text: String,
}

struct FunctionFrame {
    name: String,
    component: bool,
    root: Option<TemplateRoot>,
}

struct TemplateReturnFinder<'s> {
    source_text: &'s str,
    frames: Vec<FunctionFrame>,
    error: Option<TransformError>,
}

impl<'s> TemplateReturnFinder<'s> {
    fn new(source_text: &'s str) -> Self {
        Self { source_text, frames: Vec::new(), error: None }
    }

    fn search_component(&mut self, name: &str, function: &Function<'_>) -> Option<TemplateRoot> {
        self.frames.push(FunctionFrame { name: name.to_string(), component: true, root: None });
        if let Some(body) = &function.body {
            self.visit_function_body(body);
        }
        self.frames.pop().and_then(|frame| frame.root)
    }

    fn template_root(&self, element: &JSXElement<'_>, selector: &str) -> TemplateRoot {
        let template_text = match &element.closing_element {
            Some(closing) => {
                let start = element.opening_element.span.end as usize;
                let end = closing.span.start as usize;
                self.source_text.get(start..end).unwrap_or_default().to_string()
            }
            None => String::new(),
        };
        TemplateRoot { selector: selector.to_string(), template_text }
    }

    fn record(&mut self, statement: &ReturnStatement<'_>) {
        let Some(element) = returned_element(statement) else { return };
        let Some(selector) = root_tag_name(element) else { return };
        let root = self.template_root(element, selector);

        match self.frames.last_mut() {
            Some(frame) if frame.component => {
                if frame.root.is_some() {
                    self.error = Some(TransformError::MultipleTemplateReturns { component: frame.name.clone() });
                } else {
                    frame.root = Some(root);
                }
            }
            frame => {
                let function = frame.map_or_else(|| "<module>".to_string(), |frame| frame.name.clone());
                self.error = Some(TransformError::OrphanedTemplateReturn { function });
            }
        }
    }
}

impl<'a> Visit<'a> for TemplateReturnFinder<'_> {
    fn visit_function(&mut self, function: &Function<'a>, flags: ScopeFlags) {
        let name = function.id.as_ref().map_or("<anonymous>", |id| id.name.as_str());
        self.frames.push(FunctionFrame { name: name.to_string(), component: false, root: None });
        walk::walk_function(self, function, flags);
        self.frames.pop();
    }

    fn visit_arrow_function_expression(&mut self, arrow: &ArrowFunctionExpression<'a>) {
        self.frames.push(FunctionFrame { name: "<arrow>".to_string(), component: false, root: None });
        walk::walk_arrow_function_expression(self, arrow);
        self.frames.pop();
    }

    fn visit_return_statement(&mut self, statement: &ReturnStatement<'a>) {
        if self.error.is_none() {
            self.record(statement);
        }
        walk::walk_return_statement(self, statement);
    }
}

fn infer_inputs(function: &Function<'_>, source_text: &str) -> Result<Vec<InputDeclaration>> {
    match function.params.items.first().map(|param| &param.pattern.kind) {
        Some(BindingPatternKind::ObjectPattern(pattern)) => inputs_of(pattern, source_text),
        _ => Ok(Vec::new()),
    }
}

fn inputs_of(pattern: &ObjectPattern<'_>, source_text: &str) -> Result<Vec<InputDeclaration>> {
    let inputs = pattern
        .properties
        .iter()
        .map(|property| input_of(property, source_text))
        .collect::<Result<Vec<_>>>()?;

    if let Some(rest) = &pattern.rest {
        return Err(TransformError::MalformedInputDeclaration {
            property: slice(source_text, rest.span()),
            reason: "rest elements cannot be inputs".to_string(),
        });
    }

    Ok(inputs)
}

fn input_of(property: &BindingProperty<'_>, source_text: &str) -> Result<InputDeclaration> {
    let malformed = |reason: &str| TransformError::MalformedInputDeclaration {
        property: slice(source_text, property.key.span()),
        reason: reason.to_string(),
    };

    let property_name = match &property.key {
        PropertyKey::StaticIdentifier(identifier) if !property.computed => identifier.name.to_string(),
        _ => return Err(malformed("expected an identifier key")),
    };

    let assignment = match &property.value.kind {
        BindingPatternKind::AssignmentPattern(assignment) => assignment,
        BindingPatternKind::BindingIdentifier(_) => {
            return Err(malformed("expected an input() or input.required() initializer"))
        }
        _ => return Err(malformed("nested destructuring is not supported")),
    };

    let binding_name = match &assignment.left.kind {
        BindingPatternKind::BindingIdentifier(identifier) => identifier.name.to_string(),
        _ => return Err(malformed("expected an identifier binding")),
    };

    let required = match &assignment.right {
        Expression::CallExpression(call) => match &call.callee {
            Expression::Identifier(callee) if callee.name == "input" => false,
            Expression::StaticMemberExpression(member)
                if member.property.name == "required"
                    && matches!(&member.object, Expression::Identifier(object) if object.name == "input") =>
            {
                true
            }
            _ => return Err(malformed("initializer must call input() or input.required()")),
        },
        _ => return Err(malformed("initializer must call input() or input.required()")),
    };

    Ok(InputDeclaration { property_name, binding_name, required })
}

fn slice(source_text: &str, span: oxc_span::Span) -> String {
    source_text.get(span.start as usize..span.end as usize).unwrap_or_default().to_string()
}
