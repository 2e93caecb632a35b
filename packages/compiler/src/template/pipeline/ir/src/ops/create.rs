//! Creation-mode operations
//!
//! Executed once, when a view is first rendered (`rf & 1`).

use crate::output::output_ast as o;
use crate::parse_util::ParseSourceSpan;

use crate::template::pipeline::ir::{ConstIndex, XrefId};

#[derive(Debug, Clone)]
pub enum CreateOp {
    ElementStart(ElementOp),
    /// An element with no children and no listeners, produced by merging an
    /// `ElementStart` directly followed by its `ElementEnd`.
    Element(ElementOp),
    ElementEnd,
    Text(TextOp),
    Listener(ListenerOp),
    Template(TemplateOp),
    Defer(DeferOp),
    DeferOnIdle,
    /// `var <name> = ɵɵgetCurrentView();`
    SavedView(String),
}

#[derive(Debug, Clone)]
pub struct ElementOp {
    pub slot: usize,
    pub tag: String,
    pub attributes: Option<ConstIndex>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone)]
pub struct TextOp {
    pub slot: usize,
    /// Static content, empty for text that is filled in by interpolation.
    pub initial_value: String,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone)]
pub struct ListenerOp {
    pub target_slot: usize,
    /// Tag of the element the listener is attached to.
    pub tag: String,
    pub name: String,
    /// Expression evaluated when the event fires.
    pub handler: o::Expression,
    /// Variable bound to the component context inside the handler, if the
    /// handler reads from it.
    pub context_variable: Option<String>,
    pub consumes_dollar_event: bool,
    /// Assigned by the naming phase.
    pub handler_fn_name: Option<String>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Conditional,
    Defer,
}

/// Declares an embedded view in a slot of its parent.
#[derive(Debug, Clone)]
pub struct TemplateOp {
    pub slot: usize,
    pub view: XrefId,
    pub kind: TemplateKind,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone)]
pub struct DeferOp {
    pub slot: usize,
    /// Slot of the template holding the deferred content.
    pub main_slot: usize,
    pub dependency_resolver: Option<o::Expression>,
    pub source_span: Option<ParseSourceSpan>,
}
