//! Update-mode operations
//!
//! Executed on every change detection pass (`rf & 2`). Every op except
//! `Advance` targets the slot of a node created in the same view.

use crate::output::output_ast as o;
use crate::parse_util::ParseSourceSpan;

#[derive(Debug, Clone)]
pub enum UpdateOp {
    Property(PropertyOp),
    StyleProp(StylePropOp),
    InterpolateText(InterpolateTextOp),
    Conditional(ConditionalOp),
    /// Move the selected-slot pointer forward by `delta`.
    Advance(usize),
}

impl UpdateOp {
    pub fn target_slot(&self) -> Option<usize> {
        match self {
            UpdateOp::Property(op) => Some(op.target_slot),
            UpdateOp::StyleProp(op) => Some(op.target_slot),
            UpdateOp::InterpolateText(op) => Some(op.target_slot),
            UpdateOp::Conditional(op) => Some(op.target_slot),
            UpdateOp::Advance(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PropertyOp {
    pub target_slot: usize,
    pub name: String,
    pub expression: o::Expression,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone)]
pub struct StylePropOp {
    pub target_slot: usize,
    /// Hyphenated CSS property name.
    pub name: String,
    pub expression: o::Expression,
    pub unit: Option<String>,
    pub source_span: Option<ParseSourceSpan>,
}

#[derive(Debug, Clone)]
pub struct InterpolateTextOp {
    pub target_slot: usize,
    pub strings: Vec<String>,
    pub expressions: Vec<o::Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

/// One branch of an `@if` chain. `expression` is `None` for `@else`.
#[derive(Debug, Clone)]
pub struct ConditionalCase {
    pub slot: usize,
    pub expression: Option<o::Expression>,
}

#[derive(Debug, Clone)]
pub struct ConditionalOp {
    /// Slot of the first branch template.
    pub target_slot: usize,
    pub cases: Vec<ConditionalCase>,
    /// The combined `a ? 1 : b ? 2 : -1` test, filled in by the
    /// conditionals phase.
    pub processed: Option<o::Expression>,
    pub source_span: Option<ParseSourceSpan>,
}
