//! Render3 View API
//!
//! Metadata handed to the component compiler. Everything here is plain data;
//! callers build it from whatever source describes the component.

use bitflags::bitflags;
use indexmap::IndexMap;

use crate::output::output_ast as o;
use crate::render3::r3_ast as t;

/// How the component's styles are scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ViewEncapsulation {
    #[default]
    Emulated = 0,
    None = 2,
    ShadowDom = 3,
}

bitflags! {
    /// Flags attached to each entry of the `inputs` map of a definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InputFlags: u8 {
        const NONE = 0;
        const SIGNAL_BASED = 1 << 0;
    }
}

/// Metadata for an individual input on a component.
#[derive(Debug, Clone, PartialEq)]
pub struct R3InputMetadata {
    /// Name of the property the input is written to.
    pub class_property_name: String,
    /// Name used in templates to bind the input.
    pub binding_property_name: String,
    pub required: bool,
    /// Whether the input is an `input()` signal rather than a plain field.
    pub is_signal: bool,
}

impl R3InputMetadata {
    pub fn flags(&self) -> InputFlags {
        if self.is_signal {
            InputFlags::SIGNAL_BASED
        } else {
            InputFlags::NONE
        }
    }
}

/// Template of a component, already parsed into render3 nodes.
#[derive(Debug, Clone, Default)]
pub struct R3ComponentTemplate {
    pub nodes: Vec<t::R3Node>,
}

/// Dependencies of the `@defer` blocks in a template.
#[derive(Debug, Clone)]
pub enum R3ComponentDeferMetadata {
    /// One entry per defer block, keyed by the block's start offset in the
    /// template. The value is an optional dependency-loading function.
    PerBlock {
        blocks: IndexMap<usize, Option<o::Expression>>,
    },
}

impl Default for R3ComponentDeferMetadata {
    fn default() -> Self {
        R3ComponentDeferMetadata::PerBlock {
            blocks: IndexMap::new(),
        }
    }
}

impl R3ComponentDeferMetadata {
    pub fn block(&self, block: &t::DeferredBlock) -> Option<&Option<o::Expression>> {
        match self {
            R3ComponentDeferMetadata::PerBlock { blocks } => blocks.get(&block.source_span.start.offset),
        }
    }
}

/// Information needed to compile a component definition.
#[derive(Debug, Clone)]
pub struct R3ComponentMetadata {
    /// Name of the component class (or function).
    pub name: String,
    /// Expression referring to the component type.
    pub type_: o::Expression,
    /// Element selector, a single tag name.
    pub selector: String,
    pub inputs: IndexMap<String, R3InputMetadata>,
    /// Output property name to public event name.
    pub outputs: IndexMap<String, String>,
    pub export_as: Option<Vec<String>>,
    pub is_standalone: bool,
    pub template: R3ComponentTemplate,
    /// Types the template depends on, emitted as `dependencies`.
    pub declarations: Vec<o::Expression>,
    pub defer: R3ComponentDeferMetadata,
    pub styles: Vec<String>,
    pub encapsulation: ViewEncapsulation,
}

/// The result of compiling a definition: the expression plus any
/// statements that must be emitted alongside it.
#[derive(Debug, Clone)]
pub struct R3CompiledExpression {
    pub expression: o::Expression,
    pub statements: Vec<o::Statement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_flag_signal_inputs() {
        let input = R3InputMetadata {
            class_property_name: "name".into(),
            binding_property_name: "name".into(),
            required: false,
            is_signal: true,
        };
        assert_eq!(input.flags().bits(), 1);
        let plain = R3InputMetadata { is_signal: false, ..input };
        assert_eq!(plain.flags().bits(), 0);
    }
}
