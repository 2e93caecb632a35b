//! Render3 View Utilities
//!
//! Helpers for building definition objects.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::output::output_ast::{self as o, Expression, LiteralMapEntry};
use crate::render3::view::api::{InputFlags, R3InputMetadata};

lazy_static! {
    /// Checks whether an object key contains potentially unsafe chars
    pub static ref UNSAFE_OBJECT_KEY_NAME_REGEXP: Regex = Regex::new(r"[-.']").unwrap();
}

pub fn as_literal_string(value: &str) -> Expression {
    o::literal(value)
}

/// Serializes inputs for `defineComponent`. Keys are class property names.
/// An input that is signal based or renamed serializes to
/// `[flags, publicName]` (plus `declaredName` when renamed); any other input
/// to its public name.
pub fn create_inputs_literal(inputs: &IndexMap<String, R3InputMetadata>) -> Option<Expression> {
    if inputs.is_empty() {
        return None;
    }

    let entries = inputs
        .iter()
        .map(|(key, input)| {
            let different_declaring_name = input.binding_property_name != input.class_property_name;
            let flags = input.flags();

            let value = if different_declaring_name || flags != InputFlags::NONE {
                let mut result = vec![
                    o::literal(usize::from(flags.bits())),
                    as_literal_string(&input.binding_property_name),
                ];
                if different_declaring_name {
                    result.push(as_literal_string(&input.class_property_name));
                }
                o::literal_arr(result)
            } else {
                as_literal_string(&input.binding_property_name)
            };

            LiteralMapEntry::new(key.clone(), value, UNSAFE_OBJECT_KEY_NAME_REGEXP.is_match(key))
        })
        .collect();

    Some(o::literal_map(entries))
}

/// Serializes outputs as `{ classProperty: "publicName" }`.
pub fn create_outputs_literal(outputs: &IndexMap<String, String>) -> Option<Expression> {
    if outputs.is_empty() {
        return None;
    }
    let entries = outputs
        .iter()
        .map(|(key, public_name)| {
            LiteralMapEntry::new(
                key.clone(),
                as_literal_string(public_name),
                UNSAFE_OBJECT_KEY_NAME_REGEXP.is_match(key),
            )
        })
        .collect();
    Some(o::literal_map(entries))
}

/// A representation for an object literal used during codegen of definition
/// objects. Keys keep their insertion order.
#[derive(Debug, Clone, Default)]
pub struct DefinitionMap {
    values: Vec<LiteralMapEntry>,
}

impl DefinitionMap {
    pub fn new() -> Self {
        DefinitionMap::default()
    }

    /// Set `key` if `value` is present, replacing an earlier value in place.
    pub fn set(&mut self, key: &str, value: Option<Expression>) {
        let Some(value) = value else { return };
        match self.values.iter_mut().find(|entry| entry.key == key) {
            Some(existing) => existing.value = Box::new(value),
            None => self.values.push(LiteralMapEntry::new(key, value, false)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|entry| entry.key.as_str())
    }

    pub fn to_literal_map(self) -> Expression {
        o::literal_map(self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(class: &str, public: &str, is_signal: bool) -> R3InputMetadata {
        R3InputMetadata {
            class_property_name: class.into(),
            binding_property_name: public.into(),
            required: false,
            is_signal,
        }
    }

    #[test]
    fn should_serialize_signal_and_renamed_inputs() {
        let mut inputs = IndexMap::new();
        inputs.insert("name".to_string(), input("name", "name", true));
        inputs.insert("label".to_string(), input("label", "text", true));
        inputs.insert("plain".to_string(), input("plain", "plain", false));
        let expected = o::literal_map(vec![
            LiteralMapEntry::new("name", o::literal_arr(vec![o::literal(1usize), o::literal("name")]), false),
            LiteralMapEntry::new(
                "label",
                o::literal_arr(vec![o::literal(1usize), o::literal("text"), o::literal("label")]),
                false,
            ),
            LiteralMapEntry::new("plain", o::literal("plain"), false),
        ]);
        assert_eq!(create_inputs_literal(&inputs), Some(expected));
    }

    #[test]
    fn should_keep_definition_keys_in_insertion_order() {
        let mut map = DefinitionMap::new();
        map.set("type", Some(o::variable("A")));
        map.set("inputs", None);
        map.set("decls", Some(o::literal(1)));
        map.set("type", Some(o::variable("B")));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["type", "decls"]);
    }
}
