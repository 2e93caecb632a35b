//! Directive Matching
//!
//! Element-selector matcher. Only tag selectors (`my-comp`, `MatButton`)
//! are indexed; tag names are compared case sensitively.

use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SelectorMatcher<T> {
    element_map: HashMap<String, Vec<T>>,
}

impl<T> Default for SelectorMatcher<T> {
    fn default() -> Self {
        SelectorMatcher {
            element_map: HashMap::new(),
        }
    }
}

impl<T: Clone> SelectorMatcher<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag selector with associated data
    pub fn add_selectable(&mut self, element: &str, callback_data: T) {
        self.element_map
            .entry(element.to_string())
            .or_default()
            .push(callback_data);
    }

    /// All data registered for `element`, in registration order.
    pub fn match_element(&self, element: &str) -> &[T] {
        self.element_map.get(element).map_or(&[], Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.element_map.is_empty()
    }
}
