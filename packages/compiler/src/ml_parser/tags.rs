//! Tag Definitions
//!
//! The parser only needs to know which elements never have children.

use std::collections::HashSet;

use once_cell::sync::Lazy;

static VOID_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "area", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
    ]
    .into_iter()
    .collect()
});

/// HTML tag names are case insensitive, component tags are not void.
pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS.contains(tag_name) || VOID_ELEMENTS.contains(tag_name.to_lowercase().as_str())
}
