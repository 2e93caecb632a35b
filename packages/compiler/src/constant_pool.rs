//! Constant Pool
//!
//! Accumulates statements hoisted out of a compiled definition, such as the
//! template functions of embedded views. One pool is owned by one compilation.

use std::collections::HashMap;

use crate::output::output_ast as o;

#[derive(Debug, Default)]
pub struct ConstantPool {
    pub statements: Vec<o::Statement>,
    claimed_names: HashMap<String, u32>,
}

impl ConstantPool {
    pub fn new() -> Self {
        ConstantPool::default()
    }

    /// Claim `preferred_name`, suffixing it with a counter if it is already taken
    /// (or always, when `always_include_suffix` is set).
    pub fn unique_name(&mut self, preferred_name: &str, always_include_suffix: bool) -> String {
        let count = self.claimed_names.entry(preferred_name.to_string()).or_insert(0);
        let name = if *count == 0 && !always_include_suffix {
            preferred_name.to_string()
        } else {
            format!("{}{}", preferred_name, count)
        };
        *count += 1;
        name
    }

    pub fn push(&mut self, statement: o::Statement) {
        self.statements.push(statement);
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
