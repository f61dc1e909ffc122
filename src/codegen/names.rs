//! Name Legalization
//!
//! Turns raw type names into legal TypeScript identifiers and derives the
//! schema constant name for each named type. The table is built once per
//! generation pass and is a pure lookup afterwards; the core never observes
//! naming state beyond these lookups.

use std::collections::{HashMap, HashSet};

use crate::graph::{NodeId, TypeGraph};

/// Naming configuration.
#[derive(Debug, Clone)]
pub struct NamingConfig {
    /// Suffix appended to a type name to form its schema constant name.
    pub schema_suffix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            schema_suffix: "Schema".to_string(),
        }
    }
}

/// Legal names for every named type, computed once per pass.
///
/// Enums are named before objects, each group in declaration order; later
/// declarations lose collisions and receive a numeric suffix.
pub struct NameTable {
    type_names: HashMap<NodeId, String>,
    schema_names: HashMap<NodeId, String>,
}

impl NameTable {
    pub fn build(graph: &TypeGraph, config: &NamingConfig) -> Self {
        let mut type_names = HashMap::new();
        let mut schema_names = HashMap::new();
        let mut used: HashSet<String> = HashSet::new();

        let named: Vec<(NodeId, &str)> = graph
            .enums()
            .map(|e| (e.id, e.name.as_str()))
            .chain(graph.objects().map(|o| (o.id, o.name.as_str())))
            .collect();

        for (id, raw) in named {
            let base = legalize(raw);
            let mut name = base.clone();
            let mut counter = 1;
            while !used.insert(name.clone()) {
                name = format!("{}{}", base, counter);
                counter += 1;
            }
            schema_names.insert(id, format!("{}{}", name, config.schema_suffix));
            type_names.insert(id, name);
        }

        Self {
            type_names,
            schema_names,
        }
    }

    /// Legalized type name, used for the `z.infer` binding.
    pub fn type_name(&self, id: NodeId) -> &str {
        &self.type_names[&id]
    }

    /// Schema constant name (type name plus suffix).
    pub fn schema_name(&self, id: NodeId) -> &str {
        &self.schema_names[&id]
    }
}

/// Convert a raw type name into a legal TypeScript identifier in
/// PascalCase. Non-alphanumeric characters act as word separators; a
/// leading digit is guarded with an underscore. The uppercase first letter
/// means the result can never collide with a reserved word.
pub fn legalize(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut capitalize_next = true;

    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if capitalize_next {
                result.push(c.to_ascii_uppercase());
                capitalize_next = false;
            } else {
                result.push(c);
            }
        } else {
            capitalize_next = true;
        }
    }

    if result.is_empty() {
        result.push_str("Unnamed");
    }
    if result.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        result.insert(0, '_');
    }

    result
}
