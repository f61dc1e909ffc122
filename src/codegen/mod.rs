//! Schema Emission
//!
//! Consumes a [`TypeGraph`] and produces the ordered declaration sequence:
//! enums first in declaration order, then objects in dependency order, with
//! every member of a reference cycle wrapped in a deferred `z.lazy`
//! declaration so its name may appear inside its own body.
//!
//! Analysis runs up front; emission is a pure fold over its results and
//! never re-reads the graph beyond node lookups. Either the complete
//! sequence is produced or an error is returned, never partial output.

pub mod names;
pub mod zod;

pub use names::{NameTable, NamingConfig};
pub use zod::TypeMapper;

use tracing::debug;

use crate::error::{CodegenError, Result};
use crate::graph::{cycles, schedule, TypeGraph};

/// Options for a generation pass.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Emit an `export type X = z.infer<...>` binding alongside each
    /// schema. Off means schema-only mode.
    pub type_bindings: bool,
    pub naming: NamingConfig,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            type_bindings: true,
            naming: NamingConfig::default(),
        }
    }
}

/// A single emitted declaration.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Declared schema constant name.
    pub name: String,
    /// The schema expression, including the deferred wrapper when present.
    pub expr: String,
    /// Derived type name for the `z.infer` binding, when enabled.
    pub type_binding: Option<String>,
    /// Whether the declaration uses the deferred (`z.lazy`) form.
    pub deferred: bool,
}

impl Declaration {
    /// Render the declaration as TypeScript source.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.deferred {
            // the annotation keeps the constant referenceable inside its
            // own body and inside co-cycle members
            out.push_str(&format!(
                "export const {}: z.ZodSchema = {};\n",
                self.name, self.expr
            ));
        } else {
            out.push_str(&format!("export const {} = {};\n", self.name, self.expr));
        }
        if let Some(ty) = &self.type_binding {
            out.push_str(&format!(
                "export type {} = z.infer<typeof {}>;\n",
                ty, self.name
            ));
        }
        out
    }
}

/// Run a full generation pass over `graph`.
pub fn generate(graph: &TypeGraph, options: &EmitOptions) -> Result<Vec<Declaration>> {
    let names = NameTable::build(graph, &options.naming);
    let mapper = TypeMapper::new(graph, &names);
    let mut declarations = Vec::with_capacity(graph.enum_count() + graph.object_count());

    // enums have no outbound references and always come first
    for e in graph.enums() {
        declarations.push(Declaration {
            name: names.schema_name(e.id).to_string(),
            expr: zod::enum_literal(e),
            type_binding: options
                .type_bindings
                .then(|| names.type_name(e.id).to_string()),
            deferred: false,
        });
    }

    let analysis = cycles::analyze(graph);
    let order = schedule::schedule(graph, &analysis)?;

    for id in order {
        let obj = graph
            .object(id)
            .ok_or(CodegenError::Internal("scheduled id is not an object"))?;
        let body = mapper.object_body(obj)?;
        let recursive = analysis.is_recursive(id);
        let expr = if recursive {
            format!("z.lazy(() => {})", body)
        } else {
            body
        };
        declarations.push(Declaration {
            name: names.schema_name(id).to_string(),
            expr,
            type_binding: options
                .type_bindings
                .then(|| names.type_name(id).to_string()),
            deferred: recursive,
        });
    }

    debug!(declarations = declarations.len(), "generation pass complete");
    Ok(declarations)
}

/// Render a full module: import header plus declarations separated by
/// blank lines.
pub fn render_module(declarations: &[Declaration]) -> String {
    let mut out = String::from("import * as z from \"zod\";\n");
    for declaration in declarations {
        out.push('\n');
        out.push_str(&declaration.render());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_declaration_renders_const_and_binding() {
        let declaration = Declaration {
            name: "PetSchema".into(),
            expr: "z.object({})".into(),
            type_binding: Some("Pet".into()),
            deferred: false,
        };
        assert_eq!(
            declaration.render(),
            "export const PetSchema = z.object({});\nexport type Pet = z.infer<typeof PetSchema>;\n"
        );
    }

    #[test]
    fn deferred_declaration_carries_annotation() {
        let declaration = Declaration {
            name: "NodeSchema".into(),
            expr: "z.lazy(() => z.object({}))".into(),
            type_binding: None,
            deferred: true,
        };
        assert_eq!(
            declaration.render(),
            "export const NodeSchema: z.ZodSchema = z.lazy(() => z.object({}));\n"
        );
    }

    #[test]
    fn module_starts_with_the_zod_import() {
        let rendered = render_module(&[]);
        assert_eq!(rendered, "import * as z from \"zod\";\n");
    }
}
