//! Zod Expression Mapping
//!
//! Pure structural mapping from type nodes to Zod expression fragments,
//! plus the declaration bodies the emitter folds them into. Named types
//! never reach the structural path: [`TypeMapper::expression`] converts
//! them to schema-name references first. A named type arriving at the
//! structural path anyway is a programming error in the caller and aborts
//! the pass.

use crate::error::{CodegenError, Result};
use crate::graph::{EnumType, NodeId, ObjectType, PrimitiveKind, TypeGraph, TypeNode};

use super::names::NameTable;

/// Maps type nodes to Zod expressions.
pub struct TypeMapper<'a> {
    graph: &'a TypeGraph,
    names: &'a NameTable,
}

impl<'a> TypeMapper<'a> {
    pub fn new(graph: &'a TypeGraph, names: &'a NameTable) -> Self {
        Self { graph, names }
    }

    /// Expression for a node in a child position. Named types become bare
    /// references to their schema constant.
    pub fn expression(&self, node: NodeId) -> Result<String> {
        match self.graph.node(node) {
            TypeNode::Object(obj) => Ok(self.names.schema_name(obj.id).to_string()),
            TypeNode::Enum(e) => Ok(self.names.schema_name(e.id).to_string()),
            _ => self.structural(node),
        }
    }

    fn structural(&self, node: NodeId) -> Result<String> {
        Ok(match self.graph.node(node) {
            TypeNode::Primitive(kind) => primitive_expr(*kind).to_string(),
            TypeNode::Array(items) => format!("z.array({})", self.expression(*items)?),
            TypeNode::Map(values) => {
                format!("z.record(z.string(), {})", self.expression(*values)?)
            }
            TypeNode::Union(members) => self.union_expr(members)?,
            TypeNode::Object(_) | TypeNode::Enum(_) => {
                return Err(CodegenError::Internal(
                    "named type reached the structural mapping path without being referenced",
                ));
            }
        })
    }

    fn union_expr(&self, members: &[NodeId]) -> Result<String> {
        match members {
            [] => Ok("z.never()".to_string()),
            [only] => self.expression(*only),
            _ => {
                let parts = members
                    .iter()
                    .map(|member| self.expression(*member))
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("z.union([{}])", parts.join(", ")))
            }
        }
    }

    /// Declaration body for an object type: properties folded in original
    /// order, `.optional()` on optional properties, `.catchall` when an
    /// additional-properties type is present.
    pub fn object_body(&self, obj: &ObjectType) -> Result<String> {
        let mut body = String::new();
        if obj.properties.is_empty() {
            body.push_str("z.object({})");
        } else {
            body.push_str("z.object({\n");
            for prop in &obj.properties {
                let mut expr = self.expression(prop.ty)?;
                if prop.optional {
                    expr.push_str(".optional()");
                }
                body.push_str(&format!("    {}: {},\n", string_literal(&prop.key), expr));
            }
            body.push_str("})");
        }
        if let Some(additional) = obj.additional {
            body.push_str(&format!(".catchall({})", self.expression(additional)?));
        }
        Ok(body)
    }
}

/// Body of an enum declaration.
pub fn enum_literal(e: &EnumType) -> String {
    let cases = e
        .cases
        .iter()
        .map(|case| string_literal(case))
        .collect::<Vec<_>>()
        .join(", ");
    format!("z.enum([{}])", cases)
}

fn primitive_expr(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Any => "z.any()",
        PrimitiveKind::Null => "z.null()",
        PrimitiveKind::Bool => "z.boolean()",
        // the target has no distinct integer representation
        PrimitiveKind::Integer | PrimitiveKind::Double => "z.number()",
        PrimitiveKind::String => "z.string()",
        PrimitiveKind::DateTime => "z.coerce.date()",
    }
}

/// JSON escaping is valid in a JavaScript string literal.
fn string_literal(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}
