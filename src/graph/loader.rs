//! Type-Graph Document Loading
//!
//! Parses the JSON description of a type graph and lowers it onto
//! [`GraphBuilder`]. Named types are declared in a first pass and object
//! bodies are attached in a second, so documents may reference types before
//! their declaration and may form cycles.
//!
//! Document shape:
//!
//! ```json
//! {
//!   "types": [
//!     { "name": "Color", "enum": ["red", "green", "blue"] },
//!     { "name": "Person", "object": {
//!         "properties": [
//!           { "key": "name", "type": "string" },
//!           { "key": "pets", "type": { "array": "Pet" }, "optional": true }
//!         ]
//!     }}
//!   ]
//! }
//! ```
//!
//! A `type` expression is a primitive keyword (`any`, `null`, `bool`,
//! `integer`, `double`, `string`, `date-time`), the name of a declared
//! type, or one of the wrappers `{"array": T}`, `{"map": T}`,
//! `{"union": [T, ...]}`. Property arrays keep their order, which the
//! emitter preserves.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{CodegenError, Result};
use super::{GraphBuilder, NodeId, PrimitiveKind, Property, TypeGraph};

/// Root of a type-graph document.
#[derive(Debug, Deserialize)]
pub struct GraphDoc {
    pub types: Vec<TypeDecl>,
}

/// A named type declaration.
#[derive(Debug, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(flatten)]
    pub body: TypeBody,
}

/// Body of a named type declaration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeBody {
    Enum(Vec<String>),
    Object(ObjectDecl),
}

/// Body of an object declaration.
#[derive(Debug, Deserialize)]
pub struct ObjectDecl {
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub additional: Option<TypeExpr>,
}

/// A single property.
#[derive(Debug, Deserialize)]
pub struct PropertyDecl {
    pub key: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub optional: bool,
}

/// A type expression: a primitive keyword, a named-type reference, or a
/// structural wrapper.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TypeExpr {
    Name(String),
    Compound(CompoundExpr),
}

/// Structural wrapper expressions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundExpr {
    Array(Box<TypeExpr>),
    Map(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
}

/// Load a type graph from a JSON document string.
pub fn load_from_str(content: &str) -> Result<TypeGraph> {
    let doc: GraphDoc = serde_json::from_str(content)?;
    lower(doc)
}

/// Load a type graph from a file.
pub fn load_from_path(path: &Path) -> Result<TypeGraph> {
    let content = fs::read_to_string(path)?;
    load_from_str(&content)
}

fn lower(doc: GraphDoc) -> Result<TypeGraph> {
    let mut builder = GraphBuilder::new();
    let mut by_name: HashMap<String, NodeId> = HashMap::with_capacity(doc.types.len());

    // First pass: declare every named type so references resolve regardless
    // of declaration order.
    for decl in &doc.types {
        if by_name.contains_key(&decl.name) {
            return Err(CodegenError::DuplicateType(decl.name.clone()));
        }
        let id = match &decl.body {
            TypeBody::Enum(cases) => builder.enumeration(decl.name.as_str(), cases.clone()),
            TypeBody::Object(_) => builder.declare_object(decl.name.as_str()),
        };
        by_name.insert(decl.name.clone(), id);
    }

    // Second pass: attach object bodies.
    for decl in &doc.types {
        let TypeBody::Object(body) = &decl.body else {
            continue;
        };
        let id = by_name[&decl.name];

        let mut properties = Vec::with_capacity(body.properties.len());
        for prop in &body.properties {
            let ty = lower_expr(&mut builder, &by_name, &prop.ty)?;
            properties.push(Property::new(prop.key.as_str(), ty, prop.optional));
        }
        let additional = body
            .additional
            .as_ref()
            .map(|expr| lower_expr(&mut builder, &by_name, expr))
            .transpose()?;

        builder.define_object(id, properties, additional)?;
    }

    let graph = builder.finish()?;
    debug!(
        objects = graph.object_count(),
        enums = graph.enum_count(),
        "type graph loaded"
    );
    Ok(graph)
}

fn lower_expr(
    builder: &mut GraphBuilder,
    by_name: &HashMap<String, NodeId>,
    expr: &TypeExpr,
) -> Result<NodeId> {
    match expr {
        TypeExpr::Name(name) => {
            if let Some(kind) = PrimitiveKind::from_keyword(name) {
                return Ok(builder.primitive(kind));
            }
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| CodegenError::UnknownType(name.clone()))
        }
        TypeExpr::Compound(CompoundExpr::Array(items)) => {
            let items = lower_expr(builder, by_name, items)?;
            Ok(builder.array(items))
        }
        TypeExpr::Compound(CompoundExpr::Map(values)) => {
            let values = lower_expr(builder, by_name, values)?;
            Ok(builder.map(values))
        }
        TypeExpr::Compound(CompoundExpr::Union(members)) => {
            let members = members
                .iter()
                .map(|member| lower_expr(builder, by_name, member))
                .collect::<Result<Vec<_>>>()?;
            Ok(builder.union(members))
        }
    }
}
