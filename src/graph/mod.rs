//! Type Graph
//!
//! Immutable, fully resolved type graph consumed by a generation pass.
//! All nodes live in one arena; a [`NodeId`] is both the arena index and,
//! for object and enum nodes, the stable identifier used by the dependency
//! analysis. Ownership is by id lookup in the arena, never by embedding, so
//! cyclic and self-referential graphs need no pointer cycles.
//!
//! Graphs are built through [`GraphBuilder`]. Objects are declared in two
//! phases (reserve the slot, then attach the body) so a body may reference
//! its own type or a type declared later.

pub mod cycles;
pub mod loader;
pub mod refs;
pub mod schedule;

pub use cycles::{analyze, Component, CycleAnalysis};
pub use loader::{load_from_path, load_from_str};
pub use refs::{object_references, references};
pub use schedule::schedule;

use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::{CodegenError, Result};

/// Stable identifier of a node in the type graph arena.
///
/// Assigned once at construction and never reused within a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Primitive type kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Any,
    Null,
    Bool,
    Integer,
    Double,
    String,
    /// A string transformed into a date at parse time.
    DateTime,
}

impl PrimitiveKind {
    /// Parse a primitive keyword as it appears in input documents.
    pub fn from_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "any" => Self::Any,
            "null" => Self::Null,
            "bool" => Self::Bool,
            "integer" => Self::Integer,
            "double" => Self::Double,
            "string" => Self::String,
            "date-time" => Self::DateTime,
            _ => return None,
        })
    }
}

/// A single node in the type graph.
///
/// Object and Enum are the only named variants; everything else is an
/// anonymous structural node identified purely by position.
#[derive(Debug, Clone)]
pub enum TypeNode {
    Primitive(PrimitiveKind),
    Array(NodeId),
    Map(NodeId),
    Union(Vec<NodeId>),
    Object(ObjectType),
    Enum(EnumType),
}

/// A named object type.
#[derive(Debug, Clone)]
pub struct ObjectType {
    pub id: NodeId,
    /// Raw source name, legalized later by the naming service.
    pub name: String,
    pub properties: Vec<Property>,
    /// Value type accepted for keys outside the declared properties.
    pub additional: Option<NodeId>,
    defined: bool,
}

/// A named enumeration over raw case strings.
#[derive(Debug, Clone)]
pub struct EnumType {
    pub id: NodeId,
    pub name: String,
    pub cases: Vec<String>,
}

/// A property of an object type.
///
/// Order is the declaration order from the source and is preserved through
/// emission.
#[derive(Debug, Clone)]
pub struct Property {
    pub key: String,
    pub ty: NodeId,
    pub optional: bool,
}

impl Property {
    pub fn new(key: impl Into<String>, ty: NodeId, optional: bool) -> Self {
        Self {
            key: key.into(),
            ty,
            optional,
        }
    }
}

/// The immutable type graph.
///
/// Nothing mutates after [`GraphBuilder::finish`]; analysis and emission
/// only read.
#[derive(Debug)]
pub struct TypeGraph {
    nodes: Vec<TypeNode>,
    objects: Vec<NodeId>,
    enums: Vec<NodeId>,
}

impl TypeGraph {
    /// Get a node by id. Ids originate from the builder, so lookups cannot
    /// miss for ids belonging to this graph.
    pub fn node(&self, id: NodeId) -> &TypeNode {
        &self.nodes[id.index()]
    }

    /// Get an object type by id, or None when the id names something else.
    pub fn object(&self, id: NodeId) -> Option<&ObjectType> {
        match self.nodes.get(id.index()) {
            Some(TypeNode::Object(obj)) => Some(obj),
            _ => None,
        }
    }

    /// Get an enum type by id, or None when the id names something else.
    pub fn enumeration(&self, id: NodeId) -> Option<&EnumType> {
        match self.nodes.get(id.index()) {
            Some(TypeNode::Enum(e)) => Some(e),
            _ => None,
        }
    }

    /// Object types in declaration order.
    pub fn objects(&self) -> impl Iterator<Item = &ObjectType> + '_ {
        self.objects.iter().filter_map(move |&id| self.object(id))
    }

    /// Enum types in declaration order.
    pub fn enums(&self) -> impl Iterator<Item = &EnumType> + '_ {
        self.enums.iter().filter_map(move |&id| self.enumeration(id))
    }

    /// Object ids in declaration order.
    pub fn object_ids(&self) -> &[NodeId] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    /// Export the reference graph to GraphViz DOT format.
    pub fn to_dot(&self) -> String {
        let mut output = String::new();

        output.push_str("digraph TypeGraph {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=box, style=rounded, fontname=\"Helvetica\", fontsize=10];\n");
        output.push('\n');

        for e in self.enums() {
            output.push_str(&format!(
                "  \"n{}\" [label=\"{}\", color=\"#808080\"];\n",
                e.id.index(),
                e.name
            ));
        }
        for obj in self.objects() {
            output.push_str(&format!(
                "  \"n{}\" [label=\"{}\"];\n",
                obj.id.index(),
                obj.name
            ));
        }

        output.push('\n');

        for obj in self.objects() {
            let targets: BTreeSet<NodeId> = refs::object_references(self, obj);
            for target in targets {
                if self.object(target).is_some() {
                    output.push_str(&format!(
                        "  \"n{}\" -> \"n{}\";\n",
                        obj.id.index(),
                        target.index()
                    ));
                }
            }
        }

        output.push_str("}\n");
        output
    }
}

/// Builder for [`TypeGraph`].
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<TypeNode>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len() as u32)
    }

    fn push(&mut self, node: TypeNode) -> NodeId {
        let id = self.next_id();
        self.nodes.push(node);
        id
    }

    pub fn primitive(&mut self, kind: PrimitiveKind) -> NodeId {
        self.push(TypeNode::Primitive(kind))
    }

    pub fn array(&mut self, items: NodeId) -> NodeId {
        self.push(TypeNode::Array(items))
    }

    pub fn map(&mut self, values: NodeId) -> NodeId {
        self.push(TypeNode::Map(values))
    }

    pub fn union(&mut self, members: Vec<NodeId>) -> NodeId {
        self.push(TypeNode::Union(members))
    }

    pub fn enumeration(&mut self, name: impl Into<String>, cases: Vec<String>) -> NodeId {
        let id = self.next_id();
        self.push(TypeNode::Enum(EnumType {
            id,
            name: name.into(),
            cases,
        }))
    }

    /// Reserve a named object slot. The body is attached later with
    /// [`define_object`](Self::define_object), so a body may reference its
    /// own type or one declared afterwards.
    pub fn declare_object(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.next_id();
        self.push(TypeNode::Object(ObjectType {
            id,
            name: name.into(),
            properties: Vec::new(),
            additional: None,
            defined: false,
        }))
    }

    /// Attach the body of a previously declared object.
    pub fn define_object(
        &mut self,
        id: NodeId,
        properties: Vec<Property>,
        additional: Option<NodeId>,
    ) -> Result<()> {
        match self.nodes.get_mut(id.index()) {
            Some(TypeNode::Object(obj)) if !obj.defined => {
                obj.properties = properties;
                obj.additional = additional;
                obj.defined = true;
                Ok(())
            }
            Some(TypeNode::Object(obj)) => Err(CodegenError::InvalidGraph(format!(
                "object {} defined twice",
                obj.name
            ))),
            _ => Err(CodegenError::InvalidGraph(format!(
                "node {} is not a declared object",
                id
            ))),
        }
    }

    /// Declare and define an object in one step, for bodies with no forward
    /// references.
    pub fn object(
        &mut self,
        name: impl Into<String>,
        properties: Vec<Property>,
        additional: Option<NodeId>,
    ) -> NodeId {
        let id = self.next_id();
        self.push(TypeNode::Object(ObjectType {
            id,
            name: name.into(),
            properties,
            additional,
            defined: true,
        }))
    }

    /// Freeze the graph. Fails when a declared object never received a body.
    pub fn finish(self) -> Result<TypeGraph> {
        let mut objects = Vec::new();
        let mut enums = Vec::new();

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TypeNode::Object(obj) => {
                    if !obj.defined {
                        return Err(CodegenError::InvalidGraph(format!(
                            "object {} was declared but never defined",
                            obj.name
                        )));
                    }
                    objects.push(NodeId(index as u32));
                }
                TypeNode::Enum(_) => enums.push(NodeId(index as u32)),
                _ => {}
            }
        }

        Ok(TypeGraph {
            nodes: self.nodes,
            objects,
            enums,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assigns_sequential_ids() {
        let mut b = GraphBuilder::new();
        let s = b.primitive(PrimitiveKind::String);
        let a = b.array(s);
        assert_eq!(s.index(), 0);
        assert_eq!(a.index(), 1);
    }

    #[test]
    fn finish_rejects_undefined_object() {
        let mut b = GraphBuilder::new();
        b.declare_object("Dangling");
        let err = b.finish().unwrap_err();
        assert!(err.to_string().contains("Dangling"));
    }

    #[test]
    fn declaration_order_is_preserved() {
        let mut b = GraphBuilder::new();
        let later = b.declare_object("Later");
        let first = b.object("First", Vec::new(), None);
        b.define_object(later, Vec::new(), None).unwrap();
        let graph = b.finish().unwrap();

        let ids: Vec<NodeId> = graph.object_ids().to_vec();
        assert_eq!(ids, vec![later, first]);
    }

    #[test]
    fn to_dot_lists_reference_edges() {
        let mut b = GraphBuilder::new();
        let pet = b.object("Pet", Vec::new(), None);
        b.object("Person", vec![Property::new("pet", pet, false)], None);
        let graph = b.finish().unwrap();

        let dot = graph.to_dot();
        assert!(dot.contains("label=\"Person\""));
        assert!(dot.contains("->"));
    }
}
