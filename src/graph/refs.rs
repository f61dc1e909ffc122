//! Reference Extraction
//!
//! Computes the set of named-type ids a type node depends on. Wrapper nodes
//! (arrays, maps, unions) are traversed; named types are boundaries: an
//! object contributes its own id plus the references of its
//! additional-properties node, never the types behind its properties. This
//! bounding keeps the walk finite even when type bodies are cyclic.

use std::collections::{BTreeSet, HashSet};

use super::{NodeId, ObjectType, TypeGraph, TypeNode};

/// Collect the named-type ids referenced by `node`.
///
/// Enums contribute nothing: they never reference other types and are
/// always emitted before any object, so they stay out of the dependency
/// graph entirely.
pub fn references(graph: &TypeGraph, node: NodeId) -> BTreeSet<NodeId> {
    let mut out = BTreeSet::new();
    let mut visited = HashSet::new();
    collect(graph, node, &mut out, &mut visited);
    out
}

fn collect(
    graph: &TypeGraph,
    node: NodeId,
    out: &mut BTreeSet<NodeId>,
    visited: &mut HashSet<NodeId>,
) {
    if !visited.insert(node) {
        return;
    }
    match graph.node(node) {
        TypeNode::Primitive(_) | TypeNode::Enum(_) => {}
        TypeNode::Array(items) => collect(graph, *items, out, visited),
        TypeNode::Map(values) => collect(graph, *values, out, visited),
        TypeNode::Union(members) => {
            for member in members {
                collect(graph, *member, out, visited);
            }
        }
        TypeNode::Object(obj) => {
            out.insert(obj.id);
            if let Some(additional) = obj.additional {
                collect(graph, additional, out, visited);
            }
        }
    }
}

/// References induced by an object's declaration body: every property type
/// plus the additional-properties node.
pub fn object_references(graph: &TypeGraph, obj: &ObjectType) -> BTreeSet<NodeId> {
    let mut out = BTreeSet::new();
    for prop in &obj.properties {
        out.extend(references(graph, prop.ty));
    }
    if let Some(additional) = obj.additional {
        out.extend(references(graph, additional));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, PrimitiveKind, Property};

    #[test]
    fn wrappers_are_traversed() {
        let mut b = GraphBuilder::new();
        let target = b.object("Target", Vec::new(), None);
        let arr = b.array(target);
        let string = b.primitive(PrimitiveKind::String);
        let union = b.union(vec![string, arr]);
        let map = b.map(union);
        let graph = b.finish().unwrap();

        let refs = references(&graph, map);
        assert_eq!(refs.into_iter().collect::<Vec<_>>(), vec![target]);
    }

    #[test]
    fn object_contributes_own_id_not_property_types() {
        let mut b = GraphBuilder::new();
        let other = b.object("Other", Vec::new(), None);
        let obj = b.object("Obj", vec![Property::new("other", other, false)], None);
        let graph = b.finish().unwrap();

        // referencing Obj is one edge; Obj's properties stay opaque
        let refs = references(&graph, obj);
        assert_eq!(refs.into_iter().collect::<Vec<_>>(), vec![obj]);
    }

    #[test]
    fn object_additional_properties_are_included() {
        let mut b = GraphBuilder::new();
        let value = b.object("Value", Vec::new(), None);
        let obj = b.object("Bag", Vec::new(), Some(value));
        let graph = b.finish().unwrap();

        let refs = references(&graph, obj);
        assert_eq!(refs.into_iter().collect::<Vec<_>>(), vec![value, obj]);
    }

    #[test]
    fn enums_and_primitives_contribute_nothing() {
        let mut b = GraphBuilder::new();
        let color = b.enumeration("Color", vec!["red".into()]);
        let number = b.primitive(PrimitiveKind::Double);
        let graph = b.finish().unwrap();

        assert!(references(&graph, color).is_empty());
        assert!(references(&graph, number).is_empty());
    }

    #[test]
    fn body_references_cover_properties_and_additional() {
        let mut b = GraphBuilder::new();
        let left = b.object("Left", Vec::new(), None);
        let right = b.object("Right", Vec::new(), None);
        let owner_id = b.declare_object("Owner");
        b.define_object(
            owner_id,
            vec![Property::new("left", left, false)],
            Some(right),
        )
        .unwrap();
        let graph = b.finish().unwrap();

        let owner = graph.object(owner_id).unwrap();
        let refs = object_references(&graph, owner);
        assert_eq!(refs.into_iter().collect::<Vec<_>>(), vec![left, right]);
    }
}
