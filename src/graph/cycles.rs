//! Cycle Analysis
//!
//! Builds the reference graph over named object types and computes strongly
//! connected components with Tarjan's algorithm. A type is recursive when
//! its component has more than one member, or when it is its own direct
//! dependency (a self-edge). The recursive flag selects the deferred
//! declaration form during emission.

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::refs::object_references;
use super::{NodeId, TypeGraph};

/// A strongly connected component of the reference graph.
#[derive(Debug, Clone, Serialize)]
pub struct Component {
    /// Position in the analyzer's output order.
    pub index: usize,
    /// Member object ids, in discovery order.
    pub members: Vec<NodeId>,
    /// More than one member, or a single member with a self-edge.
    pub recursive: bool,
}

/// Result of cycle analysis over a type graph.
///
/// Every object belongs to exactly one component.
pub struct CycleAnalysis {
    pub components: Vec<Component>,
    component_of: HashMap<NodeId, usize>,
    recursive: HashSet<NodeId>,
    pub(crate) reference_graph: DiGraph<NodeId, ()>,
}

impl CycleAnalysis {
    /// Component index for an object id.
    pub fn component_of(&self, id: NodeId) -> Option<usize> {
        self.component_of.get(&id).copied()
    }

    /// Whether the object participates in a cycle (including a self-cycle).
    pub fn is_recursive(&self, id: NodeId) -> bool {
        self.recursive.contains(&id)
    }
}

/// Compute the strongly connected components of the object reference graph.
pub fn analyze(graph: &TypeGraph) -> CycleAnalysis {
    let mut reference_graph = DiGraph::with_capacity(graph.object_count(), graph.object_count() * 2);
    let mut indices = HashMap::with_capacity(graph.object_count());

    for obj in graph.objects() {
        indices.insert(obj.id, reference_graph.add_node(obj.id));
    }

    for obj in graph.objects() {
        let from = indices[&obj.id];
        for target in object_references(graph, obj) {
            // ids that do not resolve to a local object are external references
            let Some(&to) = indices.get(&target) else {
                continue;
            };
            reference_graph.add_edge(from, to, ());
        }
    }

    let sccs = tarjan_scc(&reference_graph);

    let mut components = Vec::with_capacity(sccs.len());
    let mut component_of = HashMap::with_capacity(graph.object_count());
    let mut recursive = HashSet::new();

    for scc in sccs {
        let index = components.len();
        let members: Vec<NodeId> = scc
            .iter()
            .filter_map(|&idx| reference_graph.node_weight(idx).copied())
            .collect();

        let is_recursive = scc.len() > 1
            || scc.iter().any(|&idx| {
                reference_graph
                    .edges_directed(idx, Direction::Outgoing)
                    .any(|e| e.target() == idx)
            });

        for member in &members {
            component_of.insert(*member, index);
            if is_recursive {
                recursive.insert(*member);
            }
        }

        components.push(Component {
            index,
            members,
            recursive: is_recursive,
        });
    }

    debug!(
        components = components.len(),
        recursive = recursive.len(),
        "cycle analysis complete"
    );

    CycleAnalysis {
        components,
        component_of,
        recursive,
        reference_graph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, PrimitiveKind, Property};

    #[test]
    fn acyclic_objects_are_not_recursive() {
        let mut b = GraphBuilder::new();
        let string = b.primitive(PrimitiveKind::String);
        let pet = b.object("Pet", vec![Property::new("name", string, false)], None);
        let person = b.object("Person", vec![Property::new("pet", pet, false)], None);
        let graph = b.finish().unwrap();

        let analysis = analyze(&graph);
        assert_eq!(analysis.components.len(), 2);
        assert!(!analysis.is_recursive(pet));
        assert!(!analysis.is_recursive(person));
        assert_ne!(analysis.component_of(pet), analysis.component_of(person));
    }

    #[test]
    fn self_edge_marks_singleton_recursive() {
        let mut b = GraphBuilder::new();
        let node = b.declare_object("Node");
        b.define_object(node, vec![Property::new("next", node, true)], None)
            .unwrap();
        let graph = b.finish().unwrap();

        let analysis = analyze(&graph);
        assert_eq!(analysis.components.len(), 1);
        assert!(analysis.is_recursive(node));
    }

    #[test]
    fn mutual_cycle_shares_one_component() {
        let mut b = GraphBuilder::new();
        let a = b.declare_object("A");
        let c = b.declare_object("B");
        b.define_object(a, vec![Property::new("b", c, false)], None)
            .unwrap();
        b.define_object(c, vec![Property::new("a", a, false)], None)
            .unwrap();
        let graph = b.finish().unwrap();

        let analysis = analyze(&graph);
        assert!(analysis.is_recursive(a));
        assert!(analysis.is_recursive(c));
        assert_eq!(analysis.component_of(a), analysis.component_of(c));
        let component = &analysis.components[analysis.component_of(a).unwrap()];
        assert_eq!(component.members.len(), 2);
    }

    #[test]
    fn cycle_through_wrapper_nodes_is_detected() {
        let mut b = GraphBuilder::new();
        let tree = b.declare_object("Tree");
        let children = b.array(tree);
        b.define_object(tree, vec![Property::new("children", children, false)], None)
            .unwrap();
        let graph = b.finish().unwrap();

        let analysis = analyze(&graph);
        assert!(analysis.is_recursive(tree));
    }
}
