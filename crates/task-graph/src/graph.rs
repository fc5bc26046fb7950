//! Dependency graph builder using petgraph.
//!
//! This module builds directed acyclic graphs (DAGs) from named nodes that
//! declare dependencies on each other, and computes a deterministic execution
//! order from them.

use crate::{Error, NodeData, Result};
use petgraph::Direction;
use petgraph::algo::{is_cyclic_directed, kosaraju_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::IntoNodeReferences;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use tracing::debug;

/// A node in the dependency graph.
#[derive(Debug, Clone)]
pub struct GraphNode<T> {
    /// Name of the node.
    pub name: String,
    /// The node payload.
    pub data: T,
}

/// Dependency graph for ordering named nodes.
///
/// Edges point from a dependency to its dependent, so a topological order
/// lists dependencies first.
pub struct DependencyGraph<T: NodeData> {
    graph: DiGraph<GraphNode<T>, ()>,
    name_to_node: HashMap<String, NodeIndex>,
}

impl<T: NodeData> DependencyGraph<T> {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            name_to_node: HashMap::new(),
        }
    }

    /// Add a single node to the graph.
    ///
    /// If a node with the same name already exists, the existing index is
    /// returned and the new payload is dropped.
    pub fn add_node(&mut self, name: &str, data: T) -> NodeIndex {
        if let Some(&node) = self.name_to_node.get(name) {
            return node;
        }

        let node_index = self.graph.add_node(GraphNode {
            name: name.to_string(),
            data,
        });
        self.name_to_node.insert(name.to_string(), node_index);
        debug!("Added graph node '{}'", name);

        node_index
    }

    /// Get a reference to a node by name.
    #[must_use]
    pub fn get_node_by_name(&self, name: &str) -> Option<&GraphNode<T>> {
        self.name_to_node
            .get(name)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Add dependency edges after all nodes have been added.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDependencies`] if any node depends on a name
    /// that was never added. No edge is added in that case.
    pub fn add_dependency_edges(&mut self) -> Result<()> {
        let mut missing = Vec::new();
        let mut edges_to_add = Vec::new();

        for (node_index, node) in self.graph.node_references() {
            for dep_name in node.data.dependency_names() {
                if let Some(&dep_index) = self.name_to_node.get(dep_name) {
                    edges_to_add.push((dep_index, node_index));
                } else {
                    missing.push((node.name.clone(), dep_name.to_string()));
                }
            }
        }

        if !missing.is_empty() {
            return Err(Error::MissingDependencies { missing });
        }

        for (from, to) in edges_to_add {
            self.graph.update_edge(from, to, ());
        }

        Ok(())
    }

    /// Check if the graph has cycles.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Names of the nodes that take part in a cycle, in insertion order.
    ///
    /// Returns an empty vector for an acyclic graph.
    #[must_use]
    pub fn cycle_members(&self) -> Vec<String> {
        let mut members: Vec<NodeIndex> = kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&idx| self.graph.contains_edge(idx, idx))
            })
            .flatten()
            .collect();
        members.sort_by_key(|idx| idx.index());
        members
            .into_iter()
            .map(|idx| self.graph[idx].name.clone())
            .collect()
    }

    /// Get the nodes in dependency order.
    ///
    /// Uses Kahn's algorithm; whenever several nodes are ready, the one added
    /// earliest is emitted first, so the result is stable for a given
    /// insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] if the graph contains cycles.
    pub fn topological_sort(&self) -> Result<Vec<GraphNode<T>>> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .count()
            })
            .collect();

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(index, _)| Reverse(index))
            .collect();

        let mut sorted = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(index)) = ready.pop() {
            let node = NodeIndex::new(index);
            sorted.push(self.graph[node].clone());
            for next in self.graph.neighbors_directed(node, Direction::Outgoing) {
                let degree = &mut in_degree[next.index()];
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(next.index()));
                }
            }
        }

        if sorted.len() != self.graph.node_count() {
            return Err(Error::CycleDetected {
                members: self.cycle_members(),
            });
        }

        Ok(sorted)
    }

    /// Get the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Check if a node exists in the graph.
    #[must_use]
    pub fn contains_node(&self, name: &str) -> bool {
        self.name_to_node.contains_key(name)
    }
}

impl<T: NodeData> Default for DependencyGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}
