//! Dependency DAG algorithms for entigen.
//!
//! This crate provides a directed acyclic graph (DAG) used to order generator
//! compositions: a generator that depends on another must be fully composed
//! (and run) before it, within every priority queue.
//!
//! # Key Types
//!
//! - [`DependencyGraph`]: builds the graph, detects cycles and computes the order
//! - [`NodeData`]: trait that node payloads implement to expose their dependencies
//! - [`GraphNode`]: a node in the graph containing the node name and payload
//!
//! # Example
//!
//! ```ignore
//! use entigen_task_graph::{DependencyGraph, NodeData};
//!
//! struct Composition {
//!     depends_on: Vec<String>,
//! }
//!
//! impl NodeData for Composition {
//!     fn dependency_names(&self) -> impl Iterator<Item = &str> {
//!         self.depends_on.iter().map(String::as_str)
//!     }
//! }
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_node("bootstrap-application", Composition { depends_on: vec![] });
//! graph.add_node("entity-snapshots", Composition {
//!     depends_on: vec!["bootstrap-application".to_string()],
//! });
//! graph.add_dependency_edges()?;
//!
//! // Dependencies first, ties broken by insertion order
//! let sorted = graph.topological_sort()?;
//! ```

mod error;
mod graph;

pub use error::{Error, Result};
pub use graph::{DependencyGraph, GraphNode};

/// Trait for payloads that can be stored in a [`DependencyGraph`].
pub trait NodeData: Clone {
    /// Returns the names of the nodes this node depends on.
    fn dependency_names(&self) -> impl Iterator<Item = &str>;
}
