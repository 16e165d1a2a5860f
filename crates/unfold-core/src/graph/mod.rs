//! Type graph: structured types as nodes, navigation steps as edges.
//!
//! The graph is an adjacency list keyed by qualified type name, with one
//! reserved node — the service root — whose edges are the entry-point
//! container's members. It is built once from a [`SchemaModel`](crate::schema::SchemaModel)
//! snapshot and read-only afterwards: validation, enumeration and rendering
//! never mutate it.
//!
//! # Components
//!
//! - [`TypeGraph::from_model`] - graph construction ([`builder`])
//! - [`TypeGraph::validate`] - referential closure check ([`validate`])
//! - [`TypeGraph::unfold`] - bounded route enumeration ([`unfold`])
//! - [`TypeGraph::write_text`] / [`render::write_routes`] - text output

mod builder;
mod error;
pub mod render;
mod unfold;
mod validate;

pub use builder::BuildResult;
pub use error::GraphError;
pub use render::{write_routes, RenderError};
pub use unfold::{Route, Unfolder};
pub use validate::Violation;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One labeled relationship between two graph nodes.
///
/// Traversing the edge contributes the `name` segment to a route; collection
/// edges additionally contribute a synthetic key-selector segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Path segment contributed by this edge: a property name, a container
    /// member name, or (for a derived-type cast) the derived type's qualified
    /// name.
    pub name: String,
    /// Qualified name of the node this edge points to.
    pub target: String,
    /// True if traversing this edge yields zero-or-many instances.
    pub is_collection: bool,
    /// Representative key property name for building the key-selector
    /// segment. Present only on collection edges to keyed entity types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Edge {
    /// The `{key}` segment selecting one instance out of a collection.
    /// Keyless collections render as `{}`.
    pub fn key_selector(&self) -> String {
        format!("{{{}}}", self.key.as_deref().unwrap_or(""))
    }
}

/// Adjacency-list graph of a schema's structured types.
///
/// Node iteration is ordered by identifier (so validation and rendering are
/// deterministic); the edge list of each node preserves schema declaration
/// order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeGraph {
    nodes: BTreeMap<String, Vec<Edge>>,
}

impl TypeGraph {
    /// Reserved identifier of the entry-point node. `$` cannot appear in a
    /// qualified type name, so this never collides with a schema type.
    pub const SERVICE_ROOT: &'static str = "$serviceRoot";

    /// Build a graph directly from node/edge-list pairs.
    ///
    /// Mostly useful in tests and for embedding; [`TypeGraph::from_model`] is
    /// the production entry point. Later entries for a duplicate node replace
    /// earlier ones.
    pub fn from_adjacency<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<Edge>)>,
    {
        Self {
            nodes: nodes.into_iter().collect(),
        }
    }

    /// Number of nodes, including the service root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges across all nodes.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(Vec::len).sum()
    }

    /// Whether `id` identifies a node of this graph.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Outgoing edges of `id` in declaration order, or `None` for an unknown
    /// node.
    pub fn edges(&self, id: &str) -> Option<&[Edge]> {
        self.nodes.get(id).map(Vec::as_slice)
    }

    /// Nodes with their edge lists, ordered by node identifier.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &[Edge])> {
        self.nodes.iter().map(|(id, edges)| (id.as_str(), edges.as_slice()))
    }
}
