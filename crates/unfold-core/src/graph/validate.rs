//! Referential closure check.

use std::fmt;

use serde::Serialize;

use super::TypeGraph;

/// One dangling edge: its target type has no node in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Node the edge starts from.
    pub source: String,
    /// Name of the dangling edge.
    pub edge: String,
    /// The missing target type.
    pub target: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "undefined edge target: {}.{} -> {}",
            self.source, self.edge, self.target
        )
    }
}

impl TypeGraph {
    /// Check that every edge target is a known node.
    ///
    /// Returns the complete violation list (never stops at the first), in
    /// node order. An empty list means the graph is closed. Violations are
    /// non-fatal by design: a partial graph is still useful for inspection,
    /// and the enumerator only fails if a dangling target is actually
    /// descended into.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        for (source, edges) in self.nodes() {
            for edge in edges {
                if !self.contains_node(&edge.target) {
                    violations.push(Violation {
                        source: source.to_string(),
                        edge: edge.name.clone(),
                        target: edge.target.clone(),
                    });
                }
            }
        }
        violations
    }
}
