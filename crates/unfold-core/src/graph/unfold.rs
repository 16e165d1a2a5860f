//! Bounded, cycle-safe enumeration of every addressable route.
//!
//! The traversal is a depth-first walk from the service root. Every prefix is
//! itself an addressable route, so every path is yielded the moment its last
//! segment is appended, not only at the leaves. Two mechanisms bound the walk
//! on cyclic schemas:
//!
//! - a per-branch visited set: a type already on the current branch is never
//!   descended into again (its segment is still yielded), while a sibling
//!   branch may legitimately revisit it;
//! - a collection-hop budget: each traversal across a collection edge
//!   consumes one unit, and descent stops once the branch's budget reaches
//!   zero. Scalar hops are free, so to-one-only schemas are bounded by the
//!   visited set alone.
//!
//! Both travel downwards by value, never shared across sibling branches, so
//! recursion depth along any branch is strictly bounded and every distinct
//! route is produced exactly once, in declaration order.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::slice;

use serde::Serialize;

use super::{Edge, GraphError, TypeGraph};

/// One addressable route: an ordered, non-empty sequence of path segments.
///
/// Routes are immutable once yielded; [`Route::join`] produces a new value
/// and leaves the prefix untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Route {
    segments: Vec<String>,
}

impl Route {
    fn root() -> Self {
        Route {
            segments: Vec::new(),
        }
    }

    /// A new route extending `self` by one segment.
    pub fn join(&self, segment: impl Into<String>) -> Route {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment.into());
        Route { segments }
    }

    /// The route's segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

/// Renders the literal `/`-joined form with a leading slash, e.g.
/// `/Orders/{Id}/Lines`.
impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl TypeGraph {
    /// Lazily enumerate every distinct route from the service root.
    ///
    /// Each call starts a fresh traversal; two runs over the same graph with
    /// the same budget yield identical sequences. The consumer may stop
    /// pulling at any point without side effects.
    ///
    /// With `max_collection_hops = 0` the first-level segments of collection
    /// members are still yielded, since the budget is only consumed *after*
    /// the collection's own segment is appended.
    ///
    /// Descending into an edge target with no node in the graph yields
    /// `Err(`[`GraphError::UnknownNode`]`)` and ends the stream: that can only
    /// happen when [`TypeGraph::validate`] violations were ignored.
    pub fn unfold(&self, max_collection_hops: u32) -> Unfolder<'_> {
        let mut stack = Vec::new();
        let mut fault = None;
        match self.edges(Self::SERVICE_ROOT) {
            Some(edges) => stack.push(Frame {
                edges: edges.iter(),
                prefix: Route::root(),
                visited: HashSet::new(),
                budget: max_collection_hops,
            }),
            None => fault = Some(GraphError::UnknownNode(Self::SERVICE_ROOT.to_string())),
        }
        Unfolder {
            graph: self,
            stack,
            pending: VecDeque::new(),
            fault,
            done: false,
        }
    }
}

/// One level of the depth-first walk.
struct Frame<'g> {
    /// Remaining edges of this node, in declaration order.
    edges: slice::Iter<'g, Edge>,
    /// Route that led to this node.
    prefix: Route,
    /// Types already traversed on this branch.
    visited: HashSet<String>,
    /// Collection hops this branch may still descend through.
    budget: u32,
}

/// Lazy route producer returned by [`TypeGraph::unfold`].
///
/// An explicit work-stack iterator: each `next` call resumes the walk exactly
/// where the previous one left off, with no background work between pulls.
pub struct Unfolder<'g> {
    graph: &'g TypeGraph,
    stack: Vec<Frame<'g>>,
    /// Routes produced by the current step but not yet handed out (a
    /// collection edge produces two at once).
    pending: VecDeque<Route>,
    fault: Option<GraphError>,
    done: bool,
}

impl Iterator for Unfolder<'_> {
    type Item = Result<Route, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(route) = self.pending.pop_front() {
                return Some(Ok(route));
            }
            if self.done {
                return None;
            }
            if let Some(err) = self.fault.take() {
                self.done = true;
                return Some(Err(err));
            }
            let Some(frame) = self.stack.last_mut() else {
                self.done = true;
                return None;
            };
            let Some(edge) = frame.edges.next() else {
                self.stack.pop();
                continue;
            };

            let mut route = frame.prefix.join(edge.name.as_str());
            self.pending.push_back(route.clone());

            let mut budget = frame.budget;
            let mut descend = true;
            if edge.is_collection {
                // The key-selector segment is appended before the budget is
                // checked, so the selector itself always appears.
                route = route.join(edge.key_selector());
                self.pending.push_back(route.clone());
                budget = budget.saturating_sub(1);
                if budget == 0 {
                    descend = false;
                }
            }

            if descend && !frame.visited.contains(&edge.target) {
                match self.graph.edges(&edge.target) {
                    Some(edges) => {
                        let mut visited = frame.visited.clone();
                        visited.insert(edge.target.clone());
                        self.stack.push(Frame {
                            edges: edges.iter(),
                            prefix: route,
                            visited,
                            budget,
                        });
                    }
                    None => self.fault = Some(GraphError::UnknownNode(edge.target.clone())),
                }
            }
        }
    }
}
