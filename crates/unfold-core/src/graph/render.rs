//! Deterministic text rendering of graphs and route streams.
//!
//! Pure functions of the graph / route stream to a line-oriented UTF-8
//! writer; where the output goes is the caller's business.

use std::io::{self, Write};

use thiserror::Error;

use super::{GraphError, TypeGraph};

/// Errors that can occur while writing rendered output.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl TypeGraph {
    /// Write the graph as text: one `[node]` header per node in identifier
    /// order, then one indented line per edge in declaration order.
    ///
    /// Collection edges show the key-selector between name and target:
    ///
    /// ```text
    /// [$serviceRoot]
    ///     Orders -> {Id} -> [sample.Order]
    ///     Current -> [sample.Order]
    /// ```
    pub fn write_text<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (id, edges) in self.nodes() {
            writeln!(writer, "[{id}]")?;
            for edge in edges {
                if edge.is_collection {
                    writeln!(
                        writer,
                        "\t{} -> {} -> [{}]",
                        edge.name,
                        edge.key_selector(),
                        edge.target
                    )?;
                } else {
                    writeln!(writer, "\t{} -> [{}]", edge.name, edge.target)?;
                }
            }
        }
        Ok(())
    }

    /// The text rendering as a string. Convenience over [`TypeGraph::write_text`].
    pub fn to_text(&self) -> String {
        let mut out = Vec::new();
        self.write_text(&mut out)
            .expect("writing to a Vec cannot fail");
        String::from_utf8(out).expect("rendered text is UTF-8")
    }
}

/// Enumerate every route of `graph` and write one per line.
///
/// Returns the number of routes written. Routes are streamed: nothing is
/// buffered beyond the line being written.
pub fn write_routes<W: Write>(
    graph: &TypeGraph,
    max_collection_hops: u32,
    writer: &mut W,
) -> Result<u64, RenderError> {
    let mut count = 0;
    for route in graph.unfold(max_collection_hops) {
        writeln!(writer, "{}", route?)?;
        count += 1;
    }
    Ok(count)
}
