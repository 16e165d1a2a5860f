//! Default configuration values.

/// Directory output files are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Suffix appended to the input file stem for the graph dump.
pub const DEFAULT_GRAPH_SUFFIX: &str = "_schema_graph.txt";

/// Suffix appended to the input file stem for the route list.
pub const DEFAULT_ROUTES_SUFFIX: &str = "_paths.txt";

/// Collection hops a traversal may descend through before stopping.
pub const DEFAULT_MAX_COLLECTION_HOPS: u32 = 3;
