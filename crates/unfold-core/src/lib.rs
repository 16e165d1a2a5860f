pub mod config;
pub mod graph;
pub mod schema;

pub use config::Config;
pub use graph::{BuildResult, Edge, GraphError, Route, TypeGraph, Unfolder, Violation};
pub use schema::{SchemaError, SchemaModel};
