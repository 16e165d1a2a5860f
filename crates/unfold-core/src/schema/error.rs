//! Schema ingestion error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a schema document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Low-level XML reader error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute on an XML element.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Structurally valid XML that is not a usable schema document.
    #[error("Malformed schema: {0}")]
    Malformed(String),

    /// IO error while reading the document.
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SchemaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SchemaError::Io {
            path: path.into(),
            source,
        }
    }
}
