//! Graph construction from a schema model.

use std::collections::BTreeMap;

use crate::schema::{ContainerMember, SchemaModel, StructuredType, TypeKind, ValueType};

use super::{Edge, TypeGraph};

const EDM_STRING: &str = "Edm.String";

/// Outcome of building a graph: the graph itself plus non-fatal warnings
/// collected along the way (composite keys, missing keys, non-string keys).
#[derive(Debug)]
pub struct BuildResult {
    pub graph: TypeGraph,
    pub warnings: Vec<String>,
}

impl TypeGraph {
    /// Build the type graph from a schema model.
    ///
    /// The service root node is created first, with one edge per container
    /// member. Every structured type then gets a node: structured-valued
    /// properties become edges, scalar properties contribute nothing, and
    /// each direct-or-indirect derived type becomes a self-labeled cast edge
    /// (name and target are both the derived type's qualified name).
    ///
    /// Key metadata problems degrade gracefully to warnings; dangling type
    /// references are left for [`TypeGraph::validate`] to report.
    pub fn from_model(model: &SchemaModel) -> BuildResult {
        let mut nodes = BTreeMap::new();
        let mut warnings = Vec::new();

        let mut root_edges = Vec::new();
        for member in &model.container.members {
            match member {
                ContainerMember::EntitySet { name, element_type } => {
                    // Entity sets carry the full (comma-joined) key list so a
                    // composite key is still visible in the rendered selector.
                    let key = entity_key_names(model, element_type, &mut warnings)
                        .filter(|names| !names.is_empty())
                        .map(|names| names.join(","));
                    root_edges.push(Edge {
                        name: name.clone(),
                        target: element_type.clone(),
                        is_collection: true,
                        key,
                    });
                }
                ContainerMember::Singleton { name, target_type } => {
                    root_edges.push(Edge {
                        name: name.clone(),
                        target: target_type.clone(),
                        is_collection: false,
                        key: None,
                    });
                }
            }
        }
        nodes.insert(Self::SERVICE_ROOT.to_string(), root_edges);

        for ty in &model.types {
            add_structured_type(model, ty, &mut nodes, &mut warnings);
        }

        BuildResult {
            graph: TypeGraph { nodes },
            warnings,
        }
    }
}

fn add_structured_type(
    model: &SchemaModel,
    ty: &StructuredType,
    nodes: &mut BTreeMap<String, Vec<Edge>>,
    warnings: &mut Vec<String>,
) {
    // A type reached earlier (duplicate declaration) keeps its first edge list.
    if nodes.contains_key(&ty.qualified_name) {
        return;
    }

    let mut edges = Vec::new();

    for property in &ty.properties {
        let (element, is_collection) = property.value_type.element();
        let ValueType::Structured(target) = element else {
            continue;
        };
        let key = if is_collection {
            entity_key_names(model, target, warnings)
                .and_then(|names| names.first().cloned())
        } else {
            None
        };
        edges.push(Edge {
            name: property.name.clone(),
            target: target.clone(),
            is_collection,
            key,
        });
    }

    for derived in model.derived_types(&ty.qualified_name) {
        edges.push(Edge {
            name: derived.qualified_name.clone(),
            target: derived.qualified_name.clone(),
            is_collection: false,
            key: None,
        });
    }

    nodes.insert(ty.qualified_name.clone(), edges);
}

/// Key property names of `target` when it resolves to an entity type,
/// warning about key shapes the key-selector renderer cannot fully express.
/// `None` for complex or unresolved targets.
fn entity_key_names(
    model: &SchemaModel,
    target: &str,
    warnings: &mut Vec<String>,
) -> Option<Vec<String>> {
    let ty = model.find_type(target)?;
    if !matches!(ty.kind, TypeKind::Entity { .. }) {
        return None;
    }

    let keys = model.entity_keys(target);
    let names: Vec<String> = keys.iter().map(|k| k.name.clone()).collect();

    if names.is_empty() {
        warnings.push(format!("no key property: {target}"));
    } else if names.len() > 1 {
        warnings.push(format!("composite key: {} ({})", target, names.join(", ")));
    }
    // Any non-string key makes the selector lossy, not just the first one.
    let non_string = keys
        .iter()
        .find(|k| k.value_type.as_deref().is_some_and(|t| t != EDM_STRING));
    if let Some(offender) = non_string {
        warnings.push(format!(
            "non-string key: {} {} ({})",
            target,
            names.join(", "),
            offender.value_type.as_deref().unwrap_or_default()
        ));
    }

    Some(names)
}
