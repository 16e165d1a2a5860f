//! In-memory schema model consumed by the graph builder.
//!
//! The model is deliberately small: a list of structured types (entity or
//! complex, with properties and an optional base type) and the entry-point
//! container binding member names to types. It carries no instance data —
//! everything downstream reasons about the *shape* of the schema only.
//!
//! [`csdl`] produces this model from an OData CSDL XML document; anything
//! else that can fill in these records works just as well.

pub mod csdl;
mod error;

pub use error::SchemaError;

use serde::{Deserialize, Serialize};

/// Prefix of the built-in primitive type namespace (`Edm.String`, `Edm.Int32`, ...).
pub const PRIMITIVE_NAMESPACE: &str = "Edm.";

/// A parsed schema: structured types in declaration order plus the entry-point
/// container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaModel {
    /// Structured types in declaration order.
    pub types: Vec<StructuredType>,
    /// The entry-point container. Empty if the document declares none.
    pub container: Container,
}

impl SchemaModel {
    /// Look up a structured type by its qualified name.
    pub fn find_type(&self, qualified_name: &str) -> Option<&StructuredType> {
        self.types.iter().find(|t| t.qualified_name == qualified_name)
    }

    /// All direct or indirect derived types of `base`, in declaration order.
    ///
    /// A type whose base chain is cyclic is skipped rather than looped over.
    pub fn derived_types(&self, base: &str) -> Vec<&StructuredType> {
        self.types
            .iter()
            .filter(|t| t.qualified_name != base && self.derives_from(t, base))
            .collect()
    }

    /// Key properties of an entity type, walking the base chain when the type
    /// declares no key of its own. Empty for complex or unknown types.
    pub fn entity_keys(&self, qualified_name: &str) -> &[KeyProperty] {
        let Some(mut current) = self.find_type(qualified_name) else {
            return &[];
        };
        for _ in 0..self.types.len() {
            match &current.kind {
                TypeKind::Entity { keys } if !keys.is_empty() => return keys,
                TypeKind::Complex => return &[],
                TypeKind::Entity { .. } => match current
                    .base_type
                    .as_deref()
                    .and_then(|b| self.find_type(b))
                {
                    Some(base) => current = base,
                    None => return &[],
                },
            }
        }
        &[]
    }

    fn derives_from(&self, ty: &StructuredType, base: &str) -> bool {
        let mut current = ty;
        // Base chains are at most as long as the type list; anything longer is a cycle.
        for _ in 0..self.types.len() {
            match &current.base_type {
                Some(b) if b == base => return true,
                Some(b) => match self.find_type(b) {
                    Some(next) => current = next,
                    None => return false,
                },
                None => return false,
            }
        }
        false
    }
}

/// A structured (entity or complex) type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredType {
    /// Namespace-qualified name, e.g. `sample.Order`.
    pub qualified_name: String,
    /// Qualified name of the base type, if this type derives from one.
    pub base_type: Option<String>,
    /// Entity (keyed) or complex (unkeyed).
    pub kind: TypeKind,
    /// Structural and navigation properties in declaration order.
    pub properties: Vec<Property>,
}

impl StructuredType {
    /// Key properties for entity types; empty for complex types.
    pub fn keys(&self) -> &[KeyProperty] {
        match &self.kind {
            TypeKind::Entity { keys } => keys,
            TypeKind::Complex => &[],
        }
    }
}

/// The kind of a structured type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
    /// An addressable entity type with declared key properties.
    Entity { keys: Vec<KeyProperty> },
    /// A complex type: structured but unkeyed.
    Complex,
}

/// A single key property of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyProperty {
    /// Property name referenced by the key declaration.
    pub name: String,
    /// Primitive type of the key property, when it could be resolved.
    pub value_type: Option<String>,
}

/// A typed property of a structured type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value_type: ValueType,
}

/// Value-type descriptor of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum ValueType {
    /// A built-in primitive such as `Edm.String`.
    Primitive(String),
    /// A reference to a structured type by qualified name. The reference is
    /// not resolved here; dangling names surface later as graph violations.
    Structured(String),
    /// Zero-or-many of the element type.
    Collection(Box<ValueType>),
}

impl ValueType {
    /// Parse a CSDL type attribute, unwrapping `Collection(...)` wrappers.
    pub fn parse(spec: &str) -> ValueType {
        let spec = spec.trim();
        if let Some(inner) = spec
            .strip_prefix("Collection(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return ValueType::Collection(Box::new(ValueType::parse(inner)));
        }
        if spec.starts_with(PRIMITIVE_NAMESPACE) {
            ValueType::Primitive(spec.to_string())
        } else {
            ValueType::Structured(spec.to_string())
        }
    }

    /// The element type and whether it was collection-wrapped.
    pub fn element(&self) -> (&ValueType, bool) {
        match self {
            ValueType::Collection(inner) => (inner.element().0, true),
            other => (other, false),
        }
    }
}

/// The entry-point container of a schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<ContainerMember>,
}

/// One named member of the entry-point container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum ContainerMember {
    /// A named collection bound to an entity type.
    EntitySet { name: String, element_type: String },
    /// A named singleton bound to a type.
    Singleton { name: String, target_type: String },
}

impl ContainerMember {
    /// The member's name as it appears in routes.
    pub fn name(&self) -> &str {
        match self {
            ContainerMember::EntitySet { name, .. } => name,
            ContainerMember::Singleton { name, .. } => name,
        }
    }
}
