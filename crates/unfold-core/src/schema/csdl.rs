//! CSDL (OData XML) schema reader.
//!
//! Streams a CSDL document with `quick-xml` and produces a [`SchemaModel`].
//! Only the parts the graph builder consumes are read: `Schema`,
//! `EntityType`/`ComplexType` with their keys and (navigation) properties,
//! and the `EntityContainer` members. Annotations, enum types, functions and
//! actions are skipped.
//!
//! Alias-qualified type references (`Schema Alias="..."`) are normalized to
//! namespace-qualified names in a post-pass, so the rest of the crate only
//! ever sees one spelling per type.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{
    Container, ContainerMember, KeyProperty, Property, SchemaError, SchemaModel, StructuredType,
    TypeKind, ValueType,
};

/// Parse a CSDL document from a string.
pub fn parse(xml: &str) -> Result<SchemaModel, SchemaError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = ParseState::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => state.open(&e, false)?,
            Event::Empty(e) => state.open(&e, true)?,
            Event::End(e) => state.close(e.local_name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
    }

    state.finish()
}

/// Parse a CSDL document from a file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<SchemaModel, SchemaError> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    parse(&xml)
}

/// A structured type as read off the document, before alias resolution.
struct RawType {
    qualified_name: String,
    base_type: Option<String>,
    is_entity: bool,
    key_names: Vec<String>,
    properties: Vec<RawProperty>,
}

struct RawProperty {
    name: String,
    type_spec: String,
}

enum RawMember {
    EntitySet { name: String, entity_type: String },
    Singleton { name: String, type_spec: String },
}

#[derive(Default)]
struct ParseState {
    namespace: String,
    aliases: HashMap<String, String>,
    saw_schema: bool,
    types: Vec<RawType>,
    current: Option<RawType>,
    in_key: bool,
    container_name: Option<String>,
    members: Vec<RawMember>,
}

impl ParseState {
    fn open(&mut self, e: &BytesStart<'_>, is_empty: bool) -> Result<(), SchemaError> {
        match e.local_name().as_ref() {
            b"Schema" => {
                self.namespace = require_attr(e, "Namespace")?;
                self.saw_schema = true;
                if let Some(alias) = attr(e, "Alias")? {
                    self.aliases.insert(alias, self.namespace.clone());
                }
            }
            b"EntityType" | b"ComplexType" => {
                let name = require_attr(e, "Name")?;
                let raw = RawType {
                    qualified_name: format!("{}.{}", self.namespace, name),
                    base_type: attr(e, "BaseType")?,
                    is_entity: e.local_name().as_ref() == b"EntityType",
                    key_names: Vec::new(),
                    properties: Vec::new(),
                };
                if is_empty {
                    self.types.push(raw);
                } else {
                    self.current = Some(raw);
                }
            }
            b"Key" if !is_empty => self.in_key = true,
            b"PropertyRef" => {
                if self.in_key {
                    if let Some(current) = self.current.as_mut() {
                        current.key_names.push(require_attr(e, "Name")?);
                    }
                }
            }
            b"Property" | b"NavigationProperty" => {
                if let Some(current) = self.current.as_mut() {
                    current.properties.push(RawProperty {
                        name: require_attr(e, "Name")?,
                        type_spec: require_attr(e, "Type")?,
                    });
                }
            }
            b"EntityContainer" => {
                self.container_name = Some(require_attr(e, "Name")?);
            }
            b"EntitySet" => {
                self.members.push(RawMember::EntitySet {
                    name: require_attr(e, "Name")?,
                    entity_type: require_attr(e, "EntityType")?,
                });
            }
            b"Singleton" => {
                self.members.push(RawMember::Singleton {
                    name: require_attr(e, "Name")?,
                    type_spec: require_attr(e, "Type")?,
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, tag: &[u8]) {
        match tag {
            b"EntityType" | b"ComplexType" => {
                if let Some(raw) = self.current.take() {
                    self.types.push(raw);
                }
            }
            b"Key" => self.in_key = false,
            _ => {}
        }
    }

    fn finish(self) -> Result<SchemaModel, SchemaError> {
        if !self.saw_schema {
            return Err(SchemaError::Malformed(
                "document contains no Schema element".to_string(),
            ));
        }

        let aliases = &self.aliases;
        let types = self
            .types
            .into_iter()
            .map(|raw| {
                let properties: Vec<Property> = raw
                    .properties
                    .iter()
                    .map(|p| Property {
                        name: p.name.clone(),
                        value_type: parse_value_type(&p.type_spec, aliases),
                    })
                    .collect();
                let kind = if raw.is_entity {
                    let keys = raw
                        .key_names
                        .iter()
                        .map(|k| KeyProperty {
                            name: k.clone(),
                            value_type: primitive_type_of(&properties, k),
                        })
                        .collect();
                    TypeKind::Entity { keys }
                } else {
                    TypeKind::Complex
                };
                StructuredType {
                    qualified_name: raw.qualified_name,
                    base_type: raw.base_type.map(|b| resolve_alias(&b, aliases)),
                    kind,
                    properties,
                }
            })
            .collect();

        let members = self
            .members
            .into_iter()
            .map(|m| match m {
                RawMember::EntitySet { name, entity_type } => ContainerMember::EntitySet {
                    name,
                    element_type: resolve_alias(&entity_type, aliases),
                },
                RawMember::Singleton { name, type_spec } => ContainerMember::Singleton {
                    name,
                    target_type: resolve_alias(&type_spec, aliases),
                },
            })
            .collect();

        Ok(SchemaModel {
            types,
            container: Container {
                name: self.container_name.unwrap_or_default(),
                members,
            },
        })
    }
}

fn attr(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, SchemaError> {
    for a in e.attributes() {
        let a = a?;
        if a.key.local_name().as_ref() == name.as_bytes() {
            return Ok(Some(a.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn require_attr(e: &BytesStart<'_>, name: &str) -> Result<String, SchemaError> {
    attr(e, name)?.ok_or_else(|| {
        SchemaError::Malformed(format!(
            "{} element is missing the {} attribute",
            String::from_utf8_lossy(e.local_name().as_ref()),
            name
        ))
    })
}

fn parse_value_type(spec: &str, aliases: &HashMap<String, String>) -> ValueType {
    let spec = spec.trim();
    if let Some(inner) = spec
        .strip_prefix("Collection(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return ValueType::Collection(Box::new(parse_value_type(inner, aliases)));
    }
    ValueType::parse(&resolve_alias(spec, aliases))
}

/// Replace a leading schema alias with the namespace it stands for.
fn resolve_alias(name: &str, aliases: &HashMap<String, String>) -> String {
    for (alias, namespace) in aliases {
        if let Some(rest) = name.strip_prefix(alias.as_str()) {
            if let Some(rest) = rest.strip_prefix('.') {
                return format!("{namespace}.{rest}");
            }
        }
    }
    name.to_string()
}

/// Primitive type of the named property, if it exists and is primitive.
fn primitive_type_of(properties: &[Property], name: &str) -> Option<String> {
    properties.iter().find(|p| p.name == name).and_then(|p| {
        match &p.value_type {
            ValueType::Primitive(t) => Some(t.clone()),
            _ => None,
        }
    })
}
