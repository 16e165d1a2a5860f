use std::io::Write;

use unfold_core::schema::{csdl, ContainerMember, SchemaError, TypeKind, ValueType};
use unfold_core::TypeGraph;

const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx">
  <edmx:DataServices>
    <Schema Namespace="sample" Alias="self" xmlns="http://docs.oasis-open.org/odata/ns/edm">
      <EntityType Name="Order">
        <Key>
          <PropertyRef Name="Id"/>
        </Key>
        <Property Name="Id" Type="Edm.String" Nullable="false"/>
        <Property Name="Total" Type="Edm.Decimal"/>
        <Property Name="ShipTo" Type="self.Address"/>
        <NavigationProperty Name="Lines" Type="Collection(self.OrderLine)"/>
      </EntityType>
      <EntityType Name="OrderLine">
        <Key>
          <PropertyRef Name="Number"/>
        </Key>
        <Property Name="Number" Type="Edm.Int32"/>
      </EntityType>
      <EntityType Name="RushOrder" BaseType="self.Order">
        <Property Name="Deadline" Type="Edm.DateTimeOffset"/>
      </EntityType>
      <ComplexType Name="Address">
        <Property Name="City" Type="Edm.String"/>
      </ComplexType>
      <EntityContainer Name="Service">
        <EntitySet Name="Orders" EntityType="self.Order"/>
        <Singleton Name="Current" Type="self.Order"/>
      </EntityContainer>
    </Schema>
  </edmx:DataServices>
</edmx:Edmx>
"#;

#[test]
fn parses_types_in_declaration_order() {
    let model = csdl::parse(SAMPLE).unwrap();
    let names: Vec<&str> = model
        .types
        .iter()
        .map(|t| t.qualified_name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "sample.Order",
            "sample.OrderLine",
            "sample.RushOrder",
            "sample.Address"
        ]
    );
}

#[test]
fn parses_keys_with_resolved_value_types() {
    let model = csdl::parse(SAMPLE).unwrap();
    let order = model.find_type("sample.Order").unwrap();
    match &order.kind {
        TypeKind::Entity { keys } => {
            assert_eq!(keys.len(), 1);
            assert_eq!(keys[0].name, "Id");
            assert_eq!(keys[0].value_type.as_deref(), Some("Edm.String"));
        }
        TypeKind::Complex => panic!("Order should be an entity type"),
    }

    let line = model.find_type("sample.OrderLine").unwrap();
    assert_eq!(line.keys()[0].value_type.as_deref(), Some("Edm.Int32"));
}

#[test]
fn classifies_property_value_types() {
    let model = csdl::parse(SAMPLE).unwrap();
    let order = model.find_type("sample.Order").unwrap();

    assert_eq!(
        order.properties[1].value_type,
        ValueType::Primitive("Edm.Decimal".to_string())
    );
    // Alias-qualified reference normalized to the namespace.
    assert_eq!(
        order.properties[2].value_type,
        ValueType::Structured("sample.Address".to_string())
    );
    assert_eq!(
        order.properties[3].value_type,
        ValueType::Collection(Box::new(ValueType::Structured(
            "sample.OrderLine".to_string()
        )))
    );
}

#[test]
fn resolves_base_type_aliases_and_derived_types() {
    let model = csdl::parse(SAMPLE).unwrap();
    let rush = model.find_type("sample.RushOrder").unwrap();
    assert_eq!(rush.base_type.as_deref(), Some("sample.Order"));

    let derived: Vec<&str> = model
        .derived_types("sample.Order")
        .iter()
        .map(|t| t.qualified_name.as_str())
        .collect();
    assert_eq!(derived, ["sample.RushOrder"]);

    // RushOrder declares no key of its own and inherits Order's.
    let keys = model.entity_keys("sample.RushOrder");
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].name, "Id");
}

#[test]
fn parses_container_members_in_order() {
    let model = csdl::parse(SAMPLE).unwrap();
    assert_eq!(model.container.name, "Service");
    assert_eq!(
        model.container.members,
        [
            ContainerMember::EntitySet {
                name: "Orders".to_string(),
                element_type: "sample.Order".to_string(),
            },
            ContainerMember::Singleton {
                name: "Current".to_string(),
                target_type: "sample.Order".to_string(),
            },
        ]
    );
}

#[test]
fn parsed_model_builds_a_closed_graph() {
    let model = csdl::parse(SAMPLE).unwrap();
    let build = TypeGraph::from_model(&model);

    assert!(build.graph.validate().is_empty());
    // OrderLine's Edm.Int32 key triggers the non-string warning.
    assert!(build.warnings.iter().any(|w| w.contains("non-string key")));

    let order = build.graph.edges("sample.Order").unwrap();
    let names: Vec<&str> = order.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["ShipTo", "Lines", "sample.RushOrder"]);
}

#[test]
fn value_type_parse_unwraps_collections() {
    assert_eq!(
        ValueType::parse("Collection(Edm.String)"),
        ValueType::Collection(Box::new(ValueType::Primitive("Edm.String".to_string())))
    );
    assert_eq!(
        ValueType::parse("ns.Thing"),
        ValueType::Structured("ns.Thing".to_string())
    );
}

#[test]
fn document_without_schema_is_malformed() {
    let err = csdl::parse("<root><child/></root>").unwrap_err();
    assert!(matches!(err, SchemaError::Malformed(_)));
}

#[test]
fn missing_required_attribute_is_malformed() {
    let xml = r#"<Schema Namespace="sample"><EntityType/></Schema>"#;
    let err = csdl::parse(xml).unwrap_err();
    match err {
        SchemaError::Malformed(msg) => assert!(msg.contains("Name")),
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[test]
fn invalid_xml_is_an_xml_error() {
    let err = csdl::parse("<Schema Namespace=\"s\"><unclosed></Schema>").unwrap_err();
    assert!(matches!(err, SchemaError::Xml(_)));
}

#[test]
fn parse_file_reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let model = csdl::parse_file(file.path()).unwrap();
    assert_eq!(model.types.len(), 4);
}

#[test]
fn parse_file_reports_the_missing_path() {
    let err = csdl::parse_file("does/not/exist.xml").unwrap_err();
    match err {
        SchemaError::Io { path, .. } => assert!(path.ends_with("exist.xml")),
        other => panic!("expected Io, got {other:?}"),
    }
}
