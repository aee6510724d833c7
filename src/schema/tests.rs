use serde_json::json;

use super::*;
use crate::fixtures::{analysis_schema, analysis_schema_json};

#[test]
fn from_json_reads_title_definitions_and_tuple_items() {
    let schema = analysis_schema();
    assert_eq!(schema.name(), "AnalysisPlanningResult");
    assert!(schema.definition("MetaAnalysisEntity").is_some());

    let Some(SchemaNode::Object { properties }) = schema.definition("MetaAnalysisIndices") else {
        panic!("indices definition should be an object");
    };
    let relationships = properties
        .iter()
        .find(|(name, _)| name == "relationships_index")
        .map(|(_, node)| node)
        .expect("relationships_index should be declared");
    let SchemaNode::Array { items } = relationships else {
        panic!("relationships_index should be an array");
    };
    assert!(matches!(items.as_ref(), SchemaNode::Tuple { items } if items.len() == 2));
}

#[test]
fn synthesize_builds_one_element_arrays_and_primitive_defaults() {
    let dummy = synthesize(&analysis_schema()).expect("fixture should synthesize");
    assert_eq!(dummy["analysis_overview"], json!(""));
    assert_eq!(
        dummy["analysis_indices"]["entities_index"],
        json!([{"name": "", "type": ""}])
    );
    assert_eq!(
        dummy["analysis_indices"]["relationships_index"],
        json!([[{"name": "", "type": ""}, {"name": "", "type": ""}]])
    );
    assert_eq!(dummy["analysis_indices"]["subsections_index"], json!([""]));
}

#[test]
fn synthesize_covers_every_primitive_and_takes_first_union_alternative() {
    let raw = json!({
        "type": "object",
        "properties": {
            "count": {"type": "integer"},
            "ratio": {"type": "number"},
            "flag": {"type": "boolean"},
            "nothing": {"type": "null"},
            "maybe_count": {"anyOf": [{"type": "integer"}, {"type": "null"}]},
            "either": {"oneOf": [{"type": "boolean"}, {"type": "string"}]},
            "nullable_text": {"type": ["null", "string"]},
            "mode": {"enum": ["fast", "slow"]},
            "kind": {"const": "entity"},
            "wrapped": {"allOf": [{"type": "string"}]}
        }
    });
    let schema = SchemaDocument::from_json(&raw).expect("schema should parse");
    let dummy = synthesize(&schema).expect("schema should synthesize");

    assert_eq!(dummy["count"], json!(0));
    assert_eq!(dummy["ratio"], json!(0.0));
    assert_eq!(dummy["flag"], json!(false));
    assert_eq!(dummy["nothing"], Value::Null);
    assert_eq!(dummy["maybe_count"], json!(0));
    assert_eq!(dummy["either"], json!(false));
    assert_eq!(dummy["nullable_text"], Value::Null);
    assert_eq!(dummy["mode"], json!("fast"));
    assert_eq!(dummy["kind"], json!("entity"));
    assert_eq!(dummy["wrapped"], json!(""));
}

#[test]
fn synthesize_is_repeatable() {
    let schema = analysis_schema();
    let first = synthesize(&schema).expect("first synthesis should succeed");
    let second = synthesize(&schema).expect("second synthesis should succeed");
    assert_eq!(first, second);
}

#[test]
fn unrecognized_nodes_are_schema_errors() {
    let raw = json!({
        "type": "object",
        "properties": {"anything": {"description": "no type at all"}}
    });
    let error = SchemaDocument::from_json(&raw).expect_err("untyped node should be rejected");
    assert!(
        matches!(&error, SchemaError::UnrecognizedNode { pointer, .. } if pointer == "#/properties/anything"),
        "unexpected error: {error}"
    );

    let unknown_type = json!({"type": "decimal"});
    assert!(matches!(
        SchemaDocument::from_json(&unknown_type),
        Err(SchemaError::UnrecognizedNode { .. })
    ));
}

#[test]
fn missing_definitions_are_unresolved_references() {
    let raw = json!({
        "type": "object",
        "properties": {"child": {"$ref": "#/$defs/Missing"}}
    });
    let schema = SchemaDocument::from_json(&raw).expect("reference parses before resolution");
    let error = synthesize(&schema).expect_err("missing definition should fail");
    assert!(
        matches!(&error, SchemaError::UnresolvedReference { reference, .. } if reference == "Missing"),
        "unexpected error: {error}"
    );

    let external = json!({"$ref": "https://example.com/schema.json"});
    assert!(matches!(
        SchemaDocument::from_json(&external),
        Err(SchemaError::UnresolvedReference { .. })
    ));
}

#[test]
fn recursive_references_terminate_through_arrays_and_unions() {
    let raw = json!({
        "$ref": "#/$defs/Node",
        "$defs": {
            "Node": {
                "type": "object",
                "properties": {
                    "label": {"type": "string"},
                    "children": {"type": "array", "items": {"$ref": "#/$defs/Node"}},
                    "parent": {"anyOf": [{"$ref": "#/$defs/Node"}, {"type": "null"}]}
                }
            }
        }
    });
    let schema = SchemaDocument::from_json(&raw).expect("recursive schema should parse");
    let dummy = synthesize(&schema).expect("recursive schema should synthesize");
    assert_eq!(
        dummy,
        json!({
            "children": [{"children": [], "label": "", "parent": null}],
            "label": "",
            "parent": null
        })
    );
}

#[test]
fn recursive_array_items_keep_one_element_for_selectors() {
    let raw = json!({
        "title": "Tree",
        "$ref": "#/$defs/Node",
        "$defs": {
            "Node": {
                "type": "object",
                "properties": {
                    "label": {"type": "string"},
                    "children": {"type": "array", "items": {"$ref": "#/$defs/Node"}}
                }
            }
        }
    });
    let schema = SchemaDocument::from_json(&raw).expect("recursive schema should parse");
    assert_eq!(path_exists(&schema, "$.children[*]"), Ok(true));
    assert_eq!(path_exists(&schema, "$.children[*].label"), Ok(true));
    assert_eq!(path_exists(&schema, "$.children[0].label"), Ok(true));
    assert_eq!(path_exists(&schema, "$.children[0].children[0]"), Ok(false));
}

#[test]
fn unconditional_recursion_is_a_schema_error() {
    let raw = json!({
        "$ref": "#/$defs/Loop",
        "$defs": {
            "Loop": {"type": "object", "properties": {"next": {"$ref": "#/$defs/Loop"}}}
        }
    });
    let schema = SchemaDocument::from_json(&raw).expect("schema should parse");
    assert_eq!(
        synthesize(&schema),
        Err(SchemaError::RecursiveReference {
            reference: "Loop".to_string()
        })
    );
}

#[test]
fn path_exists_accepts_declared_fields_and_rejects_unknown_ones() {
    let schema = analysis_schema();
    assert_eq!(path_exists(&schema, "$.analysis_overview"), Ok(true));
    assert_eq!(path_exists(&schema, "$.nonexistent_field"), Ok(false));
    assert_eq!(
        path_exists(&schema, "$.analysis_indices.entities_index[*].name"),
        Ok(true)
    );
    assert_eq!(
        path_exists(&schema, "$.analysis_indices.relationships_index[0][1].type"),
        Ok(true)
    );
    assert_eq!(
        path_exists(&schema, "$.analysis_indices.relationships_index[0][2]"),
        Ok(false)
    );
}

#[test]
fn malformed_selectors_are_reported_missing() {
    let mut validator = PathValidator::new(&analysis_schema()).expect("validator should build");
    assert!(!validator.exists("$..analysis_overview"));
    assert!(!validator.exists(""));
    assert!(!validator.exists("$.analysis_indices["));
}

#[test]
fn validator_caches_by_selector_string() {
    let mut validator = PathValidator::new(&analysis_schema()).expect("validator should build");
    assert_eq!(validator.schema_name(), "AnalysisPlanningResult");
    assert!(validator.exists("$.analysis_overview"));
    assert!(validator.exists("$.analysis_overview"));
    assert!(!validator.exists("$.nonexistent_field"));
    assert_eq!(validator.cached_len(), 2);
}

#[test]
fn from_json_str_reports_invalid_json_as_malformed() {
    let raw = analysis_schema_json().to_string();
    assert!(SchemaDocument::from_json_str(&raw).is_ok());
    assert!(matches!(
        SchemaDocument::from_json_str("{not json"),
        Err(SchemaError::Malformed { .. })
    ));
}

#[test]
fn schemas_built_in_code_synthesize_like_parsed_ones() {
    let entity = SchemaNode::Object {
        properties: vec![
            ("name".to_string(), SchemaNode::String),
            ("weight".to_string(), SchemaNode::Number),
        ],
    };
    let schema = SchemaDocument::new(SchemaNode::Object {
        properties: vec![
            ("count".to_string(), SchemaNode::Integer),
            (
                "entities".to_string(),
                SchemaNode::Array {
                    items: Box::new(SchemaNode::Reference("Entity".to_string())),
                },
            ),
        ],
    })
    .with_title("Inventory")
    .with_definition("Entity", entity);

    assert_eq!(schema.name(), "Inventory");
    assert!(schema.definition("Entity").is_some());

    let validator = PathValidator::new(&schema).expect("validator should build");
    assert_eq!(
        validator.dummy_document(),
        &json!({"count": 0, "entities": [{"name": "", "weight": 0.0}]})
    );
}
