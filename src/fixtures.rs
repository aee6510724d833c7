use serde_json::{Value, json};

use crate::schema::SchemaDocument;

pub(crate) fn analysis_schema_json() -> Value {
    json!({
        "title": "AnalysisPlanningResult",
        "type": "object",
        "properties": {
            "analysis_overview": {
                "type": "string",
                "title": "Analysis Overview",
                "description": "The analysis overview of the subsections, entities and relationships"
            },
            "analysis_indices": {"$ref": "#/$defs/MetaAnalysisIndices"}
        },
        "required": ["analysis_overview", "analysis_indices"],
        "$defs": {
            "MetaAnalysisEntity": {
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "type": {"type": "string"}
                }
            },
            "MetaAnalysisIndices": {
                "type": "object",
                "properties": {
                    "subsections_index": {"type": "array", "items": {"type": "string"}},
                    "entities_index": {
                        "type": "array",
                        "items": {"$ref": "#/$defs/MetaAnalysisEntity"}
                    },
                    "relationships_index": {
                        "type": "array",
                        "items": {
                            "type": "array",
                            "prefixItems": [
                                {"$ref": "#/$defs/MetaAnalysisEntity"},
                                {"$ref": "#/$defs/MetaAnalysisEntity"}
                            ],
                            "minItems": 2,
                            "maxItems": 2
                        }
                    }
                }
            }
        }
    })
}

pub(crate) fn analysis_schema() -> SchemaDocument {
    SchemaDocument::from_json(&analysis_schema_json()).expect("fixture schema should parse")
}

fn entity(name: &str, kind: &str) -> Value {
    json!({"name": name, "type": kind})
}

pub(crate) fn analysis_document(label: &str, entity_count: usize) -> Value {
    let entities = (0..entity_count)
        .map(|index| entity(&format!("{label}-entity-{index}"), "variable"))
        .collect::<Vec<Value>>();
    let subsections = (0..entity_count)
        .map(|index| Value::String(format!("{label}-section-{index}")))
        .collect::<Vec<Value>>();
    let relationships = entities
        .windows(2)
        .map(|pair| Value::Array(vec![pair[0].clone(), pair[1].clone()]))
        .collect::<Vec<Value>>();

    json!({
        "analysis_overview": format!("{label} overview"),
        "analysis_indices": {
            "subsections_index": subsections,
            "entities_index": entities,
            "relationships_index": relationships
        }
    })
}
