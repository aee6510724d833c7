use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::SchemaError;

mod validator;
mod walker;
#[cfg(test)]
mod tests;

pub use validator::{PathValidator, path_exists};
pub use walker::synthesize;

const DEFAULT_SCHEMA_NAME: &str = "schema";

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Object { properties: Vec<(String, SchemaNode)> },
    Array { items: Box<SchemaNode> },
    Tuple { items: Vec<SchemaNode> },
    String,
    Integer,
    Number,
    Boolean,
    Null,
    Reference(String),
    Union(Vec<SchemaNode>),
    Constant(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    title: Option<String>,
    root: SchemaNode,
    definitions: BTreeMap<String, SchemaNode>,
}

impl SchemaDocument {
    pub fn new(root: SchemaNode) -> Self {
        Self {
            title: None,
            root,
            definitions: BTreeMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_definition(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.definitions.insert(name.into(), node);
        self
    }

    pub fn from_json(raw: &Value) -> Result<Self, SchemaError> {
        let title = raw
            .get("title")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned);

        let mut definitions = BTreeMap::new();
        for key in ["$defs", "definitions"] {
            let Some(defs) = raw.get(key) else {
                continue;
            };
            let defs = defs.as_object().ok_or_else(|| SchemaError::Malformed {
                pointer: format!("#/{key}"),
                reason: "definitions must be an object".to_string(),
            })?;
            for (name, node) in defs {
                let pointer = format!("#/{key}/{name}");
                definitions.insert(name.clone(), parse_node(node, &pointer)?);
            }
        }

        let root = parse_node(raw, "#")?;
        Ok(Self {
            title,
            root,
            definitions,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, SchemaError> {
        let value = serde_json::from_str::<Value>(raw).map_err(|err| SchemaError::Malformed {
            pointer: "#".to_string(),
            reason: err.to_string(),
        })?;
        Self::from_json(&value)
    }

    pub fn name(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_SCHEMA_NAME)
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    pub fn definition(&self, name: &str) -> Option<&SchemaNode> {
        self.definitions.get(name)
    }
}

fn parse_node(raw: &Value, pointer: &str) -> Result<SchemaNode, SchemaError> {
    let Some(node) = raw.as_object() else {
        return Err(SchemaError::Malformed {
            pointer: pointer.to_string(),
            reason: format!("expected a schema object, found {raw}"),
        });
    };

    if let Some(reference) = node.get("$ref") {
        return parse_reference(reference, pointer);
    }

    if let Some(value) = node.get("const") {
        return Ok(SchemaNode::Constant(value.clone()));
    }
    if let Some(first) = node
        .get("enum")
        .and_then(Value::as_array)
        .and_then(|values| values.first())
    {
        return Ok(SchemaNode::Constant(first.clone()));
    }

    for key in ["anyOf", "oneOf"] {
        if let Some(alternatives) = node.get(key) {
            return parse_alternatives(alternatives, &format!("{pointer}/{key}"));
        }
    }

    if let Some(all_of) = node.get("allOf") {
        return match all_of.as_array().map(Vec::as_slice) {
            Some([single]) => parse_node(single, &format!("{pointer}/allOf/0")),
            _ => Err(SchemaError::Malformed {
                pointer: format!("{pointer}/allOf"),
                reason: "only single-member allOf is supported".to_string(),
            }),
        };
    }

    match node.get("type") {
        Some(Value::String(type_name)) => parse_typed(type_name, node, pointer),
        Some(Value::Array(type_names)) => {
            let mut alternatives = Vec::<SchemaNode>::with_capacity(type_names.len());
            for type_name in type_names {
                let type_name = type_name.as_str().ok_or_else(|| SchemaError::Malformed {
                    pointer: format!("{pointer}/type"),
                    reason: "type list entries must be strings".to_string(),
                })?;
                alternatives.push(parse_typed(type_name, node, pointer)?);
            }
            if alternatives.is_empty() {
                return Err(unrecognized(raw, pointer));
            }
            Ok(SchemaNode::Union(alternatives))
        }
        Some(_) => Err(unrecognized(raw, pointer)),
        None if node.contains_key("properties") => parse_typed("object", node, pointer),
        None => Err(unrecognized(raw, pointer)),
    }
}

fn parse_reference(reference: &Value, pointer: &str) -> Result<SchemaNode, SchemaError> {
    let reference = reference.as_str().unwrap_or_default();
    let name = reference
        .strip_prefix("#/$defs/")
        .or_else(|| reference.strip_prefix("#/definitions/"))
        .filter(|name| !name.is_empty());

    match name {
        Some(name) => Ok(SchemaNode::Reference(name.to_string())),
        None => Err(SchemaError::UnresolvedReference {
            pointer: pointer.to_string(),
            reference: reference.to_string(),
        }),
    }
}

fn parse_alternatives(raw: &Value, pointer: &str) -> Result<SchemaNode, SchemaError> {
    let alternatives = raw.as_array().ok_or_else(|| SchemaError::Malformed {
        pointer: pointer.to_string(),
        reason: "alternatives must be an array".to_string(),
    })?;
    if alternatives.is_empty() {
        return Err(SchemaError::Malformed {
            pointer: pointer.to_string(),
            reason: "alternatives must not be empty".to_string(),
        });
    }

    let parsed = alternatives
        .iter()
        .enumerate()
        .map(|(index, alternative)| parse_node(alternative, &format!("{pointer}/{index}")))
        .collect::<Result<Vec<SchemaNode>, SchemaError>>()?;
    Ok(SchemaNode::Union(parsed))
}

fn parse_typed(
    type_name: &str,
    node: &Map<String, Value>,
    pointer: &str,
) -> Result<SchemaNode, SchemaError> {
    match type_name {
        "object" => {
            let mut properties = Vec::<(String, SchemaNode)>::new();
            if let Some(raw_properties) = node.get("properties") {
                let raw_properties =
                    raw_properties
                        .as_object()
                        .ok_or_else(|| SchemaError::Malformed {
                            pointer: format!("{pointer}/properties"),
                            reason: "properties must be an object".to_string(),
                        })?;
                for (name, property) in raw_properties {
                    let child = parse_node(property, &format!("{pointer}/properties/{name}"))?;
                    properties.push((name.clone(), child));
                }
            }
            Ok(SchemaNode::Object { properties })
        }
        "array" => {
            if let Some(prefix_items) = node.get("prefixItems") {
                let prefix_items = prefix_items.as_array().ok_or_else(|| SchemaError::Malformed {
                    pointer: format!("{pointer}/prefixItems"),
                    reason: "prefixItems must be an array".to_string(),
                })?;
                let items = prefix_items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| parse_node(item, &format!("{pointer}/prefixItems/{index}")))
                    .collect::<Result<Vec<SchemaNode>, SchemaError>>()?;
                return Ok(SchemaNode::Tuple { items });
            }

            let items = node.get("items").ok_or_else(|| SchemaError::Malformed {
                pointer: pointer.to_string(),
                reason: "array schema has no item schema".to_string(),
            })?;
            let items = parse_node(items, &format!("{pointer}/items"))?;
            Ok(SchemaNode::Array {
                items: Box::new(items),
            })
        }
        "string" => Ok(SchemaNode::String),
        "integer" => Ok(SchemaNode::Integer),
        "number" => Ok(SchemaNode::Number),
        "boolean" => Ok(SchemaNode::Boolean),
        "null" => Ok(SchemaNode::Null),
        _ => Err(SchemaError::UnrecognizedNode {
            pointer: pointer.to_string(),
            node: format!("type '{type_name}'"),
        }),
    }
}

fn unrecognized(raw: &Value, pointer: &str) -> SchemaError {
    SchemaError::UnrecognizedNode {
        pointer: pointer.to_string(),
        node: crate::error::preview(raw),
    }
}
