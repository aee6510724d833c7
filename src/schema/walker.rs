use std::collections::HashMap;

use serde_json::{Map, Value};

use super::{SchemaDocument, SchemaNode};
use crate::error::SchemaError;

/// Builds the smallest structurally valid document for `schema`.
///
/// Arrays get exactly one element so wildcard and index selectors have
/// something to land on; unions take their first alternative. A reference
/// already being expanded may be entered once more through array items, so
/// `children[*]` of a recursive node still has one child. Past that, the
/// cycle falls through to the next union alternative or leaves the array
/// empty.
pub fn synthesize(schema: &SchemaDocument) -> Result<Value, SchemaError> {
    let mut walker = Walker {
        schema,
        active: HashMap::new(),
        via_array: false,
    };
    walker.visit(schema.root(), "#")
}

struct Walker<'a> {
    schema: &'a SchemaDocument,
    active: HashMap<&'a str, usize>,
    via_array: bool,
}

impl<'a> Walker<'a> {
    fn visit(&mut self, node: &'a SchemaNode, pointer: &str) -> Result<Value, SchemaError> {
        let via_array = std::mem::take(&mut self.via_array);
        match node {
            SchemaNode::Object { properties } => {
                let mut object = Map::new();
                for (name, property) in properties {
                    let value = self.visit(property, &format!("{pointer}/properties/{name}"))?;
                    object.insert(name.clone(), value);
                }
                Ok(Value::Object(object))
            }
            SchemaNode::Array { items } => {
                self.via_array = true;
                match self.visit(items, &format!("{pointer}/items")) {
                    Ok(item) => Ok(Value::Array(vec![item])),
                    Err(SchemaError::RecursiveReference { .. }) => Ok(Value::Array(Vec::new())),
                    Err(err) => Err(err),
                }
            }
            SchemaNode::Tuple { items } => {
                let mut values = Vec::<Value>::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    values.push(self.visit(item, &format!("{pointer}/prefixItems/{index}"))?);
                }
                Ok(Value::Array(values))
            }
            SchemaNode::String => Ok(Value::String(String::new())),
            SchemaNode::Integer => Ok(Value::from(0_i64)),
            SchemaNode::Number => Ok(Value::from(0.0_f64)),
            SchemaNode::Boolean => Ok(Value::Bool(false)),
            SchemaNode::Null => Ok(Value::Null),
            SchemaNode::Constant(value) => Ok(value.clone()),
            SchemaNode::Reference(name) => self.visit_reference(name, pointer, via_array),
            SchemaNode::Union(alternatives) => {
                let mut last_error = None;
                for (index, alternative) in alternatives.iter().enumerate() {
                    match self.visit(alternative, &format!("{pointer}/anyOf/{index}")) {
                        Ok(value) => return Ok(value),
                        Err(err @ SchemaError::RecursiveReference { .. }) => {
                            last_error = Some(err);
                        }
                        Err(err) => return Err(err),
                    }
                }
                Err(last_error.unwrap_or_else(|| SchemaError::Malformed {
                    pointer: pointer.to_string(),
                    reason: "union has no alternatives".to_string(),
                }))
            }
        }
    }

    fn visit_reference(
        &mut self,
        name: &'a str,
        pointer: &str,
        via_array: bool,
    ) -> Result<Value, SchemaError> {
        let depth = self.active.get(name).copied().unwrap_or(0);
        let allowed = if via_array { 2 } else { 1 };
        if depth >= allowed {
            return Err(SchemaError::RecursiveReference {
                reference: name.to_string(),
            });
        }

        let Some(target) = self.schema.definition(name) else {
            return Err(SchemaError::UnresolvedReference {
                pointer: pointer.to_string(),
                reference: name.to_string(),
            });
        };

        *self.active.entry(name).or_insert(0) += 1;
        let result = self.visit(target, &format!("#/$defs/{name}"));
        if let Some(count) = self.active.get_mut(name) {
            *count -= 1;
        }
        result
    }
}
