use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::{SchemaDocument, synthesize};
use crate::error::SchemaError;
use crate::selector::Selector;

#[derive(Debug, Clone)]
pub struct PathValidator {
    schema_name: String,
    dummy: Value,
    cache: HashMap<String, bool>,
}

impl PathValidator {
    pub fn new(schema: &SchemaDocument) -> Result<Self, SchemaError> {
        let dummy = synthesize(schema)?;
        Ok(Self {
            schema_name: schema.name().to_string(),
            dummy,
            cache: HashMap::new(),
        })
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn dummy_document(&self) -> &Value {
        &self.dummy
    }

    /// Malformed selectors are reported as missing rather than as errors.
    pub fn exists(&mut self, selector: &str) -> bool {
        if let Some(cached) = self.cache.get(selector) {
            return *cached;
        }

        let found = match Selector::parse(selector) {
            Ok(parsed) => !parsed.find(&self.dummy).is_empty(),
            Err(err) => {
                debug!(selector, error = %err, "selector failed to parse");
                false
            }
        };
        debug!(selector, schema = %self.schema_name, found, "validated selector");

        self.cache.insert(selector.to_string(), found);
        found
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

pub fn path_exists(schema: &SchemaDocument, selector: &str) -> Result<bool, SchemaError> {
    let mut validator = PathValidator::new(schema)?;
    Ok(validator.exists(selector))
}
