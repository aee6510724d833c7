use tracing::debug;

use super::types::{FieldConfig, Rubric, SampleSpec, ViewSpec};
use crate::error::{ConfigError, SchemaError};
use crate::schema::{PathValidator, SchemaDocument};
use crate::selector::Selector;

#[derive(Debug, Clone)]
pub struct EvalConfigBuilder {
    seed: u64,
    validator: PathValidator,
    entries: Vec<FieldConfig>,
}

impl EvalConfigBuilder {
    pub fn new(schema: &SchemaDocument, seed: u64) -> Result<Self, SchemaError> {
        Ok(Self {
            seed,
            validator: PathValidator::new(schema)?,
            entries: Vec::new(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn schema_name(&self) -> &str {
        self.validator.schema_name()
    }

    /// Re-adding a selector replaces its earlier configuration in place.
    pub fn add(
        &mut self,
        selector: &str,
        sample: Option<SampleSpec>,
        view: ViewSpec,
        rubric: Rubric,
    ) -> Result<&mut Self, ConfigError> {
        let parsed = self.validated_selector(selector)?;

        let view = view.normalized();
        for view_selector in view.selectors() {
            if !self.validator.exists(view_selector) {
                return Err(ConfigError::UnknownViewSelector {
                    selector: selector.to_string(),
                    view_selector: view_selector.clone(),
                    schema: self.validator.schema_name().to_string(),
                });
            }
        }

        if sample.is_some_and(|sample| sample.sample_count == 0) {
            return Err(ConfigError::EmptySample {
                selector: selector.to_string(),
            });
        }

        if !rubric.is_valid() {
            return Err(ConfigError::InvalidRubric {
                selector: selector.to_string(),
                lower_bound: rubric.lower_bound(),
                upper_bound: rubric.upper_bound(),
            });
        }

        let entry = FieldConfig {
            selector: parsed,
            sample,
            view,
            rubric,
        };

        match self
            .entries
            .iter_mut()
            .find(|existing| existing.selector.as_str() == selector)
        {
            Some(existing) => {
                debug!(selector, "replacing field configuration");
                *existing = entry;
            }
            None => {
                debug!(selector, sampled = sample.is_some(), "added field configuration");
                self.entries.push(entry);
            }
        }

        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> EvalConfig {
        EvalConfig {
            seed: self.seed,
            schema_name: self.validator.schema_name().to_string(),
            entries: self.entries,
        }
    }

    fn validated_selector(&mut self, selector: &str) -> Result<Selector, ConfigError> {
        let parsed = if self.validator.exists(selector) {
            Selector::parse(selector).ok()
        } else {
            None
        };

        parsed.ok_or_else(|| ConfigError::UnknownSelector {
            selector: selector.to_string(),
            schema: self.validator.schema_name().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    pub(super) seed: u64,
    pub(super) schema_name: String,
    pub(super) entries: Vec<FieldConfig>,
}

impl EvalConfig {
    pub fn builder(schema: &SchemaDocument, seed: u64) -> Result<EvalConfigBuilder, SchemaError> {
        EvalConfigBuilder::new(schema, seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn entries(&self) -> &[FieldConfig] {
        &self.entries
    }
}
