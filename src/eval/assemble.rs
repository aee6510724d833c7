use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::builder::EvalConfig;
use super::types::{EvalDatum, EvalItem, EvalRecord, FieldConfig};
use crate::error::{ValidationError, preview};

impl EvalConfig {
    pub fn apply<T: Serialize>(&self, documents: &[T]) -> Result<Vec<EvalRecord>, ValidationError> {
        self.apply_with_seed(documents, self.seed)
    }

    /// One record per document, in input order. The first failing document
    /// aborts the whole call.
    pub fn apply_with_seed<T: Serialize>(
        &self,
        documents: &[T],
        seed: u64,
    ) -> Result<Vec<EvalRecord>, ValidationError> {
        let mut records = Vec::<EvalRecord>::with_capacity(documents.len());

        for (document_index, document) in documents.iter().enumerate() {
            let raw_data =
                serde_json::to_value(document).map_err(|err| ValidationError::Serialization {
                    document_index,
                    reason: err.to_string(),
                })?;

            let mut data = Vec::<EvalDatum>::with_capacity(self.entries.len());
            for (group_index, entry) in self.entries.iter().enumerate() {
                data.push(assemble_datum(
                    entry,
                    &raw_data,
                    document_index,
                    group_index,
                    seed,
                )?);
            }

            records.push(EvalRecord { data, raw_data });
        }

        debug!(
            documents = records.len(),
            selectors = self.entries.len(),
            seed,
            "assembled evaluation records"
        );
        Ok(records)
    }
}

fn assemble_datum(
    entry: &FieldConfig,
    document: &Value,
    document_index: usize,
    group_index: usize,
    seed: u64,
) -> Result<EvalDatum, ValidationError> {
    let selector = entry.selector.as_str();
    let matches = entry.selector.find(document);
    let [matched] = matches.as_slice() else {
        let inspected = match matches.as_slice() {
            [] => preview(document),
            many => preview(&Value::Array(many.iter().map(|value| (*value).clone()).collect())),
        };
        return Err(ValidationError::MatchCount {
            document_index,
            selector: selector.to_string(),
            match_count: matches.len(),
            inspected,
        });
    };

    let (items, population_size) = match entry.sample {
        Some(sample) => {
            let Value::Array(collection) = matched else {
                return Err(ValidationError::NotACollection {
                    document_index,
                    selector: selector.to_string(),
                    inspected: preview(matched),
                });
            };
            if sample.sample_count > collection.len() {
                return Err(ValidationError::SampleTooLarge {
                    document_index,
                    selector: selector.to_string(),
                    requested: sample.sample_count,
                    available: collection.len(),
                });
            }

            let mut rng = sampling_rng(seed, document_index, selector);
            let drawn = index::sample(&mut rng, collection.len(), sample.sample_count);
            let items = drawn
                .into_iter()
                .enumerate()
                .map(|(position, drawn_index)| EvalItem {
                    id: format!("{selector}[{position}]"),
                    sample: Some(sample),
                    view: entry.view.clone(),
                    value: collection[drawn_index].clone(),
                    score: None,
                })
                .collect::<Vec<EvalItem>>();
            (items, collection.len())
        }
        None => {
            let item = EvalItem {
                id: selector.to_string(),
                sample: None,
                view: entry.view.clone(),
                value: (*matched).clone(),
                score: None,
            };
            (vec![item], 1)
        }
    };

    Ok(EvalDatum {
        group_id: group_index.to_string(),
        selector: selector.to_string(),
        items,
        rubric: entry.rubric.clone(),
        population_size,
    })
}

fn sampling_rng(seed: u64, document_index: usize, selector: &str) -> ChaCha8Rng {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update((document_index as u64).to_le_bytes());
    hasher.update(selector.as_bytes());
    ChaCha8Rng::from_seed(hasher.finalize().into())
}
