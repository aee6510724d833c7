use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use seevals::schema::SchemaDocument;

use crate::util::read_json;

pub mod bounds;
pub mod build;
pub mod check;
pub mod compositions;
pub mod plan;
pub mod summarize;

pub(crate) fn load_schema(path: &Path) -> Result<SchemaDocument> {
    let raw: Value = read_json(path)?;
    SchemaDocument::from_json(&raw)
        .with_context(|| format!("failed to interpret schema {}", path.display()))
}
