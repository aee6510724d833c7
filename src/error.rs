use std::io;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema node at '{pointer}' has no recognized type: {node}")]
    UnrecognizedNode { pointer: String, node: String },
    #[error("schema reference '{reference}' at '{pointer}' cannot be resolved")]
    UnresolvedReference { pointer: String, reference: String },
    #[error("schema reference '{reference}' is recursive and has no terminating alternative")]
    RecursiveReference { reference: String },
    #[error("schema node at '{pointer}' is malformed: {reason}")]
    Malformed { pointer: String, reason: String },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,
    #[error("selector '{selector}' has unsupported syntax at offset {offset}: '{rest}'")]
    Unsupported {
        selector: String,
        offset: usize,
        rest: String,
    },
    #[error("selector '{selector}' has an index out of range: {index}")]
    IndexOutOfRange { selector: String, index: String },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("selector '{selector}' does not exist in schema '{schema}'")]
    UnknownSelector { selector: String, schema: String },
    #[error("view selector '{view_selector}' for '{selector}' does not exist in schema '{schema}'")]
    UnknownViewSelector {
        selector: String,
        view_selector: String,
        schema: String,
    },
    #[error("selector '{selector}' requests an empty sample")]
    EmptySample { selector: String },
    #[error("rubric for '{selector}' has invalid bounds [{lower_bound}, {upper_bound}]")]
    InvalidRubric {
        selector: String,
        lower_bound: f64,
        upper_bound: f64,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "document {document_index}: selector '{selector}' matched {match_count} nodes, expected exactly 1 (inspected: {inspected})"
    )]
    MatchCount {
        document_index: usize,
        selector: String,
        match_count: usize,
        inspected: String,
    },
    #[error(
        "document {document_index}: selector '{selector}' is sampled but matched a non-array value: {inspected}"
    )]
    NotACollection {
        document_index: usize,
        selector: String,
        inspected: String,
    },
    #[error(
        "document {document_index}: selector '{selector}' requests {requested} samples from a collection of {available}"
    )]
    SampleTooLarge {
        document_index: usize,
        selector: String,
        requested: usize,
        available: usize,
    },
    #[error("document {document_index} could not be serialized: {reason}")]
    Serialization {
        document_index: usize,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum CompositionError {
    #[error("composition count for N={total}, k={parts} does not fit in memory addressing")]
    TooLarge { total: i64, parts: i64 },
    #[error("element type {element_type} cannot hold values up to {total}")]
    ElementOverflow {
        element_type: &'static str,
        total: i64,
    },
    #[error("composition table has {actual} bytes, expected a multiple of {row_bytes}")]
    Layout { actual: usize, row_bytes: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub(crate) fn preview(value: &serde_json::Value) -> String {
    const LIMIT: usize = 160;
    let rendered = value.to_string();
    if rendered.chars().count() <= LIMIT {
        return rendered;
    }
    let truncated = rendered.chars().take(LIMIT).collect::<String>();
    format!("{truncated}...")
}
