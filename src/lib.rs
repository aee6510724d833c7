//! Building human-evaluation datasets from structured model output.
//!
//! A schema fixes which selectors are valid, an [`eval::EvalConfig`] says what
//! to extract and how to score it, and applying the config to documents
//! yields one [`eval::EvalRecord`] per document. [`bounds`] and
//! [`compositions`] cover sample-size planning and score-grid enumeration.

pub mod bounds;
pub mod compositions;
pub mod error;
pub mod eval;
pub mod schema;
pub mod selector;
pub mod util;

#[cfg(test)]
mod fixtures;
