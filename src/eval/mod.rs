mod assemble;
mod builder;
mod summary;
mod types;

pub use builder::{EvalConfig, EvalConfigBuilder};
pub use summary::{SelectorSummary, summarize};
pub use types::{Criteria, EvalDatum, EvalItem, EvalRecord, FieldConfig, Rubric, SampleSpec, ViewSpec};
