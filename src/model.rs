use serde::{Deserialize, Serialize};

use seevals::eval::{Rubric, SampleSpec, ViewSpec};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalPlanFile {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub max_total_score: Option<f64>,
    pub fields: Vec<EvalPlanField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalPlanField {
    pub selector: String,
    #[serde(default)]
    pub sample: Option<SampleSpec>,
    #[serde(default)]
    pub view: ViewSpec,
    pub rubric: Rubric,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildPaths {
    pub schema_path: String,
    pub plan_path: String,
    pub input_path: String,
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildCounts {
    pub document_count: usize,
    pub selector_count: usize,
    pub datum_count: usize,
    pub item_count: usize,
    pub sampled_item_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub started_at: String,
    pub completed_at: String,
    pub seed: u64,
    pub schema_name: String,
    pub envelope: Option<String>,
    pub input_sha256: String,
    pub output_sha256: String,
    pub paths: BuildPaths,
    pub counts: BuildCounts,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectorCheck {
    pub selector: String,
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaCheckReport {
    pub schema_name: String,
    pub checked_at: String,
    pub selectors: Vec<SelectorCheck>,
    pub missing_count: usize,
}
