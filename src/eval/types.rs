use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::selector::Selector;

fn default_upper_bound() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    #[serde(rename = "ge", alias = "lower_bound", default)]
    lower_bound: f64,
    #[serde(rename = "le", alias = "upper_bound", default = "default_upper_bound")]
    upper_bound: f64,
    #[serde(rename = "desc", alias = "description", default)]
    description: String,
    #[serde(rename = "scale", alias = "scale_description", default)]
    scale_description: Option<String>,
}

impl Rubric {
    pub fn new(lower_bound: f64, upper_bound: f64, description: impl Into<String>) -> Self {
        Self {
            lower_bound,
            upper_bound,
            description: description.into(),
            scale_description: None,
        }
    }

    pub fn with_scale(mut self, scale_description: impl Into<String>) -> Self {
        self.scale_description = Some(scale_description.into());
        self
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn scale_description(&self) -> Option<&str> {
        self.scale_description.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.lower_bound.is_finite()
            && self.upper_bound.is_finite()
            && self.lower_bound >= 0.0
            && self.upper_bound >= self.lower_bound
    }

    pub fn range(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub rubrics: Vec<Rubric>,
    #[serde(default)]
    pub max_total_score: f64,
}

impl Criteria {
    pub fn new(rubrics: Vec<Rubric>, max_total_score: f64) -> Self {
        Self {
            rubrics,
            max_total_score,
        }
    }

    pub fn attainable_total(&self) -> f64 {
        self.rubrics.iter().map(Rubric::upper_bound).sum()
    }

    /// Whether `max_total_score` bounds the attainable total. Advisory only.
    pub fn is_consistent(&self) -> bool {
        self.max_total_score + f64::EPSILON * self.max_total_score.abs().max(1.0)
            >= self.attainable_total()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSpec {
    #[serde(rename = "num_samples", alias = "sample_count")]
    pub sample_count: usize,
}

impl SampleSpec {
    pub fn new(sample_count: usize) -> Self {
        Self { sample_count }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSpec {
    #[serde(rename = "views", alias = "context_selectors", default)]
    context_selectors: Vec<String>,
}

impl ViewSpec {
    pub fn new<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut context_selectors = Vec::<String>::new();
        for selector in selectors {
            let selector = selector.into();
            if !context_selectors.contains(&selector) {
                context_selectors.push(selector);
            }
        }
        Self { context_selectors }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn selectors(&self) -> &[String] {
        &self.context_selectors
    }

    pub(crate) fn normalized(self) -> Self {
        Self::new(self.context_selectors)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    pub(crate) selector: Selector,
    pub(crate) sample: Option<SampleSpec>,
    pub(crate) view: ViewSpec,
    pub(crate) rubric: Rubric,
}

impl FieldConfig {
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn sample(&self) -> Option<SampleSpec> {
        self.sample
    }

    pub fn view(&self) -> &ViewSpec {
        &self.view
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalItem {
    pub id: String,
    pub sample: Option<SampleSpec>,
    pub view: ViewSpec,
    pub value: Value,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalDatum {
    pub group_id: String,
    #[serde(default)]
    pub selector: String,
    pub items: Vec<EvalItem>,
    pub rubric: Rubric,
    /// Size of the collection the items were drawn from; the item count when
    /// nothing was sampled.
    #[serde(default)]
    pub population_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalRecord {
    pub data: Vec<EvalDatum>,
    pub raw_data: Value,
}
