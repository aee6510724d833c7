use std::collections::HashMap;

use serde::Serialize;

use super::types::{EvalRecord, Rubric};
use crate::bounds::{hoeffding_bound, serfling_bound};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorSummary {
    pub selector: String,
    pub rubric: Rubric,
    pub documents: usize,
    pub scored_items: usize,
    pub unscored_items: usize,
    pub population_size: usize,
    pub mean_score: Option<f64>,
    pub confidence: f64,
    pub hoeffding_margin: Option<f64>,
    pub serfling_margin: Option<f64>,
}

/// Groups data by selector in first-seen order. The rubric of the first
/// datum seen for a selector is the one reported.
///
/// The Serfling margin pools every document's draws into one population,
/// as if they were a single sample without replacement from it.
pub fn summarize(records: &[EvalRecord], confidence: f64) -> Vec<SelectorSummary> {
    let mut summaries = Vec::<SelectorSummary>::new();
    let mut totals = Vec::<f64>::new();
    let mut positions = HashMap::<String, usize>::new();

    for record in records {
        for datum in &record.data {
            let key = if datum.selector.is_empty() {
                datum.group_id.clone()
            } else {
                datum.selector.clone()
            };

            let position = *positions.entry(key.clone()).or_insert_with(|| {
                summaries.push(SelectorSummary {
                    selector: key,
                    rubric: datum.rubric.clone(),
                    documents: 0,
                    scored_items: 0,
                    unscored_items: 0,
                    population_size: 0,
                    mean_score: None,
                    confidence,
                    hoeffding_margin: None,
                    serfling_margin: None,
                });
                totals.push(0.0);
                summaries.len() - 1
            });

            let summary = &mut summaries[position];
            summary.documents += 1;
            summary.population_size += datum.population_size.max(datum.items.len());
            for item in &datum.items {
                match item.score {
                    Some(score) => {
                        summary.scored_items += 1;
                        totals[position] += score;
                    }
                    None => summary.unscored_items += 1,
                }
            }
        }
    }

    for (summary, total) in summaries.iter_mut().zip(totals) {
        if summary.scored_items == 0 {
            continue;
        }

        let upper_bound = summary.rubric.upper_bound();
        let lower_bound = summary.rubric.lower_bound();
        summary.mean_score = Some(total / summary.scored_items as f64);
        summary.hoeffding_margin = Some(hoeffding_bound(
            summary.scored_items,
            upper_bound,
            lower_bound,
            confidence,
        ));
        let serfling = serfling_bound(
            summary.scored_items,
            summary.population_size,
            upper_bound,
            lower_bound,
            confidence,
        );
        summary.serfling_margin = (!serfling.is_nan()).then_some(serfling);
    }

    summaries
}
