use serde::{Deserialize, Serialize};

pub fn hoeffding_bound(
    num_samples: usize,
    upper_bound: f64,
    lower_bound: f64,
    confidence: f64,
) -> f64 {
    let range = upper_bound - lower_bound;
    (range.powi(2) / (2.0 * num_samples as f64)).sqrt() * confidence_log(confidence)
}

/// Bound for sampling without replacement from `population_size` items.
///
/// Returns NaN when `num_samples > population_size`. The finite-population
/// correction is piecewise (Serfling, Bardenet & Maillard, Thm 2.4 / Cor 2.5):
/// the second branch is tighter and only valid from half the population up.
pub fn serfling_bound(
    num_samples: usize,
    population_size: usize,
    upper_bound: f64,
    lower_bound: f64,
    confidence: f64,
) -> f64 {
    if num_samples > population_size {
        return f64::NAN;
    }
    if num_samples == 0 {
        return f64::INFINITY;
    }

    let samples = num_samples as f64;
    let population = population_size as f64;
    let fpc = if samples < population / 2.0 {
        1.0 - (samples - 1.0) / population
    } else {
        (1.0 - samples / population) * (1.0 + 1.0 / samples)
    };

    (upper_bound - lower_bound) * (fpc / (2.0 * samples) * confidence_log(confidence)).sqrt()
}

fn confidence_log(confidence: f64) -> f64 {
    (2.0 / (1.0 - confidence)).ln()
}

pub fn min_samples_hoeffding(
    margin: f64,
    upper_bound: f64,
    lower_bound: f64,
    confidence: f64,
) -> Option<usize> {
    if !(margin.is_finite() && margin > 0.0) || !(0.0..1.0).contains(&confidence) {
        return None;
    }

    let range = upper_bound - lower_bound;
    let estimate = (range * confidence_log(confidence) / margin).powi(2) / 2.0;
    if !estimate.is_finite() || estimate > usize::MAX as f64 {
        return None;
    }

    let mut num_samples = (estimate.ceil() as usize).max(1);
    while hoeffding_bound(num_samples, upper_bound, lower_bound, confidence) > margin {
        num_samples += 1;
    }
    while num_samples > 1
        && hoeffding_bound(num_samples - 1, upper_bound, lower_bound, confidence) <= margin
    {
        num_samples -= 1;
    }
    Some(num_samples)
}

/// Smallest sample count, drawn without replacement, whose Serfling bound is
/// within `margin`. Scans the whole population, so keep it tractable.
pub fn min_samples_serfling(
    margin: f64,
    population_size: usize,
    upper_bound: f64,
    lower_bound: f64,
    confidence: f64,
) -> Option<usize> {
    if !(margin.is_finite() && margin > 0.0) || !(0.0..1.0).contains(&confidence) {
        return None;
    }

    (1..=population_size).find(|num_samples| {
        serfling_bound(
            *num_samples,
            population_size,
            upper_bound,
            lower_bound,
            confidence,
        ) <= margin
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleCriteria {
    pub num_samples: usize,
    pub confidence: f64,
    pub error_margin: f64,
}

impl Default for SampleCriteria {
    fn default() -> Self {
        Self {
            num_samples: 10,
            confidence: 0.95,
            error_margin: 0.0,
        }
    }
}

impl SampleCriteria {
    pub fn from_hoeffding(
        num_samples: usize,
        upper_bound: f64,
        lower_bound: f64,
        confidence: f64,
    ) -> Self {
        Self {
            num_samples,
            confidence,
            error_margin: hoeffding_bound(num_samples, upper_bound, lower_bound, confidence),
        }
    }

    pub fn from_serfling(
        num_samples: usize,
        population_size: usize,
        upper_bound: f64,
        lower_bound: f64,
        confidence: f64,
    ) -> Self {
        Self {
            num_samples,
            confidence,
            error_margin: serfling_bound(
                num_samples,
                population_size,
                upper_bound,
                lower_bound,
                confidence,
            ),
        }
    }
}
