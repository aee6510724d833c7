use anyhow::{Result, bail};
use tracing::{info, warn};

use seevals::bounds::{SampleCriteria, min_samples_hoeffding, min_samples_serfling};

use super::bounds::validate_interval;
use crate::cli::PlanArgs;

pub fn run(args: PlanArgs) -> Result<()> {
    validate_interval(args.lower, args.upper, args.confidence)?;
    if !(args.margin.is_finite() && args.margin > 0.0) {
        bail!("error margin must be positive, got {}", args.margin);
    }

    let Some(with_replacement) =
        min_samples_hoeffding(args.margin, args.upper, args.lower, args.confidence)
    else {
        bail!("no sample size reaches margin {}", args.margin);
    };
    let criteria =
        SampleCriteria::from_hoeffding(with_replacement, args.upper, args.lower, args.confidence);
    info!(
        samples = criteria.num_samples,
        margin = criteria.error_margin,
        confidence = criteria.confidence,
        "minimum samples (hoeffding)"
    );

    if let Some(population) = args.population {
        match min_samples_serfling(args.margin, population, args.upper, args.lower, args.confidence)
        {
            Some(samples) => {
                let criteria = SampleCriteria::from_serfling(
                    samples,
                    population,
                    args.upper,
                    args.lower,
                    args.confidence,
                );
                info!(
                    samples = criteria.num_samples,
                    population,
                    margin = criteria.error_margin,
                    saved = with_replacement.saturating_sub(samples),
                    "minimum samples (serfling)"
                );
            }
            None => warn!(population, "empty population, no serfling plan"),
        }
    }

    Ok(())
}
