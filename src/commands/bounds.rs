use anyhow::{Result, bail};
use tracing::info;

use seevals::bounds::SampleCriteria;

use crate::cli::BoundsArgs;

pub fn run(args: BoundsArgs) -> Result<()> {
    validate_interval(args.lower, args.upper, args.confidence)?;

    let hoeffding =
        SampleCriteria::from_hoeffding(args.samples, args.upper, args.lower, args.confidence);
    info!(
        samples = hoeffding.num_samples,
        confidence = hoeffding.confidence,
        margin = hoeffding.error_margin,
        "hoeffding bound"
    );

    if let Some(population) = args.population {
        if args.samples > population {
            bail!("sample size {} exceeds population {population}", args.samples);
        }
        let serfling = SampleCriteria::from_serfling(
            args.samples,
            population,
            args.upper,
            args.lower,
            args.confidence,
        );
        info!(
            samples = serfling.num_samples,
            population,
            confidence = serfling.confidence,
            margin = serfling.error_margin,
            "serfling bound"
        );
    }

    Ok(())
}

pub(crate) fn validate_interval(lower: f64, upper: f64, confidence: f64) -> Result<()> {
    if !(lower.is_finite() && upper.is_finite()) || upper < lower {
        bail!("score interval [{lower}, {upper}] is invalid");
    }
    if !(confidence > 0.0 && confidence < 1.0) {
        bail!("confidence must lie strictly between 0 and 1, got {confidence}");
    }
    Ok(())
}
