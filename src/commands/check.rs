use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use seevals::schema::PathValidator;

use super::load_schema;
use crate::cli::CheckArgs;
use crate::model::{SchemaCheckReport, SelectorCheck};
use crate::util::{now_utc_string, write_json_pretty};

pub fn run(args: CheckArgs) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let mut validator = PathValidator::new(&schema)
        .with_context(|| format!("failed to synthesize {}", args.schema.display()))?;

    let mut selectors = Vec::<SelectorCheck>::with_capacity(args.selectors.len());
    for selector in &args.selectors {
        let exists = validator.exists(selector);
        if exists {
            info!(selector = %selector, "selector exists");
        } else {
            warn!(selector = %selector, schema = %schema.name(), "selector not found in schema");
        }
        selectors.push(SelectorCheck {
            selector: selector.clone(),
            exists,
        });
    }

    let missing_count = selectors.iter().filter(|check| !check.exists).count();
    let report = SchemaCheckReport {
        schema_name: schema.name().to_string(),
        checked_at: now_utc_string(),
        selectors,
        missing_count,
    };

    if let Some(report_path) = &args.report_path {
        write_json_pretty(report_path, &report)?;
        info!(path = %report_path.display(), "wrote selector report");
    }

    if missing_count > 0 {
        bail!(
            "{missing_count} of {} selectors do not exist in schema '{}'",
            report.selectors.len(),
            report.schema_name
        );
    }

    info!(checked = report.selectors.len(), schema = %report.schema_name, "all selectors exist");
    Ok(())
}
