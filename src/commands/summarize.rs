use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use seevals::eval::{EvalRecord, summarize};

use crate::cli::SummarizeArgs;
use crate::util::{read_jsonl, write_json_pretty};

pub fn run(args: SummarizeArgs) -> Result<()> {
    if !(args.confidence > 0.0 && args.confidence < 1.0) {
        bail!("confidence must lie strictly between 0 and 1, got {}", args.confidence);
    }

    let records: Vec<EvalRecord> = read_jsonl(&args.input, None)?;
    if records.is_empty() {
        bail!("no records found in {}", args.input.display());
    }

    let summaries = summarize(&records, args.confidence);
    for summary in &summaries {
        if summary.scored_items == 0 {
            warn!(selector = %summary.selector, "no scored items");
            continue;
        }
        info!(
            selector = %summary.selector,
            scored = summary.scored_items,
            unscored = summary.unscored_items,
            mean = summary.mean_score.unwrap_or_default(),
            hoeffding = summary.hoeffding_margin.unwrap_or_default(),
            serfling = summary.serfling_margin.unwrap_or(f64::NAN),
            "selector summary"
        );
    }

    match &args.output {
        Some(output_path) => {
            write_json_pretty(output_path, &summaries)?;
            info!(path = %output_path.display(), selectors = summaries.len(), "wrote summary");
        }
        None => {
            let mut output = io::BufWriter::new(io::stdout().lock());
            serde_json::to_writer_pretty(&mut output, &summaries)
                .context("failed to serialize summary json output")?;
            writeln!(output)?;
            output.flush()?;
        }
    }

    Ok(())
}
