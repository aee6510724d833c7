use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use tracing::info;

use seevals::compositions::{composition_count, materialize_to_disk, weak_compositions};

use crate::cli::CompositionsArgs;
use crate::util::ensure_parent;

pub fn run(args: CompositionsArgs) -> Result<()> {
    let Some(rows) = composition_count(args.total, args.parts) else {
        bail!(
            "composition count for N={}, k={} overflows 64 bits",
            args.total,
            args.parts
        );
    };
    info!(total = args.total, parts = args.parts, rows, "counted weak compositions");

    if args.count_only {
        return Ok(());
    }

    if let Some(output_path) = &args.output {
        ensure_parent(output_path)?;
        let element_type = args.element_type.element_type();
        let path = materialize_to_disk(args.total, args.parts, output_path, element_type)
            .with_context(|| format!("failed to materialize {}", output_path.display()))?;
        info!(
            path = %path.display(),
            rows,
            element_type = element_type.as_str(),
            "wrote composition table"
        );
        return Ok(());
    }

    let mut output = io::BufWriter::new(io::stdout().lock());
    for row in weak_compositions(args.total, args.parts).take(args.limit) {
        let cells = row
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<String>>();
        writeln!(output, "{}", cells.join(" "))?;
    }
    output.flush()?;

    if rows > args.limit as u64 {
        info!(printed = args.limit, rows, "output truncated; raise --limit or use --output");
    }

    Ok(())
}
