use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use seevals::eval::{Criteria, EvalConfig, EvalConfigBuilder, EvalRecord};
use seevals::schema::SchemaDocument;

use super::load_schema;
use crate::cli::BuildArgs;
use crate::model::{BuildCounts, BuildPaths, BuildRunManifest, EvalPlanFile};
use crate::util::{
    now_utc_string, read_json, read_jsonl, sha256_file, utc_compact_string, write_json_pretty,
    write_jsonl,
};

const MANIFEST_VERSION: u32 = 1;
const DEFAULT_SEED: u64 = 47;

pub fn run(args: BuildArgs) -> Result<()> {
    let started_at = now_utc_string();
    let run_id = format!("build-{}", utc_compact_string(Utc::now()));

    let schema = load_schema(&args.schema)?;
    let plan: EvalPlanFile = read_json(&args.plan)?;
    if plan.fields.is_empty() {
        bail!("plan {} has no fields", args.plan.display());
    }

    let seed = args.seed.or(plan.seed).unwrap_or(DEFAULT_SEED);
    let config = build_config(&schema, &plan, seed)?;
    let warnings = plan_warnings(&plan);
    for warning in &warnings {
        warn!(plan = %args.plan.display(), "{warning}");
    }

    info!(
        run_id = %run_id,
        schema = %config.schema_name(),
        selectors = config.entries().len(),
        seed,
        "evaluation config built"
    );

    let documents: Vec<Value> = read_jsonl(&args.input, args.envelope.as_deref())?;
    if documents.is_empty() {
        bail!("no documents found in {}", args.input.display());
    }

    let records = config
        .apply(&documents)
        .with_context(|| format!("failed to assemble dataset from {}", args.input.display()))?;
    let counts = count_records(&records, config.entries().len());

    if args.dry_run {
        info!(
            documents = counts.document_count,
            items = counts.item_count,
            "build dry-run complete"
        );
        return Ok(());
    }

    write_jsonl(&args.output, &records)?;
    info!(path = %args.output.display(), records = records.len(), "wrote evaluation dataset");

    let manifest_path = args
        .manifest_path
        .clone()
        .unwrap_or_else(|| default_manifest_path(&args.output));
    let manifest = BuildRunManifest {
        manifest_version: MANIFEST_VERSION,
        run_id,
        started_at,
        completed_at: now_utc_string(),
        seed,
        schema_name: config.schema_name().to_string(),
        envelope: args.envelope.clone(),
        input_sha256: sha256_file(&args.input)?,
        output_sha256: sha256_file(&args.output)?,
        paths: BuildPaths {
            schema_path: args.schema.display().to_string(),
            plan_path: args.plan.display().to_string(),
            input_path: args.input.display().to_string(),
            output_path: args.output.display().to_string(),
        },
        counts,
        warnings,
    };

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote build manifest");
    info!(
        documents = manifest.counts.document_count,
        items = manifest.counts.item_count,
        "build completed"
    );

    Ok(())
}

pub fn build_config(schema: &SchemaDocument, plan: &EvalPlanFile, seed: u64) -> Result<EvalConfig> {
    let mut builder = EvalConfigBuilder::new(schema, seed)
        .with_context(|| format!("failed to synthesize schema '{}'", schema.name()))?;

    for field in &plan.fields {
        builder
            .add(
                &field.selector,
                field.sample,
                field.view.clone(),
                field.rubric.clone(),
            )
            .with_context(|| format!("invalid plan field '{}'", field.selector))?;
    }

    Ok(builder.build())
}

fn plan_warnings(plan: &EvalPlanFile) -> Vec<String> {
    let mut warnings = Vec::<String>::new();

    if let Some(max_total_score) = plan.max_total_score {
        let criteria = Criteria::new(
            plan.fields.iter().map(|field| field.rubric.clone()).collect(),
            max_total_score,
        );
        if !criteria.is_consistent() {
            warnings.push(format!(
                "max_total_score {max_total_score} is below the attainable total {}",
                criteria.attainable_total()
            ));
        }
    }

    warnings
}

fn count_records(records: &[EvalRecord], selector_count: usize) -> BuildCounts {
    let mut counts = BuildCounts {
        document_count: records.len(),
        selector_count,
        datum_count: 0,
        item_count: 0,
        sampled_item_count: 0,
    };

    for datum in records.iter().flat_map(|record| &record.data) {
        counts.datum_count += 1;
        counts.item_count += datum.items.len();
        counts.sampled_item_count += datum
            .items
            .iter()
            .filter(|item| item.sample.is_some())
            .count();
    }

    counts
}

fn default_manifest_path(output: &Path) -> PathBuf {
    output.with_extension("manifest.json")
}
