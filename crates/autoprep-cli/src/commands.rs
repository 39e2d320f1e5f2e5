use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use autoprep_core::{profile_dataset, run_pipeline};
use autoprep_ingest::read_csv_frame;
use autoprep_output::{write_artifacts, write_diagnostics};

use crate::cli::{ProfileArgs, RunArgs};
use crate::types::{ProfileResult, RunResult};

pub fn run_prep(args: &RunArgs) -> Result<RunResult> {
    let input = &args.input;
    let run_span = info_span!("run", input = %input.display());
    let _run_guard = run_span.enter();
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(input));
    let options = args.prep.to_options();

    let ingest_start = Instant::now();
    let raw = read_csv_frame(input)?;
    debug!(
        rows = raw.height(),
        columns = raw.width(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    let output = run_pipeline(&raw, args.target.as_deref(), &options)
        .with_context(|| format!("preprocess {}", input.display()))?;

    let written = if args.dry_run {
        info!("dry run, no files written");
        Vec::new()
    } else {
        let mut written = write_artifacts(&output_dir, &output.artifacts)
            .with_context(|| format!("export to {}", output_dir.display()))?;
        written.push(write_diagnostics(&output_dir, &output.diagnostics)?);
        info!(files = written.len(), output_dir = %output_dir.display(), "artifacts written");
        written
    };
    Ok(RunResult {
        input: input.clone(),
        output_dir,
        written,
        diagnostics: output.diagnostics,
        dry_run: args.dry_run,
    })
}

pub fn run_profile(args: &ProfileArgs) -> Result<ProfileResult> {
    let input = &args.input;
    let raw = read_csv_frame(input)?;
    let profile = profile_dataset(&raw, args.target.as_deref(), &args.prep.to_options())
        .with_context(|| format!("profile {}", input.display()))?;
    Ok(ProfileResult {
        input: input.clone(),
        profile,
    })
}

/// `<CSV dir>/output`.
fn default_output_dir(input: &Path) -> PathBuf {
    input
        .parent()
        .map(|dir| dir.join("output"))
        .unwrap_or_else(|| Path::new("output").to_path_buf())
}
