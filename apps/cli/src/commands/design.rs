//! Batch design from command-line arguments.

use std::io::Write;

use anyhow::{bail, Context, Result};
use primerplan_core::engine::PrimerEngine;
use primerplan_core::{DesignParameters, DesignRun, FragmentOrchestrator, FragmentPlanner};
use primerplan_formats::export::export_results;
use primerplan_formats::reference::{load_reference, normalize_path};
use tracing::info;

use crate::cli::DesignArgs;
use crate::config::{apply_overrides, build_engine, read_params_file};
use crate::dto::RunReportDto;
use crate::report::write_run;

pub fn run(args: DesignArgs) -> Result<()> {
    let engine = build_engine(&args.engine);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let run = execute(&args, engine, &mut out)?;

    if run.designed() == 0 {
        bail!("No fragment could be designed");
    }
    Ok(())
}

/// Run one batch design and write its report to `out`.
pub fn execute<E, W>(args: &DesignArgs, engine: E, out: &mut W) -> Result<DesignRun>
where
    E: PrimerEngine,
    W: Write,
{
    let path = normalize_path(&args.reference);
    let reference = load_reference(&path)
        .with_context(|| format!("Failed to load reference {}", path.display()))?;
    let window = reference
        .window(args.gene_start, args.gene_end)
        .context("Invalid gene coordinates")?;

    let mut planner = FragmentPlanner::for_window(&window, args.fragments.len())?;
    for &(start, end) in &args.fragments {
        let number = planner.next_number();
        if !args.json {
            writeln!(out, "{}", planner.echo(start, end))?;
        }
        planner
            .submit(start, end)
            .with_context(|| format!("Invalid fragment {}", number))?;
    }
    let fragments = planner.finish()?;

    let mut params =
        DesignParameters::defaults(args.min_amplicon, args.max_amplicon, args.num_primers);
    let mut overrides = match &args.params {
        Some(file) => read_params_file(file)?,
        None => Vec::new(),
    };
    overrides.extend(args.overrides.iter().cloned());
    apply_overrides(&mut params, &overrides);

    let orchestrator = FragmentOrchestrator::new(engine);
    let run = orchestrator
        .run(&window.gene, &fragments, &params)
        .context("Invalid design configuration")?;

    if args.json {
        let dto = RunReportDto::new(&run, window.gene_len(), &params);
        serde_json::to_writer_pretty(&mut *out, &dto)?;
        writeln!(out)?;
    } else {
        write_run(&run, out)?;
    }

    if let Some(output) = &args.output {
        let path = normalize_path(output);
        export_results(&run.results, &path)
            .with_context(|| format!("Error writing to file {}", path.display()))?;
        if !args.json {
            writeln!(out, "Primers saved successfully to {}", path.display())?;
        }
    }

    info!(
        run_id = %run.id,
        designed = run.designed(),
        failed = run.failed(),
        pairs = run.results.len(),
        "design finished"
    );
    Ok(run)
}
