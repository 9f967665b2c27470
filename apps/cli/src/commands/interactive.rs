//! Prompt-driven session: every answer is re-asked until it is valid.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use primerplan_core::engine::PrimerEngine;
use primerplan_core::params::validate_amplicon_range;
use primerplan_core::{
    DesignParameters, DesignRun, Fragment, FragmentOrchestrator, FragmentPlanner, GeneWindow,
    ReferenceSequence,
};
use primerplan_formats::export::export_results;
use primerplan_formats::reference::{load_reference, normalize_path};
use primerplan_formats::FormatError;

use crate::cli::InteractiveArgs;
use crate::commands::defaults::write_parameters;
use crate::config::build_engine;
use crate::prompt::Prompter;
use crate::report::write_run;

pub fn run(args: InteractiveArgs) -> Result<()> {
    let engine = build_engine(&args.engine);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut prompter = Prompter::new(stdin.lock(), stdout.lock());
    run_session(&mut prompter, engine)?;
    Ok(())
}

fn ask_reference<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<ReferenceSequence> {
    loop {
        let raw = p.line("Insert the path of the file containing the sequence: ")?;
        match load_reference(normalize_path(&raw)) {
            Ok(reference) => return Ok(reference),
            Err(FormatError::Io(_)) => {
                p.say("The provided path is not valid. Please provide a valid file path.")?
            }
            Err(e) => p.say(format_args!("An error occurred while reading the file: {}", e))?,
        }
    }
}

fn ask_window<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    reference: &ReferenceSequence,
) -> Result<GeneWindow> {
    let prompt = format!(
        "Insert the bp where the gene starts and finishes (max: {}) separated by space: ",
        reference.len()
    );
    loop {
        let answer = p.line(&prompt)?;
        let coords: Vec<i64> = answer
            .split_whitespace()
            .map(str::parse::<i64>)
            .collect::<Result<_, _>>()
            .unwrap_or_default();
        if let [start, end] = coords[..] {
            if let Ok(window) = reference.window(start, end) {
                return Ok(window);
            }
        }
        p.say("Please insert valid numbers within the sequence length range.")?;
    }
}

fn ask_fragments<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    window: &GeneWindow,
) -> Result<Vec<Fragment>> {
    let count: usize = p.ask(
        "Insert the number of primers you want to design: ",
        "positive integer",
        |n| *n > 0,
    )?;
    let mut planner = FragmentPlanner::for_window(window, count)?;

    while !planner.is_complete() {
        let n = planner.next_number();
        let start: i64 = p.ask(
            &format!("Insert the start of fragment {}: ", n),
            "integer",
            |_| true,
        )?;
        let end: i64 = p.ask(
            &format!("Insert the end of fragment {}, max: {}: ", n, planner.gene_len()),
            "integer",
            |_| true,
        )?;
        p.say(planner.echo(start, end))?;
        if let Err(e) = planner.submit(start, end) {
            p.say("")?;
            p.say(format_args!(
                "Error: {}. Please enter valid start and end positions within the gene.",
                e
            ))?;
            p.say("")?;
        }
    }
    Ok(planner.finish()?)
}

fn ask_amplicon<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    fragments: &[Fragment],
) -> Result<(u32, u32)> {
    let smallest = fragments.iter().map(|f| f.length).min();
    loop {
        let min: u32 = p.ask("Insert the min amplicon size: ", "positive integer", |v| *v > 0)?;
        let max: u32 = p.ask("Insert the max amplicon size: ", "positive integer", |v| *v > 0)?;
        match validate_amplicon_range(min, max, smallest) {
            Ok(()) => return Ok((min, max)),
            Err(e) => p.say(e)?,
        }
    }
}

/// Overrides that break the amplicon range for `fragments` are rolled back.
fn edit_parameters<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    params: &mut DesignParameters,
    fragments: &[Fragment],
) -> Result<()> {
    p.say("")?;
    p.say("Default global parameters for primer design:")?;
    write_parameters(params, p.output())?;

    if !p.yes_no("Do you want to modify any parameters? (yes/no): ")? {
        return Ok(());
    }
    loop {
        let key = p.line("Enter the parameter name you want to modify (or 'done' to finish): ")?;
        let key = key.trim();
        if key.eq_ignore_ascii_case("done") {
            return Ok(());
        }
        if !params.contains(key) {
            p.say(format_args!("{} is not a valid parameter name.", key))?;
            continue;
        }
        let raw = p.line(&format!("Enter the new value for {}: ", key))?;
        let previous = params.clone();
        let applied = params.override_value(key, &raw).map(|_| ());
        let checked = applied.and_then(|()| params.validate_for(fragments));
        if let Err(e) = checked {
            *params = previous;
            p.say(e)?;
        }
    }
}

fn offer_save<R: BufRead, W: Write>(p: &mut Prompter<R, W>, run: &DesignRun) -> Result<()> {
    p.say("")?;
    if !p.yes_no("Do you want to save the primers? (yes/no): ")? {
        return p.say("Primers not saved.");
    }
    let raw = p.line("Insert the path where you want to save the primers: ")?;
    let path = normalize_path(&raw);
    match export_results(&run.results, &path) {
        Ok(()) => p.say(format_args!("Primers saved successfully to {}", path.display())),
        Err(e) => p.say(format_args!("Error writing to file: {}", e)),
    }
}

/// Walk through one full design. The fragment count doubles as the number
/// of primer pairs requested per fragment.
pub fn run_session<R, W, E>(p: &mut Prompter<R, W>, engine: E) -> Result<DesignRun>
where
    R: BufRead,
    W: Write,
    E: PrimerEngine,
{
    let reference = ask_reference(p)?;
    let window = ask_window(p, &reference)?;
    let fragments = ask_fragments(p, &window)?;
    let (min, max) = ask_amplicon(p, &fragments)?;

    let mut params = DesignParameters::defaults(min, max, fragments.len());
    edit_parameters(p, &mut params, &fragments)?;

    let run = FragmentOrchestrator::new(engine)
        .run(&window.gene, &fragments, &params)
        .context("Invalid design configuration")?;
    write_run(&run, p.output())?;

    offer_save(p, &run)?;
    Ok(run)
}
