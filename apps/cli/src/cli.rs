use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Design primer pairs for user-defined fragments of a gene
#[derive(Parser)]
#[command(name = "primerplan")]
#[command(version)]
#[command(about = "Split a gene into fragments and design primer pairs for each", long_about = None)]
pub struct Cli {
    /// Log filter (trace, debug, info, warn, error or an EnvFilter directive)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Design primers for fragments given on the command line
    Design(DesignArgs),

    /// Ask for every input on the terminal, re-asking until it is valid
    Interactive(InteractiveArgs),

    /// Print the default design parameters
    Defaults(DefaultsArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    /// primer3_core and oligotm executables
    Primer3,
    /// Deterministic in-process engine for dry runs
    Mock,
}

#[derive(Debug, Clone, Args)]
pub struct EngineArgs {
    /// Primer design engine
    #[arg(long, value_enum, default_value_t = EngineKind::Primer3)]
    pub engine: EngineKind,

    /// Path to the primer3_core executable
    #[arg(long, default_value = "primer3_core")]
    pub primer3_core: PathBuf,

    /// Path to the oligotm executable
    #[arg(long, default_value = "oligotm")]
    pub oligotm: PathBuf,

    /// primer3 thermodynamic parameter directory
    #[arg(long)]
    pub thermo_params: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct DesignArgs {
    /// Flat text file holding the reference sequence
    #[arg(short, long)]
    pub reference: String,

    /// Gene start in the reference (0-based, inclusive)
    #[arg(long, allow_hyphen_values = true)]
    pub gene_start: i64,

    /// Gene end in the reference (exclusive)
    #[arg(long, allow_hyphen_values = true)]
    pub gene_end: i64,

    /// Fragment as START-END relative to the gene; repeat for more fragments
    #[arg(short, long = "fragment", required = true, value_parser = parse_span)]
    pub fragments: Vec<(i64, i64)>,

    /// Minimum amplicon size
    #[arg(long)]
    pub min_amplicon: u32,

    /// Maximum amplicon size (at most the smallest fragment length)
    #[arg(long)]
    pub max_amplicon: u32,

    /// Primer pairs to request per fragment
    #[arg(short, long, default_value_t = 1)]
    pub num_primers: usize,

    /// Override a design parameter, e.g. PRIMER_OPT_TM=60
    #[arg(long = "set", value_parser = parse_assignment)]
    pub overrides: Vec<(String, String)>,

    /// JSON object of parameter overrides, applied before --set
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Save primer pairs to this file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Print a JSON run report instead of the text report
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Debug, Clone, Args)]
pub struct InteractiveArgs {
    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Debug, Clone, Args)]
pub struct DefaultsArgs {
    #[arg(long, default_value_t = 100)]
    pub min_amplicon: u32,

    #[arg(long, default_value_t = 300)]
    pub max_amplicon: u32,

    #[arg(short, long, default_value_t = 1)]
    pub num_primers: usize,

    /// Print as a JSON object
    #[arg(long)]
    pub json: bool,
}

/// Parse `START-END` or `START,END`.
pub fn parse_span(s: &str) -> Result<(i64, i64), String> {
    let (start, end) = s
        .split_once(',')
        .or_else(|| s.split_once('-'))
        .ok_or_else(|| format!("expected START-END, got '{}'", s))?;
    let start = start
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid start '{}': {}", start, e))?;
    let end = end
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid end '{}': {}", end, e))?;
    Ok((start, end))
}

/// Parse `KEY=VALUE`.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.trim().is_empty() {
        return Err(format!("missing parameter name in '{}'", s));
    }
    Ok((key.trim().to_string(), value.trim().to_string()))
}
