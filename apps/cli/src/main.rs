use clap::Parser;
use tracing_subscriber::util::SubscriberInitExt;

use primerplan_cli::cli::{Cli, Commands};
use primerplan_cli::commands::{defaults, design, interactive};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Design(args) => design::run(args),
        Commands::Interactive(args) => interactive::run(args),
        Commands::Defaults(args) => defaults::run(args),
    }
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

    let filter = EnvFilter::try_new(level)
        .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", level, e))?;

    // Results go to stdout; logs stay on stderr.
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}
