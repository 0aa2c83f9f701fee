// Executive Edge
// Main entry point for the edge binary

use clap::Parser;
use edge_engine::cli::{Cli, Command};
use edge_engine::config::Config;
use edge_engine::handlers::{handle_catalog, handle_run, handle_score, OutputFormat};
use edge_engine::telemetry::init_telemetry_with_level;
use sdk::errors::{EdgeErrorExt, EngineError};

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(err) = &result {
        if let Some(engine_err) = err.downcast_ref::<EngineError>() {
            eprintln!("Hint: {}", engine_err.user_hint());
        }
    }
    result
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // --log wins over the config file; RUST_LOG wins over both
    let log_level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(log_level);

    tracing::info!("Executive Edge v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Run => handle_run(&config, format),
        Command::Score { alloc } => handle_score(&alloc, format, &mut std::io::stdout().lock()),
        Command::Catalog => {
            let catalog = config.catalog()?;
            handle_catalog(&catalog, format, &mut std::io::stdout().lock())
        }
    }
}
