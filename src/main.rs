// src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use logsift::config::Config;
use logsift::context::Context;
use logsift::error::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_user_error() => {
            eprintln!("Warning: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    if let Commands::Init = cli.command {
        return commands::handle_init(&config);
    }

    let ctx = Context::open(&config)?.with_actor(cli.user);
    match cli.command {
        Commands::Init => Ok(()),
        Commands::Upload { file, name } => commands::handle_upload(&ctx, &file, name),
        Commands::Search {
            start,
            end,
            keyword,
            order,
        } => commands::handle_search(&ctx, &config, start, end, keyword, order),
        Commands::Show { id } => commands::handle_show(&ctx, id),
        Commands::Del { ids, yes } => commands::handle_del(&ctx, &ids, yes),
    }
}
