//! create-medusa-app - Interactive scaffolding CLI for Medusa projects
//!
//! This is the main entry point for the create-medusa-app command.

mod cli;
mod commands;
mod output;
mod prompts;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

#[tokio::main]
async fn main() {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // Parse CLI args
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet);

    // Every unrecoverable failure funnels through this one reporting path
    if let Err(e) = commands::create::run(cli).await {
        output::error(&format!(
            "An error occurred while setting up your project: {e:#}"
        ));
        std::process::exit(1);
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Default to warn so interactive output stays clean;
            // use -v/-vv for setup diagnostics
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
