//! yaarg CLI - API reference generator.
//!
//! Provides commands for:
//! - `render`: Render the API reference of one file or symbol
//! - `process`: Expand `::: yaarg` directives in a Markdown document

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ProcessArgs, RenderArgs};
use output::Output;

/// yaarg - Yet Another API Reference Generator.
#[derive(Parser)]
#[command(name = "yaarg", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the API reference of a file or symbol to stdout.
    Render(RenderArgs),
    /// Expand `::: yaarg` directives in a Markdown document.
    Process(ProcessArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Render(args) => args.verbose,
            Self::Process(args) => args.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Process(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
