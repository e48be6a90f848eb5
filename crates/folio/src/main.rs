//! Folio CLI - page-graph navigation and link rendering.
//!
//! Provides commands for:
//! - `index`: List the pages of a combined view in index order
//! - `nav`: Render a navigation tree
//! - `filter`: Render the elements of one kind below a page
//! - `link`: Resolve and render a single link
//! - `combined`: Render every page below a root as one document

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CombinedArgs, FilterArgs, GlobalArgs, IndexArgs, LinkArgs, NavArgs};
use output::Output;

/// Folio - page-graph navigation and link rendering.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pages below a root in combined-view order.
    Index(IndexArgs),
    /// Render a navigation tree.
    Nav(NavArgs),
    /// Render the elements of one kind below a page.
    Filter(FilterArgs),
    /// Resolve and render a link.
    Link(LinkArgs),
    /// Render every page below a root as one document.
    Combined(CombinedArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Index(args) => args.execute(&cli.global, &output),
        Commands::Nav(args) => args.execute(&cli.global, &output),
        Commands::Filter(args) => args.execute(&cli.global, &output),
        Commands::Link(args) => args.execute(&cli.global, &output),
        Commands::Combined(args) => args.execute(&cli.global, &output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
