//! # snag - HTTP error payload inspector
//!
//! Runs API error objects through the same store front-end code uses, so the
//! status message and per-field validation errors can be checked from the
//! terminal.
//!
//! ## Usage
//!
//! ```bash
//! # Summarize a failed response saved to disk
//! snag parse error.json
//! echo '{"response": {"status": 404}}' | snag parse -
//!
//! # Machine-readable output
//! snag parse error.json --json
//!
//! # Look up messages in the active catalog
//! snag message 422
//! snag catalog --catalog ./messages.yaml
//! ```

use clap::Parser;
use snag::{error::SnagError, handle_catalog, handle_message, handle_parse, load_catalog, Cli};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the stderr logger
///
/// `SNAG_LOG` takes precedence; otherwise `--verbose` selects `debug` and the
/// default is `warn`.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("SNAG_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run() -> Result<(), SnagError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog = load_catalog(cli.catalog.as_deref())?;
    use snag::Command;
    match cli.command {
        Command::Parse { input, json } => handle_parse(&input, json, catalog)?,
        Command::Message { status } => handle_message(&status, &catalog)?,
        Command::Catalog => handle_catalog(&catalog)?,
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        if let Some(suggestion) = e.suggestion() {
            eprintln!("Suggestion: {suggestion}");
        }
        std::process::exit(1);
    }
}
