pub mod catalog;
pub mod config;
pub mod error;
pub mod printer;
pub mod store;

use catalog::MessageCatalog;
use clap::{Parser, Subcommand};
use error::{CliError, SnagError};
use printer::{format_catalog, print_summary};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use store::{ErrorInput, ErrorStore, ErrorSummary};
use tracing::debug;

#[derive(Subcommand)]
pub enum Command {
    /// Parse an error payload and print its status message and field errors
    Parse {
        /// JSON file holding the error object, or '-' for stdin
        input: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the catalog message for a status code
    Message {
        /// HTTP status code
        status: String,
    },
    /// List the active status messages and the fallback
    Catalog,
}

#[derive(Parser)]
#[command(name = "snag")]
#[command(author, version, about, long_about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    /// Catalog YAML file (defaults to .snag/catalog.yaml)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
    /// Log parsing decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Validates a status argument
///
/// Accepts the three-digit range `http::StatusCode` accepts.
pub fn parse_status(status: &str) -> Result<u16, SnagError> {
    let code = status
        .trim()
        .parse::<u16>()
        .map_err(|_| CliError::InvalidStatus(status.to_string()))?;
    http::StatusCode::from_u16(code)
        .map(|code| code.as_u16())
        .map_err(|_| SnagError::Cli(CliError::InvalidStatus(status.to_string())))
}

/// Reads the raw payload from a file path, or stdin for `-`
pub fn read_input(input: &str) -> Result<String, SnagError> {
    let (content, source) = if input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        (buffer, "stdin".to_string())
    } else {
        (fs::read_to_string(input)?, format!("'{input}'"))
    };
    if content.trim().is_empty() {
        return Err(CliError::EmptyInput(source).into());
    }
    Ok(content)
}

/// Classifies a JSON document as field errors or a failed response
pub fn parse_input(content: &str) -> Result<ErrorInput, SnagError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    Ok(ErrorInput::try_from(value)?)
}

/// Runs a JSON document through a fresh store
pub fn parse_payload(
    content: &str,
    catalog: MessageCatalog,
) -> Result<(ErrorSummary, ErrorStore), SnagError> {
    let input = parse_input(content)?;
    let mut store = ErrorStore::with_catalog(catalog);
    let summary = store.set_and_parse(input);
    debug!(fields = store.fields().len(), "payload parsed");
    Ok((summary, store))
}

pub fn load_catalog(explicit: Option<&Path>) -> Result<MessageCatalog, SnagError> {
    let base = std::env::current_dir()?;
    config::load_catalog(&base, explicit)
}

pub fn handle_parse(input: &str, json: bool, catalog: MessageCatalog) -> Result<(), SnagError> {
    let content = read_input(input)?;
    let (summary, store) = parse_payload(&content, catalog)?;
    print_summary(&summary, store.fields(), json);
    Ok(())
}

pub fn handle_message(status: &str, catalog: &MessageCatalog) -> Result<(), SnagError> {
    let code = parse_status(status)?;
    println!("{}", catalog.lookup(Some(code)));
    Ok(())
}

pub fn handle_catalog(catalog: &MessageCatalog) -> Result<(), SnagError> {
    print!("{}", format_catalog(catalog));
    Ok(())
}
