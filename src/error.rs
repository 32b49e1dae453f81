use std::fmt;
use std::io;

/// Central error type for the snag library and CLI
#[derive(Debug, Clone)]
pub enum SnagError {
    /// Error payload could not be read
    Payload(PayloadError),
    /// Catalog configuration errors
    Config(ConfigError),
    /// CLI argument errors
    Cli(CliError),
    /// I/O errors (file operations, stdin)
    Io(String),
    /// JSON/YAML parsing errors
    Parse(ParseError),
}

/// Problems with the shape of an error payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// Validation body has no `errors` attribute
    MissingErrors,
    /// Field errors were neither a string nor a list of strings
    InvalidFieldErrors(String),
    /// Top-level payload was not a JSON object
    NotAnObject(String),
    /// Status was present but not a valid HTTP status code
    InvalidStatus(String),
}

/// Catalog configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Catalog file not found
    FileNotFound(String),
    /// Invalid YAML content
    InvalidYaml(String),
    /// `${env:NAME}` reference could not be resolved
    VariableResolution(String),
}

/// CLI argument errors
#[derive(Debug, Clone)]
pub enum CliError {
    /// Status argument was not a number
    InvalidStatus(String),
    /// Input source was empty
    EmptyInput(String),
}

/// Parsing related errors
#[derive(Debug, Clone)]
pub enum ParseError {
    /// JSON parsing error
    Json(String),
    /// YAML parsing error
    Yaml(String),
}

impl fmt::Display for SnagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnagError::Payload(err) => write!(f, "{err}"),
            SnagError::Config(err) => write!(f, "{err}"),
            SnagError::Cli(err) => write!(f, "{err}"),
            SnagError::Io(msg) => write!(f, "I/O error: {msg}"),
            SnagError::Parse(err) => write!(f, "{err}"),
        }
    }
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::MissingErrors => {
                write!(f, "Invalid payload: validation body has no 'errors' attribute")
            }
            PayloadError::InvalidFieldErrors(field) => {
                write!(f, "Invalid payload: errors for field '{field}' must be a string or a list of strings")
            }
            PayloadError::NotAnObject(kind) => {
                write!(f, "Invalid payload: expected a JSON object, found {kind}")
            }
            PayloadError::InvalidStatus(value) => {
                write!(f, "Invalid payload: '{value}' is not an HTTP status code")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Catalog file not found: '{path}'")
            }
            ConfigError::InvalidYaml(msg) => {
                write!(f, "Invalid YAML in catalog file: {msg}")
            }
            ConfigError::VariableResolution(msg) => {
                write!(f, "Failed to resolve variables: {msg}")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidStatus(status) => {
                write!(f, "Invalid status '{status}'. Status codes must be numbers between 100 and 999")
            }
            CliError::EmptyInput(source) => {
                write!(f, "No error payload found in {source}")
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Json(msg) => write!(f, "JSON parsing error: {msg}"),
            ParseError::Yaml(msg) => write!(f, "YAML parsing error: {msg}"),
        }
    }
}

impl std::error::Error for SnagError {}
impl std::error::Error for PayloadError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for CliError {}
impl std::error::Error for ParseError {}

impl From<PayloadError> for SnagError {
    fn from(err: PayloadError) -> Self {
        SnagError::Payload(err)
    }
}

impl From<ConfigError> for SnagError {
    fn from(err: ConfigError) -> Self {
        SnagError::Config(err)
    }
}

impl From<CliError> for SnagError {
    fn from(err: CliError) -> Self {
        SnagError::Cli(err)
    }
}

impl From<ParseError> for SnagError {
    fn from(err: ParseError) -> Self {
        SnagError::Parse(err)
    }
}

impl From<io::Error> for SnagError {
    fn from(err: io::Error) -> Self {
        SnagError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for SnagError {
    fn from(err: serde_yaml::Error) -> Self {
        SnagError::Parse(ParseError::Yaml(err.to_string()))
    }
}

impl From<serde_json::Error> for SnagError {
    fn from(err: serde_json::Error) -> Self {
        SnagError::Parse(ParseError::Json(err.to_string()))
    }
}

impl SnagError {
    /// Provides a helpful suggestion for how to fix the error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            SnagError::Config(ConfigError::FileNotFound(_)) => {
                Some("Create .snag/catalog.yaml or pass --catalog with an existing file")
            }
            SnagError::Config(ConfigError::VariableResolution(_)) => {
                Some("Export the referenced environment variable before running snag")
            }
            SnagError::Payload(PayloadError::MissingErrors) => {
                Some("Validation bodies look like: {\"errors\": {\"email\": [\"The email field is required.\"]}}")
            }
            SnagError::Payload(PayloadError::NotAnObject(_)) => {
                Some("Example: {\"response\": {\"status\": 404}} or {\"status\": 500}")
            }
            SnagError::Cli(CliError::InvalidStatus(_)) => Some("Example: snag message 404"),
            SnagError::Cli(CliError::EmptyInput(_)) => {
                Some("Pipe a JSON object into 'snag parse -' or pass a file path")
            }
            _ => None,
        }
    }
}
