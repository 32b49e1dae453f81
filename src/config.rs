use crate::catalog::MessageCatalog;
use crate::error::{ConfigError, SnagError};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory searched for a catalog file when none is given explicitly
pub const CATALOG_DIR: &str = ".snag";

/// Catalog file names tried inside [`CATALOG_DIR`], in order
pub const CATALOG_FILES: &[&str] = &["catalog.yaml", "catalog.yml"];

/// Catalog overrides as written in a YAML file
///
/// ```yaml
/// variables:
///   support: support@example.com
/// fallback: "Something went wrong, write to ${support}."
/// messages:
///   404: "Nothing here."
///   503: "Down for maintenance, ask ${env:ONCALL_NAME}."
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    pub variables: Option<HashMap<String, String>>,
    pub fallback: Option<String>,
    pub messages: Option<BTreeMap<u16, String>>,
}

impl CatalogConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml(e.to_string()))
    }

    /// Expands `${name}` and `${env:NAME}` references in every message
    pub fn resolve(self) -> Result<Self, ConfigError> {
        let vars = self.variables.unwrap_or_default();
        let fallback = self
            .fallback
            .map(|message| resolve_vars(&message, &vars))
            .transpose()
            .map_err(ConfigError::VariableResolution)?;
        let messages = match self.messages {
            Some(messages) => {
                let mut resolved = BTreeMap::new();
                for (status, message) in messages {
                    let message =
                        resolve_vars(&message, &vars).map_err(ConfigError::VariableResolution)?;
                    resolved.insert(status, message);
                }
                Some(resolved)
            }
            None => None,
        };
        Ok(Self {
            variables: Some(vars),
            fallback,
            messages,
        })
    }

    /// Resolves variables and builds the catalog
    pub fn into_catalog(self) -> Result<MessageCatalog, ConfigError> {
        let resolved = self.resolve()?;
        Ok(MessageCatalog::new(resolved.messages, resolved.fallback))
    }
}

/// Load and parse a catalog file
pub fn load_catalog_config(path: &Path) -> Result<CatalogConfig, SnagError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            SnagError::Config(ConfigError::FileNotFound(path.display().to_string()))
        }
        _ => SnagError::from(e),
    })?;
    Ok(CatalogConfig::from_yaml(&content)?)
}

/// Finds the catalog file to use, relative to `base`
///
/// An explicit path must exist. Without one, the files in [`CATALOG_FILES`]
/// are tried under `base/.snag`; `None` means the built-in catalog applies.
pub fn find_catalog_file(base: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>, SnagError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }
        return Ok(Some(path.to_path_buf()));
    }
    Ok(CATALOG_FILES
        .iter()
        .map(|name| base.join(CATALOG_DIR).join(name))
        .find(|path| path.is_file()))
}

/// Builds the active catalog for a working directory
pub fn load_catalog(base: &Path, explicit: Option<&Path>) -> Result<MessageCatalog, SnagError> {
    match find_catalog_file(base, explicit)? {
        Some(path) => {
            debug!(path = %path.display(), "loading catalog file");
            Ok(load_catalog_config(&path)?.into_catalog()?)
        }
        None => {
            debug!("no catalog file found, using built-in messages");
            Ok(MessageCatalog::default())
        }
    }
}

/// Resolves variables in a string using file-defined and environment variables.
pub fn resolve_vars(input: &str, file_vars: &HashMap<String, String>) -> Result<String, String> {
    let mut result = String::new();
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            let mut closed = false;
            for next_c in chars.by_ref() {
                if next_c == '}' {
                    closed = true;
                    break;
                }
                var_name.push(next_c);
            }
            if !closed {
                return Err(format!("Unterminated variable: ${{{var_name}"));
            }
            if let Some(env_var) = var_name.strip_prefix("env:") {
                match std::env::var(env_var) {
                    Ok(val) => result.push_str(&val),
                    Err(_) => return Err(format!("Missing environment variable: {env_var}")),
                }
            } else {
                match file_vars.get(&var_name) {
                    Some(val) => result.push_str(val),
                    None => return Err(format!("Missing variable: {var_name}")),
                }
            }
        } else {
            result.push(c);
        }
    }
    Ok(result)
}
