use crate::error::PayloadError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Mapping from field name to the errors reported for it
pub type FieldErrorMap = BTreeMap<String, FieldErrors>;

/// Errors attached to a single field
///
/// APIs report either one message or a list of messages per field; both
/// shapes are kept as received.
///
/// # Examples
///
/// ```
/// use snag::store::FieldErrors;
///
/// let single = FieldErrors::from("Please provide a name.");
/// let multiple = FieldErrors::from(vec!["Too short.", "Must contain a digit."]);
///
/// assert_eq!(single.first(), Some("Please provide a name."));
/// assert_eq!(multiple.first(), Some("Too short."));
/// assert_eq!(multiple.messages().len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldErrors {
    /// A lone message
    Single(String),
    /// Messages in the order the server sent them
    Multiple(Vec<String>),
}

impl FieldErrors {
    /// First message for the field, `None` for an empty list
    pub fn first(&self) -> Option<&str> {
        match self {
            FieldErrors::Single(message) => Some(message),
            FieldErrors::Multiple(messages) => messages.first().map(String::as_str),
        }
    }

    /// All messages as a flat list
    pub fn messages(&self) -> Vec<&str> {
        match self {
            FieldErrors::Single(message) => vec![message.as_str()],
            FieldErrors::Multiple(messages) => messages.iter().map(String::as_str).collect(),
        }
    }

    /// Reads one field's errors from JSON
    ///
    /// `field` is only used to name the offending key in the error.
    pub fn from_value(field: &str, value: &Value) -> Result<Self, PayloadError> {
        match value {
            Value::String(message) => Ok(FieldErrors::Single(message.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(message) => Ok(message.clone()),
                    _ => Err(PayloadError::InvalidFieldErrors(field.to_string())),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FieldErrors::Multiple),
            _ => Err(PayloadError::InvalidFieldErrors(field.to_string())),
        }
    }
}

impl From<&str> for FieldErrors {
    fn from(message: &str) -> Self {
        FieldErrors::Single(message.to_string())
    }
}

impl From<String> for FieldErrors {
    fn from(message: String) -> Self {
        FieldErrors::Single(message)
    }
}

impl From<Vec<String>> for FieldErrors {
    fn from(messages: Vec<String>) -> Self {
        FieldErrors::Multiple(messages)
    }
}

impl From<Vec<&str>> for FieldErrors {
    fn from(messages: Vec<&str>) -> Self {
        FieldErrors::Multiple(messages.into_iter().map(str::to_string).collect())
    }
}

/// Reads a whole `{field: message | [message, ...]}` object
pub fn field_errors_from_value(value: &Value) -> Result<FieldErrorMap, PayloadError> {
    let object = value
        .as_object()
        .ok_or_else(|| PayloadError::NotAnObject(json_kind(value).to_string()))?;
    object
        .iter()
        .map(|(field, errors)| {
            FieldErrors::from_value(field, errors).map(|errors| (field.clone(), errors))
        })
        .collect()
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
