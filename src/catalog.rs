use std::collections::BTreeMap;

/// Built-in status messages, copied into every catalog that is not given its own table
pub const DEFAULT_MESSAGES: &[(u16, &str)] = &[
    (
        401,
        "Not Authenticated: Sorry, you have to be logged in to access this!",
    ),
    (403, "Not Authorized: Sorry, you can't access this!"),
    (
        404,
        "Not Found: We couldn't find what you're looking for. Please refresh and try again, or contact the support team.",
    ),
    (422, "Validation Error"),
    (500, "Server Error: Please contact the support team."),
];

/// Message used when a status has no entry of its own
pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "Error: Please refresh and try again, or contact the support team.";

/// Returns a fresh copy of the built-in status table
pub fn default_messages() -> BTreeMap<u16, String> {
    DEFAULT_MESSAGES
        .iter()
        .map(|(status, message)| (*status, (*message).to_string()))
        .collect()
}

/// Lookup table from HTTP status code to a display message
///
/// A catalog is immutable once built. Statuses missing from the table, and
/// missing statuses altogether, resolve to the fallback message.
///
/// # Examples
///
/// ```
/// use snag::catalog::{MessageCatalog, DEFAULT_FALLBACK_MESSAGE};
///
/// let catalog = MessageCatalog::default();
///
/// assert_eq!(catalog.lookup(Some(422)), "Validation Error");
/// assert_eq!(catalog.lookup(Some(418)), DEFAULT_FALLBACK_MESSAGE);
/// assert_eq!(catalog.lookup(None), DEFAULT_FALLBACK_MESSAGE);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageCatalog {
    messages: BTreeMap<u16, String>,
    fallback: String,
}

impl MessageCatalog {
    /// Builds a catalog from optional overrides
    ///
    /// A supplied table replaces the built-in one entirely, even when empty.
    /// A missing or empty fallback falls back to [`DEFAULT_FALLBACK_MESSAGE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use snag::catalog::MessageCatalog;
    /// use std::collections::BTreeMap;
    ///
    /// let mut messages = BTreeMap::new();
    /// messages.insert(404, "Whoops, couldn't find that!".to_string());
    ///
    /// let catalog = MessageCatalog::new(Some(messages), Some("Oh no!".to_string()));
    /// assert_eq!(catalog.lookup(Some(404)), "Whoops, couldn't find that!");
    /// assert_eq!(catalog.lookup(Some(500)), "Oh no!");
    /// ```
    pub fn new(messages: Option<BTreeMap<u16, String>>, fallback: Option<String>) -> Self {
        let fallback = fallback
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| DEFAULT_FALLBACK_MESSAGE.to_string());
        Self {
            messages: messages.unwrap_or_else(default_messages),
            fallback,
        }
    }

    /// Returns the display message for a status
    ///
    /// A status of `0` counts as no status at all.
    pub fn lookup(&self, status: Option<u16>) -> &str {
        status
            .filter(|code| *code != 0)
            .and_then(|code| self.messages.get(&code))
            .map(String::as_str)
            .unwrap_or(self.fallback.as_str())
    }

    pub fn messages(&self) -> &BTreeMap<u16, String> {
        &self.messages
    }

    pub fn fallback_message(&self) -> &str {
        &self.fallback
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new(None, None)
    }
}
