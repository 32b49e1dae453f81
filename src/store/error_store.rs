use crate::catalog::MessageCatalog;
use crate::error::PayloadError;
use crate::store::fields::{FieldErrorMap, FieldErrors};
use crate::store::payload::{ErrorInput, ErrorPayload, ValidationPayload, VALIDATION_STATUS};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Display-ready outcome of parsing a failed response
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
    /// Status taken from the payload, if it carried one
    pub status: Option<u16>,
    /// Catalog message for that status
    pub message: String,
}

impl ErrorSummary {
    pub fn is_validation(&self) -> bool {
        self.status == Some(VALIDATION_STATUS)
    }
}

/// Result of [`ErrorStore::get`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldLookup<'a> {
    /// Errors of the requested field
    Field(&'a FieldErrors),
    /// Every field, when no field (or an unknown one) was asked for
    All(&'a FieldErrorMap),
}

/// Holds the current error state of a form or request flow
///
/// The store is loaded with either per-field errors or a failed response.
/// [`ErrorStore::parse`] turns a loaded response into a status and display
/// message, and picks up per-field errors from validation failures so they
/// can be queried with [`ErrorStore::has`], [`ErrorStore::get`] and
/// [`ErrorStore::get_first`].
///
/// # Examples
///
/// ```
/// use snag::store::{ErrorPayload, ErrorStore};
/// use serde_json::json;
///
/// let mut errors = ErrorStore::new();
/// let body = json!({"errors": {"email": ["Email is required."]}});
///
/// let summary = errors.set_and_parse(ErrorPayload::response(Some(422), Some(body)));
///
/// assert_eq!(summary.status, Some(422));
/// assert_eq!(summary.message, "Validation Error");
/// assert!(errors.has("email"));
/// assert_eq!(errors.get_first(Some("email")), Some("Email is required."));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ErrorStore {
    fields: FieldErrorMap,
    payload: Option<ErrorPayload>,
    catalog: MessageCatalog,
}

impl ErrorStore {
    /// Creates an empty store backed by the built-in catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with custom catalog overrides
    ///
    /// Same rules as [`MessageCatalog::new`]: a supplied table replaces the
    /// built-in one, a missing or empty fallback keeps the built-in fallback.
    pub fn with_messages(
        messages: Option<BTreeMap<u16, String>>,
        fallback: Option<String>,
    ) -> Self {
        Self::with_catalog(MessageCatalog::new(messages, fallback))
    }

    pub fn with_catalog(catalog: MessageCatalog) -> Self {
        Self {
            fields: FieldErrorMap::new(),
            payload: None,
            catalog,
        }
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Per-field errors currently held
    pub fn fields(&self) -> &FieldErrorMap {
        &self.fields
    }

    /// Failed response waiting to be parsed, if one was loaded
    pub fn payload(&self) -> Option<&ErrorPayload> {
        self.payload.as_ref()
    }

    /// Replaces the whole error state
    ///
    /// Field errors become the current fields. A payload is held for
    /// [`ErrorStore::parse`] and leaves no field errors behind, so
    /// [`ErrorStore::any`] stays false after loading a non-422 failure; check
    /// [`ErrorStore::payload`] to tell that a failure is held.
    pub fn set_all(&mut self, errors: impl Into<ErrorInput>) -> &mut Self {
        match errors.into() {
            ErrorInput::Fields(fields) => {
                debug!(fields = fields.len(), "replacing field errors");
                self.fields = fields;
                self.payload = None;
            }
            ErrorInput::Payload(payload) => {
                debug!(status = ?payload.status(), "holding error payload");
                self.fields = FieldErrorMap::new();
                self.payload = Some(payload);
            }
        }
        self
    }

    /// Replaces the fields with the errors of a validation body
    pub fn set_validation(&mut self, payload: impl Into<ValidationPayload>) {
        let payload = payload.into();
        debug!(fields = payload.errors.len(), "setting validation errors");
        self.fields = payload.errors;
        self.payload = None;
    }

    /// Reads a raw validation body and replaces the fields with its errors
    ///
    /// A body without an `errors` attribute is rejected and the current
    /// fields are left as they were.
    pub fn set_validation_value(&mut self, body: &Value) -> Result<(), PayloadError> {
        let payload = ValidationPayload::try_from(body)?;
        self.set_validation(payload);
        Ok(())
    }

    /// Summarizes the held payload
    ///
    /// A 422 status also loads the validation errors from the payload body.
    /// Any other status leaves the fields untouched. Without a payload the
    /// summary has no status and carries the fallback message.
    pub fn parse(&mut self) -> ErrorSummary {
        let (status, validation) = match &self.payload {
            Some(payload) => {
                let (status, data) = payload.resolve();
                let validation = if status == Some(VALIDATION_STATUS) {
                    Some(
                        data.ok_or(PayloadError::MissingErrors)
                            .and_then(ValidationPayload::try_from),
                    )
                } else {
                    None
                };
                (status, validation)
            }
            None => (None, None),
        };

        match validation {
            Some(Ok(payload)) => self.set_validation(payload),
            Some(Err(err)) => warn!(error = %err, "ignoring unreadable validation body"),
            None => {}
        }

        let summary = ErrorSummary {
            status,
            message: self.catalog.lookup(status).to_string(),
        };
        debug!(status = ?summary.status, message = %summary.message, "parsed error payload");
        summary
    }

    /// Loads the store and parses it in one step
    pub fn set_and_parse(&mut self, errors: impl Into<ErrorInput>) -> ErrorSummary {
        self.set_all(errors).parse()
    }

    /// Merges field errors into the current ones, overwriting equal keys
    pub fn add(&mut self, fields: impl IntoIterator<Item = (String, FieldErrors)>) {
        self.fields.extend(fields);
    }

    /// Returns true if any field has errors
    pub fn any(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Errors of `field` when it is present, every field otherwise
    pub fn get(&self, field: Option<&str>) -> FieldLookup<'_> {
        match field.and_then(|name| self.fields.get(name)) {
            Some(errors) => FieldLookup::Field(errors),
            None => FieldLookup::All(&self.fields),
        }
    }

    /// First error message of `field`
    ///
    /// `None` when no field is given, the field is absent, or its list is empty.
    pub fn get_first(&self, field: Option<&str>) -> Option<&str> {
        self.fields.get(field?).and_then(FieldErrors::first)
    }

    /// Removes one field, or resets the whole state when no field is given
    pub fn clear(&mut self, field: Option<&str>) {
        if let Some(name) = field {
            self.fields.remove(name);
            return;
        }

        self.fields.clear();
        self.payload = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_messages, DEFAULT_FALLBACK_MESSAGE};
    use serde_json::json;

    fn email_errors() -> FieldErrorMap {
        let mut fields = FieldErrorMap::new();
        fields.insert(
            "email".to_string(),
            FieldErrors::from(vec!["The email field is required."]),
        );
        fields
    }

    fn one_two() -> FieldErrorMap {
        let mut fields = FieldErrorMap::new();
        fields.insert("one".to_string(), FieldErrors::from("thing"));
        fields.insert("two".to_string(), FieldErrors::from("things"));
        fields
    }

    #[test]
    fn test_new_store_defaults() {
        let errors = ErrorStore::new();
        assert!(errors.fields().is_empty());
        assert!(errors.payload().is_none());
        assert_eq!(errors.catalog().messages(), &default_messages());
        assert_eq!(errors.catalog().fallback_message(), DEFAULT_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_custom_messages() {
        let mut messages = BTreeMap::new();
        messages.insert(404, "Whoops, couldn't find that!".to_string());
        messages.insert(422, "Uh oh, some fields are missing!".to_string());
        let errors = ErrorStore::with_messages(
            Some(messages.clone()),
            Some("Oh no! An error occurred.".to_string()),
        );
        assert!(errors.fields().is_empty());
        assert_eq!(errors.catalog().messages(), &messages);
        assert_eq!(errors.catalog().fallback_message(), "Oh no! An error occurred.");
    }

    #[test]
    fn test_set_all_fields() {
        let mut errors = ErrorStore::new();
        errors.set_all(email_errors());
        assert_eq!(errors.get(None), FieldLookup::All(&email_errors()));
    }

    #[test]
    fn test_set_all_payload_replaces_fields() {
        let mut errors = ErrorStore::new();
        errors.set_all(email_errors());
        errors.set_all(ErrorPayload::direct(Some(500), None));
        assert!(!errors.any());
        assert_eq!(errors.payload(), Some(&ErrorPayload::direct(Some(500), None)));
    }

    #[test]
    fn test_set_validation() {
        let mut errors = ErrorStore::new();
        errors.set_validation(email_errors());
        assert_eq!(errors.fields(), &email_errors());
    }

    #[test]
    fn test_set_validation_value() {
        let mut errors = ErrorStore::new();
        errors
            .set_validation_value(&json!({"errors": {"email": ["The email field is required."]}}))
            .unwrap();
        assert_eq!(errors.fields(), &email_errors());
    }

    #[test]
    fn test_set_validation_value_without_errors_keeps_fields() {
        let mut errors = ErrorStore::new();
        errors.set_all(one_two());
        let result = errors.set_validation_value(&json!({"message": "invalid"}));
        assert_eq!(result, Err(PayloadError::MissingErrors));
        assert_eq!(errors.fields(), &one_two());
    }

    #[test]
    fn test_parse_non_validation_status() {
        let mut errors = ErrorStore::new();
        let payload = ErrorPayload::response(Some(401), None);
        errors.set_all(payload.clone());

        let summary = errors.parse();

        assert_eq!(errors.payload(), Some(&payload));
        assert!(errors.fields().is_empty());
        assert_eq!(
            summary,
            ErrorSummary {
                status: Some(401),
                message: "Not Authenticated: Sorry, you have to be logged in to access this!"
                    .to_string(),
            }
        );
    }

    #[test]
    fn test_parse_non_validation_status_keeps_added_fields() {
        let mut errors = ErrorStore::new();
        errors.set_all(ErrorPayload::response(Some(401), None));
        errors.add([(
            "name".to_string(),
            FieldErrors::from(vec!["The name field is required."]),
        )]);
        assert!(errors.payload().is_some());

        let summary = errors.parse();

        assert_eq!(
            summary.message,
            "Not Authenticated: Sorry, you have to be logged in to access this!"
        );
        assert!(errors.has("name"));
        assert_eq!(errors.fields().len(), 1);
        assert_eq!(errors.payload(), Some(&ErrorPayload::response(Some(401), None)));
    }

    #[test]
    fn test_set_all_payload_leaves_any_false() {
        let mut errors = ErrorStore::new();
        errors.set_all(ErrorPayload::response(Some(401), None));
        assert!(!errors.any());
        assert!(errors.payload().is_some());
        assert_eq!(errors.get(None), FieldLookup::All(&FieldErrorMap::new()));
    }

    #[test]
    fn test_parse_validation_status() {
        let mut errors = ErrorStore::new();
        errors.set_all(ErrorPayload::response(
            Some(422),
            Some(json!({"errors": {"email": ["Email is required."]}})),
        ));

        let summary = errors.parse();

        assert_eq!(
            errors.get(Some("email")),
            FieldLookup::Field(&FieldErrors::from(vec!["Email is required."]))
        );
        assert_eq!(errors.fields().len(), 1);
        assert!(summary.is_validation());
        assert_eq!(summary.message, "Validation Error");
    }

    #[test]
    fn test_parse_direct_server_error() {
        let mut errors = ErrorStore::new();
        errors.set_all(ErrorPayload::direct(Some(500), None));

        let summary = errors.parse();

        assert_eq!(summary.status, Some(500));
        assert_eq!(summary.message, "Server Error: Please contact the support team.");
    }

    #[test]
    fn test_parse_empty_store() {
        let mut errors = ErrorStore::new();
        let summary = errors.parse();
        assert_eq!(summary.status, None);
        assert_eq!(summary.message, DEFAULT_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_parse_unknown_status_uses_fallback() {
        let mut errors = ErrorStore::new();
        let summary = errors.set_and_parse(ErrorPayload::direct(Some(418), None));
        assert_eq!(summary.status, Some(418));
        assert_eq!(summary.message, DEFAULT_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_parse_validation_without_errors_is_a_no_op() {
        let mut errors = ErrorStore::new();
        let summary = errors.set_and_parse(ErrorPayload::response(
            Some(422),
            Some(json!({"message": "The given data was invalid."})),
        ));
        assert_eq!(summary.message, "Validation Error");
        assert!(!errors.any());

        let summary = errors.set_and_parse(ErrorPayload::direct(Some(422), None));
        assert_eq!(summary.status, Some(422));
        assert!(!errors.any());
    }

    #[test]
    fn test_parse_twice_after_validation() {
        let mut errors = ErrorStore::new();
        errors.set_and_parse(ErrorPayload::response(
            Some(422),
            Some(json!({"errors": {"email": "Email is required."}})),
        ));

        // The payload was consumed into field errors
        let summary = errors.parse();
        assert_eq!(summary.status, None);
        assert_eq!(summary.message, DEFAULT_FALLBACK_MESSAGE);
        assert!(errors.has("email"));
    }

    #[test]
    fn test_parse_uses_custom_catalog() {
        let mut messages = BTreeMap::new();
        messages.insert(404, "Whoops, couldn't find that!".to_string());
        let mut errors = ErrorStore::with_messages(Some(messages), None);

        let summary = errors.set_and_parse(ErrorPayload::response(Some(404), None));
        assert_eq!(summary.message, "Whoops, couldn't find that!");

        let summary = errors.set_and_parse(ErrorPayload::response(Some(500), None));
        assert_eq!(summary.message, DEFAULT_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_set_and_parse_from_http_response() {
        let response = http::Response::builder()
            .status(422)
            .body(json!({"errors": {"name": ["The name field is required."]}}))
            .unwrap();

        let mut errors = ErrorStore::new();
        let summary = errors.set_and_parse(response);

        assert!(summary.is_validation());
        assert_eq!(errors.get_first(Some("name")), Some("The name field is required."));
    }

    #[test]
    fn test_add_merges() {
        let mut errors = ErrorStore::new();
        errors.set_all(email_errors());

        let mut new_error = FieldErrorMap::new();
        new_error.insert(
            "name".to_string(),
            FieldErrors::from(vec!["The name field is required."]),
        );
        errors.add(new_error.clone());

        let mut expected = email_errors();
        expected.extend(new_error);
        assert_eq!(errors.fields(), &expected);
    }

    #[test]
    fn test_add_overwrites_existing_key() {
        let mut errors = ErrorStore::new();
        errors.set_all(one_two());
        errors.add([("two".to_string(), FieldErrors::from("replaced"))]);
        assert_eq!(errors.get_first(Some("two")), Some("replaced"));
        assert_eq!(errors.get_first(Some("one")), Some("thing"));
    }

    #[test]
    fn test_any() {
        let mut errors = ErrorStore::new();
        assert!(!errors.any());

        errors.set_validation(email_errors());
        assert!(errors.any());

        errors.set_all(FieldErrorMap::new());
        assert!(!errors.any());
    }

    #[test]
    fn test_has() {
        let mut errors = ErrorStore::new();
        errors.set_validation(email_errors());
        assert!(errors.has("email"));
        assert!(!errors.has("name"));
    }

    #[test]
    fn test_get_field() {
        let mut errors = ErrorStore::new();
        errors.set_validation(email_errors());
        assert_eq!(
            errors.get(Some("email")),
            FieldLookup::Field(&FieldErrors::from(vec!["The email field is required."]))
        );
    }

    #[test]
    fn test_get_without_field_returns_all() {
        let mut errors = ErrorStore::new();
        errors.set_validation(email_errors());
        assert_eq!(errors.get(None), FieldLookup::All(&email_errors()));
        assert_eq!(errors.get(Some("missing")), FieldLookup::All(&email_errors()));
    }

    #[test]
    fn test_get_first() {
        let mut errors = ErrorStore::new();
        errors.set_validation(email_errors());
        assert_eq!(errors.get_first(Some("email")), Some("The email field is required."));
        assert_eq!(errors.get_first(Some("missing")), None);
        assert_eq!(errors.get_first(None), None);
    }

    #[test]
    fn test_get_first_single_message() {
        let mut errors = ErrorStore::new();
        let mut fields = FieldErrorMap::new();
        fields.insert("name".to_string(), FieldErrors::from("Please provide a name."));
        errors.set_all(fields);
        assert_eq!(errors.get_first(Some("name")), Some("Please provide a name."));
    }

    #[test]
    fn test_clear_all() {
        let mut errors = ErrorStore::new();
        errors.set_validation(one_two());
        assert_eq!(errors.fields(), &one_two());

        errors.clear(None);
        assert!(errors.fields().is_empty());
    }

    #[test]
    fn test_clear_all_drops_payload() {
        let mut errors = ErrorStore::new();
        errors.set_all(ErrorPayload::direct(Some(404), None));
        errors.clear(None);
        assert!(errors.payload().is_none());
        assert_eq!(errors.parse().status, None);
    }

    #[test]
    fn test_clear_field() {
        let mut errors = ErrorStore::new();
        errors.set_validation(one_two());

        errors.clear(Some("two"));
        let mut expected = FieldErrorMap::new();
        expected.insert("one".to_string(), FieldErrors::from("thing"));
        assert_eq!(errors.fields(), &expected);

        errors.clear(Some("missing"));
        assert_eq!(errors.fields(), &expected);
    }
}
