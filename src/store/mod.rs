pub mod error_store;
pub mod fields;
pub mod payload;

pub use error_store::{ErrorStore, ErrorSummary, FieldLookup};
pub use fields::{field_errors_from_value, FieldErrorMap, FieldErrors};
pub use payload::{ErrorInput, ErrorPayload, ValidationPayload, VALIDATION_STATUS};
