use crate::error::PayloadError;
use crate::store::fields::{field_errors_from_value, json_kind, FieldErrorMap};
use serde_json::{Map, Value};

/// HTTP status that asks the store to read per-field validation errors
pub const VALIDATION_STATUS: u16 = 422;

/// A failed response as handed over by the caller
///
/// HTTP clients report failures in one of two shapes: an error object that
/// wraps the response (`{"response": {"status": 404, "data": ...}}`), or the
/// response itself (`{"status": 404, "data": ...}`). Both carry the same two
/// parts, which [`ErrorPayload::resolve`] hands back uniformly.
///
/// # Examples
///
/// ```
/// use snag::store::ErrorPayload;
/// use serde_json::json;
///
/// let wrapped = ErrorPayload::response(Some(404), None);
/// let direct = ErrorPayload::direct(Some(500), Some(json!({"message": "boom"})));
///
/// assert_eq!(wrapped.resolve(), (Some(404), None));
/// assert_eq!(direct.status(), Some(500));
/// assert_eq!(direct.data(), Some(&json!({"message": "boom"})));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorPayload {
    /// Error object wrapping the server response
    Response {
        status: Option<u16>,
        data: Option<Value>,
    },
    /// The server response itself
    Direct {
        status: Option<u16>,
        data: Option<Value>,
    },
}

impl ErrorPayload {
    pub fn response(status: Option<u16>, data: Option<Value>) -> Self {
        ErrorPayload::Response { status, data }
    }

    pub fn direct(status: Option<u16>, data: Option<Value>) -> Self {
        ErrorPayload::Direct { status, data }
    }

    /// Returns the status and body regardless of shape
    pub fn resolve(&self) -> (Option<u16>, Option<&Value>) {
        match self {
            ErrorPayload::Response { status, data } | ErrorPayload::Direct { status, data } => {
                (*status, data.as_ref())
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.resolve().0
    }

    pub fn data(&self) -> Option<&Value> {
        self.resolve().1
    }

    /// Returns true when the status asks for validation errors to be read
    pub fn is_validation(&self) -> bool {
        self.status() == Some(VALIDATION_STATUS)
    }

    /// Classifies a JSON object as one of the payload shapes
    ///
    /// Returns `Ok(None)` when the object has neither a `response` key nor
    /// top-level `status`/`data` keys.
    pub fn from_object(object: &Map<String, Value>) -> Result<Option<Self>, PayloadError> {
        if let Some(Value::Object(response)) = object.get("response") {
            let (status, data) = read_parts(response)?;
            return Ok(Some(ErrorPayload::Response { status, data }));
        }
        if object.contains_key("status") || object.contains_key("data") {
            let (status, data) = read_parts(object)?;
            return Ok(Some(ErrorPayload::Direct { status, data }));
        }
        Ok(None)
    }
}

impl From<http::Response<Value>> for ErrorPayload {
    fn from(response: http::Response<Value>) -> Self {
        let status = response.status().as_u16();
        let data = match response.into_body() {
            Value::Null => None,
            body => Some(body),
        };
        ErrorPayload::Direct {
            status: Some(status),
            data,
        }
    }
}

fn read_parts(object: &Map<String, Value>) -> Result<(Option<u16>, Option<Value>), PayloadError> {
    let status = match object.get("status") {
        None | Some(Value::Null) => None,
        Some(Value::Number(number)) => Some(
            number
                .as_u64()
                .and_then(|code| u16::try_from(code).ok())
                .ok_or_else(|| PayloadError::InvalidStatus(number.to_string()))?,
        ),
        Some(Value::String(text))
            if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) =>
        {
            Some(
                text.parse::<u16>()
                    .map_err(|_| PayloadError::InvalidStatus(text.clone()))?,
            )
        }
        Some(other) => return Err(PayloadError::InvalidStatus(other.to_string())),
    };
    let data = match object.get("data") {
        None | Some(Value::Null) => None,
        Some(data) => Some(data.clone()),
    };
    Ok((status, data))
}

/// Body of a validation failure: `{"errors": {field: message(s)}}`
///
/// # Examples
///
/// ```
/// use snag::store::ValidationPayload;
/// use serde_json::json;
///
/// let body = json!({"errors": {"email": ["Email is required."]}});
/// let payload = ValidationPayload::try_from(&body)?;
/// assert!(payload.errors.contains_key("email"));
///
/// assert!(ValidationPayload::try_from(&json!({"message": "nope"})).is_err());
/// # Ok::<(), snag::error::PayloadError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationPayload {
    pub errors: FieldErrorMap,
}

impl ValidationPayload {
    pub fn new(errors: FieldErrorMap) -> Self {
        Self { errors }
    }
}

impl TryFrom<&Value> for ValidationPayload {
    type Error = PayloadError;

    fn try_from(body: &Value) -> Result<Self, Self::Error> {
        match body.get("errors") {
            None | Some(Value::Null) => Err(PayloadError::MissingErrors),
            Some(errors) => Ok(Self::new(field_errors_from_value(errors)?)),
        }
    }
}

impl From<FieldErrorMap> for ValidationPayload {
    fn from(errors: FieldErrorMap) -> Self {
        Self::new(errors)
    }
}

/// Anything the store can be loaded with
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorInput {
    /// Ready-made per-field errors
    Fields(FieldErrorMap),
    /// A failed response still to be parsed
    Payload(ErrorPayload),
}

impl From<FieldErrorMap> for ErrorInput {
    fn from(fields: FieldErrorMap) -> Self {
        ErrorInput::Fields(fields)
    }
}

impl From<ErrorPayload> for ErrorInput {
    fn from(payload: ErrorPayload) -> Self {
        ErrorInput::Payload(payload)
    }
}

impl From<http::Response<Value>> for ErrorInput {
    fn from(response: http::Response<Value>) -> Self {
        ErrorInput::Payload(response.into())
    }
}

impl TryFrom<&Value> for ErrorInput {
    type Error = PayloadError;

    /// An object with a `response` key, or with top-level `status`/`data`,
    /// is a payload. An object whose `errors` value is an object is a
    /// validation body and yields those errors. Any other object is read as
    /// field errors.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let object = value
            .as_object()
            .ok_or_else(|| PayloadError::NotAnObject(json_kind(value).to_string()))?;
        if let Some(payload) = ErrorPayload::from_object(object)? {
            return Ok(ErrorInput::Payload(payload));
        }
        if let Some(Value::Object(_)) = object.get("errors") {
            let payload = ValidationPayload::try_from(value)?;
            return Ok(ErrorInput::Fields(payload.errors));
        }
        Ok(ErrorInput::Fields(field_errors_from_value(value)?))
    }
}

impl TryFrom<Value> for ErrorInput {
    type Error = PayloadError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        ErrorInput::try_from(&value)
    }
}
