//! Error types for the request core.
//!
//! # Design
//! Failures fall into four groups. `BuildError` covers everything the resolver
//! rejects before a request exists. `RequestError` is the single shape for
//! both transport failures (code 500) and non-success statuses (the status
//! code). A JSON body that fails to parse on a successful status is
//! `Error::Payload`. `Error` ties the three together so `?` works across
//! resolve and dispatch.

use std::error::Error as StdError;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::response::ResponseData;

/// Code reported for failures that happened before a status line arrived.
pub const TRANSPORT_FAILURE_CODE: u16 = 500;

/// Errors raised while resolving an endpoint and parameters into a request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("missing value for url placeholder :{0}")]
    MissingParameter(String),

    #[error("url placeholder :{name} must be a string, number or boolean, got {kind}")]
    InvalidParameterType { name: String, kind: &'static str },

    #[error("unknown http method: {0}")]
    UnknownMethod(String),

    #[error("invalid request url {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure reported by a transport before any response was obtained.
#[derive(Debug)]
pub struct TransportError(Box<dyn StdError + Send + Sync>);

impl TransportError {
    pub fn new(e: impl StdError + Send + Sync + 'static) -> Self {
        Self(Box::new(e))
    }

    pub fn msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self(message.into())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.0)
    }
}

/// Normalized failure of a dispatched request.
///
/// `code` is the final HTTP status, or [`TRANSPORT_FAILURE_CODE`] when the
/// transport itself failed. Fields are read-only once constructed.
#[derive(Debug, Error)]
#[error("{message} ({code})")]
pub struct RequestError {
    code: u16,
    message: String,
    headers: Vec<(String, String)>,
    documentation_url: Option<String>,
    errors: Vec<Value>,
    data: Option<ResponseData>,
    #[source]
    source: Option<TransportError>,
}

impl RequestError {
    pub(crate) fn transport(source: TransportError) -> Self {
        Self {
            code: TRANSPORT_FAILURE_CODE,
            message: source.to_string(),
            headers: Vec::new(),
            documentation_url: None,
            errors: Vec::new(),
            data: None,
            source: Some(source),
        }
    }

    pub(crate) fn status(
        code: u16,
        message: String,
        headers: Vec<(String, String)>,
        data: Option<ResponseData>,
    ) -> Self {
        let mut documentation_url = None;
        let mut errors = Vec::new();
        if let Some(ResponseData::Json(Value::Object(body))) = &data {
            documentation_url = body
                .get("documentation_url")
                .and_then(Value::as_str)
                .map(str::to_string);
            if let Some(Value::Array(items)) = body.get("errors") {
                errors = items.clone();
            }
        }
        Self {
            code,
            message,
            headers,
            documentation_url,
            errors,
            data,
            source: None,
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        crate::http::find_header(&self.headers, name)
    }

    pub fn documentation_url(&self) -> Option<&str> {
        self.documentation_url.as_deref()
    }

    /// Entries of the `errors` array of a JSON error body.
    pub fn errors(&self) -> &[Value] {
        &self.errors
    }

    /// The decoded error body, if the response carried one.
    pub fn data(&self) -> Option<&ResponseData> {
        self.data.as_ref()
    }

    pub fn is_transport(&self) -> bool {
        self.source.is_some()
    }
}

/// Any failure of a single call through the request core.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("invalid JSON in {status} response body: {source}")]
    Payload {
        status: u16,
        source: serde_json::Error,
    },
}

impl Error {
    /// The status-or-sentinel code for dispatch failures; `None` for build
    /// errors and payload errors.
    pub fn code(&self) -> Option<u16> {
        match self {
            Error::Request(e) => Some(e.code()),
            _ => None,
        }
    }

    pub fn as_request(&self) -> Option<&RequestError> {
        match self {
            Error::Request(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_keeps_message_and_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = RequestError::transport(TransportError::new(io));
        assert_eq!(err.code(), 500);
        assert_eq!(err.message(), "connection refused");
        assert!(err.is_transport());
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn status_error_lifts_github_error_fields() {
        let body = serde_json::json!({
            "message": "Validation Failed",
            "documentation_url": "https://docs.example.com/issues",
            "errors": [{"resource": "Issue", "field": "title", "code": "missing_field"}]
        });
        let err = RequestError::status(
            422,
            "Validation Failed".to_string(),
            Vec::new(),
            Some(ResponseData::Json(body)),
        );
        assert_eq!(err.code(), 422);
        assert_eq!(err.documentation_url(), Some("https://docs.example.com/issues"));
        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.errors()[0]["field"], "title");
        assert!(!err.is_transport());
    }

    #[test]
    fn display_includes_code() {
        let err = RequestError::status(404, "Not Found".to_string(), Vec::new(), None);
        assert_eq!(err.to_string(), "Not Found (404)");
        let err = Error::from(err);
        assert_eq!(err.code(), Some(404));
        assert_eq!(Error::from(BuildError::UnknownMethod("X".into())).code(), None);
    }
}
