//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Every Sendy endpoint is a form-encoded POST, so a request is fully
//! described by its URL and an ordered list of form fields. The core builds
//! `HttpRequest` values and classifies `HttpResponse` values; executing the
//! round-trip belongs to a `Transport` (or to a foreign host through the FFI
//! crate). URL encoding of the fields is the executor's job.

use crate::endpoint::Operation;

/// A form POST described as plain data.
///
/// Field order is preserved exactly as assembled; keys are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub operation: Operation,
    pub url: String,
    pub fields: Vec<(String, String)>,
}

impl HttpRequest {
    /// Value of the form field named `key`, if present.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
