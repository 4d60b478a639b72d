//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Enum values coming *from* C are taken
//! as `u32` and checked here, since an out-of-range discriminant in a Rust
//! enum is undefined behaviour. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use sendy_core::{ApiError, HttpRequest, Operation, Outcome, ResponseFormat};

/// Opaque handle to a `SendyClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiSendyClient {
    pub(crate) inner: sendy_core::SendyClient,
}

/// Copy `s` into a C string owned by the caller.
///
/// Interior NUL bytes cannot be represented and are dropped.
pub(crate) fn c_string(s: impl Into<String>) -> *mut c_char {
    CString::new(s.into())
        .unwrap_or_else(|e| {
            let mut bytes = e.into_vec();
            bytes.retain(|&b| b != 0);
            CString::new(bytes).unwrap_or_default()
        })
        .into_raw()
}

/// Borrow a C string argument. `None` for null or invalid UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
pub(crate) unsafe fn str_arg<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Operation as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiOperation {
    Subscribe = 0,
    Unsubscribe = 1,
    Delete = 2,
    SubscriptionStatus = 3,
    ActiveSubscriberCount = 4,
    CreateCampaign = 5,
}

impl From<Operation> for FfiOperation {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Subscribe => FfiOperation::Subscribe,
            Operation::Unsubscribe => FfiOperation::Unsubscribe,
            Operation::Delete => FfiOperation::Delete,
            Operation::SubscriptionStatus => FfiOperation::SubscriptionStatus,
            Operation::ActiveSubscriberCount => FfiOperation::ActiveSubscriberCount,
            Operation::CreateCampaign => FfiOperation::CreateCampaign,
        }
    }
}

/// Map a raw `FfiOperation` discriminant back to an `Operation`.
pub(crate) fn operation_from_raw(raw: u32) -> Option<Operation> {
    Operation::ALL.get(raw as usize).copied()
}

/// Map a raw response format (0 = plain text, 1 = HTML).
pub(crate) fn format_from_raw(raw: u32) -> Option<ResponseFormat> {
    match raw {
        0 => Some(ResponseFormat::PlainText),
        1 => Some(ResponseFormat::Html),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// One form field as a key-value pair of C strings, owned by this library.
#[repr(C)]
pub struct FfiField {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// One form field supplied by the C caller. Read, never freed.
#[repr(C)]
pub struct FfiFieldInput {
    pub key: *const c_char,
    pub value: *const c_char,
}

/// Read `len` caller-supplied fields. `None` if any key or value is null
/// or not UTF-8.
///
/// # Safety
/// `fields` must be null (with `len == 0`) or point to `len` valid entries.
pub(crate) unsafe fn fields_arg(
    fields: *const FfiFieldInput,
    len: u32,
) -> Option<Vec<(String, String)>> {
    if fields.is_null() {
        return (len == 0).then(Vec::new);
    }
    let entries = unsafe { std::slice::from_raw_parts(fields, len as usize) };
    entries
        .iter()
        .map(|f| {
            let key = unsafe { str_arg(f.key) }?;
            let value = unsafe { str_arg(f.value) }?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// A form POST described as C-compatible plain data.
///
/// Built by `sendy_build_*` functions. The C caller sends `fields` as an
/// `application/x-www-form-urlencoded` POST to `url` and passes the
/// response back through `sendy_parse`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub operation: FfiOperation,
    pub url: *mut c_char,
    pub fields: *mut FfiField,
    pub fields_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let fields_len = req.fields.len() as u32;
        let fields = if req.fields.is_empty() {
            std::ptr::null_mut()
        } else {
            // Boxed slice: capacity equals length, so the free side can
            // rebuild it from (ptr, len).
            let boxed: Box<[FfiField]> = req
                .fields
                .into_iter()
                .map(|(k, v)| FfiField {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(boxed) as *mut FfiField
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            operation: req.operation.into(),
            url: c_string(req.url),
            fields,
            fields_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing the request,
/// then passes a pointer to `sendy_parse`. The FFI layer reads but does not
/// free these fields. A null `body` is read as empty.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Http = 1,
    Transport = 2,
    Config = 3,
    Panic = 4,
    NullArg = 5,
    InvalidArg = 6,
}

/// Which `Outcome` variant an `FfiResult` carries.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiOutcomeKind {
    /// No outcome: the call failed, see `error_code`.
    None = 0,
    Success = 1,
    AlreadySubscribed = 2,
    UserNotFound = 3,
    /// `text` holds the status literal, e.g. `"Soft bounced"`.
    Status = 4,
    /// `text` holds the count as sent.
    Count = 5,
    /// `sending` tells whether the campaign started sending.
    CampaignCreated = 6,
    /// `text` holds the service's error message.
    NamedError = 7,
    /// `text` holds the unrecognized body.
    RawBody = 8,
}

/// Result envelope for `sendy_parse`.
///
/// On success `error_code` is `Ok`, `error_message` is null and
/// `outcome_kind` names the classified outcome; `text` is set for the kinds
/// that carry one and null otherwise. On failure `error_code` describes the
/// category, `error_message` is a human-readable C string, and
/// `outcome_kind` is `None`.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub outcome_kind: FfiOutcomeKind,
    pub text: *mut c_char,
    pub sending: bool,
}

impl FfiResult {
    fn boxed(result: FfiResult) -> *mut Self {
        Box::into_raw(Box::new(result))
    }

    fn error(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Self::boxed(FfiResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            outcome_kind: FfiOutcomeKind::None,
            text: std::ptr::null_mut(),
            sending: false,
        })
    }

    /// Build a success result from a classified `Outcome`.
    pub(crate) fn from_outcome(outcome: Outcome, http_status: u16) -> *mut Self {
        let (outcome_kind, text, sending) = match outcome {
            Outcome::Success => (FfiOutcomeKind::Success, None, false),
            Outcome::AlreadySubscribed => (FfiOutcomeKind::AlreadySubscribed, None, false),
            Outcome::UserNotFound => (FfiOutcomeKind::UserNotFound, None, false),
            Outcome::Status(status) => (FfiOutcomeKind::Status, Some(status.as_str().to_string()), false),
            Outcome::Count(count) => (FfiOutcomeKind::Count, Some(count), false),
            Outcome::CampaignCreated { sending } => (FfiOutcomeKind::CampaignCreated, None, sending),
            Outcome::NamedError(msg) => (FfiOutcomeKind::NamedError, Some(msg), false),
            Outcome::RawBody(body) => (FfiOutcomeKind::RawBody, Some(body), false),
        };
        Self::boxed(FfiResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status,
            outcome_kind,
            text: text.map_or(std::ptr::null_mut(), c_string),
            sending,
        })
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (code, status) = match &err {
            ApiError::HttpStatus { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
            ApiError::Config(_) => (FfiErrorCode::Config, 0),
        };
        Self::error(code, status, err.to_string())
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    /// Build an error result for an out-of-range or non-UTF-8 argument.
    pub(crate) fn invalid_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::InvalidArg, 0, format!("invalid argument: {name}"))
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg.to_string())
    }
}
