//! C-ABI wrapper around `sendy-core`.
//!
//! # Overview
//! Exposes request building and response classification through
//! `extern "C"` functions, so a host with its own HTTP stack (and a C FFI)
//! can talk to Sendy without reimplementing the classification rules.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - One `sendy_build_*` per operation; a single `sendy_parse` classifies
//!   any response, given the operation the request was built for.
//! - `FfiResult` carries either an error code or an `FfiOutcomeKind` with
//!   its optional text.
//! - The C caller owns all returned pointers and must call the matching
//!   `sendy_free_*` function to release them.

pub mod types;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use sendy_core::{Config, HttpRequest, HttpResponse, SendyClient};

use types::*;

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new client.
///
/// `default_list_id` may be null. `response_format` is 0 for plain text,
/// 1 for legacy HTML. Returns null if `api_key` or `base_url` is null or
/// not UTF-8, if `response_format` is out of range, or on internal panic.
/// The caller must free the returned pointer with `sendy_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn sendy_client_new(
    api_key: *const c_char,
    base_url: *const c_char,
    default_list_id: *const c_char,
    response_format: u32,
) -> *mut FfiSendyClient {
    catch_unwind(|| {
        let (Some(api_key), Some(base_url), Some(format)) = (
            unsafe { str_arg(api_key) },
            unsafe { str_arg(base_url) },
            format_from_raw(response_format),
        ) else {
            return std::ptr::null_mut();
        };
        let mut config = Config::new(api_key, base_url).with_response_format(format);
        if let Some(list) = unsafe { str_arg(default_list_id) } {
            config = config.with_default_list(list);
        }
        Box::into_raw(Box::new(FfiSendyClient {
            inner: SendyClient::new(config),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `sendy_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sendy_client_free(client: *mut FfiSendyClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Shared null/UTF-8 handling for the build functions: `build` runs only if
/// `client` is non-null, and its `None` becomes a null return.
fn build_with(
    client: *const FfiSendyClient,
    build: impl FnOnce(&SendyClient) -> Option<HttpRequest> + std::panic::UnwindSafe,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        build(&client.inner).map_or(std::ptr::null_mut(), FfiHttpRequest::from_core)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a subscribe request.
///
/// `list_id` may be null (use the client's default). `fields` may be null
/// when `fields_len` is 0; otherwise every key and value must be non-null.
/// Returns null if `client` or `email` is null, or any string is not UTF-8.
/// The caller must free the returned pointer with `sendy_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn sendy_build_subscribe(
    client: *const FfiSendyClient,
    email: *const c_char,
    list_id: *const c_char,
    fields: *const FfiFieldInput,
    fields_len: u32,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        let email = unsafe { str_arg(email) }?;
        let custom = unsafe { fields_arg(fields, fields_len) }?;
        Some(c.build_subscribe(email, custom, unsafe { str_arg(list_id) }))
    })
}

/// Build an unsubscribe request. `list_id` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn sendy_build_unsubscribe(
    client: *const FfiSendyClient,
    email: *const c_char,
    list_id: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        let email = unsafe { str_arg(email) }?;
        Some(c.build_unsubscribe(email, unsafe { str_arg(list_id) }))
    })
}

/// Build a delete request. `list_id` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn sendy_build_delete(
    client: *const FfiSendyClient,
    email: *const c_char,
    list_id: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        let email = unsafe { str_arg(email) }?;
        Some(c.build_delete(email, unsafe { str_arg(list_id) }))
    })
}

/// Build a subscription-status request. `list_id` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn sendy_build_subscription_status(
    client: *const FfiSendyClient,
    email: *const c_char,
    list_id: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        let email = unsafe { str_arg(email) }?;
        Some(c.build_subscription_status(email, unsafe { str_arg(list_id) }))
    })
}

/// Build an active-subscriber-count request. `list_id` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn sendy_build_active_subscriber_count(
    client: *const FfiSendyClient,
    list_id: *const c_char,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        Some(c.build_active_subscriber_count(unsafe { str_arg(list_id) }))
    })
}

/// Build a create-campaign request from raw form fields.
///
/// `api_key` and `list_ids` are added when absent from `fields`.
#[unsafe(no_mangle)]
pub extern "C" fn sendy_build_create_campaign(
    client: *const FfiSendyClient,
    fields: *const FfiFieldInput,
    fields_len: u32,
) -> *mut FfiHttpRequest {
    build_with(client, |c| {
        let fields = unsafe { fields_arg(fields, fields_len) }?;
        Some(c.build_create_campaign(fields))
    })
}

// ---------------------------------------------------------------------------
// Parse response
// ---------------------------------------------------------------------------

/// Classify the response to a request built for `operation` (an
/// `FfiOperation` discriminant).
///
/// Always returns a result; free it with `sendy_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn sendy_parse(
    client: *const FfiSendyClient,
    operation: u32,
    response: *const FfiHttpResponse,
) -> *mut FfiResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiResult::null_arg("response");
        }
        let Some(operation) = operation_from_raw(operation) else {
            return FfiResult::invalid_arg("operation");
        };
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        let body = if resp.body.is_null() {
            String::new()
        } else {
            match unsafe { str_arg(resp.body) } {
                Some(body) => body.to_string(),
                None => return FfiResult::invalid_arg("response.body"),
            }
        };
        let core_resp = HttpResponse {
            status: resp.status,
            body,
        };
        match client.inner.parse(operation, core_resp) {
            Ok(outcome) => FfiResult::from_outcome(outcome, resp.status),
            Err(e) => FfiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiResult::panic("panic in sendy_parse"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `sendy_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sendy_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.fields.is_null() && req.fields_len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(req.fields, req.fields_len as usize);
            let fields = unsafe { Box::from_raw(slice) };
            for f in fields.iter() {
                if !f.key.is_null() {
                    drop(unsafe { CString::from_raw(f.key) });
                }
                if !f.value.is_null() {
                    drop(unsafe { CString::from_raw(f.value) });
                }
            }
        }
    });
}

/// Free an `FfiResult` returned by `sendy_parse`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sendy_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.text.is_null() {
            drop(unsafe { CString::from_raw(result.text) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn sendy_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

/// Endpoint path for an `FfiOperation` discriminant, e.g.
/// `"/api/subscribers/delete.php"`. Null if out of range.
/// Free with `sendy_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn sendy_operation_path(operation: u32) -> *mut c_char {
    catch_unwind(|| operation_from_raw(operation).map_or(std::ptr::null_mut(), |op| c_string(op.path())))
        .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::{CStr, CString};

    fn new_client(format: u32) -> *mut FfiSendyClient {
        let key = CString::new("KEY").unwrap();
        let url = CString::new("https://mail.example.com/").unwrap();
        let list = CString::new("L1").unwrap();
        sendy_client_new(key.as_ptr(), url.as_ptr(), list.as_ptr(), format)
    }

    fn read(ptr: *const c_char) -> String {
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
    }

    fn fields_of(req: *mut FfiHttpRequest) -> Vec<(String, String)> {
        let req = unsafe { &*req };
        if req.fields.is_null() {
            return Vec::new();
        }
        unsafe { std::slice::from_raw_parts(req.fields, req.fields_len as usize) }
            .iter()
            .map(|f| (read(f.key), read(f.value)))
            .collect()
    }

    fn parse(client: *const FfiSendyClient, op: FfiOperation, status: u16, body: &str) -> *mut FfiResult {
        let body = CString::new(body).unwrap();
        let resp = FfiHttpResponse {
            status,
            body: body.as_ptr(),
        };
        sendy_parse(client, op as u32, &resp)
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client(0);
        assert!(!client.is_null());
        sendy_client_free(client);
    }

    #[test]
    fn client_new_rejects_null_and_bad_format() {
        let url = CString::new("https://mail.example.com").unwrap();
        assert!(sendy_client_new(std::ptr::null(), url.as_ptr(), std::ptr::null(), 0).is_null());
        assert!(new_client(7).is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        sendy_client_free(std::ptr::null_mut());
    }

    #[test]
    fn build_subscribe_with_custom_fields() {
        let client = new_client(0);
        let email = CString::new("joe@example.com").unwrap();
        let (k, v) = (CString::new("name").unwrap(), CString::new("Joe").unwrap());
        let custom = [FfiFieldInput {
            key: k.as_ptr(),
            value: v.as_ptr(),
        }];
        let req = sendy_build_subscribe(client, email.as_ptr(), std::ptr::null(), custom.as_ptr(), 1);
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert_eq!(req_ref.operation, FfiOperation::Subscribe);
        assert_eq!(read(req_ref.url), "https://mail.example.com/subscribe");
        let pairs = fields_of(req);
        let pairs: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("api_key", "KEY"),
                ("email", "joe@example.com"),
                ("list", "L1"),
                ("boolean", "true"),
                ("name", "Joe"),
            ]
        );

        sendy_free_request(req);
        sendy_client_free(client);
    }

    #[test]
    fn build_subscribe_null_field_value_returns_null() {
        let client = new_client(0);
        let email = CString::new("joe@example.com").unwrap();
        let k = CString::new("name").unwrap();
        let custom = [FfiFieldInput {
            key: k.as_ptr(),
            value: std::ptr::null(),
        }];
        let req = sendy_build_subscribe(client, email.as_ptr(), std::ptr::null(), custom.as_ptr(), 1);
        assert!(req.is_null());
        sendy_client_free(client);
    }

    #[test]
    fn build_delete_explicit_list() {
        let client = new_client(0);
        let email = CString::new("joe@example.com").unwrap();
        let list = CString::new("L2").unwrap();
        let req = sendy_build_delete(client, email.as_ptr(), list.as_ptr());
        let req_ref = unsafe { &*req };
        assert_eq!(read(req_ref.url), "https://mail.example.com/api/subscribers/delete.php");
        assert!(fields_of(req).contains(&("list_id".to_string(), "L2".to_string())));
        sendy_free_request(req);
        sendy_client_free(client);
    }

    #[test]
    fn build_count_and_campaign() {
        let client = new_client(0);
        let req = sendy_build_active_subscriber_count(client, std::ptr::null());
        assert_eq!(unsafe { &*req }.operation, FfiOperation::ActiveSubscriberCount);
        assert_eq!(unsafe { &*req }.fields_len, 2);
        sendy_free_request(req);

        let req = sendy_build_create_campaign(client, std::ptr::null(), 0);
        let pairs = fields_of(req);
        assert!(pairs.contains(&("api_key".to_string(), "KEY".to_string())));
        assert!(pairs.contains(&("list_ids".to_string(), "L1".to_string())));
        sendy_free_request(req);
        sendy_client_free(client);
    }

    #[test]
    fn build_null_client_returns_null() {
        let email = CString::new("a@b.c").unwrap();
        assert!(sendy_build_unsubscribe(std::ptr::null(), email.as_ptr(), std::ptr::null()).is_null());
        assert!(sendy_build_subscription_status(std::ptr::null(), email.as_ptr(), std::ptr::null()).is_null());
    }

    #[test]
    fn parse_plain_success() {
        let client = new_client(0);
        let result = parse(client, FfiOperation::Subscribe, 200, "true");
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(r.error_message.is_null());
        assert_eq!(r.outcome_kind, FfiOutcomeKind::Success);
        assert!(r.text.is_null());
        sendy_free_result(result);
        sendy_client_free(client);
    }

    #[test]
    fn parse_status_carries_literal() {
        let client = new_client(0);
        let result = parse(client, FfiOperation::SubscriptionStatus, 200, "Soft bounced");
        let r = unsafe { &*result };
        assert_eq!(r.outcome_kind, FfiOutcomeKind::Status);
        assert_eq!(read(r.text), "Soft bounced");
        sendy_free_result(result);
        sendy_client_free(client);
    }

    #[test]
    fn parse_named_error_and_campaign() {
        let client = new_client(0);
        let result = parse(client, FfiOperation::Unsubscribe, 200, "Email does not exist.");
        let r = unsafe { &*result };
        assert_eq!(r.outcome_kind, FfiOutcomeKind::NamedError);
        assert_eq!(read(r.text), "Email does not exist.");
        sendy_free_result(result);

        let result = parse(client, FfiOperation::CreateCampaign, 200, "Campaign created and now sending");
        let r = unsafe { &*result };
        assert_eq!(r.outcome_kind, FfiOutcomeKind::CampaignCreated);
        assert!(r.sending);
        sendy_free_result(result);
        sendy_client_free(client);
    }

    #[test]
    fn parse_html_mode() {
        let client = new_client(1);
        let body = "<html><head><title>You're already subscribed!</title></head><body></body></html>";
        let result = parse(client, FfiOperation::Subscribe, 200, body);
        assert_eq!(unsafe { &*result }.outcome_kind, FfiOutcomeKind::AlreadySubscribed);
        sendy_free_result(result);
        sendy_client_free(client);
    }

    #[test]
    fn parse_non_2xx_is_http_error() {
        let client = new_client(0);
        let result = parse(client, FfiOperation::Delete, 404, "Not Found");
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Http);
        assert_eq!(r.http_status, 404);
        assert_eq!(r.outcome_kind, FfiOutcomeKind::None);
        assert!(!r.error_message.is_null());
        sendy_free_result(result);
        sendy_client_free(client);
    }

    #[test]
    fn parse_null_body_is_empty() {
        let client = new_client(0);
        let resp = FfiHttpResponse {
            status: 200,
            body: std::ptr::null(),
        };
        let result = sendy_parse(client, FfiOperation::ActiveSubscriberCount as u32, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.outcome_kind, FfiOutcomeKind::RawBody);
        assert_eq!(read(r.text), "");
        sendy_free_result(result);
        sendy_client_free(client);
    }

    #[test]
    fn parse_bad_arguments() {
        let client = new_client(0);
        let body = CString::new("true").unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = sendy_parse(client, 42, &resp);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::InvalidArg);
        sendy_free_result(result);

        let result = sendy_parse(std::ptr::null(), 0, &resp);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        sendy_free_result(result);

        let result = sendy_parse(client, 0, std::ptr::null());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        sendy_free_result(result);
        sendy_client_free(client);
    }

    #[test]
    fn c_string_drops_interior_nul() {
        let s = c_string("a\0b");
        assert_eq!(read(s), "ab");
        sendy_free_string(s);
    }

    #[test]
    fn operation_paths() {
        let p = sendy_operation_path(FfiOperation::SubscriptionStatus as u32);
        assert_eq!(read(p), "/api/subscribers/subscription-status.php");
        sendy_free_string(p);
        assert!(sendy_operation_path(6).is_null());
    }

    #[test]
    fn free_null_is_safe() {
        sendy_free_request(std::ptr::null_mut());
        sendy_free_result(std::ptr::null_mut());
        sendy_free_string(std::ptr::null_mut());
    }
}
