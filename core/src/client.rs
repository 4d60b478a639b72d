//! Stateless request builder and response classifier for the Sendy API.
//!
//! # Design
//! `SendyClient` holds only its immutable `Config`. Each operation is split
//! into a `build_*` method that produces an `HttpRequest` and a shared
//! `parse` step that turns an `HttpResponse` into an `Outcome`. The caller
//! (a `Transport`, or a foreign host through the FFI crate) executes the
//! round-trip in between, keeping the core deterministic and free of I/O.

use crate::config::Config;
use crate::endpoint::{resolve_list_id, Operation};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Campaign, Outcome};

/// Synchronous, stateless client for the Sendy API.
#[derive(Debug, Clone)]
pub struct SendyClient {
    config: Config,
}

impl SendyClient {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn list_id<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        resolve_list_id(explicit, self.config.default_list_id.as_deref())
    }

    fn request(&self, operation: Operation, fields: Vec<(String, String)>) -> HttpRequest {
        let url = operation.resolve(&self.config.base_url);
        log::debug!("built {operation} request for {url} with {} fields", fields.len());
        HttpRequest {
            operation,
            url,
            fields,
        }
    }

    /// Subscribe `email`, sending `custom_fields` along in the caller's order.
    ///
    /// Custom fields are merged pair by pair, so every value stays under its
    /// own key (`name` included). A custom field that reuses a base key
    /// replaces the base value in place.
    pub fn build_subscribe<I, K, V>(
        &self,
        email: &str,
        custom_fields: I,
        list_id: Option<&str>,
    ) -> HttpRequest
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields = vec![
            field("api_key", &self.config.api_key),
            field("email", email),
            field("list", self.list_id(list_id)),
            field("boolean", "true"),
        ];
        for (key, value) in custom_fields {
            set_field(&mut fields, key.into(), value.into());
        }
        self.request(Operation::Subscribe, fields)
    }

    pub fn build_unsubscribe(&self, email: &str, list_id: Option<&str>) -> HttpRequest {
        let fields = vec![
            field("api_key", &self.config.api_key),
            field("email", email),
            field("list", self.list_id(list_id)),
            field("boolean", "true"),
        ];
        self.request(Operation::Unsubscribe, fields)
    }

    pub fn build_delete(&self, email: &str, list_id: Option<&str>) -> HttpRequest {
        let fields = vec![
            field("api_key", &self.config.api_key),
            field("email", email),
            field("list_id", self.list_id(list_id)),
        ];
        self.request(Operation::Delete, fields)
    }

    pub fn build_subscription_status(&self, email: &str, list_id: Option<&str>) -> HttpRequest {
        let fields = vec![
            field("api_key", &self.config.api_key),
            field("email", email),
            field("list_id", self.list_id(list_id)),
        ];
        self.request(Operation::SubscriptionStatus, fields)
    }

    pub fn build_active_subscriber_count(&self, list_id: Option<&str>) -> HttpRequest {
        let fields = vec![
            field("api_key", &self.config.api_key),
            field("list_id", self.list_id(list_id)),
        ];
        self.request(Operation::ActiveSubscriberCount, fields)
    }

    /// Create a campaign from raw form fields.
    ///
    /// The caller's fields are sent as given, in order and with any repeated
    /// keys kept. `api_key` and `list_ids` are added only when the caller did
    /// not supply them; `list_ids` falls back to the configured default list.
    pub fn build_create_campaign<I, K, V>(&self, campaign_fields: I) -> HttpRequest
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields: Vec<(String, String)> = campaign_fields
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        if !has_field(&fields, "api_key") {
            fields.push(field("api_key", &self.config.api_key));
        }
        if !has_field(&fields, "list_ids") {
            if let Some(default) = &self.config.default_list_id {
                fields.push(field("list_ids", default));
            }
        }
        self.request(Operation::CreateCampaign, fields)
    }

    pub fn build_campaign(&self, campaign: Campaign) -> HttpRequest {
        self.build_create_campaign(campaign.into_fields())
    }

    /// Interpret the response to a request built for `operation`.
    ///
    /// Non-2xx statuses are returned as `ApiError::HttpStatus` without
    /// looking at the body.
    pub fn parse(&self, operation: Operation, response: HttpResponse) -> Result<Outcome, ApiError> {
        if !response.is_success() {
            log::debug!("{operation} returned HTTP {}", response.status);
            return Err(ApiError::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }
        Ok(self.config.response_format.classify(operation, &response.body))
    }
}

fn field(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}

fn has_field(fields: &[(String, String)], key: &str) -> bool {
    fields.iter().any(|(k, _)| k == key)
}

/// Insert or overwrite `key`, keeping the position of an existing entry.
fn set_field(fields: &mut Vec<(String, String)>, key: String, value: String) {
    match fields.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => fields.push((key, value)),
    }
}
