//! One-call operations: build, execute through a `Transport`, classify.

use std::fmt;

use crate::client::SendyClient;
use crate::config::Config;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::transport::Transport;
use crate::types::{Campaign, Outcome};

/// A configured client bound to a transport.
///
/// Holds no mutable state, so one instance can serve concurrent callers.
/// Every call reports its own result; nothing is remembered between calls.
pub struct Sendy {
    client: SendyClient,
    transport: Box<dyn Transport>,
}

impl Sendy {
    /// Use the ureq transport selected by `config.transport_mode`.
    #[cfg(feature = "ureq")]
    pub fn new(config: Config) -> Self {
        let transport = crate::transport::for_config(&config);
        Self {
            client: SendyClient::new(config),
            transport,
        }
    }

    pub fn with_transport(config: Config, transport: impl Transport + 'static) -> Self {
        Self {
            client: SendyClient::new(config),
            transport: Box::new(transport),
        }
    }

    pub fn client(&self) -> &SendyClient {
        &self.client
    }

    pub fn subscribe<I, K, V>(
        &self,
        email: &str,
        custom_fields: I,
        list_id: Option<&str>,
    ) -> Result<Outcome, ApiError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.execute(self.client.build_subscribe(email, custom_fields, list_id))
    }

    pub fn unsubscribe(&self, email: &str, list_id: Option<&str>) -> Result<Outcome, ApiError> {
        self.execute(self.client.build_unsubscribe(email, list_id))
    }

    /// Remove `email` from the list entirely (not just unsubscribe it).
    pub fn delete(&self, email: &str, list_id: Option<&str>) -> Result<Outcome, ApiError> {
        self.execute(self.client.build_delete(email, list_id))
    }

    pub fn subscription_status(&self, email: &str, list_id: Option<&str>) -> Result<Outcome, ApiError> {
        self.execute(self.client.build_subscription_status(email, list_id))
    }

    pub fn active_subscriber_count(&self, list_id: Option<&str>) -> Result<Outcome, ApiError> {
        self.execute(self.client.build_active_subscriber_count(list_id))
    }

    pub fn create_campaign<I, K, V>(&self, fields: I) -> Result<Outcome, ApiError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.execute(self.client.build_create_campaign(fields))
    }

    pub fn send_campaign(&self, campaign: Campaign) -> Result<Outcome, ApiError> {
        self.execute(self.client.build_campaign(campaign))
    }

    /// Execute a request built by `client()`.
    ///
    /// Transport failures return early and never reach the classifier.
    pub fn execute(&self, request: HttpRequest) -> Result<Outcome, ApiError> {
        let HttpRequest {
            operation,
            url,
            fields,
        } = request;
        let response = self.transport.post(&url, &fields).inspect_err(|e| {
            log::debug!("{operation} to {url} failed: {e}");
        })?;
        self.client.parse(operation, response)
    }
}

impl fmt::Debug for Sendy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sendy").field("client", &self.client).finish_non_exhaustive()
    }
}
