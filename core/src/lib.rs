//! Synchronous client core for the Sendy email-marketing API.
//!
//! # Overview
//! Sendy answers its subscriber and campaign endpoints with loosely
//! formatted text: a bare `true`, an English error sentence, a status word,
//! or, on older installations, a small HTML page. This crate builds the form
//! POSTs for the six operations and classifies whatever comes back into a
//! typed `Outcome`.
//!
//! # Design
//! - `SendyClient` is stateless apart from its immutable `Config`; each
//!   operation has a `build_*` method producing an `HttpRequest`, and one
//!   `parse` step consuming the `HttpResponse` (host-does-IO).
//! - `Sendy` pairs a `SendyClient` with a `Transport` for one-call use.
//!   The ureq transports (`DirectHttpTransport`, `CurlTransport`) are behind
//!   the default `ureq` feature.
//! - `ResponseFormat` selects plain-text or legacy HTML classification.
//! - Service errors are `Outcome` values; only transport failures and
//!   non-2xx statuses are `ApiError`s.

pub mod classify;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod sendy;
pub mod transport;
pub mod types;

pub use classify::ResponseFormat;
pub use client::SendyClient;
pub use config::{Config, TransportMode, TransportOptions};
pub use endpoint::{resolve_list_id, Operation};
pub use error::{ApiError, ConfigError};
pub use http::{HttpRequest, HttpResponse};
pub use sendy::Sendy;
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::{CurlTransport, DirectHttpTransport};
pub use types::{Campaign, Outcome, SubscriptionStatus};
