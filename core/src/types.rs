//! Domain types: classified outcomes, subscriber status and campaign input.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The typed interpretation of one Sendy response body.
///
/// Service-side errors are values here, not `Err`: `NamedError` carries a
/// recognized error message verbatim and `RawBody` carries anything the
/// classifier did not recognize, unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    Success,
    AlreadySubscribed,
    UserNotFound,
    /// Answer to a subscription-status query.
    Status(SubscriptionStatus),
    /// Active subscriber count, verbatim as the service sent it.
    Count(String),
    CampaignCreated { sending: bool },
    NamedError(String),
    RawBody(String),
}

impl Outcome {
    /// True for every variant that reports the operation went through.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Outcome::Success
                | Outcome::Status(_)
                | Outcome::Count(_)
                | Outcome::CampaignCreated { .. }
        )
    }

    /// The subscriber count as an integer, when this is a `Count`.
    pub fn count(&self) -> Option<u64> {
        match self {
            Outcome::Count(raw) => raw.parse().ok(),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Outcome::NamedError(msg) => Some(msg),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::AlreadySubscribed => write!(f, "already subscribed"),
            Outcome::UserNotFound => write!(f, "user not found"),
            Outcome::Status(status) => write!(f, "status: {status}"),
            Outcome::Count(count) => write!(f, "count: {count}"),
            Outcome::CampaignCreated { sending: false } => write!(f, "campaign created"),
            Outcome::CampaignCreated { sending: true } => {
                write!(f, "campaign created and now sending")
            }
            Outcome::NamedError(msg) => write!(f, "error: {msg}"),
            Outcome::RawBody(body) => write!(f, "unrecognized response: {body}"),
        }
    }
}

/// Subscription state of one address on one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    Subscribed,
    Unsubscribed,
    Unconfirmed,
    Bounced,
    #[serde(rename = "Soft bounced")]
    SoftBounced,
    Complained,
}

impl SubscriptionStatus {
    pub const ALL: [SubscriptionStatus; 6] = [
        SubscriptionStatus::Subscribed,
        SubscriptionStatus::Unsubscribed,
        SubscriptionStatus::Unconfirmed,
        SubscriptionStatus::Bounced,
        SubscriptionStatus::SoftBounced,
        SubscriptionStatus::Complained,
    ];

    /// The exact text the service uses for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionStatus::Subscribed => "Subscribed",
            SubscriptionStatus::Unsubscribed => "Unsubscribed",
            SubscriptionStatus::Unconfirmed => "Unconfirmed",
            SubscriptionStatus::Bounced => "Bounced",
            SubscriptionStatus::SoftBounced => "Soft bounced",
            SubscriptionStatus::Complained => "Complained",
        }
    }

    /// Exact, case-sensitive match against the service's status text.
    pub fn from_literal(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == text)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for creating (and optionally sending) a campaign.
///
/// `list_ids` and the other id lists are comma-separated, as the service
/// expects them. `brand_id` is required by the service when the campaign is
/// only saved as a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Campaign {
    pub from_name: String,
    pub from_email: String,
    pub reply_to: String,
    pub title: Option<String>,
    pub subject: String,
    pub plain_text: Option<String>,
    pub html_text: String,
    pub list_ids: Option<String>,
    pub segment_ids: Option<String>,
    pub exclude_list_ids: Option<String>,
    pub exclude_segment_ids: Option<String>,
    pub brand_id: Option<String>,
    pub query_string: Option<String>,
    pub track_opens: Option<u8>,
    pub track_clicks: Option<u8>,
    pub send_campaign: bool,
    pub schedule_date_time: Option<String>,
    pub schedule_timezone: Option<String>,
}

impl Campaign {
    /// Flatten into form fields, omitting unset optional values.
    pub fn into_fields(self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        let mut push = |key: &str, value: String| fields.push((key.to_string(), value));

        push("from_name", self.from_name);
        push("from_email", self.from_email);
        push("reply_to", self.reply_to);
        if let Some(title) = self.title {
            push("title", title);
        }
        push("subject", self.subject);
        if let Some(plain_text) = self.plain_text {
            push("plain_text", plain_text);
        }
        push("html_text", self.html_text);

        let optional = [
            ("list_ids", self.list_ids),
            ("segment_ids", self.segment_ids),
            ("exclude_list_ids", self.exclude_list_ids),
            ("exclude_segment_ids", self.exclude_segment_ids),
            ("brand_id", self.brand_id),
            ("query_string", self.query_string),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                push(key, value);
            }
        }
        if let Some(track) = self.track_opens {
            push("track_opens", track.to_string());
        }
        if let Some(track) = self.track_clicks {
            push("track_clicks", track.to_string());
        }
        push("send_campaign", if self.send_campaign { "1" } else { "0" }.to_string());
        if let Some(when) = self.schedule_date_time {
            push("schedule_date_time", when);
        }
        if let Some(tz) = self.schedule_timezone {
            push("schedule_timezone", tz);
        }
        fields
    }
}
