//! Operation names, their fixed endpoint paths, and list-id resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The six actions the Sendy API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Subscribe,
    Unsubscribe,
    Delete,
    SubscriptionStatus,
    ActiveSubscriberCount,
    CreateCampaign,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Subscribe,
        Operation::Unsubscribe,
        Operation::Delete,
        Operation::SubscriptionStatus,
        Operation::ActiveSubscriberCount,
        Operation::CreateCampaign,
    ];

    /// Path relative to the installation's base URL.
    pub fn path(self) -> &'static str {
        match self {
            Operation::Subscribe => "/subscribe",
            Operation::Unsubscribe => "/unsubscribe",
            Operation::Delete => "/api/subscribers/delete.php",
            Operation::SubscriptionStatus => "/api/subscribers/subscription-status.php",
            Operation::ActiveSubscriberCount => "/api/subscribers/active-subscriber-count.php",
            Operation::CreateCampaign => "/api/campaigns/create.php",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Subscribe => "subscribe",
            Operation::Unsubscribe => "unsubscribe",
            Operation::Delete => "delete",
            Operation::SubscriptionStatus => "subscription_status",
            Operation::ActiveSubscriberCount => "active_subscriber_count",
            Operation::CreateCampaign => "create_campaign",
        }
    }

    /// Join `base_url` with this operation's path. The base URL is not
    /// validated; a malformed one surfaces later as a transport error.
    pub fn resolve(self, base_url: &str) -> String {
        format!("{}{}", base_url, self.path())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| format!("unknown operation: {s}"))
    }
}

/// Pick the list id for a per-subscriber call.
///
/// An explicit, non-empty id wins; otherwise the configured default;
/// otherwise an empty string, which the service rejects with its own error.
pub fn resolve_list_id<'a>(explicit: Option<&'a str>, default: Option<&'a str>) -> &'a str {
    explicit
        .filter(|id| !id.is_empty())
        .or(default)
        .unwrap_or("")
}
