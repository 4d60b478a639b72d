//! Plain-text classification.
//!
//! Current Sendy installations answer with a single line: a success literal,
//! a known error sentence, or (from some front ends) an `Error:`-prefixed
//! message. Matching is exact; nothing is trimmed.

use crate::endpoint::Operation;
use crate::types::{Outcome, SubscriptionStatus};

/// Prefix the service and the transport layer both use for error lines.
pub const ERROR_PREFIX: &str = "Error:";

pub const SUBSCRIBE_ERRORS: &[&str] = &[
    "Already subscribed.",
    "Invalid email address.",
    "Invalid list ID.",
    "Some fields are missing.",
    "Email is suppressed.",
];

pub const UNSUBSCRIBE_ERRORS: &[&str] = &[
    "Some fields are missing.",
    "Invalid email address.",
    "Email does not exist.",
];

/// Shared by delete and active-subscriber-count.
pub const SUBSCRIBER_API_ERRORS: &[&str] = &[
    "No data passed",
    "API key not passed",
    "Invalid API key",
    "List ID not passed",
    "List does not exist",
    "Email address not passed",
    "Subscriber does not exist",
];

pub const STATUS_ERRORS: &[&str] = &[
    "No data passed",
    "API key not passed",
    "Invalid API key",
    "Email not passed",
    "List ID not passed",
    "Email does not exist in list",
];

pub const CAMPAIGN_ERRORS: &[&str] = &[
    "No data passed",
    "API key not passed",
    "Invalid API key",
    "From name not passed",
    "From email not passed",
    "Reply to email not passed",
    "Subject not passed",
    "HTML not passed",
    "List or segment ID(s) not passed",
    "One or more list IDs are invalid",
    "One or more segment IDs are invalid",
    "List or segment IDs does not belong to a single brand",
    "Brand ID not passed",
    "Unable to create campaign",
    "Unable to create and send campaign",
    "Unable to calculate totals",
];

pub const CAMPAIGN_CREATED: &str = "Campaign created";
pub const CAMPAIGN_SENDING: &str = "Campaign created and now sending";

/// Error sentences `op` is documented to return.
pub fn known_errors(op: Operation) -> &'static [&'static str] {
    match op {
        Operation::Subscribe => SUBSCRIBE_ERRORS,
        Operation::Unsubscribe => UNSUBSCRIBE_ERRORS,
        Operation::Delete | Operation::ActiveSubscriberCount => SUBSCRIBER_API_ERRORS,
        Operation::SubscriptionStatus => STATUS_ERRORS,
        Operation::CreateCampaign => CAMPAIGN_ERRORS,
    }
}

pub fn classify(op: Operation, body: &str) -> Outcome {
    if let Some(outcome) = success(op, body) {
        return outcome;
    }
    if body.starts_with(ERROR_PREFIX) || known_errors(op).contains(&body) {
        return Outcome::NamedError(body.to_string());
    }
    Outcome::RawBody(body.to_string())
}

fn success(op: Operation, body: &str) -> Option<Outcome> {
    match op {
        // `boolean=true` makes the service answer "true"; older releases sent "1".
        Operation::Subscribe | Operation::Unsubscribe | Operation::Delete => {
            matches!(body, "true" | "1").then_some(Outcome::Success)
        }
        Operation::SubscriptionStatus => SubscriptionStatus::from_literal(body).map(Outcome::Status),
        Operation::ActiveSubscriberCount => {
            let numeric = !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit());
            numeric.then(|| Outcome::Count(body.to_string()))
        }
        Operation::CreateCampaign => match body {
            CAMPAIGN_CREATED => Some(Outcome::CampaignCreated { sending: false }),
            CAMPAIGN_SENDING => Some(Outcome::CampaignCreated { sending: true }),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Operation::Subscribe, "true")]
    #[case(Operation::Subscribe, "1")]
    #[case(Operation::Unsubscribe, "true")]
    #[case(Operation::Delete, "1")]
    fn boolean_markers_are_success(#[case] op: Operation, #[case] body: &str) {
        assert_eq!(classify(op, body), Outcome::Success);
    }

    #[test]
    fn every_known_error_is_named() {
        for op in Operation::ALL {
            for literal in known_errors(op) {
                assert_eq!(
                    classify(op, literal),
                    Outcome::NamedError(literal.to_string()),
                    "{op}: {literal}"
                );
            }
        }
    }

    #[test]
    fn every_status_literal_maps_to_its_status() {
        for status in SubscriptionStatus::ALL {
            assert_eq!(
                classify(Operation::SubscriptionStatus, status.as_str()),
                Outcome::Status(status)
            );
        }
    }

    #[rstest]
    #[case("0")]
    #[case("1284")]
    fn numeric_count(#[case] body: &str) {
        assert_eq!(
            classify(Operation::ActiveSubscriberCount, body),
            Outcome::Count(body.to_string())
        );
    }

    #[rstest]
    #[case("-3")]
    #[case("12 ")]
    #[case("")]
    fn non_numeric_count_passes_through(#[case] body: &str) {
        assert_eq!(
            classify(Operation::ActiveSubscriberCount, body),
            Outcome::RawBody(body.to_string())
        );
    }

    #[test]
    fn campaign_literals() {
        assert_eq!(
            classify(Operation::CreateCampaign, "Campaign created"),
            Outcome::CampaignCreated { sending: false }
        );
        assert_eq!(
            classify(Operation::CreateCampaign, "Campaign created and now sending"),
            Outcome::CampaignCreated { sending: true }
        );
    }

    #[test]
    fn error_prefix_is_named_for_any_operation() {
        for op in Operation::ALL {
            let body = "Error: cURL error 28: Operation timed out";
            assert_eq!(classify(op, body), Outcome::NamedError(body.to_string()));
        }
    }

    #[rstest]
    #[case(Operation::Subscribe, "True")]
    #[case(Operation::Subscribe, " true")]
    #[case(Operation::Subscribe, "Already subscribed")]
    #[case(Operation::SubscriptionStatus, "subscribed")]
    #[case(Operation::CreateCampaign, "Campaign created!")]
    #[case(Operation::Delete, "<html><body>maintenance</body></html>")]
    fn near_misses_are_passed_through_unchanged(#[case] op: Operation, #[case] body: &str) {
        assert_eq!(classify(op, body), Outcome::RawBody(body.to_string()));
    }

    #[test]
    fn literals_are_scoped_to_their_operation() {
        // A status sentence is not a subscribe error.
        assert_eq!(
            classify(Operation::Subscribe, "Email does not exist in list"),
            Outcome::RawBody("Email does not exist in list".to_string())
        );
        // "true" means nothing to a status query.
        assert_eq!(
            classify(Operation::SubscriptionStatus, "true"),
            Outcome::RawBody("true".to_string())
        );
    }
}
