//! Verify build/classify against JSON test vectors stored in `test-vectors/`.
//!
//! The same files can drive a host-language binding through the FFI crate,
//! so they are plain data: an operation name, the inputs, and the expected
//! request or outcome. Outcomes are compared after deserializing through
//! serde, so the vectors also pin the `Outcome` wire shape.

use pretty_assertions::assert_eq;
use sendy_core::{Config, HttpResponse, Operation, Outcome, ResponseFormat, SendyClient};
use serde::Deserialize;

const BASE_URL: &str = "https://mail.example.com";

#[derive(Deserialize)]
struct Vectors<T> {
    cases: Vec<T>,
}

#[derive(Deserialize)]
struct ClassifyCase {
    name: String,
    operation: Operation,
    body: String,
    expected: Outcome,
}

#[derive(Deserialize)]
struct ExpectedRequest {
    url: String,
    fields: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct RequestCase {
    name: String,
    operation: Operation,
    #[serde(default)]
    email: String,
    list_id: Option<String>,
    #[serde(default)]
    custom_fields: Vec<(String, String)>,
    expected_request: ExpectedRequest,
}

fn client(format: ResponseFormat) -> SendyClient {
    SendyClient::new(
        Config::new("KEY", BASE_URL)
            .with_default_list("L1")
            .with_response_format(format),
    )
}

fn run_classify_vectors(raw: &str, format: ResponseFormat) {
    let vectors: Vectors<ClassifyCase> = serde_json::from_str(raw).unwrap();
    assert!(!vectors.cases.is_empty());

    let c = client(format);
    for case in vectors.cases {
        let response = HttpResponse {
            status: 200,
            body: case.body,
        };
        let outcome = c.parse(case.operation, response).unwrap();
        assert_eq!(outcome, case.expected, "{}", case.name);
    }
}

#[test]
fn plain_text_vectors() {
    run_classify_vectors(
        include_str!("../../test-vectors/plain.json"),
        ResponseFormat::PlainText,
    );
}

#[test]
fn html_vectors() {
    run_classify_vectors(include_str!("../../test-vectors/html.json"), ResponseFormat::Html);
}

#[test]
fn request_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Vectors<RequestCase> = serde_json::from_str(raw).unwrap();

    let c = client(ResponseFormat::PlainText);
    for case in vectors.cases {
        let list_id = case.list_id.as_deref();
        let req = match case.operation {
            Operation::Subscribe => c.build_subscribe(&case.email, case.custom_fields, list_id),
            Operation::Unsubscribe => c.build_unsubscribe(&case.email, list_id),
            Operation::Delete => c.build_delete(&case.email, list_id),
            Operation::SubscriptionStatus => c.build_subscription_status(&case.email, list_id),
            Operation::ActiveSubscriberCount => c.build_active_subscriber_count(list_id),
            Operation::CreateCampaign => c.build_create_campaign(case.custom_fields),
        };
        assert_eq!(req.operation, case.operation, "{}: operation", case.name);
        assert_eq!(req.url, case.expected_request.url, "{}: url", case.name);
        assert_eq!(req.fields, case.expected_request.fields, "{}: fields", case.name);
    }
}

#[test]
fn outcome_wire_shape() {
    let json = serde_json::to_value(Outcome::CampaignCreated { sending: true }).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "kind": "campaign_created", "value": { "sending": true } })
    );
    let json = serde_json::to_value(Outcome::Success).unwrap();
    assert_eq!(json, serde_json::json!({ "kind": "success" }));
}

#[test]
fn non_2xx_is_never_classified() {
    let err = client(ResponseFormat::PlainText)
        .parse(
            Operation::Subscribe,
            HttpResponse {
                status: 500,
                body: "true".into(),
            },
        )
        .unwrap_err();
    assert!(err.to_string().contains("500"), "{err}");
}
