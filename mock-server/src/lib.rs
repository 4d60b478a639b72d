//! In-memory stand-in for a Sendy installation.
//!
//! Serves the six endpoints the client uses, answering with the same
//! sentences a real installation sends. The public form endpoints
//! (`/subscribe`, `/unsubscribe`) and the status/count endpoints can answer
//! either in plain text or in the legacy HTML page layout; the delete and
//! campaign endpoints always answer in plain text.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::post,
    Form, Router,
};
use tokio::{net::TcpListener, sync::RwLock};

/// The only API key the mock accepts.
pub const API_KEY: &str = "test-api-key";
/// Lists that exist from startup.
pub const LISTS: [&str; 2] = ["L1", "L2"];
/// Addresses on this domain are treated as suppressed.
pub const SUPPRESSED_DOMAIN: &str = "@suppressed.test";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Plain,
    Html,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Subscribed,
    Unsubscribed,
}

impl Status {
    fn as_str(self) -> &'static str {
        match self {
            Status::Subscribed => "Subscribed",
            Status::Unsubscribed => "Unsubscribed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscriber {
    pub status: Status,
    pub fields: HashMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedCampaign {
    pub subject: String,
    pub sending: bool,
}

/// list id -> email -> subscriber
pub type Lists = HashMap<String, HashMap<String, Subscriber>>;

#[derive(Clone)]
pub struct MockState {
    format: Format,
    lists: Arc<RwLock<Lists>>,
    campaigns: Arc<RwLock<Vec<CreatedCampaign>>>,
}

impl MockState {
    pub fn new(format: Format) -> Self {
        let lists = LISTS
            .iter()
            .map(|id| (id.to_string(), HashMap::new()))
            .collect();
        Self {
            format,
            lists: Arc::new(RwLock::new(lists)),
            campaigns: Arc::default(),
        }
    }

    pub async fn subscriber(&self, list: &str, email: &str) -> Option<Subscriber> {
        self.lists.read().await.get(list)?.get(email).cloned()
    }

    pub async fn campaigns(&self) -> Vec<CreatedCampaign> {
        self.campaigns.read().await.clone()
    }
}

type Fields = HashMap<String, String>;

pub fn app() -> Router {
    app_with(MockState::new(Format::Plain))
}

pub fn app_with(state: MockState) -> Router {
    Router::new()
        .route("/subscribe", post(subscribe))
        .route("/unsubscribe", post(unsubscribe))
        .route("/api/subscribers/delete.php", post(delete))
        .route("/api/subscribers/subscription-status.php", post(subscription_status))
        .route("/api/subscribers/active-subscriber-count.php", post(active_subscriber_count))
        .route("/api/campaigns/create.php", post(create_campaign))
        .with_state(state)
}

pub async fn run(listener: TcpListener, format: Format) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(MockState::new(format))).await
}

/// Value of a form field, treating an empty value as absent.
fn get<'a>(fields: &'a Fields, key: &str) -> Option<&'a str> {
    fields.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

fn valid_email(email: &str) -> bool {
    matches!(email.split_once('@'), Some((user, domain)) if !user.is_empty() && domain.contains('.'))
}

/// Checks shared by every `/api/...` endpoint.
fn check_api_key(fields: &Fields) -> Result<(), &'static str> {
    if fields.is_empty() {
        return Err("No data passed");
    }
    match get(fields, "api_key") {
        None => Err("API key not passed"),
        Some(API_KEY) => Ok(()),
        Some(_) => Err("Invalid API key"),
    }
}

fn text(body: &str) -> Response {
    body.to_string().into_response()
}

fn title_page(title: &str) -> Response {
    Html(format!(
        "<html><head><title>{title}</title><meta charset=\"utf-8\"></head><body><h1>{title}</h1></body></html>"
    ))
    .into_response()
}

fn unsubscribe_page(message: &str) -> Response {
    Html(format!(
        "<html><head><title>Unsubscribe</title></head><!-- sendy --><body>\
         <img src=\"/img/logo.png\"><div id=\"wrapper\"><h2>{message}</h2></div></body></html>"
    ))
    .into_response()
}

async fn subscribe(State(state): State<MockState>, Form(fields): Form<Fields>) -> Response {
    let outcome = subscribe_outcome(&state, &fields).await;
    log::debug!("subscribe {:?} -> {outcome:?}", get(&fields, "email"));
    match (state.format, outcome) {
        (Format::Plain, Ok(())) => text("true"),
        (Format::Plain, Err(msg)) => text(msg),
        (Format::Html, Ok(())) => title_page("You're subscribed!"),
        (Format::Html, Err("Already subscribed.")) => title_page("You're already subscribed!"),
        (Format::Html, Err(msg)) => title_page(msg),
    }
}

async fn subscribe_outcome(state: &MockState, fields: &Fields) -> Result<(), &'static str> {
    let (Some(email), Some(list)) = (get(fields, "email"), get(fields, "list")) else {
        return Err("Some fields are missing.");
    };
    if !valid_email(email) {
        return Err("Invalid email address.");
    }
    let mut lists = state.lists.write().await;
    let Some(members) = lists.get_mut(list) else {
        return Err("Invalid list ID.");
    };
    if email.ends_with(SUPPRESSED_DOMAIN) {
        return Err("Email is suppressed.");
    }
    let custom: HashMap<String, String> = fields
        .iter()
        .filter(|(k, _)| !matches!(k.as_str(), "api_key" | "email" | "list" | "boolean"))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    match members.get_mut(email) {
        Some(existing) if existing.status == Status::Subscribed => Err("Already subscribed."),
        Some(existing) => {
            existing.status = Status::Subscribed;
            existing.fields.extend(custom);
            Ok(())
        }
        None => {
            members.insert(
                email.to_string(),
                Subscriber {
                    status: Status::Subscribed,
                    fields: custom,
                },
            );
            Ok(())
        }
    }
}

async fn unsubscribe(State(state): State<MockState>, Form(fields): Form<Fields>) -> Response {
    let outcome = unsubscribe_outcome(&state, &fields).await;
    log::debug!("unsubscribe {:?} -> {outcome:?}", get(&fields, "email"));
    match (state.format, outcome) {
        (Format::Plain, Ok(())) => text("true"),
        (Format::Plain, Err(msg)) => text(msg),
        (Format::Html, Ok(())) => unsubscribe_page("You're unsubscribed."),
        (Format::Html, Err(msg)) => unsubscribe_page(msg),
    }
}

async fn unsubscribe_outcome(state: &MockState, fields: &Fields) -> Result<(), &'static str> {
    let (Some(email), Some(list)) = (get(fields, "email"), get(fields, "list")) else {
        return Err("Some fields are missing.");
    };
    if !valid_email(email) {
        return Err("Invalid email address.");
    }
    let mut lists = state.lists.write().await;
    let subscriber = lists
        .get_mut(list)
        .and_then(|members| members.get_mut(email))
        .ok_or("Email does not exist.")?;
    subscriber.status = Status::Unsubscribed;
    Ok(())
}

async fn delete(State(state): State<MockState>, Form(fields): Form<Fields>) -> Response {
    let outcome = delete_outcome(&state, &fields).await;
    log::debug!("delete {:?} -> {outcome:?}", get(&fields, "email"));
    text(outcome.unwrap_or_else(|msg| msg))
}

async fn delete_outcome(state: &MockState, fields: &Fields) -> Result<&'static str, &'static str> {
    check_api_key(fields)?;
    let list = get(fields, "list_id").ok_or("List ID not passed")?;
    let mut lists = state.lists.write().await;
    let members = lists.get_mut(list).ok_or("List does not exist")?;
    let email = get(fields, "email").ok_or("Email address not passed")?;
    members.remove(email).ok_or("Subscriber does not exist")?;
    Ok("true")
}

async fn subscription_status(State(state): State<MockState>, Form(fields): Form<Fields>) -> Response {
    let outcome = status_outcome(&state, &fields).await;
    log::debug!("subscription status {:?} -> {outcome:?}", get(&fields, "email"));
    let line = outcome.unwrap_or_else(|msg| msg);
    match state.format {
        Format::Plain => text(line),
        Format::Html => title_page(line),
    }
}

async fn status_outcome(state: &MockState, fields: &Fields) -> Result<&'static str, &'static str> {
    check_api_key(fields)?;
    let email = get(fields, "email").ok_or("Email not passed")?;
    let list = get(fields, "list_id").ok_or("List ID not passed")?;
    let lists = state.lists.read().await;
    let subscriber = lists
        .get(list)
        .and_then(|members| members.get(email))
        .ok_or("Email does not exist in list")?;
    Ok(subscriber.status.as_str())
}

async fn active_subscriber_count(State(state): State<MockState>, Form(fields): Form<Fields>) -> Response {
    let outcome = count_outcome(&state, &fields).await;
    log::debug!("active subscriber count -> {outcome:?}");
    let line = match outcome {
        Ok(count) => count.to_string(),
        Err(msg) => msg.to_string(),
    };
    match state.format {
        Format::Plain => text(&line),
        Format::Html => title_page(&line),
    }
}

async fn count_outcome(state: &MockState, fields: &Fields) -> Result<usize, &'static str> {
    check_api_key(fields)?;
    let list = get(fields, "list_id").ok_or("List ID not passed")?;
    let lists = state.lists.read().await;
    let members = lists.get(list).ok_or("List does not exist")?;
    Ok(members
        .values()
        .filter(|s| s.status == Status::Subscribed)
        .count())
}

async fn create_campaign(State(state): State<MockState>, Form(fields): Form<Fields>) -> Response {
    let outcome = campaign_outcome(&state, &fields).await;
    log::debug!("create campaign {:?} -> {outcome:?}", get(&fields, "subject"));
    text(outcome.unwrap_or_else(|msg| msg))
}

async fn campaign_outcome(state: &MockState, fields: &Fields) -> Result<&'static str, &'static str> {
    check_api_key(fields)?;
    let required = [
        ("from_name", "From name not passed"),
        ("from_email", "From email not passed"),
        ("reply_to", "Reply to email not passed"),
        ("subject", "Subject not passed"),
        ("html_text", "HTML not passed"),
    ];
    for (key, missing) in required {
        get(fields, key).ok_or(missing)?;
    }

    let sending = get(fields, "send_campaign") == Some("1");
    let lists = state.lists.read().await;
    if sending {
        let list_ids = get(fields, "list_ids").ok_or("List or segment ID(s) not passed")?;
        if !list_ids.split(',').all(|id| lists.contains_key(id.trim())) {
            return Err("One or more list IDs are invalid");
        }
    } else {
        get(fields, "brand_id").ok_or("Brand ID not passed")?;
    }
    drop(lists);

    state.campaigns.write().await.push(CreatedCampaign {
        subject: get(fields, "subject").unwrap_or_default().to_string(),
        sending,
    });
    Ok(if sending {
        "Campaign created and now sending"
    } else {
        "Campaign created"
    })
}
