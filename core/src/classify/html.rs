//! Legacy HTML classification.
//!
//! Older Sendy releases answered the public subscribe/unsubscribe forms and
//! the status/count endpoints with small HTML pages. The status sentence is
//! pulled out of a fixed spot in the page, described by a `NodePath`, and
//! then matched like a plain-text body.
//!
//! These paths encode the markup of those releases. A wrapper element or a
//! reordered head silently moves the text; when that happens the path stops
//! resolving and the body is passed through as `Outcome::RawBody`.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Node};

use crate::endpoint::Operation;
use crate::types::{Outcome, SubscriptionStatus};

pub const SUBSCRIBED_TITLE: &str = "You're subscribed!";
pub const ALREADY_SUBSCRIBED_TITLE: &str = "You're already subscribed!";
pub const UNSUBSCRIBED_MESSAGE: &str = "You're unsubscribed.";
pub const UNKNOWN_EMAIL_MESSAGE: &str = "Email does not exist.";
pub const NOT_IN_LIST_MESSAGE: &str = "Email does not exist in list";

/// Tag given to comment nodes, which are kept as children.
pub const COMMENT_TAG: &str = "#comment";

/// Outside SVG/MathML the HTML parser reads `<![CDATA[x]]>` as a comment
/// holding `[CDATA[x]]`. Inside `<title>` it stays literal text.
const CDATA_OPEN: &str = "[CDATA[";
const CDATA_CLOSE: &str = "]]";

/// One element of a parsed page, in document order.
///
/// Text (and CDATA) directly inside an element becomes its `text`; child
/// elements and comments become `children`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlNode {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<HtmlNode>,
}

impl HtmlNode {
    /// Parse `markup` and return its `<html>` element as the tree root.
    ///
    /// The parser is error tolerant: missing `<html>`, `<head>` or `<body>`
    /// tags are synthesized, so any input yields a tree.
    pub fn parse(markup: &str) -> HtmlNode {
        let document = Html::parse_document(markup);
        HtmlNode::from_element(document.root_element())
    }

    fn from_element(element: ElementRef<'_>) -> HtmlNode {
        let value = element.value();
        let mut node = HtmlNode {
            tag: value.name().to_string(),
            attributes: value
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            text: None,
            children: Vec::new(),
        };

        for child in element.children() {
            if let Some(child) = ElementRef::wrap(child) {
                node.children.push(HtmlNode::from_element(child));
                continue;
            }
            match child.value() {
                Node::Text(text) => node.push_text(literal_cdata_text(text).unwrap_or(text)),
                Node::Comment(comment) => match cdata_text(comment) {
                    Some(text) => node.push_text(text),
                    None => node.children.push(HtmlNode {
                        tag: COMMENT_TAG.to_string(),
                        text: Some(comment.to_string()),
                        ..HtmlNode::default()
                    }),
                },
                _ => {}
            }
        }
        node
    }

    fn push_text(&mut self, text: &str) {
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    pub fn child(&self, index: usize) -> Option<&HtmlNode> {
        self.children.get(index)
    }

    /// First direct child with the given tag name.
    pub fn child_by_tag(&self, tag: &str) -> Option<&HtmlNode> {
        self.children.iter().find(|c| c.tag.eq_ignore_ascii_case(tag))
    }
}

/// Contents of a CDATA section the parser turned into a comment.
fn cdata_text(comment: &str) -> Option<&str> {
    comment.strip_prefix(CDATA_OPEN)?.strip_suffix(CDATA_CLOSE)
}

/// Contents of a CDATA section left verbatim in raw-text content.
fn literal_cdata_text(text: &str) -> Option<&str> {
    cdata_text(text.strip_prefix('<')?.strip_prefix('!')?.strip_suffix('>')?)
}

/// One hop in a `NodePath`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The n-th child, counting elements and comments.
    Child(usize),
    /// The first child with this tag.
    Tag(&'static str),
}

/// A fixed route from the root element to the node holding a status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePath(pub &'static [Step]);

impl NodePath {
    /// `<html>` → `<head>` → `<title>`.
    pub const SUBSCRIBE: NodePath = NodePath(&[Step::Tag("head"), Step::Tag("title")]);
    /// Third child of the root, its second child, that node's first child.
    pub const UNSUBSCRIBE: NodePath = NodePath(&[Step::Child(2), Step::Child(1), Step::Child(0)]);
    /// First child of the root, its first child.
    pub const FIRST_LEAF: NodePath = NodePath(&[Step::Child(0), Step::Child(0)]);

    pub fn for_operation(op: Operation) -> Option<NodePath> {
        match op {
            Operation::Subscribe => Some(NodePath::SUBSCRIBE),
            Operation::Unsubscribe => Some(NodePath::UNSUBSCRIBE),
            Operation::SubscriptionStatus | Operation::ActiveSubscriberCount => {
                Some(NodePath::FIRST_LEAF)
            }
            Operation::Delete | Operation::CreateCampaign => None,
        }
    }

    pub fn select<'a>(&self, root: &'a HtmlNode) -> Option<&'a HtmlNode> {
        self.0.iter().try_fold(root, |node, step| match *step {
            Step::Child(index) => node.child(index),
            Step::Tag(tag) => node.child_by_tag(tag),
        })
    }

    pub fn select_text<'a>(&self, root: &'a HtmlNode) -> Option<&'a str> {
        self.select(root).and_then(|node| node.text.as_deref())
    }
}

/// Classify a legacy HTML page.
///
/// Returns `None` for operations that never answered in HTML; the caller
/// falls back to plain-text matching for those.
pub fn classify(op: Operation, body: &str) -> Option<Outcome> {
    let path = NodePath::for_operation(op)?;
    let tree = HtmlNode::parse(body);

    let Some(text) = path.select_text(&tree) else {
        log::debug!("{op}: status text not found at {path:?}, passing body through");
        return Some(Outcome::RawBody(body.to_string()));
    };
    log::trace!("{op}: extracted status text {text:?}");

    let outcome = match (op, text) {
        (Operation::Subscribe, ALREADY_SUBSCRIBED_TITLE) => Outcome::AlreadySubscribed,
        (Operation::Subscribe, SUBSCRIBED_TITLE) => Outcome::Success,
        (Operation::Unsubscribe, UNSUBSCRIBED_MESSAGE) => Outcome::Success,
        (Operation::Unsubscribe, UNKNOWN_EMAIL_MESSAGE) => Outcome::UserNotFound,
        (Operation::SubscriptionStatus, "Subscribed") => {
            Outcome::Status(SubscriptionStatus::Subscribed)
        }
        (Operation::SubscriptionStatus, "Unsubscribed") => {
            Outcome::Status(SubscriptionStatus::Unsubscribed)
        }
        (Operation::SubscriptionStatus, NOT_IN_LIST_MESSAGE) => Outcome::UserNotFound,
        (Operation::ActiveSubscriberCount, count) => Outcome::Count(count.to_string()),
        (_, other) => Outcome::NamedError(other.to_string()),
    };
    Some(outcome)
}
