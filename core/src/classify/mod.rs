//! Response classification.
//!
//! # Design
//! The service has answered in two shapes over its lifetime: single-line
//! plain text (current) and small HTML pages (legacy form endpoints). Both
//! interpretations sit behind `ResponseFormat::classify`, so a deployment
//! switches between them with one configuration value. Plain text is the
//! default and should be used whenever the installation supports it.

pub mod html;
pub mod plain;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::endpoint::Operation;
use crate::error::ConfigError;
use crate::types::Outcome;

/// Which body interpretation to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    PlainText,
    Html,
}

impl ResponseFormat {
    pub fn classify(self, op: Operation, body: &str) -> Outcome {
        let outcome = match self {
            ResponseFormat::PlainText => plain::classify(op, body),
            // Text that is not markup (an "Error: ..." line, a bare count)
            // is read as plain text even in HTML mode.
            ResponseFormat::Html if !looks_like_markup(body) => plain::classify(op, body),
            ResponseFormat::Html => {
                html::classify(op, body).unwrap_or_else(|| plain::classify(op, body))
            }
        };
        log::debug!("{op} classified as {outcome}");
        outcome
    }
}

impl FromStr for ResponseFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" | "plain_text" | "text" => Ok(ResponseFormat::PlainText),
            "html" => Ok(ResponseFormat::Html),
            other => Err(ConfigError::InvalidResponseFormat(other.to_string())),
        }
    }
}

fn looks_like_markup(body: &str) -> bool {
    body.trim_start().starts_with('<')
}
