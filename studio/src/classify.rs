//! Input classification.
//!
//! A line of user input is either a prompt for the image generation API or a
//! direct link to an image that skips generation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^(ftp|http|https)://[^ "]+$"#).unwrap());

/// Classified user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InputKind {
    /// Free text to send to the generation API.
    Prompt(String),
    /// A direct image URL.
    Url(String),
}

impl InputKind {
    /// Returns the raw input text.
    pub fn as_str(&self) -> &str {
        match self {
            InputKind::Prompt(s) | InputKind::Url(s) => s,
        }
    }

    /// Returns true if the input was recognized as a URL.
    pub fn is_url(&self) -> bool {
        matches!(self, InputKind::Url(_))
    }
}

/// Classifies raw input as a URL or a prompt.
///
/// Never fails: anything that is not an ftp/http/https URL without spaces or
/// double quotes is a prompt. The input is not trimmed.
pub fn classify(input: &str) -> InputKind {
    if URL_RE.is_match(input) {
        InputKind::Url(input.to_string())
    } else {
        InputKind::Prompt(input.to_string())
    }
}
