//! Provider request body.

use relay_core::ComposedEmail;
use serde::{Deserialize, Serialize};

/// Email as sent to the provider's JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

impl OutboundEmail {
    /// Address a composed email.
    pub fn new(from: impl Into<String>, to: impl Into<String>, email: ComposedEmail) -> Self {
        Self {
            from: from.into(),
            to: vec![to.into()],
            subject: email.subject,
            text: email.text,
            html: email.html,
            reply_to: email.reply_to,
        }
    }
}
