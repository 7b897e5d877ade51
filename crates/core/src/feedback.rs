//! Feedback submission payload and its admission checks.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::email::is_valid_email;
use crate::error::{Error, Result};
use crate::limits::*;
use crate::sanitize::{clean, clean_opt};

/// Feedback payload as sent by the app.
///
/// Every field is optional at the wire level so that spam detection runs
/// before any other rule. Length bounds are checked by [`Validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedbackSubmission {
    #[validate(length(max = 60))]
    pub name: Option<String>,
    #[validate(length(max = 120))]
    pub email: Option<String>,
    #[validate(length(max = 4000))]
    pub message: Option<String>,

    // App metadata, filled in by the client.
    #[serde(alias = "app_name")]
    #[validate(length(max = 120))]
    pub app_name: Option<String>,
    #[serde(alias = "app_version")]
    #[validate(length(max = 60))]
    pub app_version: Option<String>,
    #[serde(alias = "build_number")]
    #[validate(length(max = 60))]
    pub build_number: Option<String>,
    #[validate(length(max = 40))]
    pub platform: Option<String>,
    #[validate(length(max = 140))]
    pub device: Option<String>,
    #[serde(alias = "os_version")]
    #[validate(length(max = 80))]
    pub os_version: Option<String>,
    #[validate(length(max = 16))]
    pub locale: Option<String>,

    /// Hidden form field; humans leave it empty.
    #[validate(length(max = 40))]
    pub honey: Option<String>,
}

impl FeedbackSubmission {
    /// Parse a submission from a raw JSON body.
    ///
    /// Only a JSON object is accepted; serde would otherwise fill the fields
    /// from an array by position.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(Error::validation("Expected a JSON object"));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Whether the honeypot field was filled in.
    pub fn is_spam(&self) -> bool {
        self.honey
            .as_deref()
            .is_some_and(|honey| !honey.trim().is_empty())
    }

    /// Check field bounds, sanitize, and validate content.
    ///
    /// Does not look at the honeypot; callers check [`is_spam`](Self::is_spam) first.
    pub fn admit(&self) -> Result<CleanFeedback> {
        if let Err(errors) = self.validate() {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect();
            fields.sort();
            return Err(Error::InvalidFields(fields));
        }

        let message = clean_opt(self.message.as_deref(), MAX_MESSAGE_LEN);
        if message.chars().count() < MIN_MESSAGE_LEN {
            return Err(Error::validation("Message too short"));
        }

        let email = clean_opt(self.email.as_deref(), MAX_EMAIL_LEN);
        if !email.is_empty() && !is_valid_email(&email) {
            return Err(Error::validation("Invalid email"));
        }

        Ok(CleanFeedback {
            name: non_empty(clean_opt(self.name.as_deref(), MAX_NAME_LEN)),
            email: non_empty(email),
            message,
            app: AppInfo {
                app_name: clean_opt(self.app_name.as_deref(), MAX_APP_NAME_LEN),
                app_version: clean_opt(self.app_version.as_deref(), MAX_APP_VERSION_LEN),
                build_number: clean_opt(self.build_number.as_deref(), MAX_BUILD_NUMBER_LEN),
                platform: clean_opt(self.platform.as_deref(), MAX_PLATFORM_LEN),
                device: clean_opt(self.device.as_deref(), MAX_DEVICE_LEN),
                os_version: clean_opt(self.os_version.as_deref(), MAX_OS_VERSION_LEN),
                locale: clean_opt(self.locale.as_deref(), MAX_LOCALE_LEN),
            },
        })
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Descriptive fields about the sending app, already cleaned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppInfo {
    pub app_name: String,
    pub app_version: String,
    pub build_number: String,
    pub platform: String,
    pub device: String,
    pub os_version: String,
    pub locale: String,
}

/// A submission that passed every content check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanFeedback {
    pub name: Option<String>,
    /// Validated reply-to address.
    pub email: Option<String>,
    pub message: String,
    pub app: AppInfo,
}

impl CleanFeedback {
    /// Build directly from a message, mostly useful in tests.
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            name: None,
            email: None,
            message: message.into(),
            app: AppInfo::default(),
        }
    }
}
