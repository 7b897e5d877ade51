//! Email composition for accepted feedback.

use chrono::{DateTime, Utc};

use crate::feedback::CleanFeedback;

/// Header line of every feedback email.
pub const HEADING: &str = "New feedback from the app";

const RULE: &str = "================================";

/// A ready-to-send feedback email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
    pub reply_to: Option<String>,
    /// Metadata rows in display order (label, value).
    pub metadata: Vec<(&'static str, String)>,
}

/// Build the subject line: `"{prefix} · {platform} · v{version}"`.
pub fn subject(prefix: &str, feedback: &CleanFeedback) -> String {
    let platform = or_default(&feedback.app.platform, "unknown");
    let version = or_default(&feedback.app.app_version, "-");
    format!("{prefix} · {platform} · v{version}")
}

/// Compose the email for a validated submission.
///
/// Pure: the same inputs always produce the same email.
pub fn compose(
    feedback: &CleanFeedback,
    client_ip: &str,
    now: DateTime<Utc>,
    subject_prefix: &str,
) -> ComposedEmail {
    let app = &feedback.app;
    let metadata = vec![
        ("Time", now.format("%Y-%m-%d %H:%M UTC").to_string()),
        ("App", app.app_name.clone()),
        ("Version", format!("{} ({})", app.app_version, app.build_number)),
        ("Platform", app.platform.clone()),
        ("Device", app.device.clone()),
        ("OS", app.os_version.clone()),
        ("Locale", app.locale.clone()),
        ("IP", client_ip.to_string()),
    ];

    let mut sender = Vec::new();
    if let Some(name) = &feedback.name {
        sender.push(("Name", name.as_str()));
    }
    if let Some(email) = &feedback.email {
        sender.push(("Email", email.as_str()));
    }

    ComposedEmail {
        subject: subject(subject_prefix, feedback),
        text: text_body(&sender, &feedback.message, &metadata),
        html: html_body(&sender, &feedback.message, &metadata),
        reply_to: feedback.email.clone(),
        metadata,
    }
}

fn text_body(sender: &[(&str, &str)], message: &str, metadata: &[(&str, String)]) -> String {
    let mut body = format!("{HEADING}\n{RULE}\n\n");

    if !sender.is_empty() {
        for (label, value) in sender {
            body.push_str(&format!("{label}: {value}\n"));
        }
        body.push('\n');
    }

    body.push_str("Message:\n");
    body.push_str(message);
    body.push_str("\n\n---\n");

    for (label, value) in metadata {
        body.push_str(&format!("{label}: {value}\n"));
    }

    body
}

fn html_body(sender: &[(&str, &str)], message: &str, metadata: &[(&str, String)]) -> String {
    let sender_rows: String = sender
        .iter()
        .map(|(label, value)| format!("<div><b>{label}:</b> {}</div>", escape_html(value)))
        .collect();

    let meta_rows: String = metadata
        .iter()
        .map(|(label, value)| format!("<div>{label}: {}</div>", escape_html(value)))
        .collect();

    format!(
        concat!(
            r#"<div style="font-family: -apple-system, Segoe UI, Roboto, Arial; line-height:1.4;">"#,
            r#"<h2 style="margin:0 0 8px 0;">{heading}</h2>"#,
            "{sender_rows}",
            r#"<div style="margin-top:14px; padding:14px; border-radius:12px; background:#f6f7f9; white-space:pre-wrap;">{message}</div>"#,
            r#"<div style="margin-top:14px; color:#555; font-size:13px;">"#,
            r#"<div style="margin-bottom:6px;"><b>Meta</b></div>"#,
            "{meta_rows}",
            "</div>",
            "</div>"
        ),
        heading = HEADING,
        sender_rows = sender_rows,
        message = escape_html(message),
        meta_rows = meta_rows,
    )
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
