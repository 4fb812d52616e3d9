//! Outbound notifications
//!
//! The waitlist service only sees the [`Notifier`] capability. Providers live in
//! submodules.

pub mod postmark;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

pub use postmark::PostmarkNotifier;

/// Channel a message is delivered over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageKind {
    Push,
    Email,
    Sms,
}

/// File attached to a templated message (content is base64)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub content: String,
    pub content_type: String,
}

/// Templated message handed to a [`Notifier`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub target: String,
    pub kind: MessageKind,
    pub title: String,
    pub template_id: String,
    pub data: HashMap<String, String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Message {
    pub fn email(target: &str, title: &str, template_id: &str) -> Self {
        Self {
            target: target.to_string(),
            kind: MessageKind::Email,
            title: title.to_string(),
            template_id: template_id.to_string(),
            data: HashMap::new(),
            attachments: Vec::new(),
        }
    }

    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.data.insert(key.to_string(), value.to_string());
        self
    }
}

/// Something that can deliver a templated message
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &Message) -> Result<()>;
}

/// Notifier that only logs; used when no provider key is configured
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &Message) -> Result<()> {
        info!(
            target_address = %message.target,
            template = %message.template_id,
            "✉️  Notification skipped (no provider configured)"
        );
        Ok(())
    }
}
