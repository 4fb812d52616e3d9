//! Postmark API Client
//!
//! Sends templated email through `POST /email/withTemplate/`.

use crate::notifier::{Message, Notifier};
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error};

pub const POSTMARK_API_BASE: &str = "https://api.postmarkapp.com";
const SEND_WITH_TEMPLATE_PATH: &str = "/email/withTemplate/";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TemplateAttachment {
    name: String,
    content: String,
    content_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct EmailWithTemplateRequest {
    template_alias: String,
    template_model: serde_json::Value,
    from: String,
    to: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<TemplateAttachment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EmailWithTemplateResponse {
    #[serde(rename = "MessageID", default)]
    message_id: String,
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorResponse {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    message: String,
}

/// Postmark-backed [`Notifier`]
#[derive(Clone)]
pub struct PostmarkNotifier {
    client: Client,
    base_url: String,
    from: String,
}

impl PostmarkNotifier {
    pub fn new(api_key: &str, from: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::HeaderName::from_static("x-postmark-server-token"),
                    api_key.parse().context("Invalid POSTMARK_KEY")?,
                );
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .context("Failed to build Postmark client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            from: from.to_string(),
        })
    }

    #[inline]
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build_request(&self, message: &Message) -> EmailWithTemplateRequest {
        EmailWithTemplateRequest {
            template_alias: message.template_id.clone(),
            template_model: json!({ "Data": message.data }),
            from: self.from.clone(),
            to: message.target.clone(),
            attachments: message
                .attachments
                .iter()
                .map(|a| TemplateAttachment {
                    name: a.name.clone(),
                    content: a.content.clone(),
                    content_type: a.content_type.clone(),
                })
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for PostmarkNotifier {
    async fn send(&self, message: &Message) -> Result<()> {
        let request = self.build_request(message);

        let resp = self
            .client
            .post(self.url(SEND_WITH_TEMPLATE_PATH))
            .json(&request)
            .send()
            .await
            .context("POST /email/withTemplate/ failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.json::<ErrorResponse>().await.unwrap_or_default();
            error!(
                status = %status,
                code = body.error_code,
                message = %body.message,
                "Error sending email"
            );
            return Err(anyhow!(
                "POST /email/withTemplate/ {}: code {} {}",
                status,
                body.error_code,
                body.message
            ));
        }

        let result = resp
            .json::<EmailWithTemplateResponse>()
            .await
            .context("Failed to parse Postmark response")?;

        // https://postmarkapp.com/developer/api/overview#error-codes
        if result.error_code > 0 {
            error!(
                code = result.error_code,
                message = %result.message,
                "Error sending email"
            );
            return Err(anyhow!(
                "Postmark rejected message: code {} {}",
                result.error_code,
                result.message
            ));
        }

        debug!(message_id = %result.message_id, "Email accepted by Postmark");
        Ok(())
    }
}
