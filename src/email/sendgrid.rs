//! SendGrid v3 implementation of [`EmailSender`].

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::{EmailError, EmailResult, EmailSender, TemplatedEmail};
use crate::config::EmailConfig;

pub struct SendGridClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SendGridClient {
    pub fn new(config: &EmailConfig) -> EmailResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| EmailError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

/// `mail/send` payload with a single personalization.
fn mail_body(email: &TemplatedEmail) -> Value {
    json!({
        "from": { "email": email.from_address, "name": email.from_name },
        "template_id": email.template_id,
        "personalizations": [{
            "to": [{ "email": email.to }],
            "dynamic_template_data": email.dynamic_data,
        }],
    })
}

#[async_trait]
impl EmailSender for SendGridClient {
    #[instrument(skip_all, fields(template_id = %email.template_id))]
    async fn send(&self, email: &TemplatedEmail) -> EmailResult<u16> {
        let resp = self
            .client
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&mail_body(email))
            .send()
            .await
            .map_err(|e| EmailError::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        if status >= 300 {
            let body = resp.text().await.unwrap_or_default();
            return Err(EmailError::Status { status, body });
        }

        debug!(status, "Email accepted");
        Ok(status)
    }
}
