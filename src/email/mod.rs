//! Transactional email adapter.

mod sendgrid;

use async_trait::async_trait;
pub use sendgrid::SendGridClient;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Email provider returned status {status}: {body}")]
    Status { status: u16, body: String },
}

pub type EmailResult<T> = Result<T, EmailError>;

/// One email rendered from a provider-side dynamic template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatedEmail {
    pub template_id: String,
    pub from_address: String,
    pub from_name: String,
    pub to: String,
    pub dynamic_data: Map<String, Value>,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send the email, returning the provider's HTTP status.
    ///
    /// Statuses of 300 and above are returned as [`EmailError::Status`].
    async fn send(&self, email: &TemplatedEmail) -> EmailResult<u16>;
}
