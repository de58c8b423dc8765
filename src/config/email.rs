use serde::{Deserialize, Serialize};

/// Transactional email (SendGrid) configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    /// SendGrid API key.
    pub api_key: String,

    /// API base URL. Overridden in tests and for regional endpoints.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sender address.
    pub from_address: String,

    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Dynamic template used for the "sessions deleted" notice.
    pub sessions_deleted_template_id: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("api_key", &"****")
            .field("base_url", &self.base_url)
            .field("from_address", &self.from_address)
            .field("from_name", &self.from_name)
            .field(
                "sessions_deleted_template_id",
                &self.sessions_deleted_template_id,
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl EmailConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_empty() {
            return Err("email.api_key cannot be empty".to_string());
        }
        if !self.from_address.contains('@') {
            return Err(format!(
                "email.from_address '{}' is not an email address",
                self.from_address
            ));
        }
        if self.sessions_deleted_template_id.is_empty() {
            return Err("email.sessions_deleted_template_id cannot be empty".to_string());
        }
        if let Err(e) = url::Url::parse(&self.base_url) {
            return Err(format!("email.base_url is not a valid URL: {e}"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "https://api.sendgrid.com".to_string()
}

fn default_from_name() -> String {
    "Notifications".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}
