use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::{PurgeError, PurgeHandlers, handlers::record_failure};
use crate::{
    email::TemplatedEmail,
    models::NotificationInput,
    observability::metrics,
};

impl PurgeHandlers {
    /// Tell the requester how many sessions were deleted.
    ///
    /// Any provider error or status of 300 and above is returned as
    /// [`PurgeError::Notification`]. Deletion state is unaffected.
    #[instrument(skip_all, fields(session_count = input.session_count))]
    pub async fn send_email(&self, input: &NotificationInput) -> Result<(), PurgeError> {
        self.notify(input).await.inspect_err(|e| {
            metrics::record_notification("error");
            record_failure(e);
        })
    }

    async fn notify(&self, input: &NotificationInput) -> Result<(), PurgeError> {
        let sender = self.email()?;
        let email = self.sessions_deleted_email(input);

        let status = sender
            .send(&email)
            .await
            .map_err(PurgeError::Notification)?;

        metrics::record_notification("sent");
        info!(status, "Sessions deleted notice sent");
        Ok(())
    }

    fn sessions_deleted_email(&self, input: &NotificationInput) -> TemplatedEmail {
        let mut dynamic_data = Map::new();
        dynamic_data.insert(
            "First_Name".to_string(),
            Value::String(input.first_name.clone()),
        );
        dynamic_data.insert(
            "Session_Count".to_string(),
            Value::from(input.session_count),
        );

        TemplatedEmail {
            template_id: self.settings.sessions_deleted_template_id.clone(),
            from_address: self.settings.from_address.clone(),
            from_name: self.settings.from_name.clone(),
            to: input.email.clone(),
            dynamic_data,
        }
    }
}
