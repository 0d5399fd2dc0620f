//! Failure notification registration
//!
//! When the run input carries a notification email, a webhook is registered
//! for failed and timed-out runs. The hosting platform owns delivery; this
//! side only describes the registration and records it.

use serde::Serialize;
use std::sync::Mutex;
use tracing::info;

use super::WebhookRegistrar;
use crate::Result;
use crate::constants::webhook::{EVENT_TYPES, REQUEST_URL};

/// A webhook registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRegistration {
    pub event_types: Vec<String>,
    pub request_url: String,
    pub payload_template: String,
}

impl WebhookRegistration {
    /// Registration that mails run failures to `email`
    pub fn for_email(email: &str) -> Self {
        let email = serde_json::Value::String(email.to_string());
        Self {
            event_types: EVENT_TYPES.iter().map(|event| event.to_string()).collect(),
            request_url: REQUEST_URL.to_string(),
            payload_template: format!(
                r#"{{"notificationEmail": {}, "eventType": {{{{eventType}}}}, "eventData": {{{{eventData}}}}, "resource": {{{{resource}}}} }}"#,
                email
            ),
        }
    }
}

/// Logs registrations and keeps them for inspection
#[derive(Debug, Default)]
pub struct LoggingWebhookRegistrar {
    registered: Mutex<Vec<WebhookRegistration>>,
}

impl LoggingWebhookRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registrations(&self) -> Vec<WebhookRegistration> {
        self.registered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl WebhookRegistrar for LoggingWebhookRegistrar {
    async fn register(&self, registration: &WebhookRegistration) -> Result<()> {
        info!(
            "Registering failure webhook for {} -> {}",
            registration.event_types.join(", "),
            registration.request_url
        );
        self.registered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(registration.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::webhook::{EVENT_RUN_FAILED, EVENT_RUN_TIMED_OUT};

    #[test]
    fn test_registration_for_email() {
        let registration = WebhookRegistration::for_email("ops@example.org");

        assert_eq!(
            registration.event_types,
            vec![EVENT_RUN_FAILED.to_string(), EVENT_RUN_TIMED_OUT.to_string()]
        );
        assert_eq!(
            registration.payload_template,
            r#"{"notificationEmail": "ops@example.org", "eventType": {{eventType}}, "eventData": {{eventData}}, "resource": {{resource}} }"#
        );
    }

    #[test]
    fn test_email_is_escaped_in_template() {
        let registration = WebhookRegistration::for_email("a\"b@example.org");
        assert!(
            registration
                .payload_template
                .contains(r#""notificationEmail": "a\"b@example.org""#)
        );
    }

    #[tokio::test]
    async fn test_logging_registrar_records_registrations() {
        let registrar = LoggingWebhookRegistrar::new();
        registrar
            .register(&WebhookRegistration::for_email("ops@example.org"))
            .await
            .unwrap();

        assert_eq!(registrar.registrations().len(), 1);
    }
}
