use async_trait::async_trait;
use serde::Serialize;

use super::{Notifier, NotifyError};

#[derive(Debug, Serialize)]
struct NotifyPayload<'a> {
    title: &'a str,
    body: &'a str,
}

/// Posts notifications as JSON to an Apprise API `/notify` endpoint.
pub struct HttpNotifier {
    client: reqwest::Client,
    url: String,
}

impl HttpNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        self.client
            .post(&self.url)
            .json(&NotifyPayload { title, body })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = NotifyPayload {
            title: "Docker Watchdog",
            body: "Restarted: web (abc123def456)",
        };
        let json = serde_json::to_value(&payload).expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Docker Watchdog",
                "body": "Restarted: web (abc123def456)",
            })
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_http_error() {
        let notifier = HttpNotifier::new("http://127.0.0.1:9/notify".to_string());
        let err = notifier.notify("title", "body").await.unwrap_err();
        assert!(matches!(err, NotifyError::Http(_)));
    }
}
