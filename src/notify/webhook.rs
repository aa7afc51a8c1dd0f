use chrono::Utc;
use serde_json::json;

use crate::error::NotifyError;
use crate::notify::{http_client, Notification};
use crate::types::WebhookConfig;

/// Generic webhook sender posting a normalized JSON body. Attachment paths
/// are listed, not uploaded; receivers that want the files fetch them
/// through other means.
pub struct WebhookSender {
    cfg: WebhookConfig,
}

impl WebhookSender {
    pub fn new(cfg: WebhookConfig) -> Self {
        Self { cfg }
    }

    pub fn build_payload(&self, n: &Notification<'_>) -> serde_json::Value {
        let attachments: Vec<String> = n
            .attachments
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        json!({
            "title": n.title,
            "message": n.message,
            "summary": n.summary,
            "timestamp": Utc::now().to_rfc3339(),
            "attachments": attachments,
        })
    }

    pub async fn send(&self, n: &Notification<'_>) -> Result<(), NotifyError> {
        let client = http_client()?;
        let mut req = client.post(&self.cfg.url).json(&self.build_payload(n));
        for (name, value) in &self.cfg.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        let res = req.send().await?;
        let status = res.status().as_u16();
        if !matches!(status, 200 | 201 | 202 | 204) {
            let body = res.text().await.unwrap_or_default();
            return Err(NotifyError::UnexpectedStatus { status, body });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::tests::summary;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    #[test]
    fn test_payload_is_normalized_json() {
        let sender = WebhookSender::new(WebhookConfig {
            enabled: true,
            url: "https://example.com/hook".to_string(),
            headers: BTreeMap::new(),
        });
        let s = summary(28, 1, 0, 1);
        let attachments = [PathBuf::from("/tmp/report.csv")];
        let n = Notification {
            title: "Infra check",
            message: "Action required:\n[K8S-001] Node status",
            summary: &s,
            attachments: &attachments,
        };
        let payload = sender.build_payload(&n);

        assert_eq!(payload["title"], "Infra check");
        assert_eq!(payload["summary"]["total"], 30);
        assert_eq!(payload["summary"]["warning"], 1);
        assert_eq!(payload["attachments"][0], "/tmp/report.csv");
        assert!(payload["timestamp"].is_string());
    }
}
