use chrono::Utc;
use serde_json::json;

use crate::error::NotifyError;
use crate::notify::{http_client, truncate_body, Notification};
use crate::types::SlackConfig;

const MESSAGE_LIMIT: usize = 2000;

/// Slack incoming-webhook sender using Block Kit. The webhook format has no
/// attachment upload, so attachment paths are silently omitted.
pub struct SlackSender {
    cfg: SlackConfig,
}

impl SlackSender {
    pub fn new(cfg: SlackConfig) -> Self {
        Self { cfg }
    }

    pub fn build_payload(&self, n: &Notification<'_>) -> serde_json::Value {
        let counts = &n.summary.counts;
        let mut blocks = vec![
            json!({
                "type": "header",
                "text": {"type": "plain_text", "text": n.title}
            }),
            json!({"type": "divider"}),
            json!({
                "type": "section",
                "fields": [
                    {"type": "mrkdwn", "text": format!("*Checks:*\n{}", n.summary.total)},
                    {"type": "mrkdwn", "text": format!("*OK:*\n{}", counts.ok)},
                    {"type": "mrkdwn", "text": format!("*Warning:*\n{}", counts.warning)},
                    {"type": "mrkdwn", "text": format!("*Critical:*\n{}", counts.critical)}
                ]
            }),
            json!({"type": "divider"}),
            json!({
                "type": "context",
                "elements": [
                    {"type": "mrkdwn", "text": format!("Checked at {}", Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true))}
                ]
            }),
        ];

        if n.summary.has_issues() {
            blocks.push(json!({
                "type": "section",
                "text": {"type": "mrkdwn", "text": format!("```{}```", truncate_body(n.message, MESSAGE_LIMIT))}
            }));
        }

        json!({
            "channel": self.cfg.channel,
            "blocks": blocks,
        })
    }

    pub async fn send(&self, n: &Notification<'_>) -> Result<(), NotifyError> {
        let client = http_client()?;
        let res = client
            .post(&self.cfg.webhook_url)
            .json(&self.build_payload(n))
            .send()
            .await?;
        let status = res.status();
        if status.as_u16() != 200 {
            let body = res.text().await.unwrap_or_default();
            return Err(NotifyError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::tests::summary;

    fn sender() -> SlackSender {
        SlackSender::new(SlackConfig {
            enabled: true,
            webhook_url: "https://hooks.slack.com/services/T/B/x".to_string(),
            channel: "#infra-alerts".to_string(),
        })
    }

    #[test]
    fn test_payload_has_header_counters_and_channel() {
        let s = summary(28, 0, 0, 2);
        let n = Notification {
            title: "Weekly infrastructure check",
            message: "All checks passed.",
            summary: &s,
            attachments: &[],
        };
        let payload = sender().build_payload(&n);

        assert_eq!(payload["channel"], "#infra-alerts");
        let blocks = payload["blocks"].as_array().unwrap();
        // healthy summary: no fenced issue section
        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks[0]["text"]["text"], "Weekly infrastructure check");
        let fields = blocks[2]["fields"].as_array().unwrap();
        assert!(fields[0]["text"].as_str().unwrap().contains("30"));
        assert!(fields[1]["text"].as_str().unwrap().contains("28"));
    }

    #[test]
    fn test_payload_appends_issue_body_when_unhealthy() {
        let s = summary(28, 1, 1, 0);
        let n = Notification {
            title: "t",
            message: "Action required:\n[OS-001] CPU usage (CRITICAL): exceeds threshold (80%)",
            summary: &s,
            attachments: &[],
        };
        let payload = sender().build_payload(&n);
        let blocks = payload["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 6);
        let body = blocks[5]["text"]["text"].as_str().unwrap();
        assert!(body.starts_with("```"));
        assert!(body.contains("OS-001"));
    }

    #[test]
    fn test_payload_truncates_long_issue_body() {
        let s = summary(0, 30, 0, 0);
        let long = "x".repeat(5000);
        let n = Notification {
            title: "t",
            message: &long,
            summary: &s,
            attachments: &[],
        };
        let payload = sender().build_payload(&n);
        let body = payload["blocks"][5]["text"]["text"].as_str().unwrap();
        // 2000 chars plus the fencing backticks
        assert_eq!(body.len(), 2000 + 6);
    }
}
