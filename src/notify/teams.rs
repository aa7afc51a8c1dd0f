use chrono::Utc;
use serde_json::json;

use crate::error::NotifyError;
use crate::notify::{http_client, truncate_body, Notification};
use crate::types::{Summary, TeamsConfig};

const MESSAGE_LIMIT: usize = 2000;

/// Microsoft Teams webhook sender using the MessageCard format. No
/// attachment support; paths are silently omitted.
pub struct TeamsSender {
    cfg: TeamsConfig,
}

impl TeamsSender {
    pub fn new(cfg: TeamsConfig) -> Self {
        Self { cfg }
    }

    pub fn build_payload(&self, n: &Notification<'_>) -> serde_json::Value {
        let counts = &n.summary.counts;
        let mut sections = vec![json!({
            "activityTitle": n.title,
            "activitySubtitle": Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            "facts": [
                {"name": "Checks", "value": n.summary.total.to_string()},
                {"name": "OK", "value": counts.ok.to_string()},
                {"name": "Warning", "value": counts.warning.to_string()},
                {"name": "Critical", "value": counts.critical.to_string()},
                {"name": "Unknown", "value": counts.unknown.to_string()}
            ],
            "markdown": true
        })];
        if !n.message.is_empty() {
            sections.push(json!({
                "text": format!("```\n{}\n```", truncate_body(n.message, MESSAGE_LIMIT))
            }));
        }

        json!({
            "@type": "MessageCard",
            "@context": "http://schema.org/extensions",
            "themeColor": theme_color(n.summary),
            "summary": n.title,
            "sections": sections,
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

fn theme_color(summary: &Summary) -> &'static str {
    if summary.counts.critical > 0 {
        "FF0000"
    } else if summary.counts.warning > 0 {
        "FFA500"
    } else {
        "00FF00"
    }
}
