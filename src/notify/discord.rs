use chrono::Utc;
use serde_json::json;

use crate::error::NotifyError;
use crate::notify::{http_client, truncate_body, Notification};
use crate::types::{DiscordConfig, Summary};

const MESSAGE_LIMIT: usize = 2000;

/// Discord webhook sender using a single embed. No attachment support;
/// paths are silently omitted.
pub struct DiscordSender {
    cfg: DiscordConfig,
}

impl DiscordSender {
    pub fn new(cfg: DiscordConfig) -> Self {
        Self { cfg }
    }

    pub fn build_payload(&self, n: &Notification<'_>) -> serde_json::Value {
        let counts = &n.summary.counts;
        let mut embed = json!({
            "title": n.title,
            "color": embed_color(n.summary),
            "timestamp": Utc::now().to_rfc3339(),
            "fields": [
                {"name": "Checks", "value": n.summary.total.to_string(), "inline": true},
                {"name": "OK", "value": counts.ok.to_string(), "inline": true},
                {"name": "Warning", "value": counts.warning.to_string(), "inline": true},
                {"name": "Critical", "value": counts.critical.to_string(), "inline": true},
                {"name": "Unknown", "value": counts.unknown.to_string(), "inline": true}
            ],
            "footer": {"text": "infra-health-reporter"}
        });
        if !n.message.is_empty() {
            embed["description"] =
                json!(format!("```\n{}\n```", truncate_body(n.message, MESSAGE_LIMIT)));
        }

        json!({ "embeds": [embed] })
    }

    pub async fn send(&self, n: &Notification<'_>) -> Result<(), NotifyError> {
        let client = http_client()?;
        let res = client
            .post(&self.cfg.webhook_url)
            .json(&self.build_payload(n))
            .send()
            .await?;
        let status = res.status().as_u16();
        if !matches!(status, 200 | 204) {
            let body = res.text().await.unwrap_or_default();
            return Err(NotifyError::UnexpectedStatus { status, body });
        }
        Ok(())
    }
}

fn embed_color(summary: &Summary) -> u32 {
    if summary.counts.critical > 0 {
        0x00FF_0000
    } else if summary.counts.warning > 0 {
        0x00FF_A500
    } else {
        0x0000_FF00
    }
}
