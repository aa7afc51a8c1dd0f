use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::error::NotifyError;
use crate::notify::{format_summary_text, http_client, Notification};
use crate::types::TelegramConfig;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Telegram bot-API sender. Sends the summary as a Markdown message, then
/// uploads each attachment through `sendDocument`. A failed attachment
/// upload is logged but does not fail the send.
pub struct TelegramSender {
    cfg: TelegramConfig,
    api_base: String,
}

impl TelegramSender {
    pub fn new(cfg: TelegramConfig) -> Self {
        Self {
            cfg,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Points the sender at an alternate API host. Test seam.
    pub fn with_api_base(cfg: TelegramConfig, api_base: impl Into<String>) -> Self {
        Self {
            cfg,
            api_base: api_base.into(),
        }
    }

    pub fn build_text(&self, n: &Notification<'_>) -> String {
        format!(
            "*{}*\n\n{}\nChecked at {}",
            n.title,
            format_summary_text(n.summary),
            Utc::now().format("%Y-%m-%d %H:%M:%S"),
        )
    }

    pub async fn send(&self, n: &Notification<'_>) -> Result<(), NotifyError> {
        let client = http_client()?;
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.cfg.bot_token);
        let payload = json!({
            "chat_id": self.cfg.chat_id,
            "text": self.build_text(n),
            "parse_mode": "Markdown",
        });
        let res = client.post(&url).json(&payload).send().await?;
        let status = res.status();
        if status.as_u16() != 200 {
            let body = res.text().await.unwrap_or_default();
            return Err(NotifyError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        for path in n.attachments {
            if let Err(e) = self.send_document(&client, path).await {
                warn!("telegram attachment {} not sent: {}", path.display(), e);
            }
        }
        Ok(())
    }

    async fn send_document(
        &self,
        client: &reqwest::Client,
        path: &std::path::Path,
    ) -> Result<(), NotifyError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| NotifyError::Attachment {
                path: path.to_path_buf(),
                source,
            })?;
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        let form = reqwest::multipart::Form::new()
            .text("chat_id", self.cfg.chat_id.clone())
            .part(
                "document",
                reqwest::multipart::Part::bytes(bytes).file_name(filename),
            );

        let url = format!("{}/bot{}/sendDocument", self.api_base, self.cfg.bot_token);
        let res = client.post(&url).multipart(form).send().await?;
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
