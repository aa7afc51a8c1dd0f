use chrono::Utc;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::warn;

use crate::error::NotifyError;
use crate::notify::Notification;
use crate::types::EmailConfig;

/// SMTP sender composing a MIME multipart message: HTML summary body plus
/// the report files as octet-stream attachments. The SMTP connection lives
/// for exactly one send.
pub struct EmailSender {
    cfg: EmailConfig,
}

impl EmailSender {
    pub fn new(cfg: EmailConfig) -> Self {
        Self { cfg }
    }

    pub fn build_message(&self, n: &Notification<'_>) -> Result<Message, NotifyError> {
        let mut builder = Message::builder().subject(n.title.to_string());
        builder = builder.from(parse_mailbox(&self.cfg.sender)?);
        for recipient in &self.cfg.recipients {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        let mut multipart = MultiPart::mixed().singlepart(SinglePart::html(build_html_body(n)));
        for path in n.attachments {
            let bytes = match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("email attachment {} not readable: {}", path.display(), e);
                    continue;
                }
            };
            let filename = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| "attachment".to_string());
            let content_type = ContentType::parse("application/octet-stream")
                .map_err(|e| NotifyError::Smtp(e.to_string()))?;
            multipart = multipart.singlepart(Attachment::new(filename).body(bytes, content_type));
        }

        builder
            .multipart(multipart)
            .map_err(|e| NotifyError::Smtp(e.to_string()))
    }

    pub async fn send(&self, n: &Notification<'_>) -> Result<(), NotifyError> {
        let message = self.build_message(n)?;

        let mut transport = if self.cfg.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.cfg.smtp_server)
                .map_err(|e| NotifyError::Smtp(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.cfg.smtp_server)
        };
        transport = transport.port(self.cfg.smtp_port);
        if !self.cfg.smtp_user.is_empty() {
            transport = transport.credentials(Credentials::new(
                self.cfg.smtp_user.clone(),
                self.cfg.smtp_password.clone(),
            ));
        }

        transport
            .build()
            .send(message)
            .await
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<lettre::message::Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|e| NotifyError::Smtp(format!("invalid address '{}': {}", address, e)))
}

fn build_html_body(n: &Notification<'_>) -> String {
    let counts = &n.summary.counts;
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <style>
        body {{ font-family: Arial, sans-serif; }}
        .header {{ background: #2c3e50; color: white; padding: 20px; text-align: center; }}
        .summary {{ display: flex; justify-content: space-around; padding: 20px; background: #ecf0f1; }}
        .stat {{ text-align: center; padding: 15px; border-radius: 8px; min-width: 80px; color: white; }}
        .ok {{ background: #27ae60; }}
        .warning {{ background: #f39c12; }}
        .critical {{ background: #e74c3c; }}
        .unknown {{ background: #95a5a6; }}
        .content {{ padding: 20px; }}
        .footer {{ background: #34495e; color: white; padding: 10px; text-align: center; font-size: 12px; }}
    </style>
</head>
<body>
    <div class="header">
        <h1>{title}</h1>
        <p>Generated {generated}</p>
    </div>
    <div class="summary">
        <div class="stat ok"><h2>{ok}</h2><p>OK</p></div>
        <div class="stat warning"><h2>{warning}</h2><p>Warning</p></div>
        <div class="stat critical"><h2>{critical}</h2><p>Critical</p></div>
        <div class="stat unknown"><h2>{unknown}</h2><p>Unknown</p></div>
    </div>
    <div class="content">
        <h3>Details</h3>
        <pre>{message}</pre>
    </div>
    <div class="footer">
        <p>Sent automatically by infra-health-reporter.</p>
    </div>
</body>
</html>
"#,
        title = n.title,
        generated = Utc::now().format("%Y-%m-%d %H:%M:%S"),
        ok = counts.ok,
        warning = counts.warning,
        critical = counts.critical,
        unknown = counts.unknown,
        message = n.message,
    )
}
