//! Multi-channel notification dispatch. Each channel owns its payload
//! shape; the dispatcher's contract is failure isolation: one channel's
//! error never aborts the others and never reaches the caller as an Err.

pub mod discord;
pub mod email;
pub mod slack;
pub mod teams;
pub mod telegram;
pub mod webhook;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::NotifyError;
use crate::types::{CheckResult, NotificationConfig, Summary};

pub use discord::DiscordSender;
pub use email::EmailSender;
pub use slack::SlackSender;
pub use teams::TeamsSender;
pub use telegram::TelegramSender;
pub use webhook::WebhookSender;

/// Timeout for a single webhook/bot-API send.
pub(crate) const HTTP_SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn http_client() -> Result<reqwest::Client, NotifyError> {
    Ok(reqwest::Client::builder()
        .timeout(HTTP_SEND_TIMEOUT)
        .build()?)
}

/// One notification transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Channel {
    Email,
    Slack,
    Teams,
    Discord,
    Telegram,
    Webhook,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Email => "email",
            Channel::Slack => "slack",
            Channel::Teams => "teams",
            Channel::Discord => "discord",
            Channel::Telegram => "telegram",
            Channel::Webhook => "webhook",
        };
        write!(f, "{}", name)
    }
}

/// Everything a sender needs for one dispatch.
#[derive(Debug, Clone, Copy)]
pub struct Notification<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub summary: &'a Summary,
    pub attachments: &'a [PathBuf],
}

/// Closed set of channel senders behind one `send` capability. An enum
/// rather than trait objects: the channel set is fixed and adding one is a
/// new variant plus a config flag.
pub enum Sender {
    Email(EmailSender),
    Slack(SlackSender),
    Teams(TeamsSender),
    Discord(DiscordSender),
    Telegram(TelegramSender),
    Webhook(WebhookSender),
}

impl Sender {
    pub fn channel(&self) -> Channel {
        match self {
            Sender::Email(_) => Channel::Email,
            Sender::Slack(_) => Channel::Slack,
            Sender::Teams(_) => Channel::Teams,
            Sender::Discord(_) => Channel::Discord,
            Sender::Telegram(_) => Channel::Telegram,
            Sender::Webhook(_) => Channel::Webhook,
        }
    }

    pub async fn send(&self, notification: &Notification<'_>) -> Result<(), NotifyError> {
        match self {
            Sender::Email(s) => s.send(notification).await,
            Sender::Slack(s) => s.send(notification).await,
            Sender::Teams(s) => s.send(notification).await,
            Sender::Discord(s) => s.send(notification).await,
            Sender::Telegram(s) => s.send(notification).await,
            Sender::Webhook(s) => s.send(notification).await,
        }
    }
}

/// Fans a summary out to every enabled channel, sequentially and
/// best-effort: one attempt per channel, failures logged and recorded as
/// `false` in the per-channel result map.
pub struct NotificationDispatcher {
    senders: Vec<Sender>,
}

impl NotificationDispatcher {
    pub fn new(senders: Vec<Sender>) -> Self {
        Self { senders }
    }

    /// Registers one sender per channel that is both enabled and configured.
    /// Enabled channels whose endpoint resolved to empty (unset env var) are
    /// skipped: not configured is not a failure.
    pub fn from_config(cfg: &NotificationConfig) -> Self {
        let mut senders = Vec::new();

        if cfg.email.enabled {
            if !cfg.email.smtp_server.is_empty() && !cfg.email.recipients.is_empty() {
                senders.push(Sender::Email(EmailSender::new(cfg.email.clone())));
            } else {
                warn!("email channel enabled but not configured, skipping");
            }
        }
        if cfg.slack.enabled {
            if !cfg.slack.webhook_url.is_empty() {
                senders.push(Sender::Slack(SlackSender::new(cfg.slack.clone())));
            } else {
                warn!("slack channel enabled but not configured, skipping");
            }
        }
        if cfg.teams.enabled {
            if !cfg.teams.webhook_url.is_empty() {
                senders.push(Sender::Teams(TeamsSender::new(cfg.teams.clone())));
            } else {
                warn!("teams channel enabled but not configured, skipping");
            }
        }
        if cfg.discord.enabled {
            if !cfg.discord.webhook_url.is_empty() {
                senders.push(Sender::Discord(DiscordSender::new(cfg.discord.clone())));
            } else {
                warn!("discord channel enabled but not configured, skipping");
            }
        }
        if cfg.telegram.enabled {
            if !cfg.telegram.bot_token.is_empty() && !cfg.telegram.chat_id.is_empty() {
                senders.push(Sender::Telegram(TelegramSender::new(cfg.telegram.clone())));
            } else {
                warn!("telegram channel enabled but not configured, skipping");
            }
        }
        if cfg.webhook.enabled {
            if !cfg.webhook.url.is_empty() {
                senders.push(Sender::Webhook(WebhookSender::new(cfg.webhook.clone())));
            } else {
                warn!("webhook channel enabled but not configured, skipping");
            }
        }

        Self { senders }
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.senders.iter().map(|s| s.channel()).collect()
    }

    pub async fn send_all(&self, notification: &Notification<'_>) -> BTreeMap<Channel, bool> {
        let mut outcome = BTreeMap::new();
        for sender in &self.senders {
            let channel = sender.channel();
            match sender.send(notification).await {
                Ok(()) => {
                    info!("notification sent via {}", channel);
                    outcome.insert(channel, true);
                }
                Err(e) => {
                    error!("{} notification failed: {}", channel, e);
                    outcome.insert(channel, false);
                }
            }
        }
        outcome
    }

    /// Dispatches only when the summary needs attention; otherwise returns
    /// an empty map without touching any channel.
    pub async fn send_if_issues(
        &self,
        notification: &Notification<'_>,
        send_on_warning: bool,
        send_on_critical: bool,
    ) -> BTreeMap<Channel, bool> {
        let counts = &notification.summary.counts;
        let should_send = (send_on_warning && counts.warning > 0)
            || (send_on_critical && counts.critical > 0);
        if should_send {
            self.send_all(notification).await
        } else {
            BTreeMap::new()
        }
    }
}

/// Plain-text rollup shared by the text-oriented channels.
pub fn format_summary_text(summary: &Summary) -> String {
    format!(
        "Checks run: {}\nOK: {}\nWarning: {}\nCritical: {}\nUnknown: {}",
        summary.total,
        summary.counts.ok,
        summary.counts.warning,
        summary.counts.critical,
        summary.counts.unknown,
    )
}

/// Message body listing the checks that need operator attention.
pub fn format_issue_message(issues: &[&CheckResult]) -> String {
    if issues.is_empty() {
        return "All checks passed.".to_string();
    }
    let mut lines = vec!["Action required:".to_string()];
    for issue in issues {
        lines.push(format!(
            "[{}] {} ({}): {}",
            issue.id, issue.name, issue.status, issue.message
        ));
    }
    lines.join("\n")
}

pub(crate) fn truncate_body(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
