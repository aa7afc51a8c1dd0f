use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grouping of checks used for rollup reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckCategory {
    Os,
    Kubernetes,
    Services,
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckCategory::Os => write!(f, "OS"),
            CheckCategory::Kubernetes => write!(f, "Kubernetes"),
            CheckCategory::Services => write!(f, "Services"),
        }
    }
}

/// Verdict assigned to a check's measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Ok => write!(f, "OK"),
            CheckStatus::Warning => write!(f, "WARNING"),
            CheckStatus::Critical => write!(f, "CRITICAL"),
            CheckStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Structured evaluator tag for checks whose output needs reduction
/// rather than a plain threshold or string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    /// Lines of `name:ready/desired`; any ready != desired is an issue.
    ReplicaMatch,
}

/// One declarative probe loaded from the check catalog. Immutable after load.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub check_type: Option<CheckType>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub expected: Option<String>,
}

impl CheckDefinition {
    pub fn unit_str(&self) -> &str {
        self.unit.as_deref().unwrap_or("")
    }
}

/// The full check catalog, grouped by category in declaration order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckDefinitionSet {
    pub os: Vec<CheckDefinition>,
    pub kubernetes: Vec<CheckDefinition>,
    pub services: Vec<CheckDefinition>,
}

impl CheckDefinitionSet {
    /// All definitions in display order: OS, then Kubernetes, then Services.
    pub fn iter(&self) -> impl Iterator<Item = (CheckCategory, &CheckDefinition)> {
        self.os
            .iter()
            .map(|d| (CheckCategory::Os, d))
            .chain(self.kubernetes.iter().map(|d| (CheckCategory::Kubernetes, d)))
            .chain(self.services.iter().map(|d| (CheckCategory::Services, d)))
    }

    pub fn len(&self) -> usize {
        self.os.len() + self.kubernetes.len() + self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of one check in one run. Created exactly once per check and
/// immutable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub id: String,
    pub name: String,
    pub category: CheckCategory,
    pub description: String,
    pub status: CheckStatus,
    pub value: String,
    pub threshold: Option<f64>,
    pub unit: String,
    pub message: String,
    pub measured_at: DateTime<Utc>,
    #[serde(skip)]
    pub raw_output: String,
}

/// Per-status counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub ok: usize,
    pub warning: usize,
    pub critical: usize,
    pub unknown: usize,
}

impl StatusCounts {
    pub fn bump(&mut self, status: CheckStatus) {
        match status {
            CheckStatus::Ok => self.ok += 1,
            CheckStatus::Warning => self.warning += 1,
            CheckStatus::Critical => self.critical += 1,
            CheckStatus::Unknown => self.unknown += 1,
        }
    }

    pub fn sum(&self) -> usize {
        self.ok + self.warning + self.critical + self.unknown
    }
}

/// Derived rollup of a run. Always recomputed from the result set, so the
/// counts can never drift from the results they describe.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total: usize,
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub by_category: BTreeMap<CheckCategory, StatusCounts>,
}

impl Summary {
    pub fn has_issues(&self) -> bool {
        self.counts.warning > 0 || self.counts.critical > 0
    }
}

// --- Notification configuration ---

fn default_smtp_port() -> u16 {
    587
}

fn default_slack_channel() -> String {
    "#infra-alerts".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub sender: String,
    pub recipients: Vec<String>,
    pub use_tls: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: String::new(),
            smtp_port: default_smtp_port(),
            smtp_user: String::new(),
            smtp_password: String::new(),
            sender: String::new(),
            recipients: Vec::new(),
            use_tls: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    pub enabled: bool,
    pub webhook_url: String,
    pub channel: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            webhook_url: String::new(),
            channel: default_slack_channel(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TeamsConfig {
    pub enabled: bool,
    pub webhook_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    pub enabled: bool,
    pub webhook_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub enabled: bool,
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    pub enabled: bool,
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

/// Per-channel notification settings, fully materialized at load time.
/// Read-only for the duration of a run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub email: EmailConfig,
    pub slack: SlackConfig,
    pub teams: TeamsConfig,
    pub discord: DiscordConfig,
    pub telegram: TelegramConfig,
    pub webhook: WebhookConfig,
}
