use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::ConfigError;
use crate::types::{CheckDefinitionSet, NotificationConfig};

/// Source of environment variables. Abstracted so `${VAR}` interpolation
/// and flag parsing are testable without touching the process environment.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment.
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment for tests.
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Truthiness parsing for flag variables: "1", "true" (any case) are true.
pub fn is_truthy(value: Option<String>) -> bool {
    value
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(false)
}

/// Resolves `${VAR_NAME}` placeholders against the environment. Unset
/// variables resolve to the empty string; text without a closing brace is
/// left as-is.
pub fn interpolate_env<E: EnvironmentProvider>(input: &str, env: &E) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if let Some(value) = env.get_var(var) {
                    out.push_str(&value);
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[derive(Debug, serde::Deserialize)]
struct CatalogFile {
    check_items: CheckDefinitionSet,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct NotificationFile {
    notifications: NotificationConfig,
}

/// Loads and validates the check catalog. Any malformed definition is fatal:
/// the run must not start against a partially-loaded catalog.
pub fn load_catalog(path: &Path) -> Result<CheckDefinitionSet, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: CatalogFile = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_catalog(&file.check_items)?;
    Ok(file.check_items)
}

fn validate_catalog(set: &CheckDefinitionSet) -> Result<(), ConfigError> {
    for (category, defs) in [
        ("os", &set.os),
        ("kubernetes", &set.kubernetes),
        ("services", &set.services),
    ] {
        let mut seen: HashSet<&str> = HashSet::new();
        for def in defs {
            if def.id.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "check without an id in category '{}'",
                    category
                )));
            }
            if !seen.insert(def.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate check id '{}' in category '{}'",
                    def.id, category
                )));
            }
            if def.command.is_none() && def.check_type.is_none() {
                return Err(ConfigError::Invalid(format!(
                    "check '{}' has neither a command nor a check_type",
                    def.id
                )));
            }
        }
    }
    Ok(())
}

/// Loads notification settings from the `notifications:` section of a YAML
/// file, resolving `${VAR}` placeholders once. A missing file means all
/// channels stay disabled.
pub fn load_notification_config<E: EnvironmentProvider>(
    path: &Path,
    env: &E,
) -> Result<NotificationConfig, ConfigError> {
    if !path.exists() {
        return Ok(NotificationConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: NotificationFile =
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let mut cfg = file.notifications;
    resolve_placeholders(&mut cfg, env);
    Ok(cfg)
}

fn resolve_placeholders<E: EnvironmentProvider>(cfg: &mut NotificationConfig, env: &E) {
    let fix = |s: &mut String| *s = interpolate_env(s, env);

    fix(&mut cfg.email.smtp_server);
    fix(&mut cfg.email.smtp_user);
    fix(&mut cfg.email.smtp_password);
    fix(&mut cfg.email.sender);
    for recipient in &mut cfg.email.recipients {
        fix(recipient);
    }
    fix(&mut cfg.slack.webhook_url);
    fix(&mut cfg.slack.channel);
    fix(&mut cfg.teams.webhook_url);
    fix(&mut cfg.discord.webhook_url);
    fix(&mut cfg.telegram.bot_token);
    fix(&mut cfg.telegram.chat_id);
    fix(&mut cfg.webhook.url);
    for value in cfg.webhook.headers.values_mut() {
        fix(value);
    }
}
