use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use infra_health_reporter::config::{
    is_truthy, load_catalog, load_notification_config, EnvironmentProvider, SystemEnvironment,
};
use infra_health_reporter::notify::{format_issue_message, Notification, NotificationDispatcher};
use infra_health_reporter::runner::CheckRunner;
use infra_health_reporter::ExecutionMode;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let env = SystemEnvironment;

    let catalog_path = env
        .get_var("CHECK_CONFIG")
        .unwrap_or_else(|| "config/check_items.yaml".to_string());
    let notify_path = env
        .get_var("NOTIFY_CONFIG")
        .unwrap_or_else(|| "config/notifications.yaml".to_string());

    let demo_mode = is_truthy(env.get_var("DEMO_MODE"));
    let mode = if demo_mode {
        ExecutionMode::Demo
    } else {
        ExecutionMode::Live
    };

    let catalog = load_catalog(Path::new(&catalog_path))
        .with_context(|| format!("failed to load check catalog from {catalog_path}"))?;
    info!(
        checks = catalog.len(),
        demo = demo_mode,
        "loaded check catalog from {}",
        catalog_path
    );

    let runner = CheckRunner::new(mode);
    let aggregator = runner.run_all(&catalog).await;

    let summary = aggregator.summary();
    info!(
        total = summary.total,
        ok = summary.counts.ok,
        warning = summary.counts.warning,
        critical = summary.counts.critical,
        unknown = summary.counts.unknown,
        "check run complete"
    );
    for (category, counts) in &summary.by_category {
        info!(
            "{}: {} ok, {} warning, {} critical, {} unknown",
            category, counts.ok, counts.warning, counts.critical, counts.unknown
        );
    }

    if is_truthy(env.get_var("JSON_OUTPUT")) {
        println!("{}", serde_json::to_string_pretty(&aggregator.to_json())?);
    }

    let notify = is_truthy(env.get_var("NOTIFY"));
    let notify_on_issues = is_truthy(env.get_var("NOTIFY_ON_ISSUES"));

    if notify || notify_on_issues {
        let notify_cfg = load_notification_config(Path::new(&notify_path), &env)
            .with_context(|| format!("failed to load notification config from {notify_path}"))?;
        let dispatcher = NotificationDispatcher::from_config(&notify_cfg);

        if dispatcher.channels().is_empty() {
            warn!("notification requested but no channels are configured");
        } else {
            let attachments: Vec<PathBuf> = env
                .get_var("REPORT_ATTACHMENTS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(PathBuf::from)
                        .collect()
                })
                .unwrap_or_default();

            let title = if demo_mode {
                "Infrastructure Health Report (demo)".to_string()
            } else {
                "Infrastructure Health Report".to_string()
            };
            let issues = aggregator.issues();
            let message = format_issue_message(&issues);
            let notification = Notification {
                title: &title,
                message: &message,
                summary: &summary,
                attachments: &attachments,
            };

            let outcomes = if notify_on_issues && !notify {
                dispatcher.send_if_issues(&notification, true, true).await
            } else {
                dispatcher.send_all(&notification).await
            };
            for (channel, ok) in &outcomes {
                if !ok {
                    warn!("notification to {} failed", channel);
                }
            }
        }
    }

    std::process::exit(aggregator.exit_code());
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}
