// Public modules
pub mod aggregate;
pub mod classify;
pub mod config;
pub mod demo;
pub mod error;
pub mod executor;
pub mod notify;
pub mod runner;
pub mod types;

// Re-export commonly used items
pub use aggregate::ResultAggregator;
pub use classify::{StatusClassifier, DEFAULT_WARNING_RATIO};
pub use config::{
    interpolate_env, is_truthy, load_catalog, load_notification_config, EnvironmentProvider,
    MockEnvironment, SystemEnvironment,
};
pub use error::{ConfigError, ExecutionError, NotifyError};
pub use executor::{CheckExecutor, ExecutionMode, Measurement, DEFAULT_COMMAND_TIMEOUT};
pub use notify::{
    format_issue_message, format_summary_text, Channel, Notification, NotificationDispatcher,
    Sender,
};
pub use runner::CheckRunner;
pub use types::*;
