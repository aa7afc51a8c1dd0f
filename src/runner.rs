use chrono::Utc;
use tracing::warn;

use crate::aggregate::ResultAggregator;
use crate::classify::StatusClassifier;
use crate::executor::{CheckExecutor, ExecutionMode, Measurement};
use crate::types::{CheckCategory, CheckDefinition, CheckDefinitionSet, CheckResult, CheckStatus};

const VALUE_DISPLAY_LIMIT: usize = 300;
const RAW_OUTPUT_LIMIT: usize = 500;

/// Drives one run: executes every catalog definition in declaration order,
/// classifies each measurement and feeds the aggregator. Every check yields
/// exactly one CheckResult, including on total failure.
pub struct CheckRunner {
    executor: CheckExecutor,
    classifier: StatusClassifier,
}

impl CheckRunner {
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            executor: CheckExecutor::new(mode),
            classifier: StatusClassifier::new(),
        }
    }

    pub fn with_components(executor: CheckExecutor, classifier: StatusClassifier) -> Self {
        Self {
            executor,
            classifier,
        }
    }

    pub async fn run_all(&self, catalog: &CheckDefinitionSet) -> ResultAggregator {
        let mut aggregator =
            ResultAggregator::new(self.executor.mode() == ExecutionMode::Demo);
        for (category, definition) in catalog.iter() {
            let measurement = self.executor.execute(definition).await;
            let (status, message) = self.classifier.classify(&measurement, definition);
            if status != CheckStatus::Ok {
                warn!("[{}] {}: {} - {}", definition.id, definition.name, status, message);
            }
            aggregator.add(build_result(category, definition, &measurement, status, message));
        }
        aggregator
    }
}

fn build_result(
    category: CheckCategory,
    definition: &CheckDefinition,
    measurement: &Measurement,
    status: CheckStatus,
    message: String,
) -> CheckResult {
    let (value, raw_output) = match measurement {
        Measurement::Observed { raw_value } | Measurement::Canned { raw_value, .. } => (
            truncate(raw_value, VALUE_DISPLAY_LIMIT),
            truncate(raw_value, RAW_OUTPUT_LIMIT),
        ),
        Measurement::Failed { .. } => ("N/A".to_string(), String::new()),
    };
    CheckResult {
        id: definition.id.clone(),
        name: definition.name.clone(),
        category,
        description: definition.description.clone(),
        status,
        value,
        threshold: definition.threshold,
        unit: definition.unit_str().to_string(),
        message,
        measured_at: Utc::now(),
        raw_output,
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => s[..i].to_string(),
        None => s.to_string(),
    }
}
