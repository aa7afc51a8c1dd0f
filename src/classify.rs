use crate::executor::Measurement;
use crate::types::{CheckDefinition, CheckStatus, CheckType};

/// Fraction of the threshold at which a value starts to WARN. A value at or
/// above `threshold * ratio` but below the threshold itself is WARNING.
pub const DEFAULT_WARNING_RATIO: f64 = 0.8;

/// Maps a raw measurement plus its check definition to a status verdict.
/// Pure logic; an execution error always overrides whatever mode the
/// definition selects.
#[derive(Debug, Clone, Copy)]
pub struct StatusClassifier {
    warning_ratio: f64,
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusClassifier {
    pub fn new() -> Self {
        Self {
            warning_ratio: DEFAULT_WARNING_RATIO,
        }
    }

    pub fn with_warning_ratio(warning_ratio: f64) -> Self {
        Self { warning_ratio }
    }

    pub fn classify(
        &self,
        measurement: &Measurement,
        definition: &CheckDefinition,
    ) -> (CheckStatus, String) {
        match measurement {
            Measurement::Failed { error } => {
                (CheckStatus::Unknown, format!("execution failed: {}", error))
            }
            Measurement::Canned {
                status, message, ..
            } => (*status, message.clone()),
            Measurement::Observed { raw_value } => self.classify_value(raw_value, definition),
        }
    }

    fn classify_value(&self, raw_value: &str, definition: &CheckDefinition) -> (CheckStatus, String) {
        if definition.check_type == Some(CheckType::ReplicaMatch) {
            return classify_replicas(raw_value);
        }
        if let Some(threshold) = definition.threshold {
            return self.classify_threshold(raw_value, threshold, definition.unit_str());
        }
        if let Some(expected) = definition.expected.as_deref() {
            return classify_expected(raw_value, expected);
        }
        // Informational check: the value is carried through for display only.
        (CheckStatus::Ok, "confirmed normal".to_string())
    }

    fn classify_threshold(
        &self,
        raw_value: &str,
        threshold: f64,
        unit: &str,
    ) -> (CheckStatus, String) {
        let Some(value) = extract_numeric(raw_value) else {
            return (
                CheckStatus::Unknown,
                format!("non-numeric value: {}", raw_value.trim()),
            );
        };
        if value >= threshold {
            (
                CheckStatus::Critical,
                format!("exceeds threshold ({}{})", threshold, unit),
            )
        } else if value >= threshold * self.warning_ratio {
            (
                CheckStatus::Warning,
                format!("approaching threshold ({}{})", threshold, unit),
            )
        } else {
            (CheckStatus::Ok, "within normal range".to_string())
        }
    }
}

fn classify_expected(raw_value: &str, expected: &str) -> (CheckStatus, String) {
    let value = raw_value.trim();
    if value.is_empty() {
        return (CheckStatus::Unknown, "no value to compare".to_string());
    }
    if value == expected {
        (CheckStatus::Ok, "matches expected value".to_string())
    } else {
        (
            CheckStatus::Critical,
            format!("expected '{}', got '{}'", expected, value),
        )
    }
}

/// Reduces a `name:ready/desired` listing to a verdict. No parseable
/// resource lines is vacuously OK: a selector that matches nothing is not a
/// failure.
fn classify_replicas(raw_value: &str) -> (CheckStatus, String) {
    let mut total = 0usize;
    let mut issues: Vec<&str> = Vec::new();
    for line in raw_value.lines() {
        let line = line.trim();
        let Some((name, replicas)) = line.rsplit_once(':') else {
            continue;
        };
        let Some((ready, desired)) = replicas.split_once('/') else {
            continue;
        };
        total += 1;
        if ready.trim() != desired.trim() {
            issues.push(name);
        }
    }

    if total == 0 {
        return (CheckStatus::Ok, "no matching resources".to_string());
    }
    match issues.len() {
        0 => (
            CheckStatus::Ok,
            format!("all {} resources at desired replicas", total),
        ),
        1..=2 => (
            CheckStatus::Warning,
            format!("replica mismatch: {}", issues.join(", ")),
        ),
        n => (
            CheckStatus::Critical,
            format!("{} resources below desired replicas", n),
        ),
    }
}

/// Extracts the leading numeric token from a measurement, skipping unit
/// prefixes and stripping suffixes like `%`.
fn extract_numeric(raw_value: &str) -> Option<f64> {
    let s = raw_value.trim();
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let mut end = start;
    let mut seen_dot = false;
    for (i, c) in s[start..].char_indices() {
        if c.is_ascii_digit() {
            end = start + i + 1;
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            end = start + i + 1;
        } else {
            break;
        }
    }
    s[start..end].trim_end_matches('.').parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExecutionError;

    #[test]
    fn test_threshold_bands() {
        let c = StatusClassifier::new();
        let def = threshold_def(80.0);

        assert_eq!(verdict(&c, "45", &def), CheckStatus::Ok);
        assert_eq!(verdict(&c, "75", &def), CheckStatus::Warning);
        assert_eq!(verdict(&c, "85", &def), CheckStatus::Critical);
        // lower band boundary is WARNING, not OK
        assert_eq!(verdict(&c, "64", &def), CheckStatus::Warning);
        assert_eq!(verdict(&c, "63.999", &def), CheckStatus::Ok);
        // threshold itself is CRITICAL
        assert_eq!(verdict(&c, "80", &def), CheckStatus::Critical);
    }

    #[test]
    fn test_threshold_messages_carry_threshold_and_unit() {
        let c = StatusClassifier::new();
        let def = threshold_def(80.0);
        let (status, message) = c.classify(&observed("75"), &def);
        assert_eq!(status, CheckStatus::Warning);
        assert_eq!(message, "approaching threshold (80%)");
        let (_, message) = c.classify(&observed("99"), &def);
        assert_eq!(message, "exceeds threshold (80%)");
    }

    #[test]
    fn test_threshold_strips_percent_and_suffixes() {
        let c = StatusClassifier::new();
        let def = threshold_def(80.0);
        assert_eq!(verdict(&c, "85%", &def), CheckStatus::Critical);
        assert_eq!(verdict(&c, " 45 % ", &def), CheckStatus::Ok);
        assert_eq!(verdict(&c, "62.5%", &def), CheckStatus::Ok);
    }

    #[test]
    fn test_threshold_non_numeric_is_unknown() {
        let c = StatusClassifier::new();
        let def = threshold_def(80.0);
        let (status, message) = c.classify(&observed("not-a-number"), &def);
        assert_eq!(status, CheckStatus::Unknown);
        assert!(message.contains("non-numeric"));
    }

    #[test]
    fn test_custom_warning_ratio() {
        let c = StatusClassifier::with_warning_ratio(0.5);
        let def = threshold_def(100.0);
        assert_eq!(verdict(&c, "49", &def), CheckStatus::Ok);
        assert_eq!(verdict(&c, "50", &def), CheckStatus::Warning);
        assert_eq!(verdict(&c, "99", &def), CheckStatus::Warning);
        assert_eq!(verdict(&c, "100", &def), CheckStatus::Critical);
    }

    #[test]
    fn test_expected_value_mode() {
        let c = StatusClassifier::new();
        let def = expected_def("v1.28.4");
        assert_eq!(verdict(&c, "v1.28.4", &def), CheckStatus::Ok);
        assert_eq!(verdict(&c, "v1.27.0", &def), CheckStatus::Critical);
        // case-sensitive
        assert_eq!(verdict(&c, "V1.28.4", &def), CheckStatus::Critical);
        let (status, _) = c.classify(&observed("   "), &def);
        assert_eq!(status, CheckStatus::Unknown);
    }

    #[test]
    fn test_informational_is_always_ok() {
        let c = StatusClassifier::new();
        let def = plain_def();
        let (status, message) = c.classify(&observed("5.15.0-91-generic"), &def);
        assert_eq!(status, CheckStatus::Ok);
        assert_eq!(message, "confirmed normal");
    }

    #[test]
    fn test_execution_error_overrides_all_modes() {
        let c = StatusClassifier::new();
        let failed = Measurement::Failed {
            error: ExecutionError::Timeout(30),
        };
        for def in [threshold_def(80.0), expected_def("Ready"), plain_def()] {
            let (status, message) = c.classify(&failed, &def);
            assert_eq!(status, CheckStatus::Unknown);
            assert!(message.contains("timed out"), "message: {}", message);
        }
    }

    #[test]
    fn test_canned_hint_passes_through() {
        let c = StatusClassifier::new();
        let canned = Measurement::Canned {
            raw_value: "45".to_string(),
            status: CheckStatus::Warning,
            message: "approaching threshold".to_string(),
        };
        // even with a threshold on the definition, the hint wins
        let (status, message) = c.classify(&canned, &threshold_def(80.0));
        assert_eq!(status, CheckStatus::Warning);
        assert_eq!(message, "approaching threshold");
    }

    #[test]
    fn test_replica_match_all_healthy() {
        let c = StatusClassifier::new();
        let def = replica_def();
        let (status, message) =
            c.classify(&observed("nginx:3/3\napi:2/2\nredis:1/1"), &def);
        assert_eq!(status, CheckStatus::Ok);
        assert_eq!(message, "all 3 resources at desired replicas");
    }

    #[test]
    fn test_replica_match_few_issues_warn_with_names() {
        let c = StatusClassifier::new();
        let def = replica_def();
        let (status, message) =
            c.classify(&observed("nginx:2/3\napi:2/2\nredis:0/1"), &def);
        assert_eq!(status, CheckStatus::Warning);
        assert_eq!(message, "replica mismatch: nginx, redis");
    }

    #[test]
    fn test_replica_match_many_issues_critical() {
        let c = StatusClassifier::new();
        let def = replica_def();
        let (status, message) =
            c.classify(&observed("a:0/1\nb:1/2\nc:2/3\nd:3/3"), &def);
        assert_eq!(status, CheckStatus::Critical);
        assert_eq!(message, "3 resources below desired replicas");
    }

    #[test]
    fn test_replica_match_no_resources_is_vacuously_ok() {
        let c = StatusClassifier::new();
        let def = replica_def();
        for raw in ["", "N/A", "no resources found"] {
            let (status, message) = c.classify(&observed(raw), &def);
            assert_eq!(status, CheckStatus::Ok, "raw: {:?}", raw);
            assert_eq!(message, "no matching resources");
        }
    }

    #[test]
    fn test_extract_numeric() {
        assert_eq!(extract_numeric("45"), Some(45.0));
        assert_eq!(extract_numeric("62.5%"), Some(62.5));
        assert_eq!(extract_numeric("load: 1.25"), Some(1.25));
        assert_eq!(extract_numeric("1.2.3"), Some(1.2));
        assert_eq!(extract_numeric("42."), Some(42.0));
        assert_eq!(extract_numeric("nothing here"), None);
        assert_eq!(extract_numeric(""), None);
    }

    fn verdict(c: &StatusClassifier, raw: &str, def: &CheckDefinition) -> CheckStatus {
        c.classify(&observed(raw), def).0
    }

    fn observed(raw: &str) -> Measurement {
        Measurement::Observed {
            raw_value: raw.to_string(),
        }
    }

    fn base_def() -> CheckDefinition {
        CheckDefinition {
            id: "T-001".to_string(),
            name: "test".to_string(),
            description: String::new(),
            command: Some("true".to_string()),
            check_type: None,
            threshold: None,
            unit: None,
            expected: None,
        }
    }

    fn threshold_def(threshold: f64) -> CheckDefinition {
        CheckDefinition {
            threshold: Some(threshold),
            unit: Some("%".to_string()),
            ..base_def()
        }
    }

    fn expected_def(expected: &str) -> CheckDefinition {
        CheckDefinition {
            expected: Some(expected.to_string()),
            ..base_def()
        }
    }

    fn replica_def() -> CheckDefinition {
        CheckDefinition {
            check_type: Some(CheckType::ReplicaMatch),
            ..base_def()
        }
    }

    fn plain_def() -> CheckDefinition {
        base_def()
    }
}
