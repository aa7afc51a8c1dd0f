use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use serde_json::json;

use crate::types::{CheckResult, CheckStatus, StatusCounts, Summary};

/// Collects the results of one run and derives the summary, JSON result set
/// and process exit code from them. Results keep catalog declaration order;
/// re-adding an id replaces the stored result in place so derived counts
/// move with it instead of double-counting.
pub struct ResultAggregator {
    results: Vec<CheckResult>,
    index: HashMap<String, usize>,
    demo_mode: bool,
}

impl ResultAggregator {
    pub fn new(demo_mode: bool) -> Self {
        Self {
            results: Vec::new(),
            index: HashMap::new(),
            demo_mode,
        }
    }

    pub fn add(&mut self, result: CheckResult) {
        match self.index.get(&result.id) {
            Some(&i) => self.results[i] = result,
            None => {
                self.index.insert(result.id.clone(), self.results.len());
                self.results.push(result);
            }
        }
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Results needing operator attention (WARNING or CRITICAL).
    pub fn issues(&self) -> Vec<&CheckResult> {
        self.results
            .iter()
            .filter(|r| matches!(r.status, CheckStatus::Warning | CheckStatus::Critical))
            .collect()
    }

    /// Rollup derived on demand from the full result set.
    pub fn summary(&self) -> Summary {
        let mut counts = StatusCounts::default();
        let mut by_category: BTreeMap<_, StatusCounts> = BTreeMap::new();
        for r in &self.results {
            counts.bump(r.status);
            by_category.entry(r.category).or_default().bump(r.status);
        }
        Summary {
            total: self.results.len(),
            counts,
            by_category,
        }
    }

    /// 2 on any CRITICAL, else 1 on any WARNING, else 0. UNKNOWN never
    /// escalates the exit code on its own.
    pub fn exit_code(&self) -> i32 {
        let counts = self.summary().counts;
        if counts.critical > 0 {
            2
        } else if counts.warning > 0 {
            1
        } else {
            0
        }
    }

    /// Machine-readable result set for external consumers.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "summary": self.summary(),
            "results": self.results,
            "timestamp": Utc::now().to_rfc3339(),
            "demo_mode": self.demo_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CheckCategory;

    #[test]
    fn test_summary_counts_sum_to_total() {
        let mut agg = ResultAggregator::new(false);
        agg.add(result("OS-001", CheckCategory::Os, CheckStatus::Ok));
        agg.add(result("OS-002", CheckCategory::Os, CheckStatus::Warning));
        agg.add(result("K8S-001", CheckCategory::Kubernetes, CheckStatus::Critical));
        agg.add(result("SVC-001", CheckCategory::Services, CheckStatus::Unknown));

        let summary = agg.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.counts.sum(), summary.total);
        assert_eq!(summary.counts.ok, 1);
        assert_eq!(summary.counts.warning, 1);
        assert_eq!(summary.counts.critical, 1);
        assert_eq!(summary.counts.unknown, 1);
    }

    #[test]
    fn test_per_category_counts_sum_to_category_totals() {
        let mut agg = ResultAggregator::new(false);
        agg.add(result("OS-001", CheckCategory::Os, CheckStatus::Ok));
        agg.add(result("OS-002", CheckCategory::Os, CheckStatus::Warning));
        agg.add(result("K8S-001", CheckCategory::Kubernetes, CheckStatus::Ok));

        let summary = agg.summary();
        assert_eq!(summary.by_category[&CheckCategory::Os].sum(), 2);
        assert_eq!(summary.by_category[&CheckCategory::Kubernetes].sum(), 1);
        assert!(!summary.by_category.contains_key(&CheckCategory::Services));
    }

    #[test]
    fn test_re_adding_id_moves_counts() {
        let mut agg = ResultAggregator::new(false);
        agg.add(result("OS-001", CheckCategory::Os, CheckStatus::Critical));
        assert_eq!(agg.summary().counts.critical, 1);

        agg.add(result("OS-001", CheckCategory::Os, CheckStatus::Ok));
        let summary = agg.summary();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.counts.critical, 0);
        assert_eq!(summary.counts.ok, 1);
    }

    #[test]
    fn test_re_adding_id_keeps_position() {
        let mut agg = ResultAggregator::new(false);
        agg.add(result("OS-001", CheckCategory::Os, CheckStatus::Ok));
        agg.add(result("OS-002", CheckCategory::Os, CheckStatus::Ok));
        agg.add(result("OS-001", CheckCategory::Os, CheckStatus::Warning));

        let ids: Vec<&str> = agg.results().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["OS-001", "OS-002"]);
        assert_eq!(agg.results()[0].status, CheckStatus::Warning);
    }

    #[test]
    fn test_exit_code_monotonicity() {
        let mut agg = ResultAggregator::new(false);
        assert_eq!(agg.exit_code(), 0);

        agg.add(result("OS-001", CheckCategory::Os, CheckStatus::Unknown));
        // UNKNOWN alone never escalates
        assert_eq!(agg.exit_code(), 0);

        agg.add(result("OS-002", CheckCategory::Os, CheckStatus::Warning));
        assert_eq!(agg.exit_code(), 1);

        agg.add(result("OS-003", CheckCategory::Os, CheckStatus::Critical));
        assert_eq!(agg.exit_code(), 2);
    }

    #[test]
    fn test_issues_filters_warning_and_critical() {
        let mut agg = ResultAggregator::new(false);
        agg.add(result("OS-001", CheckCategory::Os, CheckStatus::Ok));
        agg.add(result("OS-002", CheckCategory::Os, CheckStatus::Warning));
        agg.add(result("OS-003", CheckCategory::Os, CheckStatus::Critical));
        agg.add(result("OS-004", CheckCategory::Os, CheckStatus::Unknown));

        let ids: Vec<&str> = agg.issues().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["OS-002", "OS-003"]);
    }

    #[test]
    fn test_to_json_shape() {
        let mut agg = ResultAggregator::new(true);
        agg.add(result("OS-001", CheckCategory::Os, CheckStatus::Ok));

        let doc = agg.to_json();
        assert_eq!(doc["demo_mode"], true);
        assert_eq!(doc["summary"]["total"], 1);
        assert_eq!(doc["summary"]["ok"], 1);
        assert_eq!(doc["summary"]["by_category"]["os"]["ok"], 1);
        assert_eq!(doc["results"][0]["id"], "OS-001");
        assert_eq!(doc["results"][0]["status"], "OK");
        assert!(doc["timestamp"].is_string());
    }

    fn result(id: &str, category: CheckCategory, status: CheckStatus) -> CheckResult {
        CheckResult {
            id: id.to_string(),
            name: id.to_string(),
            category,
            description: String::new(),
            status,
            value: "1".to_string(),
            threshold: None,
            unit: String::new(),
            message: String::new(),
            measured_at: Utc::now(),
            raw_output: String::new(),
        }
    }
}
