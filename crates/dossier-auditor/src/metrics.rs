//! Metrics collection for audit operations

/// Metrics collected across audit runs
#[derive(Debug, Clone, Default)]
pub struct AuditMetrics {
    /// Duplicate-pair findings recorded
    pub duplicates_flagged: usize,

    /// Missing-field findings recorded
    pub missing_fields_flagged: usize,

    /// Findings suppressed by an existing or dismissed issue
    pub suppressed: usize,

    /// Audit cycles completed
    pub audit_count: usize,

    /// Total runtime in seconds
    pub total_runtime_secs: u64,
}

impl AuditMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record duplicate findings
    pub fn record_duplicates(&mut self, count: usize) {
        self.duplicates_flagged += count;
    }

    /// Record missing-field findings
    pub fn record_missing_fields(&mut self, count: usize) {
        self.missing_fields_flagged += count;
    }

    /// Record suppressed findings
    pub fn record_suppressed(&mut self, count: usize) {
        self.suppressed += count;
    }

    /// Record an audit cycle completion
    pub fn record_audit(&mut self) {
        self.audit_count += 1;
    }

    /// Total findings recorded across all categories
    pub fn total_flagged(&self) -> usize {
        self.duplicates_flagged + self.missing_fields_flagged
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Audit Metrics Summary".to_string(),
            "=====================".to_string(),
            format!("Audit cycles: {}", self.audit_count),
            format!("Total runtime: {}s", self.total_runtime_secs),
            format!("Duplicates flagged: {}", self.duplicates_flagged),
            format!("Missing fields flagged: {}", self.missing_fields_flagged),
            format!("Suppressed: {}", self.suppressed),
            format!("Total flagged: {}", self.total_flagged()),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = AuditMetrics::new();
        assert_eq!(metrics.total_flagged(), 0);
        assert_eq!(metrics.audit_count, 0);
    }

    #[test]
    fn test_record_and_total() {
        let mut metrics = AuditMetrics::new();
        metrics.record_duplicates(3);
        metrics.record_missing_fields(2);
        metrics.record_suppressed(1);
        metrics.record_audit();

        assert_eq!(metrics.duplicates_flagged, 3);
        assert_eq!(metrics.missing_fields_flagged, 2);
        assert_eq!(metrics.suppressed, 1);
        assert_eq!(metrics.total_flagged(), 5);
        assert_eq!(metrics.audit_count, 1);
    }

    #[test]
    fn test_reset() {
        let mut metrics = AuditMetrics::new();
        metrics.record_duplicates(5);
        metrics.record_audit();

        metrics.reset();

        assert_eq!(metrics.total_flagged(), 0);
        assert_eq!(metrics.audit_count, 0);
    }

    #[test]
    fn test_summary() {
        let mut metrics = AuditMetrics::new();
        metrics.record_duplicates(2);
        metrics.record_missing_fields(1);
        metrics.record_audit();
        metrics.total_runtime_secs = 7;

        let summary = metrics.summary();
        assert!(summary.contains("Audit cycles: 1"));
        assert!(summary.contains("Duplicates flagged: 2"));
        assert!(summary.contains("Missing fields flagged: 1"));
        assert!(summary.contains("Total runtime: 7s"));
    }
}
