//! Core Auditor implementation

use crate::rules::{run_rule_checks, sample_claims_for_eval};
use crate::{AuditMetrics, AuditorConfig, AuditorError};
use dossier_domain::traits::ClaimStore;
use dossier_domain::{AuditClaim, ClaimIssue, IssueId, IssueKey, IssueType, Severity};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

/// Current timestamp in seconds since Unix epoch
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Outcome of one audit run for one user
#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    /// Findings recorded (or, in dry-run mode, that would have been)
    pub issues: Vec<ClaimIssue>,

    /// Duplicate-pair findings among them
    pub duplicates_found: usize,

    /// Missing-field findings among them
    pub missing_fields_found: usize,

    /// Findings skipped because the identical issue already exists,
    /// open or dismissed
    pub suppressed: usize,
}

/// Audit service for claim quality
///
/// Responsible for:
/// - Flagging possible-duplicate claim pairs
/// - Flagging claims missing a type or label
/// - Honoring user dismissals: a dismissed finding is never re-raised
/// - Sampling the least-supported claims for manual evaluation
///
/// # Examples
///
/// ```no_run
/// use dossier_auditor::{Auditor, AuditorConfig};
/// use dossier_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqliteStore::new(":memory:")?;
/// let mut auditor = Auditor::new(AuditorConfig::default());
///
/// let report = auditor.audit(&mut store, "user-1")?;
/// println!("{} findings", report.issues.len());
/// # Ok(())
/// # }
/// ```
pub struct Auditor {
    config: AuditorConfig,
    metrics: AuditMetrics,
}

impl Auditor {
    /// Create a new Auditor with the given configuration
    pub fn new(config: AuditorConfig) -> Self {
        Self {
            config,
            metrics: AuditMetrics::new(),
        }
    }

    /// Create an Auditor with default configuration
    pub fn default_config() -> Self {
        Self::new(AuditorConfig::default())
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &AuditMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Run all quality rules for one user and record the findings
    ///
    /// A finding whose `(claim, related claim, type)` identity matches any
    /// existing issue is suppressed, whether that issue is open or was
    /// dismissed by the user. In dry-run mode findings are reported but
    /// nothing is written.
    pub fn audit<S: ClaimStore>(
        &mut self,
        store: &mut S,
        user_id: &str,
    ) -> Result<AuditReport, AuditorError>
    where
        S::Error: std::fmt::Display,
    {
        let start = SystemTime::now();
        let mut report = AuditReport::default();

        let rows = store
            .audit_claims(user_id)
            .map_err(|e| AuditorError::Store(e.to_string()))?;

        debug!("Auditing {} claims for user '{}'", rows.len(), user_id);

        let existing_keys: HashSet<IssueKey> = store
            .issues_for_user(user_id)
            .map_err(|e| AuditorError::Store(e.to_string()))?
            .iter()
            .map(|issue| issue.key())
            .collect();

        let now = current_timestamp();
        let checks = run_rule_checks(&rows, self.config.duplicate_threshold);
        let mut findings = Vec::new();

        for dup in checks.duplicates {
            findings.push(ClaimIssue {
                id: IssueId::new(),
                claim_id: dup.claim_id,
                issue_type: IssueType::Duplicate,
                severity: Severity::Warning,
                message: format!(
                    "Possible duplicate of '{}' ({:.0}% label similarity)",
                    dup.related_label,
                    dup.similarity * 100.0
                ),
                related_claim_id: Some(dup.related_claim_id),
                created_at: now,
                dismissed_at: None,
            });
        }

        for missing in checks.missing_fields {
            findings.push(ClaimIssue {
                id: IssueId::new(),
                claim_id: missing.claim_id,
                issue_type: IssueType::MissingField,
                severity: Severity::Error,
                message: format!("Claim is missing its {}", missing.field.as_str()),
                related_claim_id: None,
                created_at: now,
                dismissed_at: None,
            });
        }

        for issue in findings {
            if existing_keys.contains(&issue.key()) {
                report.suppressed += 1;
                continue;
            }

            match issue.issue_type {
                IssueType::Duplicate => report.duplicates_found += 1,
                IssueType::MissingField => report.missing_fields_found += 1,
            }

            if self.config.dry_run {
                info!("DRY RUN: would record issue: {}", issue.message);
            } else {
                store
                    .insert_issue(issue.clone())
                    .map_err(|e| AuditorError::Store(e.to_string()))?;
            }

            report.issues.push(issue);
        }

        self.metrics.record_duplicates(report.duplicates_found);
        self.metrics.record_missing_fields(report.missing_fields_found);
        self.metrics.record_suppressed(report.suppressed);
        self.metrics.record_audit();
        if let Ok(elapsed) = start.elapsed() {
            self.metrics.total_runtime_secs += elapsed.as_secs();
        }

        info!(
            "Audit for user '{}': {} duplicates, {} missing fields, {} suppressed",
            user_id, report.duplicates_found, report.missing_fields_found, report.suppressed
        );

        Ok(report)
    }

    /// Sample the user's claims most in need of manual review
    ///
    /// Least-supported claims first, newest breaking ties, capped at the
    /// configured sample size.
    pub fn sample_for_eval<S: ClaimStore>(
        &self,
        store: &S,
        user_id: &str,
    ) -> Result<Vec<AuditClaim>, AuditorError>
    where
        S::Error: std::fmt::Display,
    {
        let rows = store
            .audit_claims(user_id)
            .map_err(|e| AuditorError::Store(e.to_string()))?;

        Ok(sample_claims_for_eval(&rows, self.config.eval_sample_size))
    }
}
