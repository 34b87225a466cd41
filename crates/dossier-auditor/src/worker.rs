//! Background worker for continuous audit operation

use crate::{Auditor, AuditorConfig, AuditorError};
use dossier_domain::traits::ClaimStore;
use tokio::time::{interval, Duration};

/// Background worker that runs the Auditor on a schedule
///
/// Runs an audit cycle over a fixed set of users at the interval defined
/// by the configuration.
///
/// # Examples
///
/// ```no_run
/// use dossier_auditor::{AuditWorker, AuditorConfig};
/// use dossier_store::SqliteStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut store = SqliteStore::new("dossier.db")?;
///     let mut worker = AuditWorker::new(AuditorConfig::default());
///
///     // Run indefinitely (until Ctrl+C)
///     worker.run(&mut store, vec!["user-1".to_string()]).await?;
///     Ok(())
/// }
/// ```
pub struct AuditWorker {
    auditor: Auditor,
    interval: Duration,
}

impl AuditWorker {
    /// Create a new background worker with the given configuration
    pub fn new(config: AuditorConfig) -> Self {
        let interval = config.audit_interval();
        Self {
            auditor: Auditor::new(config),
            interval,
        }
    }

    /// Create a worker with default configuration
    pub fn default_config() -> Self {
        Self::new(AuditorConfig::default())
    }

    /// Run the worker indefinitely
    ///
    /// Audits every user in `user_ids` once per cycle at the configured
    /// interval, until a shutdown signal (Ctrl+C) is received. A failed
    /// audit for one user is logged and does not stop the cycle.
    pub async fn run<S>(&mut self, store: &mut S, user_ids: Vec<String>) -> Result<(), AuditorError>
    where
        S: ClaimStore,
        S::Error: std::fmt::Display,
    {
        let mut ticker = interval(self.interval);

        tracing::info!(
            "Audit worker started ({} users, interval: {:?})",
            user_ids.len(),
            self.interval
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("Starting audit cycle");
                    self.audit_all(store, &user_ids);
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping auditor");
                    break;
                }
            }
        }

        let metrics = self.auditor.metrics();
        tracing::info!("Auditor stopped. Final metrics:\n{}", metrics.summary());

        Ok(())
    }

    /// Run for a specific number of cycles (useful for testing)
    pub async fn run_cycles<S>(
        &mut self,
        store: &mut S,
        user_ids: Vec<String>,
        cycles: usize,
    ) -> Result<(), AuditorError>
    where
        S: ClaimStore,
        S::Error: std::fmt::Display,
    {
        let mut ticker = interval(self.interval);

        tracing::info!(
            "Audit worker started for {} cycles ({} users, interval: {:?})",
            cycles,
            user_ids.len(),
            self.interval
        );

        for cycle in 0..cycles {
            ticker.tick().await;

            tracing::debug!("Starting audit cycle {}/{}", cycle + 1, cycles);
            self.audit_all(store, &user_ids);
        }

        let metrics = self.auditor.metrics();
        tracing::info!(
            "Auditor finished {} cycles. Final metrics:\n{}",
            cycles,
            metrics.summary()
        );

        Ok(())
    }

    fn audit_all<S>(&mut self, store: &mut S, user_ids: &[String])
    where
        S: ClaimStore,
        S::Error: std::fmt::Display,
    {
        for user_id in user_ids {
            match self.auditor.audit(store, user_id) {
                Ok(report) => {
                    tracing::info!(
                        "Audit for '{}' completed: {} flagged, {} suppressed",
                        user_id,
                        report.issues.len(),
                        report.suppressed
                    );
                }
                Err(e) => {
                    tracing::error!("Audit for '{}' failed: {}", user_id, e);
                }
            }
        }
    }

    /// Get a reference to the auditor's current metrics
    pub fn metrics(&self) -> &crate::AuditMetrics {
        self.auditor.metrics()
    }

    /// Reset the auditor's metrics counters
    pub fn reset_metrics(&mut self) {
        self.auditor.reset_metrics();
    }
}
