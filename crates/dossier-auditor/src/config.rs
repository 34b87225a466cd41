//! Configuration for the auditor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for audit runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditorConfig {
    /// Label similarity above which two same-type claims are flagged as
    /// possible duplicates
    pub duplicate_threshold: f64,

    /// Maximum claims returned by evaluation sampling
    pub eval_sample_size: usize,

    /// Minutes between background audit cycles
    pub audit_interval_minutes: u64,

    /// Report findings without writing issues
    pub dry_run: bool,
}

impl AuditorConfig {
    /// Get the audit interval as a Duration
    pub fn audit_interval(&self) -> Duration {
        Duration::from_secs(self.audit_interval_minutes * 60)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.duplicate_threshold) {
            return Err("duplicate_threshold must be within [0, 1]".to_string());
        }
        if self.eval_sample_size == 0 {
            return Err("eval_sample_size must be greater than 0".to_string());
        }
        if self.audit_interval_minutes == 0 {
            return Err("audit_interval_minutes must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Strict preset: lower similarity bar, larger evaluation samples
    pub fn strict() -> Self {
        Self {
            duplicate_threshold: 0.80,
            eval_sample_size: 20,
            audit_interval_minutes: 30,
            dry_run: false,
        }
    }

    /// Lenient preset: only near-identical labels are flagged
    pub fn lenient() -> Self {
        Self {
            duplicate_threshold: 0.92,
            eval_sample_size: 5,
            audit_interval_minutes: 240,
            dry_run: false,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for AuditorConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold: 0.85,
            eval_sample_size: 10,
            audit_interval_minutes: 60,
            dry_run: false,
        }
    }
}
