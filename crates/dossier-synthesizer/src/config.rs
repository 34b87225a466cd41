//! Configuration for the synthesis engine

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the synthesis engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizerConfig {
    /// Maximum evidence text length (characters); oversized items are skipped
    pub max_evidence_chars: usize,

    /// Number of candidate claims retrieved per evidence item
    pub candidate_count: usize,

    /// Maximum time for a single oracle call (seconds)
    pub oracle_timeout_secs: u64,

    /// Retry attempts after a failed or timed-out oracle call
    pub max_oracle_retries: u32,

    /// Base delay between oracle retries (milliseconds), doubled per attempt
    pub retry_base_delay_ms: u64,
}

impl SynthesizerConfig {
    /// Get the oracle timeout as a Duration
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    /// Retry delay for a given attempt (0-based), with exponential backoff
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms.saturating_mul(1 << attempt.min(16)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_evidence_chars == 0 {
            return Err("max_evidence_chars must be greater than 0".to_string());
        }
        if self.candidate_count == 0 {
            return Err("candidate_count must be greater than 0".to_string());
        }
        if self.oracle_timeout_secs == 0 {
            return Err("oracle_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Fast preset: tight timeout, no retries
    pub fn fast() -> Self {
        Self {
            max_evidence_chars: dossier_domain::MAX_EVIDENCE_TEXT_CHARS,
            candidate_count: 3,
            oracle_timeout_secs: 15,
            max_oracle_retries: 0,
            retry_base_delay_ms: 250,
        }
    }

    /// Thorough preset: wider candidate net, patient retries
    pub fn thorough() -> Self {
        Self {
            max_evidence_chars: dossier_domain::MAX_EVIDENCE_TEXT_CHARS,
            candidate_count: 10,
            oracle_timeout_secs: 120,
            max_oracle_retries: 3,
            retry_base_delay_ms: 1_000,
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

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            max_evidence_chars: dossier_domain::MAX_EVIDENCE_TEXT_CHARS,
            candidate_count: 5,
            oracle_timeout_secs: 60,
            max_oracle_retries: 2,
            retry_base_delay_ms: 500,
        }
    }
}
